//! Registry stress: readers parsing while another thread churns
//! registrations. Every read must see a list that is entirely pre- or
//! entirely post-mutation; no call may panic or observe a torn list.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use subforge_core::mapper::{Mapper, require_text};
use subforge_core::matcher::{GroupEntry, PatternMatcher};
use subforge_core::property::{PropertyKey, PropertyMapping};
use subforge_core::{MappingError, Parser, ParsingService, Position};
use subforge_model::EntityKind;

const NAME: PropertyKey = PropertyKey::new(EntityKind::Series, "name");

struct NameMapper;

impl Mapper<String> for NameMapper {
    fn known_properties(&self) -> &[PropertyKey] {
        &[NAME]
    }

    fn map(&self, props: &PropertyMapping) -> Result<String, MappingError> {
        require_text(props, NAME)
    }
}

fn name_parser(pattern: &str) -> Parser<String> {
    Parser::new(
        PatternMatcher::new(pattern, [(1, GroupEntry::Leaf(NAME))]).unwrap(),
        NameMapper,
    )
}

#[test]
fn parse_stays_consistent_under_registration_churn() {
    let service = Arc::new(ParsingService::new("stress"));
    service
        .register_parser("stable", Position::Last, name_parser(r"(\w+)\.S\d+E\d+"))
        .unwrap();

    let stop = Arc::new(AtomicBool::new(false));

    thread::scope(|scope| {
        for _ in 0..8 {
            let service = Arc::clone(&service);
            let stop = Arc::clone(&stop);
            scope.spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    // The stable parser is never unregistered, so every
                    // read must succeed; the answer depends only on
                    // whether the volatile catch-all was in the snapshot.
                    let name = service.parse::<String>("Psych.S08E01").unwrap();
                    assert!(name == "Psych" || name == "Psych.S08E01");
                }
            });
        }

        let churn = Arc::clone(&service);
        scope.spawn(move || {
            for _ in 0..2_000 {
                churn
                    .register_parser("volatile", Position::First, name_parser(r"(.+)"))
                    .unwrap();
                churn.unregister_all::<String>("volatile");
            }
            stop.store(true, Ordering::Relaxed);
        });
    });

    // Churn fully unwound: only the stable parser remains.
    assert_eq!(service.parser_count::<String>(), 1);
    assert_eq!(service.parse::<String>("Psych.S08E01").unwrap(), "Psych");
}

#[test]
fn unregistering_a_source_mid_flight_never_breaks_other_sources() {
    let service = Arc::new(ParsingService::new("stress"));
    service
        .register_parser("stable", Position::Last, name_parser(r"(\w+)\.S\d+E\d+"))
        .unwrap();
    service
        .register_parser("volatile", Position::Last, name_parser(r"(.+)"))
        .unwrap();

    thread::scope(|scope| {
        let remover = Arc::clone(&service);
        scope.spawn(move || {
            remover.unregister_all::<String>("volatile");
        });

        for _ in 0..4 {
            let service = Arc::clone(&service);
            scope.spawn(move || {
                for _ in 0..1_000 {
                    // Matches the stable grammar either way.
                    assert_eq!(
                        service.parse::<String>("Psych.S08E01").unwrap(),
                        "Psych"
                    );
                }
            });
        }
    });

    assert_eq!(service.parser_count::<String>(), 1);
}
