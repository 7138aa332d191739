//! Fan-out over external metadata sources.
//!
//! Sources supply already-typed domain objects independently of the parser;
//! the aggregator runs lookups in parallel with a bounded pool and isolates
//! per-source failures, so one broken source never aborts the others.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use subforge_model::Media;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// What to look up, usually assembled from a parsed release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaQuery {
    pub title: String,
    pub year: Option<u16>,
    pub season: Option<u16>,
    pub episode: Option<u16>,
}

impl MediaQuery {
    pub fn titled(title: impl Into<String>) -> Self {
        MediaQuery {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// One external metadata provider.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    fn id(&self) -> &str;

    async fn lookup(&self, query: &MediaQuery) -> anyhow::Result<Vec<Media>>;
}

/// Results of one source that answered.
#[derive(Debug, Clone)]
pub struct SourceResults {
    pub source: String,
    pub media: Vec<Media>,
}

/// Queries every registered source concurrently, bounded by a semaphore.
///
/// Sources share no mutable state; results come back in registration
/// (precedence) order regardless of completion order.
pub struct MetadataAggregator {
    sources: Vec<Arc<dyn MetadataSource>>,
    limit: Arc<Semaphore>,
}

impl MetadataAggregator {
    pub fn new(max_concurrent: usize) -> Self {
        MetadataAggregator {
            sources: Vec::new(),
            limit: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    pub fn with_source(mut self, source: Arc<dyn MetadataSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub async fn lookup_all(&self, query: &MediaQuery) -> Vec<SourceResults> {
        let mut tasks = JoinSet::new();
        for (index, source) in self.sources.iter().enumerate() {
            let source = Arc::clone(source);
            let limit = Arc::clone(&self.limit);
            let query = query.clone();
            tasks.spawn(async move {
                // Closing the semaphore is not part of this type's API, so
                // acquisition only fails if the runtime is tearing down.
                let _permit = limit.acquire_owned().await;
                let id = source.id().to_string();
                let outcome = source.lookup(&query).await;
                (index, id, outcome)
            });
        }

        let mut answered: Vec<(usize, SourceResults)> = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, source, Ok(media))) => {
                    debug!(source, results = media.len(), "metadata lookup succeeded");
                    answered.push((index, SourceResults { source, media }));
                }
                Ok((_, source, Err(error))) => {
                    warn!(source, %error, "metadata lookup failed, skipping source");
                }
                Err(join_error) => {
                    warn!(%join_error, "metadata lookup task aborted");
                }
            }
        }

        answered.sort_by_key(|(index, _)| *index);
        answered.into_iter().map(|(_, results)| results).collect()
    }
}

impl fmt::Debug for MetadataAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataAggregator")
            .field("sources", &self.sources.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subforge_model::{Movie, SeriesRef};

    struct FixedSource {
        id: &'static str,
        media: Vec<Media>,
    }

    #[async_trait]
    impl MetadataSource for FixedSource {
        fn id(&self) -> &str {
            self.id
        }

        async fn lookup(&self, _query: &MediaQuery) -> anyhow::Result<Vec<Media>> {
            Ok(self.media.clone())
        }
    }

    struct BrokenSource;

    #[async_trait]
    impl MetadataSource for BrokenSource {
        fn id(&self) -> &str {
            "broken"
        }

        async fn lookup(&self, _query: &MediaQuery) -> anyhow::Result<Vec<Media>> {
            anyhow::bail!("upstream returned 503")
        }
    }

    #[tokio::test]
    async fn one_failing_source_never_aborts_the_others() {
        let movie = Media::Movie(Movie::new("The Dark Knight", Some(2008)));
        let aggregator = MetadataAggregator::new(4)
            .with_source(Arc::new(FixedSource {
                id: "first",
                media: vec![movie.clone()],
            }))
            .with_source(Arc::new(BrokenSource))
            .with_source(Arc::new(FixedSource {
                id: "second",
                media: Vec::new(),
            }));

        let results = aggregator
            .lookup_all(&MediaQuery::titled("The Dark Knight"))
            .await;

        // Precedence order survives, the broken source is just absent.
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].source, "first");
        assert_eq!(results[0].media, vec![movie]);
        assert_eq!(results[1].source, "second");
    }

    #[tokio::test]
    async fn pool_bound_of_one_still_answers_every_source() {
        let episode = Media::Episode(subforge_model::Episode::numbered(
            SeriesRef::new("Psych"),
            8u16,
            1u16,
        ));
        let mut aggregator = MetadataAggregator::new(1);
        for id in ["a", "b", "c"] {
            aggregator = aggregator.with_source(Arc::new(FixedSource {
                id,
                media: vec![episode.clone()],
            }));
        }

        let results = aggregator.lookup_all(&MediaQuery::titled("Psych")).await;
        assert_eq!(results.len(), 3);
    }
}
