//! The naming side of the engine: per-type rendering rules dispatched by
//! runtime type, composed recursively through the service.

mod separation;

pub use separation::{NameBuilder, SeparationRule, SeparatorPolicy};

use crate::error::RenderError;
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Option names the standard namers recognize. Unknown options are
/// ignored, never errors, so params can be shared across namers.
pub mod params {
    /// Append the media's year suffix where one is known.
    pub const INCLUDE_YEAR: &str = "includeYear";
    /// Force-render an optional episode title.
    pub const ALWAYS_INCLUDE_TITLE: &str = "alwaysIncludeTitle";
    /// Prefer a stored literal name over the computed one.
    pub const PREFER_EXPLICIT_NAME: &str = "preferExplicitName";
    /// Override the delimiter joining a release's tag list.
    pub const TAG_SEPARATOR: &str = "tagSeparator";
}

/// Per-call rendering options: a name→value map each namer consults for
/// the options it recognizes.
#[derive(Debug, Clone, Default)]
pub struct NamingParams {
    values: HashMap<String, ParamValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Bool(bool),
    Text(String),
}

impl NamingParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flag(mut self, name: &str, on: bool) -> Self {
        self.values.insert(name.to_string(), ParamValue::Bool(on));
        self
    }

    pub fn with_text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.values
            .insert(name.to_string(), ParamValue::Text(value.into()));
        self
    }

    /// An absent or non-boolean option reads as `false`.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(ParamValue::Bool(true)))
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ParamValue::Text(value)) => Some(value),
            _ => None,
        }
    }
}

/// Per-type rendering rule.
///
/// A namer for a composite entity renders nested fields through `service`,
/// not by calling a sibling namer directly, so registering a namer for a
/// new entity kind extends the dispatch without touching existing ones.
pub trait Namer<T>: Send + Sync {
    fn name(
        &self,
        obj: &T,
        service: &NamingService,
        params: &NamingParams,
    ) -> Result<String, RenderError>;
}

trait ErasedNamer: Send + Sync {
    fn name_any(
        &self,
        obj: &dyn Any,
        service: &NamingService,
        params: &NamingParams,
    ) -> Result<String, RenderError>;
}

struct TypedNamer<T, N> {
    namer: N,
    _target: PhantomData<fn(&T)>,
}

impl<T: 'static, N: Namer<T>> ErasedNamer for TypedNamer<T, N> {
    fn name_any(
        &self,
        obj: &dyn Any,
        service: &NamingService,
        params: &NamingParams,
    ) -> Result<String, RenderError> {
        let obj = obj
            .downcast_ref::<T>()
            .ok_or(RenderError::NoNamer(type_name::<T>()))?;
        self.namer.name(obj, service, params)
    }
}

/// Dispatches `name` calls to the namer registered for the object's type.
///
/// The table is keyed by `TypeId`, resolved once at registration; the same
/// snapshot discipline as the parsing registry applies.
pub struct NamingService {
    table: RwLock<HashMap<TypeId, Arc<dyn ErasedNamer>>>,
}

impl Default for NamingService {
    fn default() -> Self {
        Self::new()
    }
}

impl NamingService {
    pub fn new() -> Self {
        NamingService {
            table: RwLock::new(HashMap::new()),
        }
    }

    /// Register (or replace) the namer for entity type `T`.
    pub fn register_namer<T: 'static>(&self, namer: impl Namer<T> + 'static) {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        table.insert(
            TypeId::of::<T>(),
            Arc::new(TypedNamer {
                namer,
                _target: PhantomData::<fn(&T)>,
            }),
        );
        debug!(target_type = type_name::<T>(), "namer registered");
    }

    /// Render `obj` to canonical text. Objects this service never parsed
    /// render the same way; only the registered namer matters.
    pub fn name<T: Any>(
        &self,
        obj: &T,
        params: &NamingParams,
    ) -> Result<String, RenderError> {
        let namer = {
            let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
            table.get(&TypeId::of::<T>()).cloned()
        };
        match namer {
            Some(namer) => namer.name_any(obj, self, params),
            None => Err(RenderError::NoNamer(type_name::<T>())),
        }
    }
}

impl fmt::Debug for NamingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered = self
            .table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("NamingService")
            .field("registered", &registered)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl Namer<String> for Upper {
        fn name(
            &self,
            obj: &String,
            _service: &NamingService,
            _params: &NamingParams,
        ) -> Result<String, RenderError> {
            Ok(obj.to_uppercase())
        }
    }

    #[test]
    fn dispatch_by_type() {
        let service = NamingService::new();
        service.register_namer::<String>(Upper);

        let params = NamingParams::new();
        assert_eq!(service.name(&"psych".to_string(), &params).unwrap(), "PSYCH");
        assert!(matches!(
            service.name(&42u32, &params),
            Err(RenderError::NoNamer(_))
        ));
    }

    #[test]
    fn unknown_params_are_ignored() {
        let params = NamingParams::new()
            .with_flag("someUnknownOption", true)
            .with_flag(params::INCLUDE_YEAR, true);
        assert!(params.flag(params::INCLUDE_YEAR));
        assert!(!params.flag("neverSet"));
    }
}
