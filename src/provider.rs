//! Pluggable data providers and the process-global provider registry

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

/// Query value passed through to a data provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Str(String),
    Bytes(Vec<u8>),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

/// Error returned by a data provider read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ProviderError(pub String);

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// External source of segment values.
///
/// Providers are registered once at startup under a name and looked up by
/// `Provider` segments on every generation; a read error degrades the
/// segment to its declared fallback.
pub trait DataProvider: Send + Sync {
    fn read(&self, query: &[Value]) -> Result<i64, ProviderError>;
}

type Registry = RwLock<HashMap<String, Arc<dyn DataProvider>>>;

static PROVIDERS: OnceLock<Registry> = OnceLock::new();

fn providers() -> &'static Registry {
    PROVIDERS.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Register a data provider under `name`, replacing any previous one.
///
/// Expected to happen during process startup, before builders that reference
/// the provider are constructed.
pub fn register(name: impl Into<String>, provider: impl DataProvider + 'static) {
    providers().write().insert(name.into(), Arc::new(provider));
}

/// True if a provider is registered under `name`.
pub fn registered(name: &str) -> bool {
    providers().read().contains_key(name)
}

/// Look up and query a provider. The registry lock is not held across the
/// provider call.
pub(crate) fn read(name: &str, query: &[Value]) -> Result<i64, ProviderError> {
    let provider = providers().read().get(name).cloned();
    match provider {
        Some(p) => p.read(query),
        None => Err(ProviderError::new("data not found")),
    }
}
