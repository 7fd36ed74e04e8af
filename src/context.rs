use serde::{Serialize, Serializer};
use serde_json::Value;
use std::sync::Arc;

/// Opaque request/operation identity attached to a logger.
///
/// The value is shared by reference between every logger derived from the
/// one it was attached to and is written verbatim into the `context` key.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceContext(Arc<Value>);

impl TraceContext {
    /// Capture any serializable value. A value that cannot be represented
    /// as JSON degrades to `null`.
    pub fn new<T: Serialize>(value: T) -> Self {
        Self(Arc::new(serde_json::to_value(value).unwrap_or(Value::Null)))
    }

    pub fn from_value(value: Value) -> Self {
        Self(Arc::new(value))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for TraceContext {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl From<&str> for TraceContext {
    fn from(value: &str) -> Self {
        Self::from_value(Value::String(value.to_string()))
    }
}

impl From<String> for TraceContext {
    fn from(value: String) -> Self {
        Self::from_value(Value::String(value))
    }
}

impl Serialize for TraceContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}
