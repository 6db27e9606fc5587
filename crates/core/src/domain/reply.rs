use anyhow::Context;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A read-endpoint payload: either the data, or the backend saying it has none.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    Ready(T),
    Unavailable(String),
}

impl<T: DeserializeOwned> Reply<T> {
    /// A truthy `error` field wins over any other content of the body.
    pub fn from_value(value: Value) -> anyhow::Result<Self> {
        if let Some(err) = value.get("error").filter(|v| is_truthy(v)) {
            let reason = match err {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Ok(Self::Unavailable(reason));
        }

        let parsed = serde_json::from_value::<T>(value)
            .with_context(|| format!("unexpected payload shape for {}", std::any::type_name::<T>()))?;
        Ok(Self::Ready(parsed))
    }
}

impl<T> Reply<T> {
    pub fn unavailable_reason(&self) -> Option<&str> {
        match self {
            Self::Ready(_) => None,
            Self::Unavailable(reason) => Some(reason),
        }
    }
}

/// Truthiness as the dashboard's JSON producers understand it.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
