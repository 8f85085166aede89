use serde_json::Value;

/// Un-typed message handed to [`ConnectionHandle::send`](crate::ConnectionHandle::send)
///
/// Structured and plain-text messages travel through the same path; how
/// either is framed on the wire is up to the connection manager.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Json(Value),
}

impl Payload {
    /// Get the payload as text, if it is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(s) => Some(s),
            Payload::Json(_) => None,
        }
    }

    /// Get the payload as JSON, if it is JSON
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Text(_) => None,
            Payload::Json(v) => Some(v),
        }
    }

    /// Check if payload is text
    pub fn is_text(&self) -> bool {
        matches!(self, Payload::Text(_))
    }

    /// Check if payload is JSON
    pub fn is_json(&self) -> bool {
        matches!(self, Payload::Json(_))
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}
