use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::service;

/// Inbound `POST /chat` body. Only `message` is read.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: Value,
}

impl ChatRequest {
    /// Accepts any JSON object. `message` is taken as-is with no type or length
    /// checks, and a missing field becomes `null`.
    pub fn from_slice(body: &[u8]) -> service::Result<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|err| service::Error::BadRequest(err.to_string().into()))?;
        match value {
            Value::Object(mut fields) => Ok(Self {
                message: fields.remove("message").unwrap_or(Value::Null),
            }),
            other => Err(service::Error::BadRequest(
                format!("expected a JSON object, got {}", json_type(&other)).into(),
            )),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: Box<str>,
}

impl From<&str> for ChatReply {
    fn from(reply: &str) -> Self {
        Self { reply: reply.into() }
    }
}

impl From<Box<str>> for ChatReply {
    fn from(reply: Box<str>) -> Self {
        Self { reply }
    }
}
