use serde_json::Value;

use crate::infer::openai::{OpenAIMessage, ROLE_SYSTEM, ROLE_USER};

pub const DEFAULT_PERSONA: &str = "คุณคือผู้ช่วยพูดไทยใน Roblox เป็นมิตร";

pub fn system(persona: &str) -> OpenAIMessage {
    OpenAIMessage {
        role: ROLE_SYSTEM,
        content: Value::String(persona.into()),
    }
}

/// The caller's message goes out exactly as received, `null` included.
pub fn user(message: Value) -> OpenAIMessage {
    OpenAIMessage {
        role: ROLE_USER,
        content: message,
    }
}
