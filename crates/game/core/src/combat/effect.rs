//! Cross-system messages.

use serde_json::Value;

/// Fire-and-forget message from one system's reactor to another system.
///
/// Effects are delivered after every hit of the attack has been resolved. An
/// effect whose target is unregistered, or registered without an effect
/// handler, is dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineEffect {
    pub target: &'static str,
    pub action: String,
    pub payload: Value,
}

impl PipelineEffect {
    pub fn new(target: &'static str, action: impl Into<String>, payload: Value) -> Self {
        Self {
            target,
            action: action.into(),
            payload,
        }
    }

    /// Effect without a payload.
    pub fn signal(target: &'static str, action: impl Into<String>) -> Self {
        Self::new(target, action, Value::Null)
    }
}
