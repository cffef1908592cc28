//! The entity seam between the registry and the host's window model.

use std::collections::BTreeMap;

use serde_json::Value;

/// A live stateful entity that can be captured into a flat record.
///
/// The host's buffer/frame/window model stays behind this trait. The
/// registry needs only a type tag, an ambient context string, and named
/// access to state variables for the generic save-list mode.
pub trait Stateful {
    /// Tag identifying the handler pair for this entity's current mode.
    fn handler_tag(&self) -> &str;

    /// Ambient context captured alongside the payload, e.g. a working
    /// directory.
    fn context(&self) -> String;

    /// Reads a named state variable.
    fn variable(&self, name: &str) -> Option<Value>;

    /// Writes a named state variable.
    fn set_variable(&mut self, name: &str, value: Value);
}

/// Default stand-in produced when a record's handler is unknown or its
/// backing capability is unavailable at restore time.
///
/// Keeps the record's tag and context so a later pass with the handler
/// available can identify what the placeholder stands for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placeholder {
    tag: String,
    context: String,
    variables: BTreeMap<String, Value>,
}

impl Placeholder {
    /// Creates a placeholder remembering the record's tag and context.
    pub fn new(tag: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            context: context.into(),
            variables: BTreeMap::new(),
        }
    }
}

impl Stateful for Placeholder {
    fn handler_tag(&self) -> &str {
        &self.tag
    }

    fn context(&self) -> String {
        self.context.clone()
    }

    fn variable(&self, name: &str) -> Option<Value> {
        self.variables.get(name).cloned()
    }

    fn set_variable(&mut self, name: &str, value: Value) {
        self.variables.insert(name.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_keeps_tag_and_context() {
        let p = Placeholder::new("text", "/home/user/project");
        assert_eq!(p.handler_tag(), "text");
        assert_eq!(p.context(), "/home/user/project");
        assert_eq!(p.variable("anything"), None);
    }

    #[test]
    fn test_placeholder_variables() {
        let mut p = Placeholder::new("text", "");
        p.set_variable("read-only", Value::Bool(true));
        assert_eq!(p.variable("read-only"), Some(Value::Bool(true)));
    }
}
