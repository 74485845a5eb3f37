use std::fmt;

use serde::{Serialize, Serializer};

// -- Function selector --

/// Server-side behavior selector sent as the `function` body field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Function {
    /// Plain conversation (the server default)
    Chat,
    /// Web search
    Search,
    /// Translation, takes `to` and optionally `from`
    Translate,
    /// Idea generation, takes `topic`
    Brainstorm,
    /// Code work, takes `action`, `language`, `code`, `error`
    Code,
    /// URL or content analysis, takes `url`, `question`, `focus`
    Analyze,
    /// Any function the client does not know about
    Custom(String),
}

impl Function {
    /// Wire name of the function
    pub fn as_str(&self) -> &str {
        match self {
            Self::Chat => "chat",
            Self::Search => "search",
            Self::Translate => "translate",
            Self::Brainstorm => "brainstorm",
            Self::Code => "code",
            Self::Analyze => "analyze",
            Self::Custom(name) => name,
        }
    }
}

impl From<&str> for Function {
    fn from(name: &str) -> Self {
        match name {
            "chat" => Self::Chat,
            "search" => Self::Search,
            "translate" => Self::Translate,
            "brainstorm" => Self::Brainstorm,
            "code" => Self::Code,
            "analyze" => Self::Analyze,
            other => Self::Custom(other.to_owned()),
        }
    }
}

impl From<String> for Function {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Function {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Action for [`Function::Code`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeAction {
    /// Write new code
    Generate,
    /// Review existing code
    Review,
    /// Find the cause of an error
    Debug,
    /// Describe what code does
    Explain,
}

impl CodeAction {
    /// Wire name of the action
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Review => "review",
            Self::Debug => "debug",
            Self::Explain => "explain",
        }
    }
}
