use serde::{Deserialize, Serialize};

/// Message body sent to the model.
///
/// The chat endpoint also accepts an array of typed parts; only plain text is
/// produced here, so the enum keeps room for that without modelling it yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
}

impl Content {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(s) => s,
        }
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}
