//! UI language tag sent with every request.

use serde::{Deserialize, Serialize};

/// Languages the backend localizes responses for.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Am,
}

impl Language {
    pub fn as_tag(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Am => "am",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Language::En),
            "am" => Some(Language::Am),
            _ => None,
        }
    }
}
