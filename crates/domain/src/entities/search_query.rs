//! Raw search text entered by the user

use serde::{Deserialize, Serialize};

/// Free text for the destination and, optionally, the origin
///
/// An empty origin means "use the current location". An empty destination
/// means "no destination".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Typed origin; `None` or blank uses the current location
    #[serde(default)]
    pub origin: Option<String>,
    /// Typed destination
    pub destination: String,
}

impl SearchQuery {
    /// Search for a destination from the current location
    #[must_use]
    pub fn to(destination: impl Into<String>) -> Self {
        Self {
            origin: None,
            destination: destination.into(),
        }
    }

    /// Use a typed origin instead of the current location
    #[must_use]
    pub fn from_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Trimmed destination text, `None` when blank
    #[must_use]
    pub fn destination_text(&self) -> Option<&str> {
        non_blank(&self.destination)
    }

    /// Trimmed origin text, `None` when absent or blank
    #[must_use]
    pub fn origin_text(&self) -> Option<&str> {
        self.origin.as_deref().and_then(non_blank)
    }
}

fn non_blank(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
