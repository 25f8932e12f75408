use serde::{Deserialize, Serialize};

/// Lifecycle of a discovery page.
///
/// `Idle -> Loading -> Ready | Errored`. A new fetch from `Ready` or
/// `Errored` goes back to `Loading`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PageStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Errored {
        /// User-facing description of the failure.
        message: String,
    },
}

impl PageStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Errored { message } => Some(message),
            _ => None,
        }
    }
}
