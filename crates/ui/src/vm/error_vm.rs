use services::SourceError;

use crate::context::UiAction;

/// Retryable failure screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorVm {
    pub title: String,
    pub message: String,
    pub button_text: String,
    pub action: UiAction,
}

impl ErrorVm {
    #[must_use]
    pub fn load_failed(error: &SourceError) -> Self {
        Self {
            title: "Something went wrong".to_owned(),
            message: error.to_string(),
            button_text: "Try again".to_owned(),
            action: UiAction::RetryLoad,
        }
    }
}
