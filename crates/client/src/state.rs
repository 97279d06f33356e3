use crate::error::ClientError;

/// Render state of a view model section
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    /// Nothing to show; the section renders no output
    Empty,
    Ready(T),
    /// Error banner text
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Banner text for a failed call: the gateway's own message when it sent
/// one, else `fallback`.
pub fn failure_message(err: &ClientError, fallback: &str) -> String {
    err.server_message()
        .map(String::from)
        .unwrap_or_else(|| fallback.to_string())
}
