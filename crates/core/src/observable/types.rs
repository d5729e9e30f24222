use std::sync::Arc;

use thiserror::Error;

/// Error carried through `on_error_resume` and failed completions.
///
/// Cloneable so a multicast source can hand the same error to every observer.
#[derive(Debug, Clone, Error)]
pub enum StreamError {
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("{0}")]
    Other(Arc<anyhow::Error>),
}

impl StreamError {
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }
}

impl From<anyhow::Error> for StreamError {
    fn from(error: anyhow::Error) -> Self {
        Self::Other(Arc::new(error))
    }
}

/// Terminal signal of a sequence.
#[derive(Debug, Clone)]
pub enum Completion {
    Success,
    Failure(StreamError),
}

impl Completion {
    pub fn is_success(&self) -> bool {
        matches!(self, Completion::Success)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Completion::Failure(_))
    }

    /// Returns the error of a failed completion.
    pub fn error(&self) -> Option<&StreamError> {
        match self {
            Completion::Success => None,
            Completion::Failure(e) => Some(e),
        }
    }
}

impl From<Result<(), StreamError>> for Completion {
    fn from(result: Result<(), StreamError>) -> Self {
        match result {
            Ok(()) => Completion::Success,
            Err(e) => Completion::Failure(e),
        }
    }
}

/// A single observer callback, materialized.
#[derive(Debug, Clone)]
pub enum Notification<T> {
    Next(T),
    ErrorResume(StreamError),
    Completed(Completion),
}

impl<T> Notification<T> {
    /// Returns the value of a `Next` notification.
    pub fn value(&self) -> Option<&T> {
        match self {
            Notification::Next(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Notification::Completed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_from_result() {
        assert!(Completion::from(Ok(())).is_success());

        let failed = Completion::from(Err(StreamError::upstream("boom")));
        assert!(failed.is_failure());
        assert_eq!(failed.error().unwrap().to_string(), "Upstream error: boom");
    }

    #[test]
    fn test_stream_error_from_anyhow() {
        let err: StreamError = anyhow::anyhow!("disk on fire").into();
        assert!(matches!(err, StreamError::Other(_)));
        assert_eq!(err.to_string(), "disk on fire");
    }

    #[test]
    fn test_notification_value() {
        let next = Notification::Next(7);
        assert_eq!(next.value(), Some(&7));
        assert!(!next.is_completed());

        let done: Notification<i32> = Notification::Completed(Completion::Success);
        assert_eq!(done.value(), None);
        assert!(done.is_completed());
    }
}
