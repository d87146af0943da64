#![forbid(unsafe_code)]

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlayerError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayerError {
    #[error("playback engine failed during {op}: {message}")]
    Engine { op: &'static str, message: String },

    #[error("player has not been set up")]
    NotInitialized,

    #[error("track not found: {id}")]
    TrackNotFound { id: String },

    #[error("queue is empty")]
    EmptyQueue,
}

impl PlayerError {
    #[must_use]
    pub fn engine(op: &'static str, message: impl Into<String>) -> Self {
        Self::Engine {
            op,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PlayerError;

    #[test]
    fn engine_error_names_the_operation() {
        let error = PlayerError::engine("seek_to", "no media loaded");
        assert_eq!(
            error.to_string(),
            "playback engine failed during seek_to: no media loaded"
        );
    }
}
