use thiserror::Error;

pub type Result<T> = std::result::Result<T, PanelError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PanelError {
    #[error("malformed gesture sample: {field} is not finite")]
    InvalidSample { field: &'static str },

    #[error("invalid panel config: {message}")]
    InvalidConfig { message: String },

    #[error("frame scheduler unavailable: {message}")]
    SchedulerUnavailable { message: String },
}

impl PanelError {
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn scheduler(message: impl Into<String>) -> Self {
        Self::SchedulerUnavailable {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PanelError;

    #[test]
    fn invalid_sample_names_the_field() {
        let error = PanelError::InvalidSample { field: "dy" };
        assert_eq!(
            error.to_string(),
            "malformed gesture sample: dy is not finite"
        );
    }

    #[test]
    fn scheduler_constructor_preserves_message() {
        let error = PanelError::scheduler("no vsync source");
        assert_eq!(
            error.to_string(),
            "frame scheduler unavailable: no vsync source"
        );
    }
}
