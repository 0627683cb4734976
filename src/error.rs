use std::io;
use thiserror::Error;

/// Custom error type for the cntrl agent
#[derive(Error, Debug)]
pub enum CntrlError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The operation is switched off in the configuration.
    #[error("{0} feature is disabled")]
    FeatureDisabled(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("{program} failed: {detail}")]
    CommandFailed { program: String, detail: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Metric collection failed: {0}")]
    MetricCollection(String),

    #[error("GPU not available: {0}")]
    GpuNotAvailable(String),

    #[error("Power command failed: {0}")]
    Power(String),

    #[error("Media control failed: {0}")]
    Media(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for the cntrl agent
pub type Result<T> = std::result::Result<T, CntrlError>;

impl CntrlError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        CntrlError::Config(msg.into())
    }

    /// Create a feature-disabled (forbidden) error
    pub fn feature_disabled<S: Into<String>>(feature: S) -> Self {
        CntrlError::FeatureDisabled(feature.into())
    }

    pub fn unknown_action<S: Into<String>>(action: S) -> Self {
        CntrlError::UnknownAction(action.into())
    }

    pub fn command_failed<P: Into<String>, D: Into<String>>(program: P, detail: D) -> Self {
        CntrlError::CommandFailed {
            program: program.into(),
            detail: detail.into(),
        }
    }

    pub fn parse<S: Into<String>>(msg: S) -> Self {
        CntrlError::Parse(msg.into())
    }

    pub fn metric_collection<S: Into<String>>(msg: S) -> Self {
        CntrlError::MetricCollection(msg.into())
    }

    pub fn gpu_not_available<S: Into<String>>(msg: S) -> Self {
        CntrlError::GpuNotAvailable(msg.into())
    }

    pub fn power<S: Into<String>>(msg: S) -> Self {
        CntrlError::Power(msg.into())
    }

    pub fn media<S: Into<String>>(msg: S) -> Self {
        CntrlError::Media(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        CntrlError::Other(msg.into())
    }

    /// True when the error is the "forbidden" signal of a disabled feature,
    /// as opposed to a measurement or dispatch failure.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, CntrlError::FeatureDisabled(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_is_distinct_from_failures() {
        assert!(CntrlError::feature_disabled("Shutdown").is_forbidden());
        assert!(!CntrlError::metric_collection("vm_stat exited 1").is_forbidden());
        assert!(!CntrlError::unknown_action("rewind").is_forbidden());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CntrlError::feature_disabled("Shutdown").to_string(),
            "Shutdown feature is disabled"
        );
        assert_eq!(
            CntrlError::command_failed("pmset", "exit status 1").to_string(),
            "pmset failed: exit status 1"
        );
    }
}
