use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing server URL (set --server or provide in config).")]
    MissingServer,
    #[error("Missing access token (set --token or provide in config).")]
    MissingToken,
    #[error("Invalid server URL '{value}': {source}")]
    InvalidServerUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Invalid scheme '{scheme}'. Use http(s) or ws(s).")]
    InvalidServerScheme { scheme: String },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Skip step must be between 1 and 3600 seconds.")]
    SkipStepOutOfRange,
    #[error("Display name must not be empty when provided.")]
    DisplayNameEmpty,
    #[error("Failed to build runtime: {source}")]
    RuntimeBuildFailed {
        #[source]
        source: std::io::Error,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
