use std::fmt;

#[derive(Debug)]
pub enum BiopsyError {
    /// IO-related failures (file not found, unreadable, etc.)
    Io(String),

    /// CSV parsing / formatting issues
    Csv(String),

    /// Shape or dimensionality mismatch
    ShapeMismatch { expected: String, got: String },

    /// Model used before calling `fit`
    NotFitted,

    /// Invalid configuration value
    InvalidParameter(String),

    /// The training dataset contains zero samples.
    EmptyTrainingData,

    /// Invalid Hyperparameter Value
    InvalidHyperparameter { name: String, value: String },

    /// Invalid value
    InvalidValue { message: String },

    /// Labels unusable for the requested model (e.g. not exactly two classes).
    InvalidTrainingData { message: String },

    /// Newton step could not be solved.
    SingularMatrix,

    /// Artifact (de)serialization failure
    Serialization(String),

    /// Remote dataset fetch failure
    Http(String),
}

impl fmt::Display for BiopsyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BiopsyError::Io(msg) => write!(f, "io error: {msg}"),
            BiopsyError::Csv(msg) => write!(f, "csv error: {msg}"),
            BiopsyError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {expected}, got {got}")
            }
            BiopsyError::NotFitted => write!(f, "model used before fit"),
            BiopsyError::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            BiopsyError::EmptyTrainingData => write!(f, "training data is empty"),
            BiopsyError::InvalidHyperparameter { name, value } => {
                write!(f, "invalid hyperparameter {name} = {value}")
            }
            BiopsyError::InvalidValue { message } => write!(f, "invalid value: {message}"),
            BiopsyError::InvalidTrainingData { message } => {
                write!(f, "invalid training data: {message}")
            }
            BiopsyError::SingularMatrix => write!(f, "singular matrix"),
            BiopsyError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            BiopsyError::Http(msg) => write!(f, "http error: {msg}"),
        }
    }
}

impl std::error::Error for BiopsyError {}

impl From<std::io::Error> for BiopsyError {
    fn from(err: std::io::Error) -> Self {
        BiopsyError::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BiopsyError>;
