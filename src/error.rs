use std::convert::From;
use thiserror;

#[derive(Clone, Debug, thiserror::Error)]
pub enum Error {
    #[error("Parameter not defined: {0}")]
    NotDefined(String),
    #[error("Scale produced a non-finite value: {0}")]
    InvalidScale(String),
    #[error("Unknown event: {0}")]
    UnknownEvent(String),
    #[error("Invalid colour: {0}")]
    InvalidColor(String),
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("File suffix not supported: {0}")]
    InvalidFileSuffix(String),
    #[error("Unable to open file for reading: {0}")]
    ReaderError(String),
    #[error("Unable to process JSON/YAML: {0}")]
    SerdeError(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::FileNotFound(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::ReaderError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerdeError(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerdeError(err.to_string())
    }
}
