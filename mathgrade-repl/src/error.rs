use mathgrade::ConfigurationError;
use rustyline::error::ReadlineError;
use std::io;

/// Utility enum to package errors that stop the front end.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The command line could not be understood.
    #[error("{0}")]
    Usage(String),

    /// A file could not be read.
    #[error("could not read `{path}`: {source}")]
    Io {
        path: String,
        source: io::Error,
    },

    /// The rubric is not valid JSON, or does not describe a valid rubric.
    #[error("invalid rubric `{path}`: {source}")]
    Rubric {
        path: String,
        source: serde_json::Error,
    },

    /// The grader rejected the rubric or its configuration.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The result could not be serialized.
    #[error("could not serialize the result: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The line editor failed.
    #[error(transparent)]
    Readline(#[from] ReadlineError),
}

impl Error {
    /// The exit code to report for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => 2,
            _ => 1,
        }
    }
}
