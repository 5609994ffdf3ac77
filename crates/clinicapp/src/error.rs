use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A column that must hold an integer or timestamp could not be parsed.
    #[error("Malformed record in {file}: {reason}")]
    MalformedRecord { file: String, reason: String },

    #[error("Invalid value: {0}")]
    Validation(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Not allowed: {0}")]
    Auth(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl From<confique::Error> for ClinicError {
    fn from(err: confique::Error) -> Self {
        ClinicError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClinicError>;
