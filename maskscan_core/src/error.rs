use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid length: column `{column}` needs at least {required} rows but has {actual}")]
    InvalidLength {
        column: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Too many rows: `{column}` holds {actual} rows but at most {max} are addressable")]
    TooManyRows {
        column: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("Backend {0} is not supported by this CPU")]
    UnsupportedBackend(&'static str),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Corrupt column file: {0}")]
    CorruptFile(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;
