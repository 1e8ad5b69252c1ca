use thiserror::Error;

/// Errors raised at the batch boundary of the transform engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Wgs84Error {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Non-finite {component} at index {index}: {value}")]
    NonFinite {
        index: usize,
        component: &'static str,
        value: f64,
    },

    #[error("Expected {expected} columns per point, got {found}")]
    Shape { expected: usize, found: usize },

    #[error("Invalid inverse configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Wgs84Error>;
