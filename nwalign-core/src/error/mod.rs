//! Core error types for nwalign

use thiserror::Error;

/// Main error type for nwalign operations
#[derive(Error, Debug)]
pub enum NwError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A symbol, or a symbol pair, that the scoring model has no entry for.
    #[error("Unknown symbol: {}", describe_symbols(.a, .b))]
    UnknownSymbol { a: char, b: Option<char> },

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl NwError {
    pub fn unknown_symbol(symbol: u8) -> Self {
        NwError::UnknownSymbol {
            a: char::from(symbol),
            b: None,
        }
    }

    pub fn unknown_pair(a: u8, b: u8) -> Self {
        NwError::UnknownSymbol {
            a: char::from(a),
            b: Some(char::from(b)),
        }
    }
}

fn describe_symbols(a: &char, b: &Option<char>) -> String {
    match b {
        Some(b) => format!("no score for pair ('{}', '{}')", a, b),
        None => format!("'{}' is not in the scoring alphabet", a),
    }
}

/// Result type alias for nwalign operations
pub type NwResult<T> = Result<T, NwError>;
