//!
//! src/errors.rs  Andrew Belles  Oct 2nd, 2025
//!
//! Defines enums and methods of error conversion
//! for errors the collector and the analysis pipeline use
//!
//!

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrendsError {
    #[error("config error: {0}")]
    Config(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("csv error: {0}")]
    Csv(String),
    #[error("plot error: {0}")]
    Plot(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error)
}

impl From<reqwest::Error> for TrendsError {
    fn from(e: reqwest::Error) -> Self { TrendsError::Http(e.to_string()) }
}

impl From<serde_json::Error> for TrendsError {
    fn from(e: serde_json::Error) -> Self { TrendsError::Parse(e.to_string()) }
}

impl From<csv::Error> for TrendsError {
    fn from(e: csv::Error) -> Self { TrendsError::Csv(e.to_string()) }
}

impl<E> From<plotters::drawing::DrawingAreaErrorKind<E>> for TrendsError
where
    E: std::error::Error + Send + Sync,
{
    fn from(e: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        TrendsError::Plot(e.to_string())
    }
}
