//! Validation errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypeError {
    #[error("threshold {name} out of range [0,100]: {value}")]
    ThresholdOutOfRange { name: String, value: f64 },
}
