//! Messaging Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("无效的时区: {0}")]
    InvalidTimezone(String),
}
