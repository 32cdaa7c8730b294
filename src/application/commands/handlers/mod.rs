//! Command Handlers 实现

mod utterance_handler;

pub use utterance_handler::*;
