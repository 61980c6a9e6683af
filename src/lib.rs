//! Conversational candidate evaluation engine
//!
//! A session walks through greeting, CV analysis, job matching and a short
//! personalised interview, and ends with a scored report.

pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use conversation::{ChatResult, ConversationEngine};
pub use error::{InterviewerError, Result};
