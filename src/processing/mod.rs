//! Text analysis: signals, profiles, matching and scoring

pub mod answer_scorer;
pub mod matcher;
pub mod questions;
pub mod skill_extractor;
pub mod text_processor;
