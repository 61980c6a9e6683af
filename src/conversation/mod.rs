//! Multi-turn interview conversation

pub mod engine;
pub mod evaluation;
pub mod messages;
pub mod response;
pub mod session;
pub mod state;
pub mod store;

pub use engine::ConversationEngine;
pub use evaluation::{AnswerSource, PromptingAnswers};
pub use response::{ChatResult, Visualization};
pub use state::{ConversationState, Step};
pub use store::{InMemorySessionStore, SessionStore};
