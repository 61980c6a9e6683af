//! Document and chat input

pub mod file_detector;
pub mod manager;
pub mod message_assembler;
pub mod text_extractor;

pub use file_detector::DocumentKind;
pub use manager::DocumentLoader;
pub use message_assembler::MessageAssembler;
