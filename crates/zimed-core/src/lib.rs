//! Generation pipeline for educator content: syllabus lookup, prompt
//! construction, backend calls, response decoding, the scheme batch and
//! PDF export.

pub mod backend;
pub mod batch;
pub mod decode;
pub mod export;
pub mod generator;
pub mod prompt;
pub mod syllabus;

pub use generator::{GenerationError, Generator};
pub use prompt::ContentKind;
