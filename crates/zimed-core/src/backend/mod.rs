//! Generation backend interface and the Gemini adapter.
//!
//! ```text
//! Generator
//!     |
//!     v
//! Arc<dyn GenerationBackend> --generate(request)--> raw response text
//!     |
//!     +-- GeminiBackend   (HTTPS generateContent)
//!     +-- test doubles    (scripted responses)
//! ```

pub mod gemini;
pub mod trait_def;
pub mod types;

pub use gemini::{GeminiBackend, GeminiConfig};
pub use trait_def::GenerationBackend;
pub use types::{BackendError, GenerationRequest};
