//! The `GenerationBackend` trait -- the seam between prompt construction
//! and the hosted language model.

use async_trait::async_trait;

use super::types::{BackendError, GenerationRequest};

/// Adapter interface for a text-generation service.
///
/// Implementors issue exactly one request per call and return the raw
/// response text; parsing is the caller's job. No retries.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Short name for logs (e.g. "gemini").
    fn name(&self) -> &str;

    /// Send one prompt and return the response text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError>;
}

// Compile-time assertion: GenerationBackend must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn GenerationBackend) {}
};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::prompt::ContentKind;

    struct EchoBackend;

    #[async_trait]
    impl GenerationBackend for EchoBackend {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
            Ok(request.prompt.clone())
        }
    }

    #[tokio::test]
    async fn backend_is_usable_as_shared_trait_object() {
        let backend: Arc<dyn GenerationBackend> = Arc::new(EchoBackend);
        let request = GenerationRequest {
            kind: ContentKind::Flashcards,
            model: "test-model".into(),
            prompt: "hello".into(),
            json_output: true,
        };
        assert_eq!(backend.name(), "echo");
        assert_eq!(backend.generate(&request).await.unwrap(), "hello");
    }
}
