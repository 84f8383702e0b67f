use std::sync::Mutex;

use super::types::CompletionClient;
use super::StructuringError;

/// Mock completion client for testing. Returns a configurable response
/// and remembers the last prompt it was sent.
pub struct MockCompletionClient {
    response: Result<String, String>,
    last_prompt: Mutex<Option<String>>,
}

impl MockCompletionClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            last_prompt: Mutex::new(None),
        }
    }

    /// A client whose every call fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|guard| guard.clone())
    }
}

impl CompletionClient for MockCompletionClient {
    fn complete(&self, _system: &str, prompt: &str) -> Result<String, StructuringError> {
        if let Ok(mut guard) = self.last_prompt.lock() {
            *guard = Some(prompt.to_string());
        }
        self.response.clone().map_err(StructuringError::Upstream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_client_returns_configured_response() {
        let client = MockCompletionClient::new("test response");
        let result = client.complete("system", "prompt").unwrap();
        assert_eq!(result, "test response");
    }

    #[test]
    fn mock_client_records_prompt() {
        let client = MockCompletionClient::new("");
        assert!(client.last_prompt().is_none());
        client.complete("system", "review this").unwrap();
        assert_eq!(client.last_prompt().as_deref(), Some("review this"));
    }

    #[test]
    fn failing_client_returns_upstream_error() {
        let client = MockCompletionClient::failing("timed out");
        let err = client.complete("system", "prompt").unwrap_err();
        assert!(matches!(err, StructuringError::Upstream(ref m) if m == "timed out"));
    }
}
