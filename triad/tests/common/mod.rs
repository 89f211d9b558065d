#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use triad::{ApiError, ApiKey, ModelClient, ModelRequest};

/// Requests seen by a [`MockModelClient`], shared so tests can inspect them
/// after the client has been moved into a `Triad`.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<ModelRequest>>>);

impl CallLog {
    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.0.lock().unwrap().clone()
    }
}

/// A mock model client that replays scripted results in order.
pub struct MockModelClient {
    replies: Mutex<VecDeque<Result<String, ApiError>>>,
    calls: CallLog,
    expected_key: Option<String>,
}

impl MockModelClient {
    /// Create a mock from a sequence of results (popped in order).
    pub fn with_replies(replies: Vec<Result<String, ApiError>>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from(replies)),
            calls: CallLog::default(),
            expected_key: None,
        }
    }

    /// Three successful structured replies, one per stage.
    pub fn three_stages(research: &str, draft: &str, review: &str) -> Self {
        Self::with_replies(vec![
            Ok(json_reply("looking at the topic", research)),
            Ok(json_reply("organizing the points", draft)),
            Ok(json_reply("checking the draft", review)),
        ])
    }

    /// Reject any key other than `key` with `AuthenticationFailed`.
    pub fn requiring_key(mut self, key: &str) -> Self {
        self.expected_key = Some(key.to_string());
        self
    }

    pub fn calls(&self) -> CallLog {
        self.calls.clone()
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn generate(&self, request: &ModelRequest, api_key: &ApiKey) -> Result<String, ApiError> {
        self.calls.0.lock().unwrap().push(request.clone());

        if let Some(ref expected) = self.expected_key {
            if api_key.expose() != expected {
                return Err(ApiError::AuthenticationFailed(
                    "invalid x-api-key".to_string(),
                ));
            }
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ApiError::UpstreamError(
                    "MockModelClient: no more replies in queue".to_string(),
                ))
            })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A reply in the JSON shape the agents are asked for.
pub fn json_reply(thoughts: &str, response: &str) -> String {
    serde_json::json!({ "thoughts": thoughts, "response": response }).to_string()
}
