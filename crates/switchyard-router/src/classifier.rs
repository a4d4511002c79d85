// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification service client.
//!
//! Talks to a Triton-style inference endpoint: one `BYTES` input tensor of
//! shape `[1, 1]` in, one flat score vector out. The index of the highest
//! score picks the backend at that position in the policy.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use switchyard_core::{AdapterType, ChatMessage, ClassifierAdapter, PluginAdapter, RouterError};
use tracing::{debug, info};

use crate::registry::Policy;

/// Upper bound on the serialized conversation handed to diagnostics.
pub const MAX_CLASSIFIER_INPUT_CHARS: usize = 2000;

/// Name of the classifier's text input tensor.
const INPUT_NAME: &str = "INPUT";

/// Inference request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferRequest {
    pub inputs: Vec<InferInput>,
}

/// One named input tensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferInput {
    pub name: String,
    pub datatype: String,
    pub shape: Vec<usize>,
    pub data: Vec<Vec<String>>,
}

impl InferRequest {
    /// Batch of one containing a single text.
    pub fn single_text(text: &str) -> Self {
        Self {
            inputs: vec![InferInput {
                name: INPUT_NAME.to_string(),
                datatype: "BYTES".to_string(),
                shape: vec![1, 1],
                data: vec![vec![text.to_string()]],
            }],
        }
    }
}

/// Inference response body. Fields other than `outputs[].data` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct InferResponse {
    #[serde(default)]
    pub outputs: Vec<InferOutput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InferOutput {
    #[serde(default)]
    pub data: Vec<f64>,
}

impl InferResponse {
    /// The first output tensor's scores.
    pub fn into_scores(self) -> Result<Vec<f64>, RouterError> {
        self.outputs
            .into_iter()
            .next()
            .map(|o| o.data)
            .ok_or_else(|| RouterError::classifier("no outputs returned from classifier"))
    }
}

/// HTTP client for Triton-style classification endpoints.
#[derive(Debug, Clone)]
pub struct TritonClassifier {
    client: reqwest::Client,
}

impl TritonClassifier {
    /// Creates a classifier client whose calls time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, RouterError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RouterError::Config(format!("failed to build classifier HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl PluginAdapter for TritonClassifier {
    fn name(&self) -> &str {
        "triton-classifier"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Classifier
    }
}

#[async_trait]
impl ClassifierAdapter for TritonClassifier {
    async fn infer(&self, url: &str, text: &str) -> Result<Vec<f64>, RouterError> {
        let request = InferRequest::single_text(text);

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RouterError::Classifier {
                message: format!("request to {url} failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, url, "classifier response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RouterError::classifier(format!(
                "classifier returned {status}: {body}"
            )));
        }

        let body = response.text().await.map_err(|e| RouterError::Classifier {
            message: format!("failed to read classifier response: {e}"),
            source: Some(Box::new(e)),
        })?;
        let parsed: InferResponse =
            serde_json::from_str(&body).map_err(|e| RouterError::Classifier {
                message: format!("malformed classifier response: {e}"),
                source: Some(Box::new(e)),
            })?;

        parsed.into_scores()
    }
}

/// Position of the highest score; ties go to the lowest index.
///
/// NaN never wins. An empty or all-NaN vector is a classifier error.
pub fn select_index(scores: &[f64]) -> Result<usize, RouterError> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }

    best.map(|(i, _)| i).ok_or_else(|| {
        if scores.is_empty() {
            RouterError::classifier("classifier returned an empty output vector")
        } else {
            RouterError::classifier("classifier output contains no comparable scores")
        }
    })
}

/// Ask the policy's classifier about `text` and reduce the scores to an index.
///
/// `threshold` is recorded for diagnostics only; it does not gate the choice.
pub async fn classify(
    adapter: &dyn ClassifierAdapter,
    policy: &Policy,
    text: &str,
    threshold: f64,
) -> Result<usize, RouterError> {
    info!(
        policy = %policy.name,
        classifier = adapter.name(),
        threshold,
        "requesting classification"
    );

    let scores = adapter.infer(&policy.classifier_url, text).await?;
    let index = select_index(&scores)?;

    debug!(?scores, index, "classifier scores reduced");
    Ok(index)
}

/// JSON-encode the conversation and keep its last
/// [`MAX_CLASSIFIER_INPUT_CHARS`] characters.
pub fn serialize_conversation(messages: &[ChatMessage]) -> String {
    let encoded = serde_json::to_string(messages).unwrap_or_default();
    truncate_tail(&encoded, MAX_CLASSIFIER_INPUT_CHARS).to_string()
}

/// The last `max_chars` characters of `text` (character based, not bytes).
pub fn truncate_tail(text: &str, max_chars: usize) -> &str {
    let total = text.chars().count();
    if total <= max_chars {
        return text;
    }
    let offset = text
        .char_indices()
        .nth(total - max_chars)
        .map_or(text.len(), |(i, _)| i);
    &text[offset..]
}

/// Raw content of the last message, or `""` when there are none.
///
/// This, not the serialized conversation, is what the classifier receives.
pub fn last_message_content(messages: &[ChatMessage]) -> &str {
    messages.last().map(|m| m.content.as_str()).unwrap_or("")
}
