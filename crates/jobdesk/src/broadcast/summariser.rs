use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::error::SummariseError;
use super::record::JobPosting;

/// Longest first sentence kept by [`SimpleSummariser`], in characters.
const MAX_SENTENCE_CHARS: usize = 180;

#[async_trait]
pub trait Summariser: Send + Sync {
    async fn summarise(&self, posting: &JobPosting) -> Result<String, SummariseError>;
}

/// Deterministic summary for deployments without a completion endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleSummariser;

impl SimpleSummariser {
    pub fn summarise_sync(posting: &JobPosting) -> String {
        let description = posting.description.trim();
        if description.is_empty() {
            return String::new();
        }

        let first = description.split(". ").next().unwrap_or_default().trim();
        let sentence = if first.chars().count() > MAX_SENTENCE_CHARS {
            let cut: String = first.chars().take(MAX_SENTENCE_CHARS).collect();
            format!("{}…", cut)
        } else {
            first.to_string()
        };

        format!("{} — {}", posting.title, sentence)
    }
}

#[async_trait]
impl Summariser for SimpleSummariser {
    async fn summarise(&self, posting: &JobPosting) -> Result<String, SummariseError> {
        Ok(Self::summarise_sync(posting))
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    text: String,
}

/// Summariser backed by an HTTP completion endpoint.
#[derive(Debug, Clone)]
pub struct HttpSummariser {
    client: Client,
    endpoint: String,
}

impl HttpSummariser {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SummariseError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SummariseError::Request(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Builds the completion prompt for a posting.
pub fn build_prompt(posting: &JobPosting) -> String {
    let mut prompt = String::from(
        "Summarise this job vacancy in one or two short sentences for a job channel.\n\n",
    );
    for (label, value) in [
        ("Title", &posting.title),
        ("Company", &posting.company),
        ("Location", &posting.location),
        ("Salary", &posting.salary),
        ("Experience", &posting.experience),
        ("Description", &posting.description),
    ] {
        if !value.is_empty() {
            prompt.push_str(&format!("{}: {}\n", label, value));
        }
    }
    prompt
}

#[async_trait]
impl Summariser for HttpSummariser {
    async fn summarise(&self, posting: &JobPosting) -> Result<String, SummariseError> {
        let prompt = build_prompt(posting);
        debug!("Requesting summary from {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&CompletionRequest { prompt: &prompt })
            .send()
            .await
            .map_err(|e| SummariseError::Request(e.to_string()))?;

        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(SummariseError::Status(status.as_u16()));
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| SummariseError::Request(format!("decode response: {}", e)))?;

        Ok(body.text.trim().to_string())
    }
}
