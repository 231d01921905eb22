//! Search query generation from an ICP profile.
//!
//! The primary path asks an AI-completion service for queries built from
//! the profile; the service call is bounded by a timeout and any failure
//! (timeout, transport, unparseable body) falls back to static templates so
//! a run can always proceed.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use leadgen_core::{IcpProfile, Platform};

use crate::error::PipelineError;

const MIN_QUERY_LEN: usize = 5;

/// A source of search queries for one ICP.
#[async_trait]
pub trait QueryGenerator: Send + Sync {
    /// Generates base queries for the profile.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] only for unrecoverable conditions;
    /// implementations with a fallback path should degrade instead.
    async fn generate(&self, icp: &IcpProfile) -> Result<Vec<String>, PipelineError>;
}

/// Appends platform-tagged variants of every base query.
///
/// For each selected non-web platform, every base query is duplicated with
/// the platform keyword appended, so platform collectors receive URLs from
/// their own result pools. Output length is `base × (1 + non-web selected)`.
#[must_use]
pub fn add_platform_variants(base: &[String], selected: &[Platform]) -> Vec<String> {
    let mut queries = base.to_vec();
    for platform in selected.iter().filter(|p| p.is_social()) {
        for query in base {
            queries.push(format!("{query} {platform}"));
        }
    }
    queries
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    completion: String,
}

/// AI-completion-backed query generator with a static fallback.
pub struct HttpQueryGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpQueryGenerator {
    /// # Errors
    ///
    /// Returns [`PipelineError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        endpoint: &str,
        api_key: Option<String>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_owned(),
            api_key,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    async fn complete(&self, icp: &IcpProfile) -> Result<Vec<String>, PipelineError> {
        let body = CompletionRequest {
            prompt: build_prompt(icp),
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/complete", self.endpoint))
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let completion: CompletionResponse = response.json().await?;
        Ok(parse_query_lines(&completion.completion))
    }
}

#[async_trait]
impl QueryGenerator for HttpQueryGenerator {
    async fn generate(&self, icp: &IcpProfile) -> Result<Vec<String>, PipelineError> {
        let attempt = tokio::time::timeout(self.timeout, self.complete(icp)).await;

        match attempt {
            Ok(Ok(queries)) if !queries.is_empty() => {
                tracing::info!(count = queries.len(), "query generation via completion service");
                Ok(queries)
            }
            Ok(Ok(_)) => {
                tracing::warn!("completion service returned no usable queries — using fallback templates");
                Ok(fallback_queries(icp))
            }
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "completion service failed — using fallback templates");
                Ok(fallback_queries(icp))
            }
            Err(_) => {
                tracing::warn!(timeout_secs = self.timeout.as_secs(), "completion service timed out — using fallback templates");
                Ok(fallback_queries(icp))
            }
        }
    }
}

fn build_prompt(icp: &IcpProfile) -> String {
    let mut prompt = format!(
        "Generate web search queries to find buyers of {} ({}).",
        icp.product.product_name, icp.product.product_category
    );
    if !icp.targeting.target_industries.is_empty() {
        prompt.push_str(&format!(
            " Target industries: {}.",
            icp.targeting.target_industries.join(", ")
        ));
    }
    if !icp.targeting.decision_maker_personas.is_empty() {
        prompt.push_str(&format!(
            " Decision makers: {}.",
            icp.targeting.decision_maker_personas.join(", ")
        ));
    }
    if !icp.product.pain_points_solved.is_empty() {
        prompt.push_str(&format!(
            " Pain points solved: {}.",
            icp.product.pain_points_solved.join(", ")
        ));
    }
    prompt.push_str(" One query per line, no numbering.");
    prompt
}

/// Parses the completion body: one query per line, numbering/bullet
/// prefixes and surrounding quotes stripped, short fragments dropped.
fn parse_query_lines(text: &str) -> Vec<String> {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    let prefix = PREFIX.get_or_init(|| {
        Regex::new(r"^\s*(?:[-*\u{2022}]|\d+[.)])\s*").expect("hard-coded regex compiles")
    });

    text.lines()
        .map(|line| {
            let stripped = prefix.replace(line, "");
            stripped.trim().trim_matches('"').trim().to_string()
        })
        .filter(|line| line.len() >= MIN_QUERY_LEN)
        .collect()
}

/// Static query templates built from the profile, used whenever the
/// completion service cannot be reached or produces nothing usable.
fn fallback_queries(icp: &IcpProfile) -> Vec<String> {
    let product = &icp.product.product_name;
    let mut queries = vec![
        format!("\"looking for\" {product}"),
        format!("\"need\" {product}"),
    ];
    for industry in &icp.targeting.target_industries {
        queries.push(format!("{product} for {industry}"));
    }
    for occasion in &icp.targeting.specific_occasions {
        queries.push(format!("{product} {occasion}"));
    }
    queries
}
