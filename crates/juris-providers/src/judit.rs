//! Judit adapter.
//!
//! REST JSON API where every request carries an HMAC-SHA256 signature
//! over `"{METHOD}\n{path}\n{timestamp}"` in the `X-Judit-Signature`
//! header. Wire fields are in English. Judit has no server-side movement
//! filter, so `since` is applied client-side after fetching steps.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use juris_config::{HealthCheckConfig, ProviderConfig, ProviderKind};
use juris_core::{
    validate_cnj, validate_person_document, Document, DocumentType, HealthStatus, JurisError,
    JurisResult, LegalDataProvider, Movement, Operation, PartyRole, PersonResult, ProcessResult,
    ProcessStatus, ProviderFeature, SearchOptions,
};
use juris_resilience::RateLimiter;
use reqwest::{Client, Method};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::Sha256;
use std::time::Instant;
use tracing::{debug, instrument};

use crate::health::HealthState;
use crate::transport::{classify_response, classify_transport, parse_date};

type HmacSha256 = Hmac<Sha256>;

/// Judit provider adapter
#[derive(Debug)]
pub struct JuditProvider {
    config: ProviderConfig,
    api_secret: SecretString,
    client: Client,
    limiter: RateLimiter,
    health: HealthState,
}

impl JuditProvider {
    /// Create a Judit adapter from its configuration.
    ///
    /// # Errors
    /// Returns [`JurisError::Configuration`] for a mismatched provider
    /// kind, a missing API secret, or an HTTP client build failure.
    pub fn new(config: ProviderConfig, health_config: &HealthCheckConfig) -> JurisResult<Self> {
        if config.kind != ProviderKind::Judit {
            return Err(JurisError::configuration(format!(
                "provider '{}' is not a Judit configuration",
                config.id
            )));
        }
        let api_secret = config.api_secret.clone().ok_or_else(|| {
            JurisError::configuration(format!(
                "provider '{}' requires an API secret for request signing",
                config.id
            ))
        })?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| JurisError::configuration(format!("failed to build HTTP client: {e}")))?;

        let limiter = RateLimiter::new(config.rate_limit.requests, config.rate_limit.period);
        let health = HealthState::new(
            config.id.clone(),
            health_config,
            config.baseline_reliability,
            config.baseline_latency_ms,
        );

        Ok(Self {
            config,
            api_secret,
            client,
            limiter,
            health,
        })
    }

    fn sign(&self, method: &Method, path: &str, timestamp: i64) -> JurisResult<String> {
        let mut mac = HmacSha256::new_from_slice(self.api_secret.expose_secret().as_bytes())
            .map_err(|e| JurisError::internal(format!("HMAC key setup failed: {e}")))?;
        mac.update(format!("{method}\n{path}\n{timestamp}").as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    async fn request_value(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        record_sample: bool,
    ) -> JurisResult<Value> {
        self.limiter.acquire().await;

        let url = self
            .config
            .base_url
            .join(path)
            .map_err(|e| JurisError::internal(format!("invalid request path '{path}': {e}")))?;
        let timestamp = Utc::now().timestamp();
        let signature = self.sign(&method, url.path(), timestamp)?;

        let mut request = self
            .client
            .request(method, url)
            .header("X-Judit-Api-Key", self.config.api_key.expose_secret())
            .header("X-Judit-Timestamp", timestamp.to_string())
            .header("X-Judit-Signature", signature);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let started = Instant::now();
        let result = request.send().await;
        let elapsed = started.elapsed();

        let outcome = match result {
            Err(e) => Err(classify_transport(&self.config.id, &e)),
            Ok(response) if response.status().is_success() => {
                response.json::<Value>().await.map_err(|e| {
                    JurisError::unavailable(
                        &self.config.id,
                        format!("malformed response body: {e}"),
                        None,
                    )
                })
            }
            Ok(response) => Err(classify_response(&self.config.id, response).await),
        };

        if record_sample {
            self.health.record_call(outcome.is_ok(), elapsed);
        }
        outcome
    }

    fn map_lawsuit(&self, raw: Value) -> ProcessResult {
        let parsed: JuditLawsuit = serde_json::from_value(raw.clone()).unwrap_or_default();

        let mut plaintiffs = Vec::new();
        let mut defendants = Vec::new();
        for party in &parsed.parties {
            match map_role(&party.role) {
                PartyRole::Plaintiff => plaintiffs.push(party.name.clone()),
                PartyRole::Defendant => defendants.push(party.name.clone()),
                _ => {}
            }
        }

        let movements = parsed
            .steps
            .iter()
            .enumerate()
            .map(|(i, s)| map_step(&parsed.cnj_number, i, s))
            .collect();

        ProcessResult {
            id: parsed.id.unwrap_or_else(|| parsed.cnj_number.clone()),
            number: parsed.cnj_number,
            court: parsed.court.unwrap_or_else(|| "unknown".to_string()),
            status: map_status(&parsed.status.unwrap_or_default()),
            plaintiffs,
            defendants,
            movements,
            last_update: parse_date(parsed.last_update.as_deref()),
            value: parsed.amount,
            subject: parsed.subject,
            raw,
        }
    }

    fn map_person(&self, raw: Value) -> JurisResult<PersonResult> {
        let parsed: JuditPerson = serde_json::from_value(raw.clone()).unwrap_or_default();
        let (document, document_type) = validate_person_document(&parsed.document)?;

        let processes = parsed
            .lawsuits
            .iter()
            .map(|l| juris_core::ProcessSummary {
                number: l.cnj_number.clone(),
                court: l.court.clone().unwrap_or_else(|| "unknown".to_string()),
                status: map_status(&l.status.clone().unwrap_or_default()),
                role: map_role(&l.role.clone().unwrap_or_default()),
            })
            .collect();

        Ok(PersonResult {
            id: parsed.id.unwrap_or_else(|| document.clone()),
            name: parsed.name,
            document,
            document_type,
            processes,
            addresses: parsed.addresses,
            phones: parsed.phones,
            emails: parsed.emails,
            raw,
        })
    }

    fn map_document(&self, raw: Value) -> Document {
        let parsed: JuditDocument = serde_json::from_value(raw.clone()).unwrap_or_default();
        Document {
            id: parsed.id,
            doc_type: map_document_type(&parsed.doc_type.unwrap_or_default()),
            title: parsed.title.unwrap_or_else(|| "unknown".to_string()),
            content: parsed.content,
            date: parse_date(parsed.date.as_deref()),
            process_id: parsed.lawsuit_id.unwrap_or_else(|| "unknown".to_string()),
            author: parsed.author,
            url: parsed.url,
            raw,
        }
    }
}

#[async_trait]
impl LegalDataProvider for JuditProvider {
    fn id(&self) -> &str {
        &self.config.id
    }

    #[instrument(skip(self, _options), fields(provider = %self.config.id))]
    async fn search_process(
        &self,
        number: &str,
        _options: &SearchOptions,
    ) -> JurisResult<ProcessResult> {
        let digits = validate_cnj(number)?;
        let raw = self
            .request_value(
                Method::POST,
                "lawsuits/search",
                Some(json!({ "search_type": "cnj", "value": digits })),
                true,
            )
            .await?;
        Ok(self.map_lawsuit(raw))
    }

    #[instrument(skip(self, _options), fields(provider = %self.config.id))]
    async fn search_person(
        &self,
        document: &str,
        _options: &SearchOptions,
    ) -> JurisResult<PersonResult> {
        let (digits, _) = validate_person_document(document)?;
        let raw = self
            .request_value(
                Method::POST,
                "persons/search",
                Some(json!({ "document": digits })),
                true,
            )
            .await?;
        self.map_person(raw)
    }

    #[instrument(skip(self, _options), fields(provider = %self.config.id))]
    async fn get_document(&self, id: &str, _options: &SearchOptions) -> JurisResult<Document> {
        let raw = self
            .request_value(Method::GET, &format!("documents/{id}"), None, true)
            .await?;
        Ok(self.map_document(raw))
    }

    #[instrument(skip(self), fields(provider = %self.config.id))]
    async fn track_movements(
        &self,
        process_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> JurisResult<Vec<Movement>> {
        let raw = self
            .request_value(
                Method::GET,
                &format!("lawsuits/{process_id}/steps"),
                None,
                true,
            )
            .await?;

        let parsed: JuditSteps = serde_json::from_value(raw).unwrap_or_default();
        let mut movements: Vec<Movement> = parsed
            .steps
            .iter()
            .enumerate()
            .map(|(i, s)| map_step(process_id, i, s))
            .collect();
        // No server-side filter on this endpoint.
        if let Some(since) = since {
            movements.retain(|m| m.date >= since);
        }
        Ok(movements)
    }

    async fn check_health(&self) -> HealthStatus {
        match self.request_value(Method::GET, "credits", None, false).await {
            Ok(raw) => {
                let parsed: JuditCredits = serde_json::from_value(raw).unwrap_or_default();
                self.health.set_credits(parsed.available, parsed.total);
                self.health.record_probe(true);
            }
            Err(e) => {
                debug!(provider = %self.config.id, error = %e, "health probe failed");
                self.health.record_probe(false);
            }
        }
        self.health.snapshot()
    }

    fn health_snapshot(&self) -> HealthStatus {
        self.health.snapshot()
    }

    fn estimate_cost(&self, operation: Operation, qty: u32) -> f64 {
        self.config.price_for(operation) * f64::from(qty)
    }

    fn remaining_credits(&self) -> Option<f64> {
        self.health.remaining_credits()
    }

    fn supports(&self, feature: ProviderFeature) -> bool {
        self.config.features.contains(&feature)
    }
}

fn map_status(raw: &str) -> ProcessStatus {
    match raw.trim().to_lowercase().as_str() {
        "active" | "in_progress" | "ongoing" => ProcessStatus::Active,
        "archived" => ProcessStatus::Archived,
        "suspended" | "stayed" => ProcessStatus::Suspended,
        "terminated" | "closed" | "final_judgment" => ProcessStatus::Closed,
        _ => ProcessStatus::Unknown,
    }
}

fn map_role(raw: &str) -> PartyRole {
    match raw.trim().to_lowercase().as_str() {
        "claimant" | "plaintiff" | "petitioner" => PartyRole::Plaintiff,
        "respondent" | "defendant" => PartyRole::Defendant,
        "attorney" | "lawyer" => PartyRole::Lawyer,
        _ => PartyRole::Other,
    }
}

fn map_document_type(raw: &str) -> DocumentType {
    match raw.trim().to_lowercase().as_str() {
        "petition" | "initial_petition" => DocumentType::Petition,
        "ruling" | "judgment" | "sentence" => DocumentType::Sentence,
        "decision" | "appellate_decision" => DocumentType::Decision,
        "court_order" | "order" => DocumentType::Order,
        _ => DocumentType::Other,
    }
}

fn map_step(process_id: &str, index: usize, raw: &JuditStep) -> Movement {
    Movement {
        id: raw
            .id
            .clone()
            .unwrap_or_else(|| format!("{process_id}-step-{index}")),
        date: parse_date(raw.date.as_deref()).unwrap_or_else(Utc::now),
        movement_type: raw.step_type.clone().unwrap_or_else(|| "unknown".to_string()),
        description: raw.description.clone().unwrap_or_default(),
        content: raw.content.clone(),
        attachments: raw.attachments.clone(),
    }
}

#[derive(Debug, Default, Deserialize)]
struct JuditLawsuit {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    cnj_number: String,
    #[serde(default)]
    court: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    parties: Vec<JuditParty>,
    #[serde(default)]
    steps: Vec<JuditStep>,
    #[serde(default)]
    last_update: Option<String>,
    #[serde(default)]
    amount: Option<f64>,
    #[serde(default)]
    subject: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct JuditParty {
    #[serde(default)]
    name: String,
    #[serde(default)]
    role: String,
}

#[derive(Debug, Default, Deserialize)]
struct JuditStep {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default, rename = "type")]
    step_type: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    attachments: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct JuditSteps {
    #[serde(default)]
    steps: Vec<JuditStep>,
}

#[derive(Debug, Default, Deserialize)]
struct JuditPerson {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    document: String,
    #[serde(default)]
    lawsuits: Vec<JuditPersonLawsuit>,
    #[serde(default)]
    addresses: Vec<String>,
    #[serde(default)]
    phones: Vec<String>,
    #[serde(default)]
    emails: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct JuditPersonLawsuit {
    #[serde(default)]
    cnj_number: String,
    #[serde(default)]
    court: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct JuditDocument {
    #[serde(default)]
    id: String,
    #[serde(default, rename = "type")]
    doc_type: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    lawsuit_id: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct JuditCredits {
    #[serde(default)]
    available: Option<f64>,
    #[serde(default)]
    total: Option<f64>,
}
