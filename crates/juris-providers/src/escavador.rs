//! Escavador adapter.
//!
//! REST JSON API authenticated with a Bearer token. Wire fields are in
//! Portuguese; explicit lookup tables normalize status, party role, and
//! document type, degrading unknown values to `Unknown`/`Other`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use juris_config::{HealthCheckConfig, ProviderConfig, ProviderKind};
use juris_core::{
    validate_cnj, validate_person_document, Document, DocumentType, HealthStatus, JurisError,
    JurisResult, LegalDataProvider, Movement, Operation, PartyRole, PersonResult, ProcessResult,
    ProcessStatus, ProviderFeature, SearchOptions,
};
use juris_resilience::RateLimiter;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, instrument};

use crate::health::HealthState;
use crate::transport::{classify_response, classify_transport, parse_date};

/// Escavador provider adapter
#[derive(Debug)]
pub struct EscavadorProvider {
    config: ProviderConfig,
    client: Client,
    limiter: RateLimiter,
    health: HealthState,
}

impl EscavadorProvider {
    /// Create an Escavador adapter from its configuration.
    ///
    /// # Errors
    /// Returns [`JurisError::Configuration`] for a mismatched provider
    /// kind or an HTTP client build failure.
    pub fn new(config: ProviderConfig, health_config: &HealthCheckConfig) -> JurisResult<Self> {
        if config.kind != ProviderKind::Escavador {
            return Err(JurisError::configuration(format!(
                "provider '{}' is not an Escavador configuration",
                config.id
            )));
        }

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
            client,
            limiter,
            health,
        })
    }

    async fn get_value(
        &self,
        path: &str,
        query: &[(&str, String)],
        record_sample: bool,
    ) -> JurisResult<Value> {
        self.limiter.acquire().await;

        let url = self
            .config
            .base_url
            .join(path)
            .map_err(|e| JurisError::internal(format!("invalid request path '{path}': {e}")))?;

        let started = Instant::now();
        let result = self
            .client
            .get(url)
            .bearer_auth(self.config.api_key.expose_secret())
            .query(query)
            .send()
            .await;
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

    fn map_process(&self, raw: Value) -> ProcessResult {
        let parsed: EscavadorProcesso =
            serde_json::from_value(raw.clone()).unwrap_or_default();

        let mut plaintiffs = Vec::new();
        let mut defendants = Vec::new();
        for parte in &parsed.partes {
            match map_role(&parte.tipo) {
                PartyRole::Plaintiff => plaintiffs.push(parte.nome.clone()),
                PartyRole::Defendant => defendants.push(parte.nome.clone()),
                _ => {}
            }
        }

        let movements = parsed
            .movimentacoes
            .iter()
            .enumerate()
            .map(|(i, m)| map_movement(&parsed.numero_cnj, i, m))
            .collect();

        ProcessResult {
            id: parsed.id.unwrap_or_else(|| parsed.numero_cnj.clone()),
            number: parsed.numero_cnj,
            court: parsed.orgao.unwrap_or_else(|| "unknown".to_string()),
            status: map_status(&parsed.status.unwrap_or_default()),
            plaintiffs,
            defendants,
            movements,
            last_update: parse_date(parsed.ultima_atualizacao.as_deref()),
            value: parsed.valor_causa,
            subject: parsed.assunto,
            raw,
        }
    }

    fn map_person(&self, raw: Value) -> JurisResult<PersonResult> {
        let parsed: EscavadorPessoa = serde_json::from_value(raw.clone()).unwrap_or_default();
        let (document, document_type) = validate_person_document(&parsed.documento)?;

        let processes = parsed
            .processos
            .iter()
            .map(|p| juris_core::ProcessSummary {
                number: p.numero_cnj.clone(),
                court: p.orgao.clone().unwrap_or_else(|| "unknown".to_string()),
                status: map_status(&p.status.clone().unwrap_or_default()),
                role: map_role(&p.tipo_parte.clone().unwrap_or_default()),
            })
            .collect();

        Ok(PersonResult {
            id: parsed.id.unwrap_or_else(|| document.clone()),
            name: parsed.nome,
            document,
            document_type,
            processes,
            addresses: parsed.enderecos,
            phones: parsed.telefones,
            emails: parsed.emails,
            raw,
        })
    }

    fn map_document(&self, raw: Value) -> Document {
        let parsed: EscavadorDocumento = serde_json::from_value(raw.clone()).unwrap_or_default();
        Document {
            id: parsed.id,
            doc_type: map_document_type(&parsed.tipo.unwrap_or_default()),
            title: parsed.titulo.unwrap_or_else(|| "unknown".to_string()),
            content: parsed.conteudo,
            date: parse_date(parsed.data.as_deref()),
            process_id: parsed.processo_id.unwrap_or_else(|| "unknown".to_string()),
            author: parsed.autor,
            url: parsed.url,
            raw,
        }
    }
}

#[async_trait]
impl LegalDataProvider for EscavadorProvider {
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
            .get_value(&format!("api/v2/processos/{digits}"), &[], true)
            .await?;
        Ok(self.map_process(raw))
    }

    #[instrument(skip(self, _options), fields(provider = %self.config.id))]
    async fn search_person(
        &self,
        document: &str,
        _options: &SearchOptions,
    ) -> JurisResult<PersonResult> {
        let (digits, _) = validate_person_document(document)?;
        let raw = self
            .get_value("api/v2/pessoas", &[("documento", digits)], true)
            .await?;
        self.map_person(raw)
    }

    #[instrument(skip(self, _options), fields(provider = %self.config.id))]
    async fn get_document(&self, id: &str, _options: &SearchOptions) -> JurisResult<Document> {
        let raw = self
            .get_value(&format!("api/v2/documentos/{id}"), &[], true)
            .await?;
        Ok(self.map_document(raw))
    }

    #[instrument(skip(self), fields(provider = %self.config.id))]
    async fn track_movements(
        &self,
        process_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> JurisResult<Vec<Movement>> {
        // Escavador filters server-side via the `desde` query parameter.
        let mut query = Vec::new();
        if let Some(since) = since {
            query.push(("desde", since.to_rfc3339()));
        }
        let raw = self
            .get_value(
                &format!("api/v2/processos/{process_id}/movimentacoes"),
                &query,
                true,
            )
            .await?;

        let parsed: EscavadorMovimentacoes = serde_json::from_value(raw).unwrap_or_default();
        Ok(parsed
            .items
            .iter()
            .enumerate()
            .map(|(i, m)| map_movement(process_id, i, m))
            .collect())
    }

    async fn check_health(&self) -> HealthStatus {
        match self.get_value("api/v2/status", &[], false).await {
            Ok(raw) => {
                let parsed: EscavadorStatus = serde_json::from_value(raw).unwrap_or_default();
                self.health
                    .set_credits(parsed.creditos.restantes, parsed.creditos.limite);
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

// Status table: Escavador reports lifecycle in Portuguese.
fn map_status(raw: &str) -> ProcessStatus {
    match raw.trim().to_lowercase().as_str() {
        "ativo" | "em andamento" | "em tramitacao" | "em tramitação" => ProcessStatus::Active,
        "arquivado" => ProcessStatus::Archived,
        "suspenso" | "sobrestado" => ProcessStatus::Suspended,
        "baixado" | "encerrado" | "extinto" | "transitado em julgado" => ProcessStatus::Closed,
        _ => ProcessStatus::Unknown,
    }
}

fn map_role(raw: &str) -> PartyRole {
    match raw.trim().to_lowercase().as_str() {
        "autor" | "autora" | "requerente" | "exequente" | "impetrante" => PartyRole::Plaintiff,
        "reu" | "réu" | "ré" | "requerido" | "requerida" | "executado" | "impetrado" => {
            PartyRole::Defendant
        }
        "advogado" | "advogada" => PartyRole::Lawyer,
        _ => PartyRole::Other,
    }
}

fn map_document_type(raw: &str) -> DocumentType {
    match raw.trim().to_lowercase().as_str() {
        "peticao" | "petição" | "peticao inicial" | "petição inicial" => DocumentType::Petition,
        "sentenca" | "sentença" => DocumentType::Sentence,
        "decisao" | "decisão" | "acordao" | "acórdão" => DocumentType::Decision,
        "despacho" | "ordem" => DocumentType::Order,
        _ => DocumentType::Other,
    }
}

fn map_movement(process_id: &str, index: usize, raw: &EscavadorMovimentacao) -> Movement {
    Movement {
        id: raw
            .id
            .clone()
            .unwrap_or_else(|| format!("{process_id}-mov-{index}")),
        date: parse_date(raw.data.as_deref()).unwrap_or_else(Utc::now),
        movement_type: raw.tipo.clone().unwrap_or_else(|| "unknown".to_string()),
        description: raw.descricao.clone().unwrap_or_default(),
        content: raw.conteudo.clone(),
        attachments: raw.anexos.clone(),
    }
}

// Raw wire shapes. Every field is optional or defaulted so a partial
// payload degrades instead of failing.

#[derive(Debug, Default, Deserialize)]
struct EscavadorProcesso {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    numero_cnj: String,
    #[serde(default)]
    orgao: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    partes: Vec<EscavadorParte>,
    #[serde(default)]
    movimentacoes: Vec<EscavadorMovimentacao>,
    #[serde(default)]
    ultima_atualizacao: Option<String>,
    #[serde(default)]
    valor_causa: Option<f64>,
    #[serde(default)]
    assunto: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EscavadorParte {
    #[serde(default)]
    nome: String,
    #[serde(default)]
    tipo: String,
}

#[derive(Debug, Default, Deserialize)]
struct EscavadorMovimentacao {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    tipo: Option<String>,
    #[serde(default)]
    descricao: Option<String>,
    #[serde(default)]
    conteudo: Option<String>,
    #[serde(default)]
    anexos: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EscavadorMovimentacoes {
    #[serde(default)]
    items: Vec<EscavadorMovimentacao>,
}

#[derive(Debug, Default, Deserialize)]
struct EscavadorPessoa {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    nome: String,
    #[serde(default)]
    documento: String,
    #[serde(default)]
    processos: Vec<EscavadorPessoaProcesso>,
    #[serde(default)]
    enderecos: Vec<String>,
    #[serde(default)]
    telefones: Vec<String>,
    #[serde(default)]
    emails: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EscavadorPessoaProcesso {
    #[serde(default)]
    numero_cnj: String,
    #[serde(default)]
    orgao: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    tipo_parte: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EscavadorDocumento {
    #[serde(default)]
    id: String,
    #[serde(default)]
    tipo: Option<String>,
    #[serde(default)]
    titulo: Option<String>,
    #[serde(default)]
    conteudo: Option<String>,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    processo_id: Option<String>,
    #[serde(default)]
    autor: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EscavadorStatus {
    #[serde(default)]
    creditos: EscavadorCreditos,
}

#[derive(Debug, Default, Deserialize)]
struct EscavadorCreditos {
    #[serde(default)]
    restantes: Option<f64>,
    #[serde(default)]
    limite: Option<f64>,
}
