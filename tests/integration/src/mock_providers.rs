//! Mock legal-data providers for integration testing
//!
//! Wiremock-based servers that simulate the Escavador and Judit APIs,
//! with per-path request counting for asserting upstream call volume.

use juris_config::ProviderConfig;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock Escavador API server
pub struct MockEscavador {
    /// The underlying wiremock server
    pub server: MockServer,
}

impl MockEscavador {
    /// Start a fresh mock server
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Provider configuration pointing at this mock
    pub fn config(&self) -> ProviderConfig {
        ProviderConfig::escavador(&self.server.uri(), "escavador-test-key")
            .expect("mock uri is valid")
    }

    /// Mount a successful process lookup for `digits`
    pub async fn mock_process_ok(&self, digits: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/api/v2/processos/{digits}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(escavador_process(digits)))
            .mount(&self.server)
            .await;
    }

    /// Mount a failing process lookup for `digits` with the given status
    pub async fn mock_process_error(&self, digits: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/api/v2/processos/{digits}")))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream failure"))
            .mount(&self.server)
            .await;
    }

    /// Mount a successful person lookup
    pub async fn mock_person_ok(&self, digits: &str) {
        Mock::given(method("GET"))
            .and(path("/api/v2/pessoas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pessoa-1",
                "nome": "Maria Silva",
                "documento": digits,
                "processos": [],
                "enderecos": [],
                "telefones": [],
                "emails": []
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount the health endpoint with the given credit figures
    pub async fn mock_status(&self, remaining: f64, limit: f64) {
        Mock::given(method("GET"))
            .and(path("/api/v2/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "creditos": {"restantes": remaining, "limite": limit}
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a failing health endpoint
    pub async fn mock_status_error(&self) {
        Mock::given(method("GET"))
            .and(path("/api/v2/status"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&self.server)
            .await;
    }

    /// Requests received for one path
    pub async fn requests_to(&self, to: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == to)
            .count()
    }
}

/// Mock Judit API server
pub struct MockJudit {
    /// The underlying wiremock server
    pub server: MockServer,
}

impl MockJudit {
    /// Start a fresh mock server
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Provider configuration pointing at this mock
    pub fn config(&self) -> ProviderConfig {
        ProviderConfig::judit(&self.server.uri(), "judit-test-key", "judit-test-secret")
            .expect("mock uri is valid")
    }

    /// Mount a successful lawsuit search
    pub async fn mock_search_ok(&self, digits: &str) {
        Mock::given(method("POST"))
            .and(path("/lawsuits/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(judit_lawsuit(digits)))
            .mount(&self.server)
            .await;
    }

    /// Mount a failing lawsuit search with the given status
    pub async fn mock_search_error(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/lawsuits/search"))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream failure"))
            .mount(&self.server)
            .await;
    }

    /// Mount the credits endpoint
    pub async fn mock_credits(&self, available: f64, total: f64) {
        Mock::given(method("GET"))
            .and(path("/credits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "available": available,
                "total": total
            })))
            .mount(&self.server)
            .await;
    }

    /// Requests received for one path
    pub async fn requests_to(&self, to: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == to)
            .count()
    }
}

/// A representative Escavador process payload
pub fn escavador_process(digits: &str) -> Value {
    json!({
        "id": "esc-proc-1",
        "numero_cnj": digits,
        "orgao": "TJSP",
        "status": "ativo",
        "partes": [
            {"nome": "Maria Silva", "tipo": "autor"},
            {"nome": "Empresa XYZ", "tipo": "reu"}
        ],
        "movimentacoes": [
            {"id": "m1", "data": "2023-05-10", "tipo": "despacho", "descricao": "Conclusos"}
        ],
        "ultima_atualizacao": "2023-05-10T12:00:00Z",
        "valor_causa": 15000.0,
        "assunto": "Cobrança"
    })
}

/// A representative Judit lawsuit payload
pub fn judit_lawsuit(digits: &str) -> Value {
    json!({
        "id": "judit-law-1",
        "cnj_number": digits,
        "court": "TJSP",
        "status": "active",
        "parties": [
            {"name": "Maria Silva", "role": "claimant"},
            {"name": "Empresa XYZ", "role": "respondent"}
        ],
        "steps": [],
        "last_update": "2023-05-10T12:00:00Z",
        "amount": 15000.0,
        "subject": "Collection"
    })
}
