//! Normalized domain model.
//!
//! Provider-agnostic records produced by the adapters. Each adapter owns
//! the mapping from its raw wire shape into these types through explicit
//! lookup tables; unknown provider values degrade to `Unknown`/`Other`
//! instead of failing.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{JurisError, JurisResult};

/// Normalized lifecycle status of a judicial process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    /// Process is in progress
    Active,
    /// Process has been archived
    Archived,
    /// Process is suspended
    Suspended,
    /// Process is closed (final ruling or dismissal)
    Closed,
    /// Status not reported or not recognized
    Unknown,
}

/// Normalized role of a party in a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    /// The party that filed the action
    Plaintiff,
    /// The party the action was filed against
    Defendant,
    /// Counsel of record
    Lawyer,
    /// Any other or unrecognized role
    Other,
}

/// Normalized document classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Initial or interlocutory petition
    Petition,
    /// Final sentence
    Sentence,
    /// Judicial decision
    Decision,
    /// Judicial order
    Order,
    /// Any other or unrecognized type
    Other,
}

/// Type of identity document held by a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonDocumentType {
    /// Natural person (11-digit CPF)
    Cpf,
    /// Legal entity (14-digit CNPJ)
    Cnpj,
    /// Any other document type
    Other,
}

/// A single movement (andamento) in a process timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    /// Movement ID
    pub id: String,
    /// When the movement was registered
    pub date: DateTime<Utc>,
    /// Provider-reported movement type, as-is
    pub movement_type: String,
    /// Short description
    pub description: String,
    /// Full text content, when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Attachment URLs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

/// A normalized judicial process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResult {
    /// Stable process ID within the source provider
    pub id: String,
    /// CNJ process number
    pub number: String,
    /// Court of record
    pub court: String,
    /// Normalized status
    pub status: ProcessStatus,
    /// Plaintiff names
    pub plaintiffs: Vec<String>,
    /// Defendant names
    pub defendants: Vec<String>,
    /// Known movements, newest last
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub movements: Vec<Movement>,
    /// Last update reported by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
    /// Case value in BRL, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Case subject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Raw provider payload, kept for debugging
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub raw: Value,
}

/// Summary of a process as listed under a person
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessSummary {
    /// CNJ process number
    pub number: String,
    /// Court of record
    pub court: String,
    /// Normalized status
    pub status: ProcessStatus,
    /// Role the person holds in this process
    pub role: PartyRole,
}

/// A normalized person lookup result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonResult {
    /// Stable person ID within the source provider
    pub id: String,
    /// Full name
    pub name: String,
    /// Identity document number (digits only)
    pub document: String,
    /// Identity document type
    pub document_type: PersonDocumentType,
    /// Processes the person appears in
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub processes: Vec<ProcessSummary>,
    /// Known addresses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<String>,
    /// Known phone numbers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phones: Vec<String>,
    /// Known e-mail addresses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<String>,
    /// Raw provider payload, kept for debugging
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub raw: Value,
}

/// A normalized process document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Stable document ID within the source provider
    pub id: String,
    /// Normalized document type
    pub doc_type: DocumentType,
    /// Document title
    pub title: String,
    /// Full text content, when the provider serves it inline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Document date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Owning process ID
    pub process_id: String,
    /// Document author (judge, clerk, counsel)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Download URL, when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Raw provider payload, kept for debugging
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub raw: Value,
}

// CNJ numbering: NNNNNNN-DD.AAAA.J.TR.OOOO (Resolution 65/2008).
static CNJ_FORMAT: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^\d{7}-\d{2}\.\d{4}\.\d\.\d{2}\.\d{4}$").unwrap()
});

/// Validate a CNJ process number.
///
/// Accepts the canonical punctuated form or a bare 20-digit string and
/// returns the digits-only representation.
///
/// # Errors
/// Returns [`JurisError::Validation`] when the input matches neither form.
pub fn validate_cnj(number: &str) -> JurisResult<String> {
    let trimmed = number.trim();
    if CNJ_FORMAT.is_match(trimmed) {
        return Ok(trimmed.chars().filter(char::is_ascii_digit).collect());
    }
    if trimmed.len() == 20 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Ok(trimmed.to_string());
    }
    Err(JurisError::validation(
        "process_number",
        format!("'{trimmed}' is not a valid CNJ process number"),
    ))
}

/// Validate a CPF or CNPJ and return the digits plus the detected type.
///
/// # Errors
/// Returns [`JurisError::Validation`] when the digit count matches neither
/// a CPF (11) nor a CNPJ (14).
pub fn validate_person_document(document: &str) -> JurisResult<(String, PersonDocumentType)> {
    let digits: String = document.chars().filter(char::is_ascii_digit).collect();
    match digits.len() {
        11 => Ok((digits, PersonDocumentType::Cpf)),
        14 => Ok((digits, PersonDocumentType::Cnpj)),
        _ => Err(JurisError::validation(
            "document",
            format!("'{document}' is neither a CPF nor a CNPJ"),
        )),
    }
}
