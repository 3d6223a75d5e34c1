use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_STAGE: &str = "prospect";
pub const DEFAULT_CHANNEL: &str = "Other";
pub const DEFAULT_PRIORITY: &str = "Medium";
pub const DEFAULT_STATUS: &str = "Open";

/// `createdAt` format: UTC, minute precision.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// The persisted aggregate holding both collections and their id counters.
///
/// Wire names keep the spelling of existing data files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "nextClienteId")]
    pub next_client_id: u64,
    #[serde(rename = "nextTicketId")]
    pub next_ticket_id: u64,
    #[serde(rename = "clientes", default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub tickets: Vec<Ticket>,
}

impl Document {
    /// The document written on first initialization.
    pub fn seed() -> Self {
        Self {
            next_client_id: 1,
            next_ticket_id: 1,
            clients: Vec::new(),
            tickets: Vec::new(),
        }
    }

    /// Checks that each counter is at least 1 and above every id it has handed out.
    pub fn check_counters(&self) -> Result<(), String> {
        if self.next_client_id == 0 || self.next_ticket_id == 0 {
            return Err("id counters must start at 1".to_string());
        }
        if let Some(max) = self.clients.iter().map(|c| c.id).max() {
            if self.next_client_id <= max {
                return Err(format!(
                    "nextClienteId {} does not exceed stored client id {}",
                    self.next_client_id, max
                ));
            }
        }
        if let Some(max) = self.tickets.iter().map(|t| t.id).max() {
            if self.next_ticket_id <= max {
                return Err(format!(
                    "nextTicketId {} does not exceed stored ticket id {}",
                    self.next_ticket_id, max
                ));
            }
        }
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::seed()
    }
}

/// A sales-pipeline contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: u64,
    #[serde(rename = "empresa")]
    pub company: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "monto")]
    pub amount: f64,
    #[serde(rename = "etapa")]
    pub stage: String,
    #[serde(rename = "origen")]
    pub source: String,
    #[serde(rename = "asesor")]
    pub advisor: String,
}

/// A support or service request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,
    #[serde(rename = "canal")]
    pub channel: String,
    #[serde(rename = "empresa")]
    pub company: String,
    #[serde(rename = "cliente")]
    pub client: String,
    #[serde(rename = "asunto")]
    pub subject: String,
    #[serde(rename = "prioridad")]
    pub priority: String,
    #[serde(rename = "asignadoA")]
    pub assigned_to: String,
    #[serde(rename = "estado")]
    pub status: String,
    #[serde(rename = "creadoEn")]
    pub created_at: String,
}

/// Create-client input. Every field is optional at parse time; presence of
/// the required ones is checked by [`NewClient::validate`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewClient {
    #[serde(rename = "empresa", default)]
    pub company: Option<String>,
    #[serde(rename = "nombre", default)]
    pub name: Option<String>,
    #[serde(rename = "monto", default, deserialize_with = "lenient_amount")]
    pub amount: Option<f64>,
    #[serde(rename = "etapa", default)]
    pub stage: Option<String>,
    #[serde(rename = "origen", default)]
    pub source: Option<String>,
    #[serde(rename = "asesor", default)]
    pub advisor: Option<String>,
}

impl NewClient {
    pub fn new(company: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            company: Some(company.into()),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if present(&self.company).is_none() {
            missing.push("empresa");
        }
        if present(&self.name).is_none() {
            missing.push("nombre");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(missing))
        }
    }

    pub(crate) fn into_client(self, id: u64) -> Client {
        Client {
            id,
            company: or_default(self.company, ""),
            name: or_default(self.name, ""),
            amount: self.amount.unwrap_or(0.0),
            stage: or_default(self.stage, DEFAULT_STAGE),
            source: or_default(self.source, ""),
            advisor: or_default(self.advisor, ""),
        }
    }
}

/// Create-ticket input.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewTicket {
    #[serde(rename = "canal", default)]
    pub channel: Option<String>,
    #[serde(rename = "empresa", default)]
    pub company: Option<String>,
    #[serde(rename = "cliente", default)]
    pub client: Option<String>,
    #[serde(rename = "asunto", default)]
    pub subject: Option<String>,
    #[serde(rename = "prioridad", default)]
    pub priority: Option<String>,
    #[serde(rename = "asignadoA", default)]
    pub assigned_to: Option<String>,
    #[serde(rename = "estado", default)]
    pub status: Option<String>,
    #[serde(rename = "creadoEn", default)]
    pub created_at: Option<String>,
}

impl NewTicket {
    pub fn new(
        company: impl Into<String>,
        client: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            company: Some(company.into()),
            client: Some(client.into()),
            subject: Some(subject.into()),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing = [
            ("empresa", &self.company),
            ("cliente", &self.client),
            ("asunto", &self.subject),
        ]
        .into_iter()
        .filter(|(_, value)| present(value).is_none())
        .map(|(field, _)| field)
        .collect::<Vec<_>>();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(missing))
        }
    }

    pub(crate) fn into_ticket(self, id: u64, now: DateTime<Utc>) -> Ticket {
        let created_at = present(&self.created_at)
            .map(str::to_string)
            .unwrap_or_else(|| now.format(CREATED_AT_FORMAT).to_string());

        Ticket {
            id,
            channel: or_default(self.channel, DEFAULT_CHANNEL),
            company: or_default(self.company, ""),
            client: or_default(self.client, ""),
            subject: or_default(self.subject, ""),
            priority: or_default(self.priority, DEFAULT_PRIORITY),
            assigned_to: or_default(self.assigned_to, ""),
            status: or_default(self.status, DEFAULT_STATUS),
            created_at,
        }
    }
}

/// Trimmed value when non-blank.
fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn or_default(value: Option<String>, default: &str) -> String {
    present(&value).unwrap_or(default).to_string()
}

/// Accepts a JSON number or a numeric string; anything else reads as absent.
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let amount = match value {
        Some(serde_json::Value::Number(number)) => number.as_f64(),
        Some(serde_json::Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(amount.filter(|amount| amount.is_finite()))
}
