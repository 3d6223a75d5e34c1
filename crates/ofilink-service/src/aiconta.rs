//! AIConta (Fiscal Shield) placeholder API.
//!
//! Canned responses only; nothing here touches the data file. The analyzer
//! echoes its input next to a fixed result until a real rules engine exists.

use crate::error::ApiError;
use axum::{
    body::Bytes,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

/// Routes mounted under `/api/aiconta`.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/companies", get(companies))
        .route("/compliance/analyze", post(analyze))
}

#[derive(Debug, Serialize)]
pub struct ModuleHealth {
    pub ok: bool,
    pub service: &'static str,
    pub message: &'static str,
    pub bots: [&'static str; 3],
}

async fn health() -> Json<ModuleHealth> {
    Json(ModuleHealth {
        ok: true,
        service: "aiconta",
        message: "AIConta API alive",
        bots: ["FacturaBot", "ContaBot", "FiscalShield"],
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: &'static str,
    pub legal_name: &'static str,
    pub country: &'static str,
    pub default_currency: &'static str,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct CompanyList {
    pub ok: bool,
    pub items: Vec<Company>,
}

async fn companies() -> Json<CompanyList> {
    Json(CompanyList {
        ok: true,
        items: vec![Company {
            id: "contax",
            legal_name: "CONTAX SOLUTIONS AND BUSINESS ADMINISTRATION SAS DE CV",
            country: "MX",
            default_currency: "MXN",
            active: true,
        }],
    })
}

/// Traffic-light verdict of a compliance review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Overall {
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub code: &'static str,
    pub severity: &'static str,
    pub title: &'static str,
    pub detail: &'static str,
    pub suggested_next: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResult {
    pub overall: Overall,
    pub summary: &'static str,
    pub findings: Vec<Finding>,
    pub citations: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub ok: bool,
    pub bot: &'static str,
    pub version: &'static str,
    pub input_echo: Value,
    pub result: AnalysisResult,
}

async fn analyze(body: Bytes) -> Result<Json<AnalysisResponse>, ApiError> {
    let input_echo = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Default::default())
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("invalid request body: {}", e)))?
    };

    Ok(Json(AnalysisResponse {
        ok: true,
        bot: "FiscalShield",
        version: "v1",
        input_echo,
        result: placeholder_result(),
    }))
}

fn placeholder_result() -> AnalysisResult {
    AnalysisResult {
        overall: Overall::Yellow,
        summary: "V1 demo: estructura lista. Pendiente motor experto + EFOS/69-B + expediente materialidad.",
        findings: vec![Finding {
            code: "MATERIALIDAD_BASE",
            severity: "medium",
            title: "Expediente incompleto",
            detail: "Faltan evidencias mínimas ligadas a contrato/OC/pedido.",
            suggested_next: vec![
                "Subir contrato firmado",
                "Adjuntar orden de compra/pedido",
                "Evidencia de entrega/servicio (correo, fotos, bitácora)",
            ],
        }],
        citations: Vec::new(),
    }
}
