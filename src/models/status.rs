//! Status taxonomy driving badge labels and colors per module.

use serde::{Deserialize, Serialize};

use super::{
    next_numeric_id, require, CardStatus, CarStatus, DriverStatus, InvoiceStatus, Record,
    StatusValue, TenderStatus, UserStatus,
};
use crate::errors::AppError;
use crate::store::Table;

/// Modules whose records carry a status badge.
pub const STATUS_MODULES: [Table; 6] = [
    Table::Drivers,
    Table::Cars,
    Table::Cards,
    Table::Tenders,
    Table::Invoices,
    Table::Users,
];

/// Label and color of one status value in one module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDefinition {
    pub id: u64,
    pub module: String,
    pub label: String,
    pub color: String,
}

fn validate_module(module: &str) -> Result<(), AppError> {
    if STATUS_MODULES.iter().any(|t| t.as_str() == module) {
        return Ok(());
    }
    Err(AppError::Validation(format!(
        "Unknown module {:?} for status definitions",
        module
    )))
}

fn validate_color(color: &str) -> Result<(), AppError> {
    let valid = color
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Color {:?} must look like #rgb or #rrggbb",
            color
        )))
    }
}

/// "on-duty" -> "On Duty"
fn title_case(wire: &str) -> String {
    wire.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn badge_color(wire: &str) -> &'static str {
    match wire {
        "available" | "active" | "paid" | "delivered" => "#28a745",
        "on-duty" | "on-route" | "pending" => "#007bff",
        "maintenance" | "unpaid" => "#ffc107",
        "expired" | "overdue" | "cancelled" => "#dc3545",
        _ => "#6c757d",
    }
}

fn definitions_for<S: StatusValue>(module: Table, out: &mut Vec<StatusDefinition>) {
    for status in S::ALL {
        out.push(StatusDefinition {
            id: out.len() as u64 + 1,
            module: module.as_str().to_string(),
            label: title_case(status.as_str()),
            color: badge_color(status.as_str()).to_string(),
        });
    }
}

/// Taxonomy seeded into new repositories: one entry per status value.
pub fn default_statuses() -> Vec<StatusDefinition> {
    let mut out = Vec::new();
    definitions_for::<DriverStatus>(Table::Drivers, &mut out);
    definitions_for::<CarStatus>(Table::Cars, &mut out);
    definitions_for::<CardStatus>(Table::Cards, &mut out);
    definitions_for::<TenderStatus>(Table::Tenders, &mut out);
    definitions_for::<InvoiceStatus>(Table::Invoices, &mut out);
    definitions_for::<UserStatus>(Table::Users, &mut out);
    out
}

impl StatusDefinition {
    pub fn from_request(id: u64, request: CreateStatusRequest) -> Self {
        Self {
            id,
            module: request.module.trim().to_string(),
            label: request.label.trim().to_string(),
            color: request.color.trim().to_lowercase(),
        }
    }

    pub fn apply(&mut self, request: &UpdateStatusRequest) -> Result<(), AppError> {
        if let Some(module) = &request.module {
            validate_module(module.trim())?;
            self.module = module.trim().to_string();
        }
        if let Some(label) = &request.label {
            require("Label", label)?;
            self.label = label.trim().to_string();
        }
        if let Some(color) = &request.color {
            validate_color(color.trim())?;
            self.color = color.trim().to_lowercase();
        }
        Ok(())
    }
}

impl Record for StatusDefinition {
    type Id = u64;
    const TABLE: Table = Table::Statuses;

    fn id(&self) -> &u64 {
        &self.id
    }

    fn next_id(existing: &[Self]) -> Result<u64, AppError> {
        next_numeric_id(Self::TABLE, existing.iter().map(|s| &s.id))
    }
}

/// Keep only definitions belonging to `module`; blank or "all" keeps everything.
pub fn filter_by_module(
    rows: Vec<StatusDefinition>,
    module: Option<&str>,
) -> Result<Vec<StatusDefinition>, AppError> {
    let Some(module) = module.map(str::trim).filter(|m| !m.is_empty() && *m != "all") else {
        return Ok(rows);
    };
    validate_module(module)?;
    Ok(rows.into_iter().filter(|s| s.module == module).collect())
}

/// Query parameters for listing status definitions.
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub module: Option<String>,
}

/// Request body for adding a status definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStatusRequest {
    pub module: String,
    pub label: String,
    pub color: String,
    #[serde(default)]
    pub expected_sha: Option<String>,
}

impl CreateStatusRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_module(self.module.trim())?;
        require("Label", &self.label)?;
        validate_color(self.color.trim())
    }
}

/// Request body for editing a status definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub expected_sha: Option<String>,
}
