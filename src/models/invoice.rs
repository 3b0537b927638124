//! Invoice model.

use serde::{Deserialize, Serialize};

use super::{next_numeric_id, require, status_enum, Record, StatusRecord};
use crate::errors::AppError;
use crate::store::Table;

status_enum! {
    InvoiceStatus {
        #[default]
        Pending => "pending",
        Paid => "paid",
        Unpaid => "unpaid",
        Overdue => "overdue",
    }
}

impl InvoiceStatus {
    /// Money is still owed.
    pub fn is_outstanding(self) -> bool {
        !matches!(self, InvoiceStatus::Paid)
    }
}

/// A client invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: u64,
    pub client: String,
    #[serde(default)]
    pub issue_date: String,
    #[serde(default)]
    pub due_date: String,
    /// Amount as entered, e.g. "$3,750"
    pub amount: String,
    #[serde(default)]
    pub status: InvoiceStatus,
    /// Payment terms, e.g. "Net 30"
    #[serde(default)]
    pub terms: String,
}

impl Invoice {
    pub fn from_request(id: u64, request: CreateInvoiceRequest) -> Self {
        Self {
            id,
            client: request.client.trim().to_string(),
            issue_date: request.issue_date.unwrap_or_default(),
            due_date: request.due_date.unwrap_or_default(),
            amount: request.amount.trim().to_string(),
            status: request.status.unwrap_or_default(),
            terms: request.terms.unwrap_or_default(),
        }
    }

    pub fn apply(&mut self, request: &UpdateInvoiceRequest) -> Result<(), AppError> {
        if let Some(client) = &request.client {
            require("Client", client)?;
            self.client = client.trim().to_string();
        }
        if let Some(date) = &request.issue_date {
            self.issue_date = date.clone();
        }
        if let Some(date) = &request.due_date {
            self.due_date = date.clone();
        }
        if let Some(amount) = &request.amount {
            require("Amount", amount)?;
            self.amount = amount.trim().to_string();
        }
        if let Some(status) = request.status {
            self.status = status;
        }
        if let Some(terms) = &request.terms {
            self.terms = terms.clone();
        }
        Ok(())
    }
}

impl Record for Invoice {
    type Id = u64;
    const TABLE: Table = Table::Invoices;

    fn id(&self) -> &u64 {
        &self.id
    }

    fn next_id(existing: &[Self]) -> Result<u64, AppError> {
        next_numeric_id(Self::TABLE, existing.iter().map(|i| &i.id))
    }
}

impl StatusRecord for Invoice {
    type Status = InvoiceStatus;

    fn status(&self) -> InvoiceStatus {
        self.status
    }
}

/// Request body for creating an invoice.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    pub client: String,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    pub amount: String,
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
    #[serde(default)]
    pub terms: Option<String>,
    #[serde(default)]
    pub expected_sha: Option<String>,
}

impl CreateInvoiceRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require("Client", &self.client)?;
        require("Amount", &self.amount)
    }
}

/// Request body for updating an invoice.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoiceRequest {
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
    #[serde(default)]
    pub terms: Option<String>,
    #[serde(default)]
    pub expected_sha: Option<String>,
}
