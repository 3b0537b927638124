//! Tender (shipment job) model.

use serde::{Deserialize, Serialize};

use super::{
    id_space_exhausted, reference_or_unassigned, require, status_enum, Record, StatusRecord,
    UNASSIGNED,
};
use crate::errors::AppError;
use crate::store::Table;

/// Prefix of human-readable tender codes.
pub const TENDER_PREFIX: &str = "TND-";

/// First code handed out in an empty table.
const FIRST_TENDER_NUMBER: u64 = 1001;

status_enum! {
    /// Tender lifecycle.
    TenderStatus {
        #[default]
        Available => "available",
        Pending => "pending",
        Delivered => "delivered",
        Cancelled => "cancelled",
        Sold => "sold",
    }
}

/// A shipment routed between a loading and an unloading location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tender {
    /// Human-readable code, e.g. "TND-1001"
    pub id: String,
    pub route: String,
    #[serde(default)]
    pub loading_date: String,
    #[serde(default)]
    pub unloading_date: String,
    /// Price as entered, e.g. "$3,750"
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub status: TenderStatus,
    #[serde(default = "super::unassigned")]
    pub driver: String,
}

impl Tender {
    pub fn from_request(id: String, request: CreateTenderRequest) -> Self {
        Self {
            id,
            route: request.route.trim().to_string(),
            loading_date: request.loading_date.unwrap_or_default(),
            unloading_date: request.unloading_date.unwrap_or_default(),
            price: request.price.unwrap_or_default(),
            status: TenderStatus::Available,
            driver: UNASSIGNED.to_string(),
        }
    }

    pub fn is_unassigned(&self) -> bool {
        self.driver == UNASSIGNED
    }

    /// Actions the list view offers for this row.
    pub fn actions(&self) -> Vec<&'static str> {
        if self.status == TenderStatus::Available && self.is_unassigned() {
            vec!["assign"]
        } else {
            Vec::new()
        }
    }

    /// Hand the tender to a driver; only open tenders can be assigned.
    pub fn assign(&mut self, driver: &str) -> Result<(), AppError> {
        require("Driver", driver)?;
        if self.status != TenderStatus::Available {
            return Err(AppError::Validation(format!(
                "Tender {} is {} and cannot be assigned",
                self.id, self.status
            )));
        }
        self.driver = driver.trim().to_string();
        self.status = TenderStatus::Pending;
        Ok(())
    }

    pub fn apply(&mut self, request: &UpdateTenderRequest) -> Result<(), AppError> {
        if let Some(route) = &request.route {
            require("Route", route)?;
            self.route = route.trim().to_string();
        }
        if let Some(date) = &request.loading_date {
            self.loading_date = date.clone();
        }
        if let Some(date) = &request.unloading_date {
            self.unloading_date = date.clone();
        }
        if let Some(price) = &request.price {
            self.price = price.clone();
        }
        if let Some(status) = request.status {
            self.status = status;
        }
        if request.driver.is_some() {
            self.driver = reference_or_unassigned(request.driver.clone());
        }
        Ok(())
    }
}

fn tender_number(code: &str) -> Option<u64> {
    code.strip_prefix(TENDER_PREFIX)?.parse().ok()
}

impl Record for Tender {
    type Id = String;
    const TABLE: Table = Table::Tenders;

    fn id(&self) -> &String {
        &self.id
    }

    fn next_id(existing: &[Self]) -> Result<String, AppError> {
        let next = match existing.iter().filter_map(|t| tender_number(&t.id)).max() {
            Some(last) => last
                .checked_add(1)
                .ok_or_else(|| id_space_exhausted(Self::TABLE))?
                .max(FIRST_TENDER_NUMBER),
            None => FIRST_TENDER_NUMBER,
        };
        Ok(format!("{}{}", TENDER_PREFIX, next))
    }
}

impl StatusRecord for Tender {
    type Status = TenderStatus;

    fn status(&self) -> TenderStatus {
        self.status
    }
}

/// List row: the tender plus the actions the client should render.
#[derive(Debug, Clone, Serialize)]
pub struct TenderRow {
    #[serde(flatten)]
    pub tender: Tender,
    pub actions: Vec<&'static str>,
}

impl From<Tender> for TenderRow {
    fn from(tender: Tender) -> Self {
        let actions = tender.actions();
        Self { tender, actions }
    }
}

/// Request body for publishing a tender.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenderRequest {
    pub route: String,
    #[serde(default)]
    pub loading_date: Option<String>,
    #[serde(default)]
    pub unloading_date: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub expected_sha: Option<String>,
}

impl CreateTenderRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require("Route", &self.route)
    }
}

/// Request body for updating a tender.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenderRequest {
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub loading_date: Option<String>,
    #[serde(default)]
    pub unloading_date: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub status: Option<TenderStatus>,
    #[serde(default)]
    pub driver: Option<String>,
    #[serde(default)]
    pub expected_sha: Option<String>,
}

/// Request body for assigning a tender to a driver.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTenderRequest {
    pub driver: String,
    #[serde(default)]
    pub expected_sha: Option<String>,
}
