//! Fuel card model.

use serde::{Deserialize, Serialize};

use super::{
    next_numeric_id, reference_or_unassigned, require, status_enum, Record, StatusRecord,
};
use crate::errors::AppError;
use crate::store::Table;

status_enum! {
    CardStatus {
        #[default]
        Active => "active",
        Expired => "expired",
    }
}

/// A fuel card. Only the last four digits of the number are ever stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: u64,
    pub number: String,
    #[serde(default)]
    pub pin: String,
    #[serde(default)]
    pub expiry: String,
    #[serde(default = "super::unassigned")]
    pub driver: String,
    #[serde(default = "super::unassigned")]
    pub vehicle: String,
    #[serde(default)]
    pub status: CardStatus,
}

/// Mask a card number down to its last four digits.
///
/// Already-masked input is kept as-is.
pub fn mask_card_number(raw: &str) -> Result<String, AppError> {
    let raw = raw.trim();
    if raw.contains('*') {
        return Ok(raw.to_string());
    }
    let digits: Vec<char> = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 || raw.chars().any(|c| !c.is_ascii_digit() && c != ' ' && c != '-') {
        return Err(AppError::Validation(
            "Card number must contain at least four digits".to_string(),
        ));
    }
    let last4: String = digits[digits.len() - 4..].iter().collect();
    Ok(format!("**** **** **** {}", last4))
}

impl Card {
    pub fn from_request(id: u64, request: CreateCardRequest, number: String) -> Self {
        Self {
            id,
            number,
            pin: request.pin.unwrap_or_default(),
            expiry: request.expiry.unwrap_or_default(),
            driver: reference_or_unassigned(request.driver),
            vehicle: reference_or_unassigned(request.vehicle),
            status: request.status.unwrap_or_default(),
        }
    }

    pub fn apply(&mut self, request: &UpdateCardRequest) -> Result<(), AppError> {
        if let Some(number) = &request.number {
            self.number = mask_card_number(number)?;
        }
        if let Some(pin) = &request.pin {
            self.pin = pin.clone();
        }
        if let Some(expiry) = &request.expiry {
            self.expiry = expiry.clone();
        }
        if request.driver.is_some() {
            self.driver = reference_or_unassigned(request.driver.clone());
        }
        if request.vehicle.is_some() {
            self.vehicle = reference_or_unassigned(request.vehicle.clone());
        }
        if let Some(status) = request.status {
            self.status = status;
        }
        Ok(())
    }
}

impl Record for Card {
    type Id = u64;
    const TABLE: Table = Table::Cards;

    fn id(&self) -> &u64 {
        &self.id
    }

    fn next_id(existing: &[Self]) -> Result<u64, AppError> {
        next_numeric_id(Self::TABLE, existing.iter().map(|c| &c.id))
    }
}

impl StatusRecord for Card {
    type Status = CardStatus;

    fn status(&self) -> CardStatus {
        self.status
    }
}

/// Request body for issuing a fuel card.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequest {
    pub number: String,
    #[serde(default)]
    pub pin: Option<String>,
    #[serde(default)]
    pub expiry: Option<String>,
    #[serde(default)]
    pub driver: Option<String>,
    #[serde(default)]
    pub vehicle: Option<String>,
    #[serde(default)]
    pub status: Option<CardStatus>,
    #[serde(default)]
    pub expected_sha: Option<String>,
}

impl CreateCardRequest {
    /// Validate and return the masked number to store.
    pub fn validate(&self) -> Result<String, AppError> {
        require("Card number", &self.number)?;
        mask_card_number(&self.number)
    }
}

/// Request body for updating a fuel card.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCardRequest {
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub pin: Option<String>,
    #[serde(default)]
    pub expiry: Option<String>,
    #[serde(default)]
    pub driver: Option<String>,
    #[serde(default)]
    pub vehicle: Option<String>,
    #[serde(default)]
    pub status: Option<CardStatus>,
    #[serde(default)]
    pub expected_sha: Option<String>,
}
