//! Vehicle (tractor + trailer) model.

use serde::{Deserialize, Serialize};

use super::{
    next_numeric_id, reference_or_unassigned, require, status_enum, Record, StatusRecord,
};
use crate::errors::AppError;
use crate::store::Table;

status_enum! {
    /// Vehicle availability.
    CarStatus {
        #[default]
        Available => "available",
        OnRoute => "on-route",
        Maintenance => "maintenance",
    }
}

/// A tractor/trailer combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: u64,
    pub tractor_plate: String,
    #[serde(default)]
    pub trailer_plate: String,
    /// Payload capacity as entered, e.g. "24 t"
    #[serde(default)]
    pub capacity: String,
    /// Cargo volume as entered, e.g. "92 m³"
    #[serde(default)]
    pub volume: String,
    #[serde(default)]
    pub insurance_expiry: String,
    #[serde(default)]
    pub inspection_expiry: String,
    #[serde(default)]
    pub status: CarStatus,
    #[serde(default = "super::unassigned")]
    pub driver: String,
}

impl Car {
    pub fn from_request(id: u64, request: CreateCarRequest) -> Self {
        Self {
            id,
            tractor_plate: request.tractor_plate.trim().to_uppercase(),
            trailer_plate: request
                .trailer_plate
                .map(|p| p.trim().to_uppercase())
                .unwrap_or_default(),
            capacity: request.capacity.unwrap_or_default(),
            volume: request.volume.unwrap_or_default(),
            insurance_expiry: request.insurance_expiry.unwrap_or_default(),
            inspection_expiry: request.inspection_expiry.unwrap_or_default(),
            status: request.status.unwrap_or_default(),
            driver: reference_or_unassigned(request.driver),
        }
    }

    pub fn apply(&mut self, request: &UpdateCarRequest) -> Result<(), AppError> {
        if let Some(plate) = &request.tractor_plate {
            require("Tractor plate", plate)?;
            self.tractor_plate = plate.trim().to_uppercase();
        }
        if let Some(plate) = &request.trailer_plate {
            self.trailer_plate = plate.trim().to_uppercase();
        }
        if let Some(capacity) = &request.capacity {
            self.capacity = capacity.clone();
        }
        if let Some(volume) = &request.volume {
            self.volume = volume.clone();
        }
        if let Some(date) = &request.insurance_expiry {
            self.insurance_expiry = date.clone();
        }
        if let Some(date) = &request.inspection_expiry {
            self.inspection_expiry = date.clone();
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

impl Record for Car {
    type Id = u64;
    const TABLE: Table = Table::Cars;

    fn id(&self) -> &u64 {
        &self.id
    }

    fn next_id(existing: &[Self]) -> Result<u64, AppError> {
        next_numeric_id(Self::TABLE, existing.iter().map(|c| &c.id))
    }
}

impl StatusRecord for Car {
    type Status = CarStatus;

    fn status(&self) -> CarStatus {
        self.status
    }
}

/// Request body for registering a vehicle.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCarRequest {
    pub tractor_plate: String,
    #[serde(default)]
    pub trailer_plate: Option<String>,
    #[serde(default)]
    pub capacity: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default)]
    pub insurance_expiry: Option<String>,
    #[serde(default)]
    pub inspection_expiry: Option<String>,
    #[serde(default)]
    pub status: Option<CarStatus>,
    #[serde(default)]
    pub driver: Option<String>,
    #[serde(default)]
    pub expected_sha: Option<String>,
}

impl CreateCarRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require("Tractor plate", &self.tractor_plate)
    }
}

/// Request body for updating a vehicle.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCarRequest {
    #[serde(default)]
    pub tractor_plate: Option<String>,
    #[serde(default)]
    pub trailer_plate: Option<String>,
    #[serde(default)]
    pub capacity: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default)]
    pub insurance_expiry: Option<String>,
    #[serde(default)]
    pub inspection_expiry: Option<String>,
    #[serde(default)]
    pub status: Option<CarStatus>,
    #[serde(default)]
    pub driver: Option<String>,
    #[serde(default)]
    pub expected_sha: Option<String>,
}
