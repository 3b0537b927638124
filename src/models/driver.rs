//! Driver model.

use serde::{Deserialize, Serialize};

use super::{
    next_numeric_id, reference_or_unassigned, require, status_enum, Record, StatusRecord,
};
use crate::errors::AppError;
use crate::store::Table;

status_enum! {
    /// Driver availability.
    DriverStatus {
        #[default]
        Available => "available",
        OnDuty => "on-duty",
        Maintenance => "maintenance",
    }
}

/// A driver on the fleet roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: u64,
    pub name: String,
    pub license: String,
    #[serde(default)]
    pub experience: String,
    /// Assigned vehicle, by display string
    #[serde(default = "super::unassigned")]
    pub car: String,
    /// Assigned fuel card, by display string
    #[serde(default = "super::unassigned")]
    pub card: String,
    /// Tender count summary shown on the roster
    #[serde(default)]
    pub tenders: String,
    #[serde(default)]
    pub status: DriverStatus,
}

impl Driver {
    pub fn from_request(id: u64, request: CreateDriverRequest) -> Self {
        Self {
            id,
            name: request.name.trim().to_string(),
            license: request.license.trim().to_string(),
            experience: request.experience.unwrap_or_default(),
            car: reference_or_unassigned(request.car),
            card: reference_or_unassigned(request.card),
            tenders: request.tenders.unwrap_or_else(|| "0".to_string()),
            status: request.status.unwrap_or_default(),
        }
    }

    pub fn apply(&mut self, request: &UpdateDriverRequest) -> Result<(), AppError> {
        if let Some(name) = &request.name {
            require("Driver name", name)?;
            self.name = name.trim().to_string();
        }
        if let Some(license) = &request.license {
            require("License", license)?;
            self.license = license.trim().to_string();
        }
        if let Some(experience) = &request.experience {
            self.experience = experience.clone();
        }
        if request.car.is_some() {
            self.car = reference_or_unassigned(request.car.clone());
        }
        if request.card.is_some() {
            self.card = reference_or_unassigned(request.card.clone());
        }
        if let Some(tenders) = &request.tenders {
            self.tenders = tenders.clone();
        }
        if let Some(status) = request.status {
            self.status = status;
        }
        Ok(())
    }
}

impl Record for Driver {
    type Id = u64;
    const TABLE: Table = Table::Drivers;

    fn id(&self) -> &u64 {
        &self.id
    }

    fn next_id(existing: &[Self]) -> Result<u64, AppError> {
        next_numeric_id(Self::TABLE, existing.iter().map(|d| &d.id))
    }
}

impl StatusRecord for Driver {
    type Status = DriverStatus;

    fn status(&self) -> DriverStatus {
        self.status
    }
}

/// Request body for creating a new driver.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDriverRequest {
    pub name: String,
    pub license: String,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub car: Option<String>,
    #[serde(default)]
    pub card: Option<String>,
    #[serde(default)]
    pub tenders: Option<String>,
    #[serde(default)]
    pub status: Option<DriverStatus>,
    /// Sha of the table the client rendered from
    #[serde(default)]
    pub expected_sha: Option<String>,
}

impl CreateDriverRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require("Driver name", &self.name)?;
        require("License", &self.license)
    }
}

/// Request body for updating an existing driver.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDriverRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub car: Option<String>,
    #[serde(default)]
    pub card: Option<String>,
    #[serde(default)]
    pub tenders: Option<String>,
    #[serde(default)]
    pub status: Option<DriverStatus>,
    #[serde(default)]
    pub expected_sha: Option<String>,
}
