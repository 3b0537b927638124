//! Data models for the fleet dashboard.
//!
//! Records serialize with camelCase keys, matching the JSON files the
//! browser client has always read and written.

mod car;
mod card;
mod chat;
mod dashboard;
mod driver;
mod invoice;
mod status;
mod tender;
mod user;

pub use car::*;
pub use card::*;
pub use chat::*;
pub use dashboard::*;
pub use driver::*;
pub use invoice::*;
pub use status::*;
pub use tender::*;
pub use user::*;

use std::fmt::Display;
use std::str::FromStr;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::errors::AppError;
use crate::store::Table;

/// Display value for an empty driver/vehicle/card reference.
pub const UNASSIGNED: &str = "Unassigned";

/// A row of one table.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Id: PartialEq + Display + FromStr + Clone + Send + Sync;

    const TABLE: Table;

    fn id(&self) -> &Self::Id;

    /// Id for a record appended after `existing`.
    fn next_id(existing: &[Self]) -> Result<Self::Id, AppError>;
}

/// A closed set of status values stored as kebab-case strings.
pub trait StatusValue: Copy + PartialEq + Send + Sync + 'static {
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }
}

/// Records carrying a typed status field.
pub trait StatusRecord: Record {
    type Status: StatusValue;

    fn status(&self) -> Self::Status;
}

/// Declares a status enum with its wire names.
macro_rules! status_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $wire)] $variant),+
        }

        impl $crate::models::StatusValue for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::models::StatusValue::as_str(*self))
            }
        }
    };
}
pub(crate) use status_enum;

/// `max(id) + 1`, starting at 1.
pub fn next_numeric_id<'a>(
    table: Table,
    ids: impl IntoIterator<Item = &'a u64>,
) -> Result<u64, AppError> {
    ids.into_iter()
        .copied()
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| id_space_exhausted(table))
}

/// Error for a table whose largest id leaves no successor.
pub(crate) fn id_space_exhausted(table: Table) -> AppError {
    AppError::Validation(format!("id space exhausted for {}", table.path()))
}

/// Keep only records whose status matches `filter`.
///
/// Filtering runs on the typed field, so relabeling a status in the
/// taxonomy cannot change which rows match.
pub fn filter_by_status<R: StatusRecord>(
    rows: Vec<R>,
    filter: Option<&str>,
) -> Result<Vec<R>, AppError> {
    let Some(raw) = filter.map(str::trim).filter(|f| !f.is_empty() && *f != "all") else {
        return Ok(rows);
    };

    let wanted = R::Status::parse(raw).ok_or_else(|| {
        let allowed: Vec<&str> = R::Status::ALL.iter().map(|s| s.as_str()).collect();
        AppError::Validation(format!(
            "Unknown {} status {:?}; expected one of {}",
            R::TABLE.record_noun(),
            raw,
            allowed.join(", ")
        ))
    })?;

    Ok(rows.into_iter().filter(|r| r.status() == wanted).collect())
}

/// Query parameters shared by list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: Option<String>,
}

pub(crate) fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

pub(crate) fn unassigned() -> String {
    UNASSIGNED.to_string()
}

/// Trimmed value, or the unassigned placeholder when blank.
pub(crate) fn reference_or_unassigned(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNASSIGNED.to_string())
}
