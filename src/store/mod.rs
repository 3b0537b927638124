//! Table storage on top of the GitHub contents API.
//!
//! The backing repository is the source of truth. Each table is one JSON
//! array file; the blob sha GitHub returns for it is the concurrency token.

mod repository;

pub use repository::*;

use serde::{Deserialize, Serialize};

/// Every JSON file the dashboard treats as a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Drivers,
    Cars,
    Cards,
    Tenders,
    Invoices,
    Users,
    Statuses,
    Chat,
}

impl Table {
    pub const ALL: [Table; 8] = [
        Table::Drivers,
        Table::Cars,
        Table::Cards,
        Table::Tenders,
        Table::Invoices,
        Table::Users,
        Table::Statuses,
        Table::Chat,
    ];

    /// Path of the file inside the repository.
    pub fn path(&self) -> &'static str {
        match self {
            Table::Drivers => "drivers.json",
            Table::Cars => "cars.json",
            Table::Cards => "cards.json",
            Table::Tenders => "tenders.json",
            Table::Invoices => "invoices.json",
            Table::Users => "users.json",
            Table::Statuses => "statuses.json",
            Table::Chat => "chat/messages.json",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Drivers => "drivers",
            Table::Cars => "cars",
            Table::Cards => "cards",
            Table::Tenders => "tenders",
            Table::Invoices => "invoices",
            Table::Users => "users",
            Table::Statuses => "statuses",
            Table::Chat => "chat",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Table::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Singular noun used in commit messages.
    pub fn record_noun(&self) -> &'static str {
        match self {
            Table::Drivers => "driver",
            Table::Cars => "car",
            Table::Cards => "card",
            Table::Tenders => "tender",
            Table::Invoices => "invoice",
            Table::Users => "user",
            Table::Statuses => "status",
            Table::Chat => "chat message",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
