//! Dashboard summary derived from the tables.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{Card, Car, Driver, Invoice, StatusRecord, StatusValue, Tender, User};

/// Count of records per status value; every value is present, zeros included.
pub type StatusCounts = BTreeMap<&'static str, usize>;

pub fn status_counts<R: StatusRecord>(rows: &[R]) -> StatusCounts {
    let mut counts: StatusCounts = R::Status::ALL.iter().map(|s| (s.as_str(), 0)).collect();
    for row in rows {
        *counts.entry(row.status().as_str()).or_default() += 1;
    }
    counts
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub drivers: StatusCounts,
    pub cars: StatusCounts,
    pub cards: StatusCounts,
    pub tenders: StatusCounts,
    pub invoices: StatusCounts,
    pub outstanding_invoices: usize,
    pub unassigned_tenders: usize,
    pub users: usize,
}

impl DashboardSummary {
    pub fn build(
        drivers: &[Driver],
        cars: &[Car],
        cards: &[Card],
        tenders: &[Tender],
        invoices: &[Invoice],
        users: &[User],
    ) -> Self {
        Self {
            drivers: status_counts(drivers),
            cars: status_counts(cars),
            cards: status_counts(cards),
            tenders: status_counts(tenders),
            invoices: status_counts(invoices),
            outstanding_invoices: invoices
                .iter()
                .filter(|i| i.status.is_outstanding())
                .count(),
            unassigned_tenders: tenders.iter().filter(|t| !t.actions().is_empty()).count(),
            users: users.len(),
        }
    }
}
