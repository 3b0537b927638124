//! View registry: one entry per dashboard view.
//!
//! Each entry names the HTML fragment to inject, the root element the
//! fragment must contain, the tables its loader reads and the controls its
//! initializer wires. Loading a view whose fragment is missing or malformed
//! yields a diagnostic state the client can render with a retry action.

mod wiring;

pub use wiring::*;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::store::{Table, TableStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewName {
    Dashboard,
    Drivers,
    Cars,
    Cards,
    Tenders,
    Invoices,
    Admin,
    Chat,
    Reports,
}

impl ViewName {
    pub const ALL: [ViewName; 9] = [
        ViewName::Dashboard,
        ViewName::Drivers,
        ViewName::Cars,
        ViewName::Cards,
        ViewName::Tenders,
        ViewName::Invoices,
        ViewName::Admin,
        ViewName::Chat,
        ViewName::Reports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewName::Dashboard => "dashboard",
            ViewName::Drivers => "drivers",
            ViewName::Cars => "cars",
            ViewName::Cards => "cards",
            ViewName::Tenders => "tenders",
            ViewName::Invoices => "invoices",
            ViewName::Admin => "admin",
            ViewName::Chat => "chat",
            ViewName::Reports => "reports",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        ViewName::ALL.into_iter().find(|v| v.as_str() == name)
    }
}

impl std::fmt::Display for ViewName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a wired control does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ViewAction {
    Create { table: Table },
    Filter { table: Table },
    Assign { table: Table },
    SendMessage,
    Refresh,
}

/// A control inside a fragment and the handler bound to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    pub element_id: &'static str,
    pub action: ViewAction,
}

#[derive(Debug)]
pub struct ViewSpec {
    pub name: ViewName,
    pub fragment: &'static str,
    pub root_id: &'static str,
    pub tables: &'static [Table],
    pub controls: &'static [Control],
}

const fn control(element_id: &'static str, action: ViewAction) -> Control {
    Control { element_id, action }
}

static REGISTRY: [ViewSpec; 9] = [
    ViewSpec {
        name: ViewName::Dashboard,
        fragment: "dashboard.html",
        root_id: "dashboard-view",
        tables: &[Table::Drivers, Table::Cars, Table::Tenders, Table::Invoices],
        controls: &[control("refresh-dashboard-btn", ViewAction::Refresh)],
    },
    ViewSpec {
        name: ViewName::Drivers,
        fragment: "drivers.html",
        root_id: "drivers-view",
        tables: &[Table::Drivers, Table::Statuses],
        controls: &[
            control("add-driver-btn", ViewAction::Create { table: Table::Drivers }),
            control("driver-status-filter", ViewAction::Filter { table: Table::Drivers }),
        ],
    },
    ViewSpec {
        name: ViewName::Cars,
        fragment: "cars.html",
        root_id: "cars-view",
        tables: &[Table::Cars, Table::Statuses],
        controls: &[
            control("add-car-btn", ViewAction::Create { table: Table::Cars }),
            control("car-status-filter", ViewAction::Filter { table: Table::Cars }),
        ],
    },
    ViewSpec {
        name: ViewName::Cards,
        fragment: "cards.html",
        root_id: "cards-view",
        tables: &[Table::Cards, Table::Statuses],
        controls: &[
            control("add-card-btn", ViewAction::Create { table: Table::Cards }),
            control("card-status-filter", ViewAction::Filter { table: Table::Cards }),
        ],
    },
    ViewSpec {
        name: ViewName::Tenders,
        fragment: "tenders.html",
        root_id: "tenders-view",
        tables: &[Table::Tenders, Table::Drivers, Table::Statuses],
        controls: &[
            control("add-tender-btn", ViewAction::Create { table: Table::Tenders }),
            control("tender-status-filter", ViewAction::Filter { table: Table::Tenders }),
            control("assign-tender-btn", ViewAction::Assign { table: Table::Tenders }),
        ],
    },
    ViewSpec {
        name: ViewName::Invoices,
        fragment: "invoices.html",
        root_id: "invoices-view",
        tables: &[Table::Invoices, Table::Statuses],
        controls: &[
            control("add-invoice-btn", ViewAction::Create { table: Table::Invoices }),
            control("invoice-status-filter", ViewAction::Filter { table: Table::Invoices }),
        ],
    },
    ViewSpec {
        name: ViewName::Admin,
        fragment: "admin.html",
        root_id: "admin-view",
        tables: &[Table::Users, Table::Statuses],
        controls: &[
            control("add-user-btn", ViewAction::Create { table: Table::Users }),
            control("add-status-btn", ViewAction::Create { table: Table::Statuses }),
            control("user-status-filter", ViewAction::Filter { table: Table::Users }),
        ],
    },
    ViewSpec {
        name: ViewName::Chat,
        fragment: "chat.html",
        root_id: "chat-view",
        tables: &[Table::Chat, Table::Users],
        controls: &[control("send-message-btn", ViewAction::SendMessage)],
    },
    ViewSpec {
        name: ViewName::Reports,
        fragment: "reports.html",
        root_id: "reports-view",
        tables: &[Table::Tenders, Table::Invoices],
        controls: &[control("refresh-reports-btn", ViewAction::Refresh)],
    },
];

/// Static registry entry for a view.
pub fn registry_spec(name: ViewName) -> &'static ViewSpec {
    // REGISTRY is declared in ViewName::ALL order.
    &REGISTRY[ViewName::ALL.iter().position(|v| *v == name).unwrap_or_default()]
}

/// Why a view could not be shown.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ViewProblem {
    FragmentUnavailable {
        path: String,
    },
    MissingRoot {
        #[serde(rename = "expectedRoot")]
        expected_root: String,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ViewState {
    Ready {
        view: ViewName,
        html: String,
        data: BTreeMap<&'static str, Value>,
        shas: BTreeMap<&'static str, Option<String>>,
        controls: &'static [Control],
    },
    Diagnostic {
        view: ViewName,
        problem: ViewProblem,
        message: String,
        retry: String,
    },
}

/// Fragment loader bound to a views directory.
#[derive(Debug, Clone)]
pub struct ViewRegistry {
    views_dir: PathBuf,
}

impl ViewRegistry {
    pub fn new(views_dir: impl Into<PathBuf>) -> Self {
        Self {
            views_dir: views_dir.into(),
        }
    }

    pub fn spec(&self, name: &str) -> Result<&'static ViewSpec, AppError> {
        ViewName::parse(name)
            .map(registry_spec)
            .ok_or_else(|| AppError::NotFound(format!("View {} not found", name)))
    }

    /// Fetch the fragment, check its structure, then run the view's loader.
    pub async fn load(&self, spec: &'static ViewSpec, store: &TableStore) -> Result<ViewState, AppError> {
        let path = self.views_dir.join(spec.fragment);
        let retry = format!("/api/views/{}", spec.name);

        let html = match tokio::fs::read_to_string(&path).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(view = %spec.name, path = %path.display(), "fragment unavailable: {}", e);
                return Ok(ViewState::Diagnostic {
                    view: spec.name,
                    problem: ViewProblem::FragmentUnavailable {
                        path: path.display().to_string(),
                    },
                    message: format!("Could not load the {} view: {}", spec.name, e),
                    retry,
                });
            }
        };

        if !has_root_element(&html, spec.root_id) {
            tracing::warn!(view = %spec.name, root = spec.root_id, "fragment is missing its root element");
            return Ok(ViewState::Diagnostic {
                view: spec.name,
                problem: ViewProblem::MissingRoot {
                    expected_root: spec.root_id.to_string(),
                },
                message: format!(
                    "The {} view is damaged: element #{} is missing",
                    spec.name, spec.root_id
                ),
                retry,
            });
        }

        let mut data = BTreeMap::new();
        let mut shas = BTreeMap::new();
        for table in spec.tables {
            let snapshot = store.read(*table).await?;
            data.insert(table.as_str(), snapshot.data);
            shas.insert(table.as_str(), snapshot.sha);
        }

        Ok(ViewState::Ready {
            view: spec.name,
            html,
            data,
            shas,
            controls: spec.controls,
        })
    }
}

/// Value of every `id` attribute in a fragment. `data-id` and similar do not count.
static ID_ATTRIBUTE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?:^|\s)id\s*=\s*["']([^"']*)["']"#).ok());

fn has_root_element(html: &str, root_id: &str) -> bool {
    let Some(re) = ID_ATTRIBUTE.as_ref() else {
        return false;
    };
    re.captures_iter(html)
        .any(|caps| caps.get(1).is_some_and(|id| id.as_str() == root_id))
}
