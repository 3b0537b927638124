//! Per-session record of which view controls have listeners attached.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::{Control, ViewAction, ViewName, ViewSpec};

/// Outcome of initializing one view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitReport {
    pub view: ViewName,
    /// Controls wired by this call
    pub attached: Vec<Control>,
    /// Controls that already carried the wired marker
    pub already_wired: usize,
}

/// Listener table plus the "already wired" markers guarding it.
#[derive(Debug, Default)]
pub struct Wiring {
    wired: HashSet<(ViewName, &'static str)>,
    listeners: HashMap<(ViewName, &'static str), Vec<ViewAction>>,
}

impl Wiring {
    /// Attach a listener to every control of `spec` that is not yet marked.
    pub fn initialize(&mut self, spec: &ViewSpec) -> InitReport {
        let mut attached = Vec::new();
        let mut already_wired = 0;

        for control in spec.controls {
            let key = (spec.name, control.element_id);
            if !self.wired.insert(key) {
                already_wired += 1;
                continue;
            }
            self.listeners.entry(key).or_default().push(control.action);
            attached.push(*control);
        }

        if !attached.is_empty() {
            tracing::debug!(view = %spec.name, attached = attached.len(), "view controls wired");
        }

        InitReport {
            view: spec.name,
            attached,
            already_wired,
        }
    }

    /// Handlers a click on `element_id` runs; empty when nothing is wired.
    pub fn dispatch(&self, view: ViewName, element_id: &str) -> Vec<ViewAction> {
        self.listeners
            .iter()
            .find(|((v, e), _)| *v == view && *e == element_id)
            .map(|(_, actions)| actions.clone())
            .unwrap_or_default()
    }
}
