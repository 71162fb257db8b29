use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::service::{ComplexityLevel, SupportLevel, TimelineOption};

/// Per-session pricing choices. Never persisted.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Selection {
    #[serde(default)]
    pub service_ids: BTreeSet<String>,
    #[serde(default)]
    pub complexity: ComplexityLevel,
    #[serde(default)]
    pub timeline: TimelineOption,
    #[serde(default)]
    pub support: SupportLevel,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.service_ids.is_empty()
    }

    /// Flips a service in or out of the selection. Returns whether it is now selected.
    pub fn toggle(&mut self, service_id: &str) -> bool {
        if self.service_ids.remove(service_id) {
            false
        } else {
            self.service_ids.insert(service_id.to_string());
            true
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct LineItem {
    pub service_id: String,
    pub name: String,
    pub base_price: f64,
    pub complexity_factor: f64,
    pub adjusted_price: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EstimateResult {
    pub line_items: Vec<LineItem>,
    pub subtotal: f64,
    pub timeline_multiplier: f64,
    pub support_multiplier: f64,
    pub support_fee: f64,
    pub total: f64,
    /// False whenever no service is selected; callers must not display the total then.
    pub has_estimate: bool,
}
