use std::fmt;

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Six-digit reference token shown to the visitor as `EST-123456`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct EstimateId(String);

impl EstimateId {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let token: u32 = rng.gen_range(100_000..=999_999);
        Self(token.to_string())
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    pub fn reference(&self) -> String {
        format!("EST-{}", self.0)
    }

    pub fn file_name(&self) -> String {
        format!("Project_Estimate_{}.pdf", self.0)
    }
}

impl fmt::Display for EstimateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EST-{}", self.0)
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct QuoteLine {
    pub name: String,
    pub description: String,
    pub features: Vec<String>,
    pub base_price: f64,
    pub complexity_factor: f64,
    pub amount: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct QuoteField {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct QuoteTotals {
    pub subtotal: f64,
    pub timeline_multiplier: f64,
    pub support_multiplier: f64,
    pub support_fee: f64,
    pub total: f64,
    pub formatted_total: String,
}

/// Printable estimate. Derived from the session on every render.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct QuoteDocument {
    pub estimate_id: EstimateId,
    pub reference: String,
    pub file_name: String,
    pub issued_on: NaiveDate,
    pub valid_until: NaiveDate,
    pub lines: Vec<QuoteLine>,
    pub configuration: Vec<QuoteField>,
    pub totals: QuoteTotals,
    pub notes: Vec<String>,
    pub contact_email: String,
}
