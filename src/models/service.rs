use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::lead::ProjectType;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ComplexityLevel {
    #[serde(rename = "simple")]
    Simple,
    #[default]
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "complex")]
    Complex,
}

impl ComplexityLevel {
    pub const ALL: [ComplexityLevel; 3] = [
        ComplexityLevel::Simple,
        ComplexityLevel::Medium,
        ComplexityLevel::Complex,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ComplexityLevel::Simple => "simple",
            ComplexityLevel::Medium => "medium",
            ComplexityLevel::Complex => "complex",
        }
    }
}

/// Delivery window the client asks for. Shorter windows carry a rush surcharge.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum TimelineOption {
    #[serde(rename = "1-3")]
    OneToThreeMonths,
    #[default]
    #[serde(rename = "3-6")]
    ThreeToSixMonths,
    #[serde(rename = "6-12")]
    SixToTwelveMonths,
    #[serde(rename = "12+")]
    OverTwelveMonths,
}

impl TimelineOption {
    pub const ALL: [TimelineOption; 4] = [
        TimelineOption::OneToThreeMonths,
        TimelineOption::ThreeToSixMonths,
        TimelineOption::SixToTwelveMonths,
        TimelineOption::OverTwelveMonths,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            TimelineOption::OneToThreeMonths => "1-3",
            TimelineOption::ThreeToSixMonths => "3-6",
            TimelineOption::SixToTwelveMonths => "6-12",
            TimelineOption::OverTwelveMonths => "12+",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum SupportLevel {
    #[serde(rename = "basic")]
    Basic,
    #[default]
    #[serde(rename = "standard")]
    Standard,
    #[serde(rename = "premium")]
    Premium,
}

impl SupportLevel {
    pub const ALL: [SupportLevel; 3] = [
        SupportLevel::Basic,
        SupportLevel::Standard,
        SupportLevel::Premium,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SupportLevel::Basic => "basic",
            SupportLevel::Standard => "standard",
            SupportLevel::Premium => "premium",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    pub base_price: f64,
    pub icon: String,
    /// Per-service factor for each complexity level. Levels missing here fall
    /// back to the global complexity table.
    #[serde(default)]
    pub complexity_factor: BTreeMap<ComplexityLevel, f64>,
    #[serde(default)]
    pub features: Vec<String>,
    /// Lead form project type this service maps to when prefilling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<ProjectType>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ComplexityOption {
    pub multiplier: f64,
    pub label: String,
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TimelineChoice {
    pub multiplier: f64,
    pub label: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SupportOption {
    pub multiplier: f64,
    /// Flat monthly fee, added once to the total and never multiplied.
    pub monthly_fee: f64,
    pub label: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PricingTables {
    pub complexity: BTreeMap<ComplexityLevel, ComplexityOption>,
    pub timeline: BTreeMap<TimelineOption, TimelineChoice>,
    pub support: BTreeMap<SupportLevel, SupportOption>,
}

impl PricingTables {
    pub fn complexity(&self, level: ComplexityLevel) -> Option<&ComplexityOption> {
        self.complexity.get(&level)
    }

    pub fn timeline(&self, option: TimelineOption) -> Option<&TimelineChoice> {
        self.timeline.get(&option)
    }

    pub fn support(&self, level: SupportLevel) -> Option<&SupportOption> {
        self.support.get(&level)
    }
}
