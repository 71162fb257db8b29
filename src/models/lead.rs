use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    WebApplication,
    MobileApp,
    CloudMigration,
    AiMl,
    Ecommerce,
    CustomSoftware,
    Consulting,
    Other,
}

impl ProjectType {
    pub fn label(&self) -> &'static str {
        match self {
            ProjectType::WebApplication => "Web Application",
            ProjectType::MobileApp => "Mobile App",
            ProjectType::CloudMigration => "Cloud Migration",
            ProjectType::AiMl => "AI / Machine Learning",
            ProjectType::Ecommerce => "E-commerce",
            ProjectType::CustomSoftware => "Custom Software",
            ProjectType::Consulting => "Technical Consulting",
            ProjectType::Other => "Other",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BudgetRange {
    #[serde(rename = "under-10k")]
    Under10k,
    #[serde(rename = "10k-25k")]
    From10kTo25k,
    #[serde(rename = "25k-50k")]
    From25kTo50k,
    #[serde(rename = "50k-100k")]
    From50kTo100k,
    #[serde(rename = "100k-plus")]
    Over100k,
}

impl BudgetRange {
    pub fn label(&self) -> &'static str {
        match self {
            BudgetRange::Under10k => "Under $10,000",
            BudgetRange::From10kTo25k => "$10,000 - $25,000",
            BudgetRange::From25kTo50k => "$25,000 - $50,000",
            BudgetRange::From50kTo100k => "$50,000 - $100,000",
            BudgetRange::Over100k => "$100,000+",
        }
    }

    /// Bracket that contains the given amount.
    pub fn for_amount(amount: f64) -> Self {
        if amount < 10_000.0 {
            BudgetRange::Under10k
        } else if amount < 25_000.0 {
            BudgetRange::From10kTo25k
        } else if amount < 50_000.0 {
            BudgetRange::From25kTo50k
        } else if amount < 100_000.0 {
            BudgetRange::From50kTo100k
        } else {
            BudgetRange::Over100k
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProjectTimeline {
    #[serde(rename = "asap")]
    Asap,
    #[serde(rename = "1-3-months")]
    OneToThreeMonths,
    #[serde(rename = "3-6-months")]
    ThreeToSixMonths,
    #[serde(rename = "6-plus-months")]
    SixPlusMonths,
    #[serde(rename = "flexible")]
    Flexible,
}

impl ProjectTimeline {
    pub fn label(&self) -> &'static str {
        match self {
            ProjectTimeline::Asap => "As soon as possible",
            ProjectTimeline::OneToThreeMonths => "1-3 months",
            ProjectTimeline::ThreeToSixMonths => "3-6 months",
            ProjectTimeline::SixPlusMonths => "6+ months",
            ProjectTimeline::Flexible => "Flexible",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Speed,
    Quality,
    Cost,
    Scalability,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Speed => "Speed to market",
            Priority::Quality => "Quality",
            Priority::Cost => "Cost efficiency",
            Priority::Scalability => "Scalability",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Web,
    Ios,
    Android,
    Desktop,
    Cloud,
    Api,
}

impl Platform {
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Web => "Web",
            Platform::Ios => "iOS",
            Platform::Android => "Android",
            Platform::Desktop => "Desktop",
            Platform::Cloud => "Cloud",
            Platform::Api => "API",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum BusinessType {
    Startup,
    SmallBusiness,
    Enterprise,
    Nonprofit,
    Agency,
    Other,
}

impl BusinessType {
    pub fn label(&self) -> &'static str {
        match self {
            BusinessType::Startup => "Startup",
            BusinessType::SmallBusiness => "Small business",
            BusinessType::Enterprise => "Enterprise",
            BusinessType::Nonprofit => "Non-profit",
            BusinessType::Agency => "Agency",
            BusinessType::Other => "Other",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TeamSize {
    #[serde(rename = "1")]
    Solo,
    #[serde(rename = "2-10")]
    Small,
    #[serde(rename = "11-50")]
    Medium,
    #[serde(rename = "51-200")]
    Large,
    #[serde(rename = "200+")]
    Enterprise,
}

impl TeamSize {
    pub fn label(&self) -> &'static str {
        match self {
            TeamSize::Solo => "Just me",
            TeamSize::Small => "2-10 people",
            TeamSize::Medium => "11-50 people",
            TeamSize::Large => "51-200 people",
            TeamSize::Enterprise => "200+ people",
        }
    }
}

/// Everything the lead form collects, across both the wizard and the simple form.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct LeadFields {
    pub project_type: Option<ProjectType>,
    pub description: String,
    pub budget: Option<BudgetRange>,
    pub timeline: Option<ProjectTimeline>,
    pub priority: Option<Priority>,
    pub platforms: BTreeSet<Platform>,
    pub features: BTreeSet<String>,
    pub integrations: BTreeSet<String>,
    pub business_type: Option<BusinessType>,
    pub team_size: Option<TeamSize>,
    pub current_solution: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub subject: String,
    pub message: String,
    /// Hidden from humans. Forwarded as-is so the receiving side can discard bot traffic.
    pub honeypot: String,
    pub challenge_answer: String,
}

/// Partial update sent by the client; absent fields are left untouched.
/// Choice fields accept `null` to clear a previous choice.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LeadFieldsPatch {
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub project_type: Option<Option<ProjectType>>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub budget: Option<Option<BudgetRange>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub timeline: Option<Option<ProjectTimeline>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub priority: Option<Option<Priority>>,
    pub platforms: Option<BTreeSet<Platform>>,
    pub features: Option<BTreeSet<String>>,
    pub integrations: Option<BTreeSet<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub business_type: Option<Option<BusinessType>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub team_size: Option<Option<TeamSize>>,
    pub current_solution: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub honeypot: Option<String>,
    pub challenge_answer: Option<String>,
}

// Present-but-null becomes `Some(None)`; an absent key stays `None` via `default`.
fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::deserialize(deserializer).map(Some)
}

impl LeadFields {
    pub fn apply(&mut self, patch: LeadFieldsPatch) {
        if let Some(value) = patch.project_type {
            self.project_type = value;
        }
        if let Some(value) = patch.description {
            self.description = value;
        }
        if let Some(value) = patch.budget {
            self.budget = value;
        }
        if let Some(value) = patch.timeline {
            self.timeline = value;
        }
        if let Some(value) = patch.priority {
            self.priority = value;
        }
        if let Some(value) = patch.platforms {
            self.platforms = value;
        }
        if let Some(value) = patch.features {
            self.features = value;
        }
        if let Some(value) = patch.integrations {
            self.integrations = value;
        }
        if let Some(value) = patch.business_type {
            self.business_type = value;
        }
        if let Some(value) = patch.team_size {
            self.team_size = value;
        }
        if let Some(value) = patch.current_solution {
            self.current_solution = value;
        }
        if let Some(value) = patch.name {
            self.name = value;
        }
        if let Some(value) = patch.email {
            self.email = value;
        }
        if let Some(value) = patch.phone {
            self.phone = value;
        }
        if let Some(value) = patch.company {
            self.company = value;
        }
        if let Some(value) = patch.subject {
            self.subject = value;
        }
        if let Some(value) = patch.message {
            self.message = value;
        }
        if let Some(value) = patch.honeypot {
            self.honeypot = value;
        }
        if let Some(value) = patch.challenge_answer {
            self.challenge_answer = value;
        }
    }
}
