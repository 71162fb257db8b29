use serde::{Deserialize, Serialize};

/// Portfolio case study shown on the projects page.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub client: String,
    pub summary: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default)]
    pub project_types: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub complexity: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(default)]
    pub featured: bool,
}

/// Portfolio filter. Values within one field are OR-ed, fields are AND-ed.
/// Absent or empty fields do not constrain the result.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProjectFilter {
    pub technologies: Option<Vec<String>>,
    pub industries: Option<Vec<String>>,
    pub project_types: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    pub complexity: Option<Vec<String>>,
    pub status: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct PortfolioFacets {
    pub technologies: Vec<String>,
    pub industries: Vec<String>,
    pub project_types: Vec<String>,
    pub categories: Vec<String>,
    pub complexity: Vec<String>,
    pub status: Vec<String>,
}
