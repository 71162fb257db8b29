use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::project::Project;
use crate::models::service::{
    ComplexityLevel, PricingTables, Service, SupportLevel, TimelineOption,
};

const SERVICES_JSON: &str = include_str!("../../data/services.json");
const PRICING_JSON: &str = include_str!("../../data/pricing.json");
const PROJECTS_JSON: &str = include_str!("../../data/projects.json");

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {name}: {source}")]
    Parse {
        name: &'static str,
        source: serde_json::Error,
    },
    #[error("Duplicate service id: {0}")]
    DuplicateServiceId(String),
    #[error("Duplicate project id: {0}")]
    DuplicateProjectId(String),
    #[error("Service {0} must have a positive base price")]
    InvalidBasePrice(String),
    #[error("Multiplier for {0} must be positive")]
    InvalidMultiplier(String),
    #[error("Support fee for {0} must not be negative")]
    InvalidSupportFee(String),
    #[error("Pricing table {table} has no entry for {key}")]
    MissingEntry { table: &'static str, key: &'static str },
}

/// Static build-time data: service catalog, multiplier tables and portfolio.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub services: Vec<Service>,
    pub pricing: PricingTables,
    pub projects: Vec<Project>,
}

impl Catalog {
    /// Loads the fixtures from `dir` when given, otherwise the ones compiled into the binary.
    pub fn load(dir: Option<&Path>) -> Result<Self, FixtureError> {
        let catalog = match dir {
            Some(dir) => {
                log::info!("Loading catalog fixtures from {}", dir.display());
                Self::from_dir(dir)?
            }
            None => Self::embedded()?,
        };

        log::info!(
            "Catalog ready: {} services, {} portfolio projects",
            catalog.services.len(),
            catalog.projects.len()
        );
        Ok(catalog)
    }

    pub fn embedded() -> Result<Self, FixtureError> {
        Self::from_json(SERVICES_JSON, PRICING_JSON, PROJECTS_JSON)
    }

    pub fn from_dir(dir: &Path) -> Result<Self, FixtureError> {
        let read = |file: &str| {
            let path = dir.join(file);
            std::fs::read_to_string(&path).map_err(|source| FixtureError::Io { path, source })
        };

        let services = read("services.json")?;
        let pricing = read("pricing.json")?;
        let projects = read("projects.json")?;
        Self::from_json(&services, &pricing, &projects)
    }

    pub fn from_json(services: &str, pricing: &str, projects: &str) -> Result<Self, FixtureError> {
        let catalog = Self {
            services: serde_json::from_str(services).map_err(|source| FixtureError::Parse {
                name: "services.json",
                source,
            })?,
            pricing: serde_json::from_str(pricing).map_err(|source| FixtureError::Parse {
                name: "pricing.json",
                source,
            })?,
            projects: serde_json::from_str(projects).map_err(|source| FixtureError::Parse {
                name: "projects.json",
                source,
            })?,
        };

        catalog.validate()?;
        Ok(catalog)
    }

    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|service| service.id == id)
    }

    pub fn validate(&self) -> Result<(), FixtureError> {
        let mut seen = HashSet::new();
        for service in &self.services {
            if !seen.insert(service.id.as_str()) {
                return Err(FixtureError::DuplicateServiceId(service.id.clone()));
            }
            if !is_positive(service.base_price) {
                return Err(FixtureError::InvalidBasePrice(service.id.clone()));
            }
            for (level, factor) in &service.complexity_factor {
                if !is_positive(*factor) {
                    return Err(FixtureError::InvalidMultiplier(format!(
                        "{}/{}",
                        service.id,
                        level.key()
                    )));
                }
            }
        }

        let mut seen = HashSet::new();
        for project in &self.projects {
            if !seen.insert(project.id.as_str()) {
                return Err(FixtureError::DuplicateProjectId(project.id.clone()));
            }
        }

        self.validate_pricing()
    }

    fn validate_pricing(&self) -> Result<(), FixtureError> {
        for level in ComplexityLevel::ALL {
            let option = self
                .pricing
                .complexity(level)
                .ok_or(FixtureError::MissingEntry {
                    table: "complexity",
                    key: level.key(),
                })?;
            if !is_positive(option.multiplier) {
                return Err(FixtureError::InvalidMultiplier(format!(
                    "complexity/{}",
                    level.key()
                )));
            }
        }

        for option in TimelineOption::ALL {
            let choice = self
                .pricing
                .timeline(option)
                .ok_or(FixtureError::MissingEntry {
                    table: "timeline",
                    key: option.key(),
                })?;
            if !is_positive(choice.multiplier) {
                return Err(FixtureError::InvalidMultiplier(format!(
                    "timeline/{}",
                    option.key()
                )));
            }
        }

        for level in SupportLevel::ALL {
            let support = self
                .pricing
                .support(level)
                .ok_or(FixtureError::MissingEntry {
                    table: "support",
                    key: level.key(),
                })?;
            if !is_positive(support.multiplier) {
                return Err(FixtureError::InvalidMultiplier(format!(
                    "support/{}",
                    level.key()
                )));
            }
            if !support.monthly_fee.is_finite() || support.monthly_fee < 0.0 {
                return Err(FixtureError::InvalidSupportFee(level.key().to_string()));
            }
        }

        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
