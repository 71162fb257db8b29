use std::collections::BTreeSet;

use crate::models::project::{PortfolioFacets, Project, ProjectFilter};

pub struct PortfolioService;

impl PortfolioService {
    /// OR within a field, AND across fields. Absent or empty fields impose no
    /// constraint, so an empty filter returns every project.
    pub fn filter<'a>(projects: &'a [Project], criteria: &ProjectFilter) -> Vec<&'a Project> {
        projects
            .iter()
            .filter(|project| {
                matches_any(&project.technologies, &criteria.technologies)
                    && matches_any(&project.industries, &criteria.industries)
                    && matches_any(&project.project_types, &criteria.project_types)
                    && matches_any(&project.categories, &criteria.categories)
                    && matches_any(std::slice::from_ref(&project.complexity), &criteria.complexity)
                    && matches_any(std::slice::from_ref(&project.status), &criteria.status)
            })
            .collect()
    }

    /// Distinct values per filterable field, sorted, for building the filter UI.
    pub fn facets(projects: &[Project]) -> PortfolioFacets {
        fn collect<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
            values
                .map(|value| value.to_string())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        }

        PortfolioFacets {
            technologies: collect(projects.iter().flat_map(|p| p.technologies.iter())),
            industries: collect(projects.iter().flat_map(|p| p.industries.iter())),
            project_types: collect(projects.iter().flat_map(|p| p.project_types.iter())),
            categories: collect(projects.iter().flat_map(|p| p.categories.iter())),
            complexity: collect(projects.iter().map(|p| &p.complexity)),
            status: collect(projects.iter().map(|p| &p.status)),
        }
    }
}

// Tags are compared case-insensitively.
fn matches_any(tags: &[String], wanted: &Option<Vec<String>>) -> bool {
    match wanted {
        Some(wanted) if !wanted.is_empty() => wanted
            .iter()
            .any(|value| tags.iter().any(|tag| tag.eq_ignore_ascii_case(value.trim()))),
        _ => true,
    }
}
