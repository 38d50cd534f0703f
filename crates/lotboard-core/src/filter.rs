//! Board filters.
//!
//! The grid and subtype selections decide which projects compete in the
//! allocation. The company selection only narrows what is displayed and
//! totalled; it never changes allocation outcomes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::project::Project;

/// Normalize a single-select value. Empty and "all" mean no filter.
pub fn normalize_choice(choice: Option<String>) -> Option<String> {
    choice
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("all"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectFilter {
    pub grid: Option<String>,
    pub subtype: Option<String>,
    /// Empty means every company
    pub companies: BTreeSet<String>,
}

impl ProjectFilter {
    /// Projects that take part in the allocation run.
    pub fn in_scope(&self, project: &Project) -> bool {
        self.grid.as_deref().map_or(true, |g| project.grid == g)
            && self.subtype.as_deref().map_or(true, |s| project.subtype == s)
    }

    /// Projects shown on the board and counted in the totals.
    pub fn is_visible(&self, project: &Project) -> bool {
        self.in_scope(project)
            && (self.companies.is_empty() || self.companies.contains(&project.parent_company))
    }

    pub fn set_grid(&mut self, grid: Option<String>) {
        self.grid = normalize_choice(grid);
    }

    pub fn set_subtype(&mut self, subtype: Option<String>) {
        self.subtype = normalize_choice(subtype);
    }

    pub fn set_companies<I>(&mut self, companies: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.companies = companies.into_iter().collect();
    }

    /// Flip one company's selection. Returns whether it is now selected.
    pub fn toggle_company(&mut self, company: &str) -> bool {
        if self.companies.remove(company) {
            false
        } else {
            self.companies.insert(company.to_string());
            true
        }
    }

    pub fn clear_companies(&mut self) {
        self.companies.clear();
    }
}

/// Choices offered by the filter dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub grids: Vec<String>,
    pub subtypes: Vec<String>,
    pub companies: Vec<String>,
}

impl FilterOptions {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            grids: catalog.grids(),
            subtypes: catalog.subtypes(),
            companies: catalog.companies(),
        }
    }
}
