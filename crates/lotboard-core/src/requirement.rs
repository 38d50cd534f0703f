//! Capacity requirements per (year, grid, subtype).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::feed::lenient_string;
use crate::project::GroupKey;
use crate::units::Megawatts;

/// Maximum capacity that may be accepted for one group.
///
/// Field names follow the requirement feed (`Year`, `Grid`, `Subtype`,
/// `Capacity`). `Year` is kept as a string because it is matched against a
/// project's four-character target year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    #[serde(rename = "Year", deserialize_with = "lenient_string")]
    pub year: String,
    #[serde(rename = "Grid")]
    pub grid: String,
    #[serde(rename = "Subtype")]
    pub subtype: String,
    #[serde(rename = "Capacity")]
    pub capacity: Megawatts,
}

impl Requirement {
    pub fn new(
        year: impl Into<String>,
        grid: impl Into<String>,
        subtype: impl Into<String>,
        capacity: f64,
    ) -> Self {
        Self {
            year: year.into(),
            grid: grid.into(),
            subtype: subtype.into(),
            capacity: Megawatts(capacity),
        }
    }

    pub fn key(&self) -> GroupKey {
        GroupKey::new(&self.year, &self.grid, &self.subtype)
    }
}

/// Immutable lookup table built once from the requirement feed.
#[derive(Debug, Clone, Default)]
pub struct RequirementTable {
    requirements: Vec<Requirement>,
    by_key: HashMap<GroupKey, usize>,
}

impl RequirementTable {
    /// Build the table. When the feed repeats a triple, the first record wins.
    pub fn new(requirements: Vec<Requirement>) -> Self {
        let mut by_key = HashMap::with_capacity(requirements.len());
        for (idx, requirement) in requirements.iter().enumerate() {
            by_key.entry(requirement.key()).or_insert(idx);
        }
        Self {
            requirements,
            by_key,
        }
    }

    /// Exact triple match.
    pub fn lookup(&self, key: &GroupKey) -> Option<&Requirement> {
        self.by_key.get(key).map(|&idx| &self.requirements[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Requirement> {
        self.requirements.iter()
    }

    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Sum of every requirement for `year` that matches the grid and subtype
    /// filters. `None` matches all.
    pub fn total_for(&self, year: &str, grid: Option<&str>, subtype: Option<&str>) -> Megawatts {
        self.requirements
            .iter()
            .filter(|r| r.year == year)
            .filter(|r| grid.map_or(true, |g| r.grid == g))
            .filter(|r| subtype.map_or(true, |s| r.subtype == s))
            .map(|r| r.capacity)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RequirementTable {
        RequirementTable::new(vec![
            Requirement::new("2026", "Luzon", "Ground mounted", 300.0),
            Requirement::new("2026", "Visayas", "Ground mounted", 120.0),
            Requirement::new("2026", "Luzon", "Rooftop", 40.0),
            Requirement::new("2027", "Luzon", "Ground mounted", 500.0),
            Requirement::new("2026", "Luzon", "Ground mounted", 999.0),
        ])
    }

    #[test]
    fn test_lookup_exact_triple_first_wins() {
        let table = table();
        let found = table
            .lookup(&GroupKey::new("2026", "Luzon", "Ground mounted"))
            .unwrap();
        assert_eq!(found.capacity, Megawatts(300.0));
        assert!(table
            .lookup(&GroupKey::new("2028", "Luzon", "Ground mounted"))
            .is_none());
    }

    #[test]
    fn test_total_for_honors_filters() {
        let table = table();
        assert_eq!(
            table.total_for("2026", Some("Luzon"), Some("Ground mounted")),
            Megawatts(1299.0)
        );
        assert_eq!(table.total_for("2026", Some("Luzon"), None), Megawatts(1339.0));
        assert_eq!(table.total_for("2026", None, None), Megawatts(1459.0));
        assert_eq!(table.total_for("2030", None, None), Megawatts(0.0));
    }

    #[test]
    fn test_year_accepts_number_or_string() {
        let rows: Vec<Requirement> = serde_json::from_str(
            r#"[{"Year": 2026, "Grid": "Luzon", "Subtype": "Rooftop", "Capacity": 40},
                {"Year": "2027", "Grid": "Luzon", "Subtype": "Rooftop", "Capacity": 55.5}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].year, "2026");
        assert_eq!(rows[1].year, "2027");
        assert_eq!(rows[1].capacity, Megawatts(55.5));
    }
}
