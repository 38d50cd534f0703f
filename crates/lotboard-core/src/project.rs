//! Project records and the identifiers they are grouped by.

use serde::{Deserialize, Serialize};

use crate::units::Megawatts;

/// Stable project identifier, the join key between the catalog and scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub i64);

impl ProjectId {
    #[inline]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Likelihood bucket tag ("High", "Low", or any configured bucket).
///
/// Buckets are open-ended strings; which ones are recognized, and in which
/// rank order, comes from [`crate::config::BoardSettings::buckets`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Likelihood(String);

impl Likelihood {
    pub const HIGH: &'static str = "High";
    pub const LOW: &'static str = "Low";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn high() -> Self {
        Self::new(Self::HIGH)
    }

    pub fn low() -> Self {
        Self::new(Self::LOW)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Likelihood {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl std::fmt::Display for Likelihood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of the allocation engine for one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BidderStatus {
    /// Fits entirely within its group's remaining headroom.
    Accepted,
    /// The first project that overflows the ceiling; consumes all remaining headroom.
    Marginal,
    /// Not accommodated, or its group has no requirement.
    #[default]
    Spillover,
}

impl BidderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BidderStatus::Accepted => "accepted",
            BidderStatus::Marginal => "marginal",
            BidderStatus::Spillover => "spillover",
        }
    }
}

impl std::fmt::Display for BidderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unit of capacity competition: (target year, grid, subtype).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    pub year: String,
    pub grid: String,
    pub subtype: String,
}

impl GroupKey {
    pub fn new(year: impl Into<String>, grid: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            grid: grid.into(),
            subtype: subtype.into(),
        }
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.year, self.grid, self.subtype)
    }
}

/// One generation asset on the board.
///
/// Classification fields are fixed after load. `likelihood`, `target_year`,
/// `capacity`, `order` and `is_moved` are the planning fields edited by hand
/// and captured in scenarios; `bidder_status` is recomputed on every cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub parent_company: String,
    #[serde(default)]
    pub spv: String,
    #[serde(default)]
    pub bess_cap: String,
    pub subtype: String,
    pub grid: String,
    pub tariff: f64,
    #[serde(default)]
    pub competitiveness: String,
    #[serde(default)]
    pub comp_ranking: String,
    #[serde(default)]
    pub looker_link: String,

    pub likelihood: Likelihood,
    pub target_year: String,
    pub capacity: Megawatts,
    pub order: i64,
    #[serde(default)]
    pub is_moved: bool,

    #[serde(default)]
    pub bidder_status: BidderStatus,
}

impl Project {
    /// Minimal record with empty display fields, mostly for tests and scripts.
    pub fn new(
        id: i64,
        likelihood: impl Into<Likelihood>,
        target_year: impl Into<String>,
        grid: impl Into<String>,
        subtype: impl Into<String>,
        capacity: f64,
        tariff: f64,
    ) -> Self {
        Self {
            id: ProjectId::new(id),
            name: format!("Project {id}"),
            parent_company: String::new(),
            spv: String::new(),
            bess_cap: String::new(),
            subtype: subtype.into(),
            grid: grid.into(),
            tariff,
            competitiveness: String::new(),
            comp_ranking: String::new(),
            looker_link: String::new(),
            likelihood: likelihood.into(),
            target_year: target_year.into(),
            capacity: Megawatts(capacity),
            order: 0,
            is_moved: false,
            bidder_status: BidderStatus::Spillover,
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.parent_company = company.into();
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn group_key(&self) -> GroupKey {
        GroupKey::new(&self.target_year, &self.grid, &self.subtype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&BidderStatus::Marginal).unwrap();
        assert_eq!(json, "\"marginal\"");
        assert_eq!(BidderStatus::default(), BidderStatus::Spillover);
    }

    #[test]
    fn test_project_uses_camel_case_fields() {
        let project = Project::new(7, Likelihood::HIGH, "2027", "Luzon", "Ground mounted", 50.0, 3.2)
            .with_company("AboitizPower");
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["targetYear"], "2027");
        assert_eq!(json["parentCompany"], "AboitizPower");
        assert_eq!(json["isMoved"], false);
        assert_eq!(json["bidderStatus"], "spillover");
        assert_eq!(json["id"], 7);
    }

    #[test]
    fn test_group_key() {
        let project = Project::new(1, "Low", "2026", "Visayas", "Rooftop", 10.0, 1.0);
        assert_eq!(project.group_key(), GroupKey::new("2026", "Visayas", "Rooftop"));
        assert_eq!(project.group_key().to_string(), "2026/Visayas/Rooftop");
    }
}
