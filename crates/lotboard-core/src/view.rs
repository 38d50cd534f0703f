//! Presentation boundary: the board as a host renders it.
//!
//! A [`BoardView`] is a plain serializable snapshot. Sections follow the
//! configured bucket order, each holding one column per year with the visible
//! projects sorted by display order. Year totals combine every bucket.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::config::BucketConfig;
use crate::filter::{FilterOptions, ProjectFilter};
use crate::project::{Likelihood, Project};
use crate::requirement::RequirementTable;
use crate::units::Megawatts;

/// A project as shown on a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectCard {
    #[serde(flatten)]
    pub project: Project,
    /// Owned by the highlighted company while the highlight is on
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub year: String,
    pub cards: Vec<ProjectCard>,
    pub total: Megawatts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketSection {
    pub bucket: Likelihood,
    pub label: String,
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketTotal {
    pub bucket: Likelihood,
    pub label: String,
    pub capacity: Megawatts,
}

/// Summary figures for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearTotals {
    pub year: String,
    pub project_count: usize,
    /// Requirements for the year matching the grid and subtype filters
    pub requirement: Megawatts,
    /// Capacity of every visible project in the year
    pub capacity: Megawatts,
    /// `requirement - capacity`; negative when oversubscribed
    pub remaining: Megawatts,
    pub buckets: Vec<BucketTotal>,
}

impl YearTotals {
    pub fn is_oversubscribed(&self) -> bool {
        self.remaining < Megawatts::ZERO
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub years: Vec<String>,
    pub sections: Vec<BucketSection>,
    pub totals: Vec<YearTotals>,
    pub filter: ProjectFilter,
    pub options: FilterOptions,
    pub highlight: bool,
    pub current_scenario: Option<String>,
    pub scenarios: Vec<String>,
}

impl BoardView {
    /// Snapshot the catalog under `filter`.
    ///
    /// `buckets` are the bucket sections to show, in order. `highlight` names
    /// the company to mark, if the highlight is on.
    pub fn build(
        catalog: &Catalog,
        requirements: &RequirementTable,
        filter: &ProjectFilter,
        buckets: &[BucketConfig],
        highlight: Option<&str>,
    ) -> Self {
        let years = catalog.years();
        let visible: Vec<&Project> = catalog.iter().filter(|p| filter.is_visible(p)).collect();

        let card = |project: &Project| ProjectCard {
            project: project.clone(),
            highlighted: highlight.map_or(false, |company| project.parent_company == company),
        };

        let sections = buckets
            .iter()
            .map(|bucket| {
                let tag = Likelihood::new(&bucket.name);
                let columns = years
                    .iter()
                    .map(|year| {
                        let mut members: Vec<&Project> = visible
                            .iter()
                            .copied()
                            .filter(|p| p.likelihood == tag && &p.target_year == year)
                            .collect();
                        members.sort_by_key(|p| p.order);
                        Column {
                            year: year.clone(),
                            total: members.iter().map(|p| p.capacity).sum(),
                            cards: members.into_iter().map(|p| card(p)).collect(),
                        }
                    })
                    .collect();
                BucketSection {
                    bucket: tag,
                    label: bucket.label.clone(),
                    columns,
                }
            })
            .collect();

        let totals = years
            .iter()
            .map(|year| {
                let in_year: Vec<&Project> = visible
                    .iter()
                    .copied()
                    .filter(|p| &p.target_year == year)
                    .collect();
                let requirement = requirements.total_for(
                    year,
                    filter.grid.as_deref(),
                    filter.subtype.as_deref(),
                );
                let capacity: Megawatts = in_year.iter().map(|p| p.capacity).sum();
                let bucket_totals = buckets
                    .iter()
                    .map(|bucket| BucketTotal {
                        bucket: Likelihood::new(&bucket.name),
                        label: bucket.label.clone(),
                        capacity: in_year
                            .iter()
                            .filter(|p| p.likelihood.as_str() == bucket.name)
                            .map(|p| p.capacity)
                            .sum(),
                    })
                    .collect();
                YearTotals {
                    year: year.clone(),
                    project_count: in_year.len(),
                    requirement,
                    capacity,
                    remaining: requirement - capacity,
                    buckets: bucket_totals,
                }
            })
            .collect();

        Self {
            years,
            sections,
            totals,
            filter: filter.clone(),
            options: FilterOptions::from_catalog(catalog),
            highlight: highlight.is_some(),
            current_scenario: None,
            scenarios: Vec::new(),
        }
    }

    pub fn section(&self, bucket: &Likelihood) -> Option<&BucketSection> {
        self.sections.iter().find(|s| &s.bucket == bucket)
    }

    pub fn totals_for(&self, year: &str) -> Option<&YearTotals> {
        self.totals.iter().find(|t| t.year == year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirement::Requirement;

    fn buckets() -> Vec<BucketConfig> {
        vec![
            BucketConfig::new("High", "Bidders"),
            BucketConfig::new("Low", "Non-bidders"),
        ]
    }

    fn catalog() -> Catalog {
        Catalog::from_projects(vec![
            Project::new(1, "High", "2026", "Luzon", "Ground mounted", 40.0, 5.0)
                .with_company("AboitizPower")
                .with_order(2),
            Project::new(2, "High", "2026", "Luzon", "Ground mounted", 50.0, 3.0).with_order(1),
            Project::new(3, "Low", "2026", "Luzon", "Ground mounted", 30.0, 8.0).with_order(0),
            Project::new(4, "High", "2027", "Visayas", "Rooftop", 25.0, 2.0).with_order(3),
        ])
        .unwrap()
    }

    fn requirements() -> RequirementTable {
        RequirementTable::new(vec![
            Requirement::new("2026", "Luzon", "Ground mounted", 100.0),
            Requirement::new("2026", "Visayas", "Ground mounted", 20.0),
            Requirement::new("2027", "Visayas", "Rooftop", 10.0),
        ])
    }

    #[test]
    fn test_sections_sorted_by_order() {
        let view = BoardView::build(
            &catalog(),
            &requirements(),
            &ProjectFilter::default(),
            &buckets(),
            None,
        );
        assert_eq!(view.years, vec!["2026", "2027"]);

        let high = view.section(&Likelihood::high()).unwrap();
        assert_eq!(high.label, "Bidders");
        let ids: Vec<i64> = high.columns[0].cards.iter().map(|c| c.project.id.value()).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(high.columns[0].total, Megawatts(90.0));
        assert_eq!(high.columns[1].cards.len(), 1);
    }

    #[test]
    fn test_totals_follow_filters() {
        let mut filter = ProjectFilter::default();
        filter.set_grid(Some("Luzon".into()));
        let view = BoardView::build(&catalog(), &requirements(), &filter, &buckets(), None);

        let totals = view.totals_for("2026").unwrap();
        assert_eq!(totals.project_count, 3);
        assert_eq!(totals.requirement, Megawatts(100.0));
        assert_eq!(totals.capacity, Megawatts(120.0));
        assert_eq!(totals.remaining, Megawatts(-20.0));
        assert!(totals.is_oversubscribed());
        assert_eq!(totals.buckets[0].capacity, Megawatts(90.0));
        assert_eq!(totals.buckets[1].capacity, Megawatts(30.0));

        let later = view.totals_for("2027").unwrap();
        assert_eq!(later.project_count, 0);
        assert_eq!(later.requirement, Megawatts(0.0));
    }

    #[test]
    fn test_unfiltered_requirement_sums_every_grid() {
        let view = BoardView::build(
            &catalog(),
            &requirements(),
            &ProjectFilter::default(),
            &buckets(),
            None,
        );
        assert_eq!(view.totals_for("2026").unwrap().requirement, Megawatts(120.0));
    }

    #[test]
    fn test_company_filter_and_highlight() {
        let mut filter = ProjectFilter::default();
        filter.toggle_company("AboitizPower");
        let view = BoardView::build(
            &catalog(),
            &requirements(),
            &filter,
            &buckets(),
            Some("AboitizPower"),
        );
        let high = view.section(&Likelihood::high()).unwrap();
        assert_eq!(high.columns[0].cards.len(), 1);
        assert!(high.columns[0].cards[0].highlighted);
        assert_eq!(view.totals_for("2026").unwrap().capacity, Megawatts(40.0));
        assert!(view.highlight);
    }

    #[test]
    fn test_card_serializes_flat() {
        let view = BoardView::build(
            &catalog(),
            &requirements(),
            &ProjectFilter::default(),
            &buckets(),
            None,
        );
        let json = serde_json::to_value(&view.sections[0].columns[0].cards[0]).unwrap();
        assert_eq!(json["id"], 2);
        assert_eq!(json["bidderStatus"], "spillover");
        assert_eq!(json["highlighted"], false);
    }
}
