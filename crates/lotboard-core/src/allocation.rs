//! Greedy capacity allocation.
//!
//! Projects compete for capacity within their (target year, grid, subtype)
//! group. Each group with a requirement is ranked by bucket (configured order)
//! and then by ascending tariff, and walked greedily against the ceiling:
//!
//! | running total before the project | outcome                                    |
//! |----------------------------------|--------------------------------------------|
//! | already at the ceiling           | spillover                                  |
//! | leaves room for the full project | accepted, running total grows by capacity  |
//! | leaves partial room              | marginal, running total forced to ceiling  |
//!
//! After ranking, every ranked project of the group receives the next value of
//! a single display-order counter that starts at zero on each call and is
//! shared across groups in discovery order.
//!
//! A group without a requirement keeps every member at spillover and assigns
//! no display order at all; the same applies to projects whose bucket is not
//! part of the ranking.
//!
//! ```
//! use lotboard_core::allocation::allocate;
//! use lotboard_core::project::{BidderStatus, Likelihood, Project};
//! use lotboard_core::requirement::{Requirement, RequirementTable};
//!
//! let mut projects = vec![
//!     Project::new(1, "High", "2026", "Luzon", "Ground mounted", 40.0, 5.0),
//!     Project::new(2, "High", "2026", "Luzon", "Ground mounted", 50.0, 3.0),
//!     Project::new(3, "High", "2026", "Luzon", "Ground mounted", 30.0, 8.0),
//! ];
//! let table = RequirementTable::new(vec![Requirement::new("2026", "Luzon", "Ground mounted", 100.0)]);
//! allocate(projects.iter_mut(), &table, &[Likelihood::high(), Likelihood::low()]);
//!
//! assert_eq!(projects[2].bidder_status, BidderStatus::Marginal);
//! ```

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::project::{BidderStatus, GroupKey, Likelihood, Project};
use crate::requirement::RequirementTable;
use crate::units::Megawatts;

/// Outcome of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupOutcome {
    pub key: GroupKey,
    /// Ceiling from the requirement table, `None` when the group is unconstrained
    pub requirement: Option<Megawatts>,
    /// Running total at the end of the walk
    pub allocated: Megawatts,
    pub accepted: usize,
    pub marginal: usize,
    pub spillover: usize,
    /// Members whose bucket is not ranked
    pub unranked: usize,
}

impl GroupOutcome {
    fn unconstrained(key: GroupKey, members: usize) -> Self {
        Self {
            key,
            requirement: None,
            allocated: Megawatts::ZERO,
            accepted: 0,
            marginal: 0,
            spillover: members,
            unranked: 0,
        }
    }
}

/// Per-group outcomes of one allocation run, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AllocationReport {
    pub groups: Vec<GroupOutcome>,
    /// Number of display orders handed out
    pub ordered: usize,
}

impl AllocationReport {
    pub fn accepted(&self) -> usize {
        self.groups.iter().map(|g| g.accepted).sum()
    }

    pub fn marginal(&self) -> usize {
        self.groups.iter().map(|g| g.marginal).sum()
    }

    /// Spillover projects, including unranked members
    pub fn spillover(&self) -> usize {
        self.groups.iter().map(|g| g.spillover + g.unranked).sum()
    }

    /// Groups that had no requirement
    pub fn unconstrained(&self) -> impl Iterator<Item = &GroupOutcome> {
        self.groups.iter().filter(|g| g.requirement.is_none())
    }
}

/// Run the allocation over `projects`.
///
/// Only `bidder_status` and `order` are written. Filters are applied by the
/// caller: pass exactly the projects that should compete.
pub fn allocate<'a, I>(
    projects: I,
    requirements: &RequirementTable,
    ranking: &[Likelihood],
) -> AllocationReport
where
    I: IntoIterator<Item = &'a mut Project>,
{
    let mut groups: Vec<(GroupKey, Vec<&'a mut Project>)> = Vec::new();
    let mut slots: HashMap<GroupKey, usize> = HashMap::new();

    for project in projects {
        project.bidder_status = BidderStatus::Spillover;
        let key = project.group_key();
        let slot = *slots.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(project);
    }

    let mut report = AllocationReport::default();
    let mut counter: i64 = 0;

    for (key, members) in groups {
        let ceiling = match requirements.lookup(&key) {
            Some(requirement) => requirement.capacity,
            None => {
                debug!(group = %key, members = members.len(), "no requirement, group left unallocated");
                report.groups.push(GroupOutcome::unconstrained(key, members.len()));
                continue;
            }
        };

        let (mut ranked, unranked) = rank(members, ranking);

        let mut outcome = GroupOutcome {
            key,
            requirement: Some(ceiling),
            allocated: Megawatts::ZERO,
            accepted: 0,
            marginal: 0,
            spillover: 0,
            unranked,
        };

        let mut running = Megawatts::ZERO;
        for project in ranked.iter_mut() {
            if running >= ceiling {
                project.bidder_status = BidderStatus::Spillover;
                outcome.spillover += 1;
            } else if project.capacity <= ceiling - running {
                project.bidder_status = BidderStatus::Accepted;
                running += project.capacity;
                outcome.accepted += 1;
            } else {
                project.bidder_status = BidderStatus::Marginal;
                running = ceiling;
                outcome.marginal += 1;
            }
        }
        outcome.allocated = running;

        for project in ranked {
            project.order = counter;
            counter += 1;
        }

        debug!(
            group = %outcome.key,
            ceiling = ceiling.value(),
            allocated = running.value(),
            accepted = outcome.accepted,
            marginal = outcome.marginal,
            spillover = outcome.spillover,
            "group allocated"
        );
        report.groups.push(outcome);
    }

    report.ordered = counter as usize;
    report
}

/// Order members bucket by bucket, ascending tariff within a bucket.
///
/// Returns the ranked members and the number left out because their bucket is
/// not part of `ranking`.
fn rank<'a>(members: Vec<&'a mut Project>, ranking: &[Likelihood]) -> (Vec<&'a mut Project>, usize) {
    let mut ranked = Vec::with_capacity(members.len());
    let mut rest = members;
    for bucket in ranking {
        let (mut in_bucket, others): (Vec<_>, Vec<_>) =
            rest.into_iter().partition(|p| &p.likelihood == bucket);
        in_bucket.sort_by(|a, b| a.tariff.total_cmp(&b.tariff));
        ranked.extend(in_bucket);
        rest = others;
    }
    let unranked = rest.len();
    (ranked, unranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirement::Requirement;

    const GM: &str = "Ground mounted";

    fn ranking() -> Vec<Likelihood> {
        vec![Likelihood::high(), Likelihood::low()]
    }

    fn status(projects: &[Project], id: i64) -> BidderStatus {
        projects
            .iter()
            .find(|p| p.id.value() == id)
            .map(|p| p.bidder_status)
            .unwrap()
    }

    fn order(projects: &[Project], id: i64) -> i64 {
        projects.iter().find(|p| p.id.value() == id).map(|p| p.order).unwrap()
    }

    #[test]
    fn test_greedy_walk_example() {
        let mut projects = vec![
            Project::new(1, "High", "2026", "Luzon", GM, 40.0, 5.0),
            Project::new(2, "High", "2026", "Luzon", GM, 50.0, 3.0),
            Project::new(3, "High", "2026", "Luzon", GM, 30.0, 8.0),
        ];
        let table = RequirementTable::new(vec![Requirement::new("2026", "Luzon", GM, 100.0)]);

        let report = allocate(projects.iter_mut(), &table, &ranking());

        assert_eq!(status(&projects, 2), BidderStatus::Accepted);
        assert_eq!(status(&projects, 1), BidderStatus::Accepted);
        assert_eq!(status(&projects, 3), BidderStatus::Marginal);
        assert_eq!(order(&projects, 2), 0);
        assert_eq!(order(&projects, 1), 1);
        assert_eq!(order(&projects, 3), 2);
        assert_eq!(report.groups[0].allocated, Megawatts(100.0));
        assert_eq!(report.ordered, 3);
    }

    #[test]
    fn test_spillover_after_ceiling_reached() {
        let mut projects = vec![
            Project::new(1, "High", "2026", "Luzon", GM, 60.0, 1.0),
            Project::new(2, "High", "2026", "Luzon", GM, 60.0, 2.0),
            Project::new(3, "High", "2026", "Luzon", GM, 5.0, 3.0),
            Project::new(4, "Low", "2026", "Luzon", GM, 1.0, 0.5),
        ];
        let table = RequirementTable::new(vec![Requirement::new("2026", "Luzon", GM, 100.0)]);

        let report = allocate(projects.iter_mut(), &table, &ranking());

        assert_eq!(status(&projects, 1), BidderStatus::Accepted);
        assert_eq!(status(&projects, 2), BidderStatus::Marginal);
        assert_eq!(status(&projects, 3), BidderStatus::Spillover);
        // Cheap Low project still ranks after every High project.
        assert_eq!(status(&projects, 4), BidderStatus::Spillover);
        assert_eq!(order(&projects, 4), 3);
        assert_eq!(report.marginal(), 1);
        assert_eq!(report.spillover(), 2);
    }

    #[test]
    fn test_exact_fit_is_accepted() {
        let mut projects = vec![
            Project::new(1, "High", "2026", "Luzon", GM, 70.0, 1.0),
            Project::new(2, "High", "2026", "Luzon", GM, 30.0, 2.0),
            Project::new(3, "High", "2026", "Luzon", GM, 1.0, 3.0),
        ];
        let table = RequirementTable::new(vec![Requirement::new("2026", "Luzon", GM, 100.0)]);
        allocate(projects.iter_mut(), &table, &ranking());

        assert_eq!(status(&projects, 2), BidderStatus::Accepted);
        assert_eq!(status(&projects, 3), BidderStatus::Spillover);
    }

    #[test]
    fn test_group_without_requirement_gets_no_order() {
        let mut projects = vec![
            Project::new(1, "High", "2026", "Luzon", GM, 10.0, 1.0).with_order(50),
            Project::new(2, "High", "2027", "Luzon", GM, 10.0, 1.0).with_order(60),
        ];
        projects[0].bidder_status = BidderStatus::Accepted;
        let table = RequirementTable::new(vec![Requirement::new("2027", "Luzon", GM, 100.0)]);

        let report = allocate(projects.iter_mut(), &table, &ranking());

        assert_eq!(status(&projects, 1), BidderStatus::Spillover);
        assert_eq!(order(&projects, 1), 50);
        assert_eq!(status(&projects, 2), BidderStatus::Accepted);
        assert_eq!(order(&projects, 2), 0);
        assert_eq!(report.unconstrained().count(), 1);
    }

    #[test]
    fn test_unranked_bucket_is_spillover_without_order() {
        let mut projects = vec![
            Project::new(1, "Medium", "2026", "Luzon", GM, 10.0, 1.0).with_order(9),
            Project::new(2, "High", "2026", "Luzon", GM, 10.0, 2.0),
        ];
        let table = RequirementTable::new(vec![Requirement::new("2026", "Luzon", GM, 100.0)]);

        let report = allocate(projects.iter_mut(), &table, &ranking());

        assert_eq!(status(&projects, 1), BidderStatus::Spillover);
        assert_eq!(order(&projects, 1), 9);
        assert_eq!(report.groups[0].unranked, 1);
        assert_eq!(report.ordered, 1);
    }

    #[test]
    fn test_orders_are_global_across_groups() {
        let mut projects = vec![
            Project::new(1, "High", "2027", "Luzon", GM, 10.0, 1.0),
            Project::new(2, "High", "2026", "Luzon", GM, 10.0, 2.0),
            Project::new(3, "Low", "2027", "Luzon", GM, 10.0, 0.1),
            Project::new(4, "High", "2026", "Luzon", GM, 10.0, 1.0),
        ];
        let table = RequirementTable::new(vec![
            Requirement::new("2026", "Luzon", GM, 15.0),
            Requirement::new("2027", "Luzon", GM, 15.0),
        ]);

        allocate(projects.iter_mut(), &table, &ranking());

        // 2027 is discovered first.
        assert_eq!(order(&projects, 1), 0);
        assert_eq!(order(&projects, 3), 1);
        assert_eq!(order(&projects, 4), 2);
        assert_eq!(order(&projects, 2), 3);
        assert_eq!(status(&projects, 3), BidderStatus::Marginal);
        assert_eq!(status(&projects, 2), BidderStatus::Marginal);
    }

    #[test]
    fn test_equal_tariffs_keep_input_order() {
        let mut projects = vec![
            Project::new(7, "High", "2026", "Luzon", GM, 10.0, 4.0),
            Project::new(3, "High", "2026", "Luzon", GM, 10.0, 4.0),
            Project::new(5, "High", "2026", "Luzon", GM, 10.0, 4.0),
        ];
        let table = RequirementTable::new(vec![Requirement::new("2026", "Luzon", GM, 15.0)]);

        allocate(projects.iter_mut(), &table, &ranking());

        assert_eq!(order(&projects, 7), 0);
        assert_eq!(order(&projects, 3), 1);
        assert_eq!(order(&projects, 5), 2);
        assert_eq!(status(&projects, 7), BidderStatus::Accepted);
        assert_eq!(status(&projects, 3), BidderStatus::Marginal);
    }

    #[test]
    fn test_idempotent() {
        let mut projects = vec![
            Project::new(1, "High", "2026", "Luzon", GM, 40.0, 5.0),
            Project::new(2, "Low", "2026", "Luzon", GM, 50.0, 3.0),
            Project::new(3, "High", "2026", "Visayas", GM, 30.0, 8.0),
            Project::new(4, "High", "2026", "Luzon", GM, 80.0, 2.0),
        ];
        let table = RequirementTable::new(vec![
            Requirement::new("2026", "Luzon", GM, 100.0),
            Requirement::new("2026", "Visayas", GM, 10.0),
        ]);

        let first_report = allocate(projects.iter_mut(), &table, &ranking());
        let first = projects.clone();
        let second_report = allocate(projects.iter_mut(), &table, &ranking());

        assert_eq!(first, projects);
        assert_eq!(first_report, second_report);
    }

    #[test]
    fn test_invariants_hold_per_group() {
        let mut projects: Vec<Project> = (0..24)
            .map(|i| {
                let bucket = if i % 3 == 0 { "Low" } else { "High" };
                let grid = if i % 2 == 0 { "Luzon" } else { "Mindanao" };
                Project::new(i, bucket, "2028", grid, GM, 5.0 + (i * 7 % 23) as f64, (i * 13 % 17) as f64)
            })
            .collect();
        let table = RequirementTable::new(vec![
            Requirement::new("2028", "Luzon", GM, 90.0),
            Requirement::new("2028", "Mindanao", GM, 45.5),
        ]);

        let report = allocate(projects.iter_mut(), &table, &ranking());

        for outcome in &report.groups {
            let ceiling = outcome.requirement.unwrap();
            let mut members: Vec<&Project> = projects
                .iter()
                .filter(|p| p.group_key() == outcome.key)
                .collect();
            members.sort_by_key(|p| p.order);

            let accepted: Megawatts = members
                .iter()
                .filter(|p| p.bidder_status == BidderStatus::Accepted)
                .map(|p| p.capacity)
                .sum();
            assert!(accepted <= ceiling);
            assert!(outcome.marginal <= 1);

            // Statuses never improve further down the ranking.
            let rank = |s: BidderStatus| match s {
                BidderStatus::Accepted => 0,
                BidderStatus::Marginal => 1,
                BidderStatus::Spillover => 2,
            };
            let mut seen_non_accepted = false;
            for pair in members.windows(2) {
                if pair[0].bidder_status != BidderStatus::Accepted {
                    seen_non_accepted = true;
                }
                if seen_non_accepted {
                    assert!(rank(pair[1].bidder_status) >= rank(BidderStatus::Marginal));
                }
            }
        }
        assert_eq!(report.ordered, projects.len());
    }

    #[test]
    fn test_leaves_planning_fields_untouched() {
        let mut projects = vec![Project::new(1, "High", "2026", "Luzon", GM, 40.0, 5.0)];
        projects[0].is_moved = true;
        let before = projects[0].clone();
        let table = RequirementTable::new(vec![Requirement::new("2026", "Luzon", GM, 10.0)]);

        allocate(projects.iter_mut(), &table, &ranking());

        let after = &projects[0];
        assert_eq!(after.capacity, before.capacity);
        assert_eq!(after.likelihood, before.likelihood);
        assert_eq!(after.target_year, before.target_year);
        assert!(after.is_moved);
        assert_eq!(after.bidder_status, BidderStatus::Marginal);
    }
}
