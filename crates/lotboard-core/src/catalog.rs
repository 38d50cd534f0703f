//! The project catalog: every loaded project, keyed by id, in load order.
//!
//! Mutation entry points report whether a project was touched and silently
//! ignore unknown ids, so hosts can forward stale ids from the UI without
//! special handling.

use std::collections::{BTreeSet, HashMap};

use crate::error::{BoardError, BoardResult};
use crate::project::{Likelihood, Project, ProjectId};
use crate::units::Megawatts;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    projects: Vec<Project>,
    index: HashMap<ProjectId, usize>,
}

impl Catalog {
    /// Build the catalog, rejecting repeated ids.
    pub fn from_projects(projects: Vec<Project>) -> BoardResult<Self> {
        let mut index = HashMap::with_capacity(projects.len());
        for (idx, project) in projects.iter().enumerate() {
            if index.insert(project.id, idx).is_some() {
                return Err(BoardError::Validation(format!(
                    "duplicate project id {}",
                    project.id
                )));
            }
        }
        Ok(Self { projects, index })
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn get(&self, id: ProjectId) -> Option<&Project> {
        self.index.get(&id).map(|&idx| &self.projects[idx])
    }

    pub fn get_mut(&mut self, id: ProjectId) -> Option<&mut Project> {
        match self.index.get(&id) {
            Some(&idx) => self.projects.get_mut(idx),
            None => None,
        }
    }

    pub fn contains(&self, id: ProjectId) -> bool {
        self.index.contains_key(&id)
    }

    /// All projects in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter()
    }

    /// Mutable access to the projects matching `predicate`, in load order.
    pub fn filtered_mut<'a, F>(&'a mut self, predicate: F) -> impl Iterator<Item = &'a mut Project>
    where
        F: Fn(&Project) -> bool + 'a,
    {
        self.projects.iter_mut().filter(move |p| predicate(p))
    }

    /// Move a project to another bucket. No-op when the bucket is unchanged.
    pub fn set_likelihood(&mut self, id: ProjectId, bucket: Likelihood) -> bool {
        match self.get_mut(id) {
            Some(project) if project.likelihood != bucket => {
                project.likelihood = bucket;
                project.is_moved = true;
                true
            }
            _ => false,
        }
    }

    /// Replace a project's capacity. Callers validate the value first.
    pub fn set_capacity(&mut self, id: ProjectId, capacity: Megawatts) -> bool {
        match self.get_mut(id) {
            Some(project) => {
                project.capacity = capacity;
                project.is_moved = true;
                true
            }
            None => false,
        }
    }

    /// Drop a project into the column for `year` and `bucket`.
    pub fn move_to(&mut self, id: ProjectId, year: &str, bucket: Likelihood) -> bool {
        match self.get_mut(id) {
            Some(project) => {
                project.target_year = year.to_string();
                project.likelihood = bucket;
                project.is_moved = true;
                true
            }
            None => false,
        }
    }

    /// Largest display order currently assigned, or -1 for an empty catalog.
    pub fn max_order(&self) -> i64 {
        self.projects.iter().map(|p| p.order).max().unwrap_or(-1)
    }

    /// Renumber one column in the given sequence.
    ///
    /// Orders start one past the catalog's current maximum, so a manual
    /// sequence always sorts after engine-assigned orders. Ids that are unknown
    /// or not in the column are skipped. `is_moved` is left alone.
    pub fn reorder_column(&mut self, year: &str, bucket: &Likelihood, ids: &[ProjectId]) -> bool {
        let base = self.max_order() + 1;
        let mut next = base;
        for id in ids {
            if let Some(project) = self.get_mut(*id) {
                if project.target_year == year && &project.likelihood == bucket {
                    project.order = next;
                    next += 1;
                }
            }
        }
        next > base
    }

    fn distinct<'a, F>(&'a self, field: F) -> Vec<String>
    where
        F: Fn(&'a Project) -> &'a str,
    {
        self.projects
            .iter()
            .map(field)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted distinct target years.
    pub fn years(&self) -> Vec<String> {
        self.distinct(|p| p.target_year.as_str())
    }

    pub fn grids(&self) -> Vec<String> {
        self.distinct(|p| p.grid.as_str())
    }

    pub fn subtypes(&self) -> Vec<String> {
        self.distinct(|p| p.subtype.as_str())
    }

    pub fn companies(&self) -> Vec<String> {
        self.distinct(|p| p.parent_company.as_str())
    }

    /// The entries of `configured` that at least one project carries, in
    /// configured order.
    pub fn present_buckets(&self, configured: &[Likelihood]) -> Vec<Likelihood> {
        configured
            .iter()
            .filter(|bucket| self.projects.iter().any(|p| &p.likelihood == *bucket))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_projects(vec![
            Project::new(1, "High", "2026", "Luzon", "Ground mounted", 40.0, 5.0)
                .with_company("AboitizPower")
                .with_order(0),
            Project::new(2, "High", "2026", "Luzon", "Ground mounted", 50.0, 3.0)
                .with_company("Other Co")
                .with_order(1),
            Project::new(3, "Low", "2027", "Visayas", "Rooftop", 30.0, 8.0).with_order(2),
        ])
        .unwrap()
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = Catalog::from_projects(vec![
            Project::new(1, "High", "2026", "Luzon", "Rooftop", 1.0, 1.0),
            Project::new(1, "Low", "2027", "Luzon", "Rooftop", 1.0, 1.0),
        ]);
        assert!(matches!(result, Err(BoardError::Validation(_))));
    }

    #[test]
    fn test_lookup() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(ProjectId::new(2)).unwrap().capacity, Megawatts(50.0));
        assert!(catalog.get(ProjectId::new(99)).is_none());
    }

    #[test]
    fn test_set_likelihood_noop_when_unchanged() {
        let mut catalog = catalog();
        assert!(!catalog.set_likelihood(ProjectId::new(1), Likelihood::high()));
        assert!(!catalog.get(ProjectId::new(1)).unwrap().is_moved);

        assert!(catalog.set_likelihood(ProjectId::new(1), Likelihood::low()));
        let project = catalog.get(ProjectId::new(1)).unwrap();
        assert_eq!(project.likelihood, Likelihood::low());
        assert!(project.is_moved);

        assert!(!catalog.set_likelihood(ProjectId::new(42), Likelihood::low()));
    }

    #[test]
    fn test_set_capacity_and_move_mark_moved() {
        let mut catalog = catalog();
        assert!(catalog.set_capacity(ProjectId::new(2), Megawatts(75.0)));
        assert!(catalog.get(ProjectId::new(2)).unwrap().is_moved);

        assert!(catalog.move_to(ProjectId::new(3), "2026", Likelihood::high()));
        let project = catalog.get(ProjectId::new(3)).unwrap();
        assert_eq!(project.target_year, "2026");
        assert_eq!(project.likelihood, Likelihood::high());
        assert!(project.is_moved);

        assert!(!catalog.move_to(ProjectId::new(9), "2026", Likelihood::high()));
    }

    #[test]
    fn test_reorder_column_sorts_after_existing_orders() {
        let mut catalog = catalog();
        let touched = catalog.reorder_column(
            "2026",
            &Likelihood::high(),
            &[ProjectId::new(2), ProjectId::new(3), ProjectId::new(1)],
        );
        assert!(touched);
        assert_eq!(catalog.get(ProjectId::new(2)).unwrap().order, 3);
        assert_eq!(catalog.get(ProjectId::new(1)).unwrap().order, 4);
        // Project 3 lives in another column.
        assert_eq!(catalog.get(ProjectId::new(3)).unwrap().order, 2);
        assert!(catalog.iter().all(|p| !p.is_moved));
    }

    #[test]
    fn test_reorder_unknown_column_touches_nothing() {
        let mut catalog = catalog();
        assert!(!catalog.reorder_column("2030", &Likelihood::low(), &[ProjectId::new(1)]));
    }

    #[test]
    fn test_distinct_values() {
        let catalog = catalog();
        assert_eq!(catalog.years(), vec!["2026", "2027"]);
        assert_eq!(catalog.grids(), vec!["Luzon", "Visayas"]);
        assert_eq!(catalog.companies(), vec!["AboitizPower", "Other Co"]);
        assert_eq!(
            catalog.present_buckets(&[Likelihood::new("Medium"), Likelihood::low(), Likelihood::high()]),
            vec![Likelihood::low(), Likelihood::high()]
        );
    }

    #[test]
    fn test_filtered_mut() {
        let mut catalog = catalog();
        for project in catalog.filtered_mut(|p| p.grid == "Luzon") {
            project.order += 10;
        }
        assert_eq!(catalog.get(ProjectId::new(1)).unwrap().order, 10);
        assert_eq!(catalog.get(ProjectId::new(3)).unwrap().order, 2);
    }
}
