//! Named scenario snapshots.
//!
//! All scenarios live in a single JSON blob under one key of a
//! [`KeyValueStore`]: an object mapping scenario name to an array of
//! [`ScenarioEntry`] records. A snapshot captures the planning fields of every
//! project in the catalog, not only the filtered ones.
//!
//! The store also tracks the "current" scenario, the one most recently saved
//! or loaded. Listing drops the pointer once its scenario is gone.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::Catalog;
use crate::config::DEFAULT_SCENARIO_KEY;
use crate::error::{BoardError, BoardResult};
use crate::project::{Likelihood, Project, ProjectId};
use crate::units::Megawatts;

/// Synchronous string storage, such as browser `localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> BoardResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> BoardResult<()>;
}

/// In-process store, lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> BoardResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> BoardResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Planning fields of one project inside a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioEntry {
    pub id: ProjectId,
    pub likelihood: Likelihood,
    pub target_year: String,
    pub order: i64,
    pub is_moved: bool,
    /// Absent in snapshots taken before capacity edits existed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<Megawatts>,
}

impl ScenarioEntry {
    pub fn capture(project: &Project) -> Self {
        Self {
            id: project.id,
            likelihood: project.likelihood.clone(),
            target_year: project.target_year.clone(),
            order: project.order,
            is_moved: project.is_moved,
            capacity: Some(project.capacity),
        }
    }

    pub fn apply_to(&self, project: &mut Project) {
        project.likelihood = self.likelihood.clone();
        project.target_year = self.target_year.clone();
        project.order = self.order;
        project.is_moved = self.is_moved;
        if let Some(capacity) = self.capacity {
            project.capacity = capacity;
        }
    }
}

/// Scenario name to snapshot, ordered by name.
pub type ScenarioMap = BTreeMap<String, Vec<ScenarioEntry>>;

pub struct ScenarioStore<S> {
    store: S,
    key: String,
    current: Option<String>,
}

impl<S: KeyValueStore> ScenarioStore<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            current: None,
        }
    }

    /// Store under the `dashboardScenarios` key.
    pub fn with_default_key(store: S) -> Self {
        Self::new(store, DEFAULT_SCENARIO_KEY)
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn backend(&self) -> &S {
        &self.store
    }

    /// Decode the blob. A missing blob is an empty map.
    pub fn read_all(&self) -> BoardResult<ScenarioMap> {
        match self.store.get(&self.key)? {
            Some(blob) if !blob.trim().is_empty() => Ok(serde_json::from_str(&blob)?),
            _ => Ok(ScenarioMap::new()),
        }
    }

    fn write_all(&mut self, scenarios: &ScenarioMap) -> BoardResult<()> {
        let blob = serde_json::to_string(scenarios)?;
        self.store.set(&self.key, &blob)
    }

    /// Snapshot every project under `name`.
    ///
    /// Fails with `Validation` for a blank name and with `DuplicateName` when
    /// the name is taken and `overwrite` is false; the store is untouched in
    /// both cases.
    pub fn save(&mut self, name: &str, overwrite: bool, catalog: &Catalog) -> BoardResult<usize> {
        if name.trim().is_empty() {
            return Err(BoardError::Validation("scenario name cannot be empty".into()));
        }

        let mut scenarios = self.read_all()?;
        if scenarios.contains_key(name) && !overwrite {
            return Err(BoardError::DuplicateName(name.to_string()));
        }

        let entries: Vec<ScenarioEntry> = catalog.iter().map(ScenarioEntry::capture).collect();
        let count = entries.len();
        scenarios.insert(name.to_string(), entries);
        self.write_all(&scenarios)?;
        self.current = Some(name.to_string());

        info!(scenario = name, projects = count, overwrite, "scenario saved");
        Ok(count)
    }

    /// Apply the snapshot named `name` to the catalog.
    ///
    /// Entries for ids not in the catalog are ignored. Returns the number of
    /// projects updated.
    pub fn load(&mut self, name: &str, catalog: &mut Catalog) -> BoardResult<usize> {
        let mut scenarios = self.read_all()?;
        let entries = scenarios
            .remove(name)
            .ok_or_else(|| BoardError::NotFound(name.to_string()))?;

        let mut applied = 0;
        for entry in &entries {
            if let Some(project) = catalog.get_mut(entry.id) {
                entry.apply_to(project);
                applied += 1;
            }
        }
        self.current = Some(name.to_string());

        info!(scenario = name, applied, skipped = entries.len() - applied, "scenario loaded");
        Ok(applied)
    }

    /// Remove `name` if present, then refresh the current pointer.
    pub fn delete(&mut self, name: &str) -> BoardResult<bool> {
        let mut scenarios = self.read_all()?;
        let removed = scenarios.remove(name).is_some();
        self.write_all(&scenarios)?;
        if removed {
            info!(scenario = name, "scenario deleted");
        }
        self.list()?;
        Ok(removed)
    }

    /// Stored scenario names, sorted. Clears a current pointer whose scenario
    /// no longer exists.
    pub fn list(&mut self) -> BoardResult<Vec<String>> {
        let scenarios = self.read_all()?;
        if let Some(current) = &self.current {
            if !scenarios.contains_key(current) {
                self.current = None;
            }
        }
        Ok(scenarios.into_keys().collect())
    }

    pub fn show(&self, name: &str) -> BoardResult<Vec<ScenarioEntry>> {
        self.read_all()?
            .remove(name)
            .ok_or_else(|| BoardError::NotFound(name.to_string()))
    }
}
