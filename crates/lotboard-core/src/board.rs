//! Board state and command dispatch.
//!
//! [`Board`] owns everything one planning session needs: the catalog, the
//! requirement table, the filters, the scenario store and the highlight
//! toggle. Hosts drive it with [`BoardCommand`] values; every dispatched
//! command is followed by a fresh allocation run and returns the new
//! [`BoardView`].
//!
//! ```
//! use lotboard_core::board::{Board, BoardCommand};
//! use lotboard_core::config::BoardConfig;
//! use lotboard_core::project::{Project, ProjectId};
//! use lotboard_core::requirement::Requirement;
//! use lotboard_core::scenario::MemoryStore;
//!
//! let projects = vec![Project::new(1, "High", "2026", "Luzon", "Ground mounted", 40.0, 5.0)];
//! let requirements = vec![Requirement::new("2026", "Luzon", "Ground mounted", 30.0)];
//! let mut board = Board::new(BoardConfig::default(), projects, requirements, MemoryStore::new()).unwrap();
//!
//! let view = board
//!     .dispatch(BoardCommand::EditCapacity { id: ProjectId::new(1), capacity: 25.0 })
//!     .unwrap();
//! assert_eq!(view.totals[0].remaining.value(), 5.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::allocation::{allocate, AllocationReport};
use crate::catalog::Catalog;
use crate::config::{BoardConfig, BucketConfig};
use crate::error::{BoardError, BoardResult, FeedKind};
use crate::filter::ProjectFilter;
use crate::project::{Likelihood, Project, ProjectId};
use crate::requirement::{Requirement, RequirementTable};
use crate::scenario::{KeyValueStore, ScenarioEntry, ScenarioStore};
use crate::units::Megawatts;
use crate::view::BoardView;

/// One user action, as sent by a host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum BoardCommand {
    /// `None`, `""` or `"all"` clears the grid filter
    SetGridFilter {
        #[serde(default)]
        grid: Option<String>,
    },
    SetSubtypeFilter {
        #[serde(default)]
        subtype: Option<String>,
    },
    SetCompanies {
        companies: Vec<String>,
    },
    ToggleCompany {
        company: String,
    },
    ClearCompanies,
    /// Drop a card into another (year, bucket) column
    MoveProject {
        id: ProjectId,
        year: String,
        likelihood: Likelihood,
    },
    ChangeLikelihood {
        id: ProjectId,
        likelihood: Likelihood,
    },
    EditCapacity {
        id: ProjectId,
        capacity: f64,
    },
    /// New top-to-bottom sequence of one column
    ReorderColumn {
        year: String,
        likelihood: Likelihood,
        ids: Vec<ProjectId>,
    },
    SaveScenario {
        name: String,
        #[serde(default)]
        overwrite: bool,
    },
    LoadScenario {
        name: String,
    },
    DeleteScenario {
        name: String,
    },
    ToggleHighlight,
}

/// Intended update of the source sheet after a manual move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectUpdate {
    pub action: &'static str,
    pub id: ProjectId,
    pub updates: UpdateFields,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateFields {
    #[serde(rename = "Likelihood")]
    pub likelihood: Likelihood,
    #[serde(rename = "GEA Lot Year")]
    pub lot_year: String,
    #[serde(rename = "Order")]
    pub order: i64,
}

impl ProjectUpdate {
    pub fn for_project(project: &Project) -> Self {
        Self {
            action: "updateProject",
            id: project.id,
            updates: UpdateFields {
                likelihood: project.likelihood.clone(),
                lot_year: project.target_year.clone(),
                order: project.order,
            },
        }
    }
}

/// Receiver of outbound sheet updates.
pub trait WriteBack {
    fn send(&mut self, update: &ProjectUpdate);
}

/// Logs the payload instead of transmitting it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingWriteBack;

impl WriteBack for LoggingWriteBack {
    fn send(&mut self, update: &ProjectUpdate) {
        match serde_json::to_string(update) {
            Ok(payload) => info!(id = %update.id, %payload, "write-back (not transmitted)"),
            Err(err) => debug!(id = %update.id, error = %err, "write-back payload not serializable"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Outcome {
    Unchanged,
    Changed,
    Moved(ProjectId),
}

pub struct Board<S> {
    config: BoardConfig,
    catalog: Catalog,
    requirements: RequirementTable,
    filter: ProjectFilter,
    scenarios: ScenarioStore<S>,
    /// Configured buckets present at load, in rank order
    sections: Vec<BucketConfig>,
    ranking: Vec<Likelihood>,
    highlight: bool,
    write_back: Box<dyn WriteBack>,
    report: AllocationReport,
}

impl<S: KeyValueStore> Board<S> {
    /// Build a board from converted feeds and run the first allocation.
    ///
    /// The configured default filters are applied only when some project
    /// carries the value.
    pub fn new(
        config: BoardConfig,
        projects: Vec<Project>,
        requirements: Vec<Requirement>,
        store: S,
    ) -> BoardResult<Self> {
        config.validate()?;
        let catalog = Catalog::from_projects(projects)?;
        let requirements = RequirementTable::new(requirements);

        let mut filter = ProjectFilter::default();
        let grids = catalog.grids();
        if let Some(grid) = &config.board.default_grid {
            if grids.contains(grid) {
                filter.set_grid(Some(grid.clone()));
            }
        }
        let subtypes = catalog.subtypes();
        if let Some(subtype) = &config.board.default_subtype {
            if subtypes.contains(subtype) {
                filter.set_subtype(Some(subtype.clone()));
            }
        }

        let ranking = config.board.ranking();
        let present = catalog.present_buckets(&ranking);
        let sections = config
            .board
            .buckets
            .iter()
            .filter(|b| present.iter().any(|p| p.as_str() == b.name))
            .cloned()
            .collect();
        let scenarios = ScenarioStore::new(store, config.storage.scenario_key.clone());

        let mut board = Self {
            config,
            catalog,
            requirements,
            filter,
            scenarios,
            sections,
            ranking,
            highlight: false,
            write_back: Box::new(LoggingWriteBack),
            report: AllocationReport::default(),
        };
        board.recompute();
        info!(
            projects = board.catalog.len(),
            requirements = board.requirements.len(),
            "board initialized"
        );
        Ok(board)
    }

    /// Build a board from the results of the two independent feed loads.
    ///
    /// Either failure aborts initialization and names the failed feed.
    pub fn from_feeds(
        config: BoardConfig,
        projects: BoardResult<Vec<Project>>,
        requirements: BoardResult<Vec<Requirement>>,
        store: S,
    ) -> BoardResult<Self> {
        let projects = projects.map_err(|e| BoardError::initialization(FeedKind::Projects, e))?;
        let requirements =
            requirements.map_err(|e| BoardError::initialization(FeedKind::Requirements, e))?;
        Self::new(config, projects, requirements, store)
    }

    pub fn with_write_back(mut self, write_back: impl WriteBack + 'static) -> Self {
        self.write_back = Box::new(write_back);
        self
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn requirements(&self) -> &RequirementTable {
        &self.requirements
    }

    pub fn filter(&self) -> &ProjectFilter {
        &self.filter
    }

    pub fn report(&self) -> &AllocationReport {
        &self.report
    }

    pub fn highlight(&self) -> bool {
        self.highlight
    }

    pub fn current_scenario(&self) -> Option<&str> {
        self.scenarios.current()
    }

    pub fn scenario_names(&mut self) -> BoardResult<Vec<String>> {
        self.scenarios.list()
    }

    pub fn show_scenario(&self, name: &str) -> BoardResult<Vec<ScenarioEntry>> {
        self.scenarios.show(name)
    }

    /// Projects taking part in the allocation under the current filter.
    pub fn in_scope(&self) -> impl Iterator<Item = &Project> {
        self.catalog.iter().filter(move |p| self.filter.in_scope(p))
    }

    /// Rerun the allocation over the filtered projects.
    pub fn recompute(&mut self) -> &AllocationReport {
        let filter = &self.filter;
        self.report = allocate(
            self.catalog.filtered_mut(move |p| filter.in_scope(p)),
            &self.requirements,
            &self.ranking,
        );
        debug!(
            accepted = self.report.accepted(),
            marginal = self.report.marginal(),
            spillover = self.report.spillover(),
            "allocation recomputed"
        );
        &self.report
    }

    /// Snapshot for rendering. Refreshes the scenario list, which may clear a
    /// stale current pointer.
    pub fn view(&mut self) -> BoardResult<BoardView> {
        let scenarios = self.scenarios.list()?;
        let highlight = self
            .highlight
            .then_some(self.config.board.highlight_company.as_str());
        let mut view = BoardView::build(
            &self.catalog,
            &self.requirements,
            &self.filter,
            &self.sections,
            highlight,
        );
        view.scenarios = scenarios;
        view.current_scenario = self.scenarios.current().map(str::to_string);
        Ok(view)
    }

    /// Apply one command, recompute and return the new view.
    pub fn dispatch(&mut self, command: BoardCommand) -> BoardResult<BoardView> {
        debug!(?command, "dispatch");
        let outcome = self.execute(command)?;
        self.recompute();
        if let Outcome::Moved(id) = outcome {
            if let Some(project) = self.catalog.get(id) {
                self.write_back.send(&ProjectUpdate::for_project(project));
            }
        }
        if let Outcome::Unchanged = outcome {
            debug!("command left the catalog unchanged");
        }
        self.view()
    }

    fn require_bucket(&self, likelihood: &Likelihood) -> BoardResult<()> {
        if self.ranking.contains(likelihood) {
            Ok(())
        } else {
            Err(BoardError::Validation(format!(
                "unknown likelihood bucket '{likelihood}'"
            )))
        }
    }

    fn execute(&mut self, command: BoardCommand) -> BoardResult<Outcome> {
        let changed = |touched: bool| if touched { Outcome::Changed } else { Outcome::Unchanged };
        let outcome = match command {
            BoardCommand::SetGridFilter { grid } => {
                self.filter.set_grid(grid);
                Outcome::Changed
            }
            BoardCommand::SetSubtypeFilter { subtype } => {
                self.filter.set_subtype(subtype);
                Outcome::Changed
            }
            BoardCommand::SetCompanies { companies } => {
                self.filter.set_companies(companies);
                Outcome::Changed
            }
            BoardCommand::ToggleCompany { company } => {
                self.filter.toggle_company(&company);
                Outcome::Changed
            }
            BoardCommand::ClearCompanies => {
                self.filter.clear_companies();
                Outcome::Changed
            }
            BoardCommand::MoveProject {
                id,
                year,
                likelihood,
            } => {
                self.require_bucket(&likelihood)?;
                if self.catalog.move_to(id, &year, likelihood) {
                    Outcome::Moved(id)
                } else {
                    Outcome::Unchanged
                }
            }
            BoardCommand::ChangeLikelihood { id, likelihood } => {
                self.require_bucket(&likelihood)?;
                if self.catalog.set_likelihood(id, likelihood) {
                    Outcome::Moved(id)
                } else {
                    Outcome::Unchanged
                }
            }
            BoardCommand::EditCapacity { id, capacity } => {
                if !capacity.is_finite() || capacity < 0.0 {
                    return Err(BoardError::Validation(format!(
                        "capacity must be a non-negative number, got {capacity}"
                    )));
                }
                changed(self.catalog.set_capacity(id, Megawatts(capacity)))
            }
            BoardCommand::ReorderColumn {
                year,
                likelihood,
                ids,
            } => changed(self.catalog.reorder_column(&year, &likelihood, &ids)),
            BoardCommand::SaveScenario { name, overwrite } => {
                self.scenarios.save(&name, overwrite, &self.catalog)?;
                Outcome::Unchanged
            }
            BoardCommand::LoadScenario { name } => {
                changed(self.scenarios.load(&name, &mut self.catalog)? > 0)
            }
            BoardCommand::DeleteScenario { name } => {
                self.scenarios.delete(&name)?;
                Outcome::Unchanged
            }
            BoardCommand::ToggleHighlight => {
                self.highlight = !self.highlight;
                Outcome::Changed
            }
        };
        Ok(outcome)
    }
}
