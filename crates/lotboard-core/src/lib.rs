//! # lotboard-core: capacity-slot planning board
//!
//! Allocates power-generation projects into yearly capacity slots. Each
//! (target year, grid, subtype) group has a capacity requirement; projects in
//! a group are ranked by likelihood bucket and tariff and accepted greedily
//! until the requirement is used up.
//!
//! ## Flow
//!
//! 1. The project and requirement feeds are converted by [`feed`].
//! 2. A [`Board`] is built from both; it owns the [`Catalog`], the
//!    [`RequirementTable`], the filters and the [`ScenarioStore`].
//! 3. Every [`BoardCommand`] mutates the catalog or the filters, reruns
//!    [`allocate`] over the projects in scope and yields a fresh [`BoardView`].
//!
//! ## Modules
//!
//! - [`allocation`] - Grouping, ranking and the greedy walk
//! - [`catalog`] - Project lookup and mutation entry points
//! - [`scenario`] - Named snapshots over a [`KeyValueStore`]
//! - [`view`] - Columns and year totals for rendering
//! - [`diagnostics`] - Issues found while converting feed rows

pub mod allocation;
pub mod board;
pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod feed;
pub mod filter;
pub mod project;
pub mod requirement;
pub mod scenario;
pub mod units;
pub mod view;

pub use allocation::{allocate, AllocationReport, GroupOutcome};
pub use board::{Board, BoardCommand, LoggingWriteBack, ProjectUpdate, WriteBack};
pub use catalog::Catalog;
pub use config::{BoardConfig, BoardSettings, BucketConfig, StorageSettings};
pub use diagnostics::{DiagnosticIssue, FeedDiagnostics, FeedStats, Severity};
pub use error::{BoardError, BoardResult, FeedKind};
pub use filter::{FilterOptions, ProjectFilter};
pub use project::{BidderStatus, GroupKey, Likelihood, Project, ProjectId};
pub use requirement::{Requirement, RequirementTable};
pub use scenario::{KeyValueStore, MemoryStore, ScenarioEntry, ScenarioStore};
pub use units::Megawatts;
pub use view::{BoardView, BucketSection, Column, ProjectCard, YearTotals};
