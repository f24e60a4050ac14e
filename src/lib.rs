//! Hydroview - Water-Loss Report Analysis Engine
//!
//! A Rust library for analyzing uploaded water-distribution loss reports:
//! ingesting parsed tabular files, normalizing locale-formatted numbers,
//! aggregating cross-file dashboard metrics, and running sort/filter/
//! paginate queries over a single report's rows.
//!
//! The crate operates on fully materialized snapshots: files are parsed by
//! an external collaborator, handed to the [`data::FileRegistry`] as ready
//! row sets, and replaced wholesale rather than patched in place. Every
//! derived value ([`stats::DashboardMetrics`], [`table::QueryResult`]) is a
//! pure function of the registry contents and the caller's query state.

pub mod data;
pub mod export;
pub mod stats;
pub mod table;

pub use data::{FileKind, FileRecord, FileRegistry, ParsedUpload, Row};
pub use export::{ExportAdapter, ExportError};
pub use stats::{Aggregator, DashboardMetrics};
pub use table::{QueryResult, QueryState, TableEngine};
