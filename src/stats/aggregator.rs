//! Aggregator Module
//! Computes cross-file dashboard metrics from the full registry snapshot.
//!
//! Metrics are recomputed from scratch on every file-set change rather than
//! maintained incrementally; at spreadsheet scale a full pass is cheap and
//! keeps the result a pure function of the registry contents.

use crate::data::{columns, parse_number, FileKind, FileRecord};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// How many entries the deviation ranking keeps.
pub const TOP_DEVIATIONS_LIMIT: usize = 10;

/// One locality whose loss index deviates below the expected baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviationEntry {
    pub directorate: String,
    pub management: String,
    pub locality: String,
    /// Raw cell value, kept as uploaded for display.
    pub deviation: String,
    /// Upload date of the report the entry came from.
    pub date: DateTime<Utc>,
}

/// Total loss accumulated for one upload month.
#[derive(Debug, Clone, PartialEq)]
pub struct LossPeriod {
    /// `YYYY-MM` bucket key.
    pub period: String,
    pub total_loss: f64,
}

/// Summary metrics backing the overview dashboard. Derived state only:
/// always rederivable from the registry snapshot it was computed from.
#[derive(Debug, Clone, Default)]
pub struct DashboardMetrics {
    pub municipality_count: usize,
    pub total_negative_loss: f64,
    pub total_distributed_volume: f64,
    /// Loss-over-volume ratio as a display string, e.g. `"-10.00%"`;
    /// the literal `"0%"` when no volume has been distributed.
    pub average_loss_index_pct: String,
    pub directorates_with_issues: BTreeSet<String>,
    /// At most [`TOP_DEVIATIONS_LIMIT`] entries, most negative first.
    pub top_deviations: Vec<DeviationEntry>,
    /// Monthly loss totals, ascending by period key. Buckets key on each
    /// file's upload month: the rows carry no date column, so this is a
    /// file-level series, not a per-row one.
    pub loss_time_series: Vec<LossPeriod>,
}

/// Computes [`DashboardMetrics`] over the full file set.
pub struct Aggregator;

impl Aggregator {
    pub fn aggregate(files: &[FileRecord]) -> DashboardMetrics {
        let mut municipalities: HashSet<String> = HashSet::new();
        let mut total_negative_loss = 0.0;
        let mut total_distributed_volume = 0.0;
        let mut directorates_with_issues = BTreeSet::new();
        let mut monthly_loss: BTreeMap<String, f64> = BTreeMap::new();
        let mut deviations: Vec<(f64, DeviationEntry)> = Vec::new();

        for file in files {
            match file.kind {
                FileKind::NegativeLoss => {
                    let period = file.uploaded_at.format("%Y-%m").to_string();
                    for row in &file.rows {
                        // Empty municipality cells still count as one
                        // (degenerate) member, matching the dashboard's
                        // historical counting behavior.
                        municipalities
                            .insert(row.get(columns::MUNICIPALITY).unwrap_or("").to_string());

                        let loss = parse_number(row.get(columns::LOSS));
                        total_negative_loss += loss;
                        total_distributed_volume +=
                            parse_number(row.get(columns::DISTRIBUTED_VOLUME));
                        *monthly_loss.entry(period.clone()).or_insert(0.0) += loss;

                        if loss < 0.0 {
                            if let Some(directorate) = row.get(columns::DIRECTORATE) {
                                if !directorate.is_empty() {
                                    directorates_with_issues.insert(directorate.to_string());
                                }
                            }
                        }
                    }
                }
                FileKind::DeviationReport => {
                    for row in &file.rows {
                        let value = parse_number(row.get(columns::LOSS_INDEX_DEVIATION));
                        if value < 0.0 {
                            deviations.push((
                                value,
                                DeviationEntry {
                                    directorate: cell(row.get(columns::DIRECTORATE)),
                                    management: cell(row.get(columns::MANAGEMENT)),
                                    locality: cell(row.get(columns::LOCALITY)),
                                    deviation: cell(row.get(columns::LOSS_INDEX_DEVIATION)),
                                    date: file.uploaded_at,
                                },
                            ));
                        }
                    }
                }
                // Reserved for future metrics; must not affect totals.
                _ => {}
            }
        }

        deviations.sort_by(|(a, _), (b, _)| a.total_cmp(b));
        deviations.truncate(TOP_DEVIATIONS_LIMIT);

        DashboardMetrics {
            municipality_count: municipalities.len(),
            total_negative_loss,
            total_distributed_volume,
            average_loss_index_pct: Self::format_loss_index(
                total_negative_loss,
                total_distributed_volume,
            ),
            directorates_with_issues,
            top_deviations: deviations.into_iter().map(|(_, entry)| entry).collect(),
            loss_time_series: monthly_loss
                .into_iter()
                .map(|(period, total_loss)| LossPeriod { period, total_loss })
                .collect(),
        }
    }

    fn format_loss_index(total_loss: f64, distributed_volume: f64) -> String {
        if distributed_volume > 0.0 {
            format!("{:.2}%", total_loss / distributed_volume * 100.0)
        } else {
            "0%".to_string()
        }
    }
}

fn cell(value: Option<&str>) -> String {
    value.unwrap_or("").to_string()
}
