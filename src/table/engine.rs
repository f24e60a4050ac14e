//! Table Engine Module
//! Sorts, filters and paginates one report's rows, and tracks row
//! selection for the detail view.
//!
//! The pipeline runs in a fixed order - sort, text filter, loss-range
//! filter, paginate - so filtering never disturbs an applied sort and the
//! page is always cut from the final sequence.

use crate::data::{columns, parse_number, try_parse_number, Row};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Stable row identifier: the row's index in the originally ingested
/// sequence. Assigned before any pipeline stage runs, so selections keyed
/// on it survive re-sorting, re-filtering and page-size changes.
pub type RowId = usize;

/// Loss range that applies no restriction at all.
pub const DEFAULT_LOSS_RANGE: (f64, f64) = (0.0, 100.0);

const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

/// Per-view query parameters, mutated one field at a time by the consumer.
#[derive(Debug, Clone)]
pub struct QueryState {
    pub search_term: String,
    /// `[min, max]` filter over the parsed `Perda` column; inert while it
    /// equals [`DEFAULT_LOSS_RANGE`].
    pub loss_range: (f64, f64),
    pub sort: Option<SortSpec>,
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
    pub selected: BTreeSet<RowId>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            loss_range: DEFAULT_LOSS_RANGE,
            sort: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            selected: BTreeSet::new(),
        }
    }
}

impl QueryState {
    /// Sorting the already-sorted column flips direction; picking a new
    /// column resets to ascending.
    pub fn toggle_sort(&mut self, column: &str) {
        let direction = match &self.sort {
            Some(spec) if spec.column == column
                && spec.direction == SortDirection::Ascending =>
            {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        self.sort = Some(SortSpec {
            column: column.to_string(),
            direction,
        });
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.page = 1;
    }

    pub fn set_loss_range(&mut self, min: f64, max: f64) {
        self.loss_range = (min, max);
        self.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Pull an out-of-range page back into `[1, total_pages]`. The engine
    /// itself slices unchecked; callers clamp before re-querying.
    pub fn clamp_page(&mut self, total_pages: usize) {
        self.page = self.page.clamp(1, total_pages.max(1));
    }

    pub fn toggle_row(&mut self, id: RowId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Page-scoped select-all toggle: clears the whole selection when every
    /// visible row is already selected, otherwise the selection becomes
    /// exactly the visible rows.
    pub fn toggle_select_all(&mut self, visible: &[RowId]) {
        let all_selected =
            !visible.is_empty() && visible.iter().all(|id| self.selected.contains(id));
        if all_selected {
            self.selected.clear();
        } else {
            self.selected = visible.iter().copied().collect();
        }
    }

    pub fn is_selected(&self, id: RowId) -> bool {
        self.selected.contains(&id)
    }
}

/// One page of filtered, sorted rows, plus the counts the pager needs.
#[derive(Debug)]
pub struct QueryResult<'a> {
    pub rows: Vec<(RowId, &'a Row)>,
    pub filtered_count: usize,
    pub total_pages: usize,
}

impl QueryResult<'_> {
    /// Ids of the rows on the current page, in display order.
    pub fn visible_ids(&self) -> Vec<RowId> {
        self.rows.iter().map(|(id, _)| *id).collect()
    }
}

/// Pure query pipeline over an immutable row snapshot.
pub struct TableEngine;

impl TableEngine {
    pub fn query<'a>(rows: &'a [Row], state: &QueryState) -> QueryResult<'a> {
        let mut indexed: Vec<(RowId, &Row)> = rows.iter().enumerate().collect();

        if let Some(spec) = &state.sort {
            indexed.sort_by(|(_, a), (_, b)| {
                let ord = Self::compare_cells(a.get(&spec.column), b.get(&spec.column));
                match spec.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }

        if !state.search_term.is_empty() {
            let term = state.search_term.to_lowercase();
            indexed.retain(|(_, row)| row.values().any(|v| v.to_lowercase().contains(&term)));
        }

        if state.loss_range != DEFAULT_LOSS_RANGE {
            let (min, max) = state.loss_range;
            indexed.retain(|(_, row)| {
                let loss = parse_number(row.get(columns::LOSS));
                loss >= min && loss <= max
            });
        }

        let filtered_count = indexed.len();
        let page_size = state.page_size.max(1);
        let total_pages = (filtered_count.div_ceil(page_size)).max(1);

        // Unchecked slicing: an out-of-range page is simply empty.
        let start = state.page.saturating_sub(1) * page_size;
        let rows = indexed.into_iter().skip(start).take(page_size).collect();

        QueryResult {
            rows,
            filtered_count,
            total_pages,
        }
    }

    /// Numeric comparison when both cells parse as locale numbers,
    /// case-insensitive lexicographic comparison otherwise. Missing cells
    /// compare as empty strings.
    fn compare_cells(a: Option<&str>, b: Option<&str>) -> Ordering {
        match (try_parse_number(a), try_parse_number(b)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => a
                .unwrap_or("")
                .to_lowercase()
                .cmp(&b.unwrap_or("").to_lowercase()),
        }
    }
}
