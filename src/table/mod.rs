//! Table module - sort/filter/paginate query engine

mod engine;

pub use engine::{
    QueryResult, QueryState, RowId, SortDirection, SortSpec, TableEngine, DEFAULT_LOSS_RANGE,
};
