//! Tabular views over search results.
//!
//! - [`Table::from_documents`] flattens nested `_source` documents into rows
//! - [`aggs`] turns single-aggregation responses into one-table summaries

pub mod aggs;
pub mod error;
pub mod table;

pub use aggs::{
    date_histogram_agg_to_table, extended_stats_agg_to_table, percentiles_agg_to_table,
    stats_agg_to_table, terms_agg_to_table,
};
pub use error::{Result, TableError};
pub use table::{Table, SEPARATOR};
