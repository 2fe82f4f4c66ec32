//! FilterView server library
//!
//! Presents tabular resources held in an external datastore as filterable,
//! sortable, paginated JSON payloads for a data-table UI.

pub mod api;
pub mod app;
pub mod core;
pub mod data;
pub mod domain;
