//! Domain logic
//!
//! Pure request-scoped table view logic. No I/O happens here; the datastore
//! collaborator lives in `crate::data`.

pub mod table;
