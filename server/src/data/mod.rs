//! Data layer
//!
//! The external datastore collaborator. The view core never talks to the
//! network directly; it goes through the [`traits::DatastoreClient`] trait,
//! implemented over HTTP in [`http`].

pub mod error;
pub mod http;
pub mod traits;
pub mod types;

pub use error::DataError;
pub use http::HttpDatastore;
pub use traits::{DatastoreClient, SearchOutcome};
