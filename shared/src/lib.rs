//! Shared wire types for the POS client
//!
//! Everything the REST backend and the client core agree on lives here:
//! entity models, the JSON response envelope, tagged entity identity, and
//! time helpers. The client crate (`pos-client`) owns all behavior; this
//! crate is data only.

pub mod models;
pub mod response;
pub mod types;
pub mod util;

pub use response::{Envelope, ErrorBody, FieldErrors};
pub use types::EntityId;
