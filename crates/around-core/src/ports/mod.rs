//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod object_store;
mod search_index;

pub use auth::{AuthError, Principal, TokenService};
pub use object_store::ObjectStore;
pub use search_index::SearchIndex;

#[cfg(test)]
pub use object_store::MockObjectStore;
#[cfg(test)]
pub use search_index::MockSearchIndex;
