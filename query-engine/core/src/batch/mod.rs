//! Resolution of many pending record requests with a single read.
//!
//! Callers queue [`OnKey`] requests, each naming the record it wants by a
//! [`FunctionalKey`]. [`query_by_key`] answers what it can from a
//! [`ResolutionCache`], fetches the rest in one backend query and notifies
//! every request whose record turned up.

mod cache;
mod error;
mod functional_key;
mod query_by_key;

pub use cache::*;
pub use error::*;
pub use functional_key::*;
pub use query_by_key::*;
