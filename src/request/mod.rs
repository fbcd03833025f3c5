//! HTTP request client.
//!
//! Wraps `reqwest` with the admin API's conventions: JSON bodies in and out,
//! and non-200 responses normalized into a [`RequestError`] carrying a
//! readable reason.

mod client;
mod error;

pub use client::{failure_reason, RequestClient};
pub use error::RequestError;
