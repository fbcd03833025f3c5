//! Table management for CRUD admin panels.
//!
//! A [`table::TableController`] owns the query parameters, result page and
//! form state of one admin table and drives a [`api::ResourceApi`] binding.
//! User-facing feedback goes through an injected [`notify::Notifier`].

pub mod api;
pub mod config;
pub mod format;
pub mod logging;
pub mod mvi;
pub mod notify;
pub mod pagination;
pub mod request;
pub mod table;
