//! Endpoint bindings the table controller drives.

mod admin;
mod resource;
mod rest;

pub use admin::{AdminClient, ObjectInfo};
pub use resource::ResourceApi;
pub use rest::{QueryMethod, RestResource};
