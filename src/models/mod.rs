//! Domain models for feature tags.
//!
//! - [`Feature`]: a named tag grouping tasks within a project.
//! - [`Project`]: owner of features and tasks.
//! - [`Task`]: a unit of project work that may reference a feature.
//!
//! `Create*` / `Update*` types are write-only request payloads carrying only
//! the fields a caller may set.

mod feature;
mod project;
mod task;

pub use feature::*;
pub use project::*;
pub use task::*;
