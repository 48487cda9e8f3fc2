//! Feature tags for project tasks.
//!
//! - [`api`] / [`db`]: the feature API server over SQLite.
//! - [`store`] / [`client`]: the [`FeatureStore`](store::FeatureStore) seam
//!   with local and HTTP implementations.
//! - [`workflow`], [`manager`], [`selector`]: headless create/edit dialog,
//!   per-project list and feature picker, driven through an injected
//!   [`DialogController`](dialog::DialogController).
//! - [`terminal`]: a line-based dialog host used by the `ftag manage` command.

pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod dialog;
pub mod manager;
pub mod models;
pub mod selector;
pub mod store;
pub mod terminal;
pub mod workflow;
