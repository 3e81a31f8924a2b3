//! Application modules.
//!
//! ## Data and state
//! - [`paths`] - store path normalization and manipulation
//! - [`search`] - search request/result types and the matching rules
//! - [`store`] - document store trait, HTTP client and in-memory store
//! - [`workspace`] - tabs, file tree, editor buffers and session state
//!
//! ## Runtime
//! - [`tasks`] - background execution of store requests
//! - [`config`] - configuration file and environment overrides
//!
//! ## UI
//! - [`dashui`] - egui panels, windows and the app shell
//! - [`notifications`] - error and status notices
//! - [`syntax`] - editor highlighting by file extension

pub mod config;
pub mod dashui;
pub mod notifications;
pub mod paths;
pub mod search;
pub mod store;
pub mod syntax;
pub mod tasks;
pub mod workspace;

pub use dashui::app::DocEditApp;
