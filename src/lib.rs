//! docedit - a desktop file manager and text editor over a remote document store
//!
//! The editor browses a folder hierarchy kept by an HTTP document store, opens
//! documents in tabs, edits them with a syntax-highlighting code editor and
//! saves them back. The set of open tabs, the active tab and the working
//! folder are mirrored to the store so a restart resumes where the user left
//! off.
//!
//! # Architecture
//!
//! - **State** ([`app::workspace`]): a UI-free state machine. UI input arrives as
//!   [`app::workspace::WorkspaceMessage`]s, store completions as
//!   [`app::workspace::StoreEvent`]s; both produce [`app::workspace::Effect`]s.
//! - **Store** ([`app::store`]): the [`app::store::DocumentStore`] trait with an
//!   HTTP client and an in-memory implementation.
//! - **Runner** ([`app::tasks`]): executes store requests on a tokio runtime and
//!   hands the results back to the UI thread.
//! - **UI** ([`app::dashui`]): egui panels and windows that turn clicks into
//!   messages.

#![warn(clippy::all, rust_2018_idioms)]

#[macro_use]
pub mod logging_macros;

pub mod app;
pub use app::DocEditApp;
