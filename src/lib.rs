//! Library crate for user-admin-tui.
//!
//! This crate exposes the building blocks of the TUI:
//! - Application state, keymap and update loop (`app`)
//! - REST layer and data model (`api`)
//! - Error and result types (`error`)
//! - Timestamp display helpers (`format`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `user-admin-tui` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod error;
pub mod format;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
