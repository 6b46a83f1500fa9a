//! # Modwire
//!
//! A structural-compatibility resolver for hierarchical module descriptors.
//!
//! Modules (hardware parts, software components, or both) are described in
//! YAML or JSON. Each module exposes typed pins that either take (consume)
//! or give (produce) a capability. Modwire builds the whole module forest
//! and discovers which pins can be wired together, without authors writing
//! the connections by hand.
//!
//! This library provides:
//! - A generic descriptor tree decoded from structured text
//! - A small constraint language for pin parameters (`=x`, `~x`, `=1..5`)
//! - Module/pin graph construction with scope promotion and explicit links
//! - A connectivity pass matching take pins to compatible give pins
//!
//! ## Architecture
//!
//! - [`descriptor`] - Generic descriptor trees and key classification
//! - [`constraint`] - Parameter value/constraint grammar and evaluation
//! - [`graph`] - Module forest, pins, links, and connectivity resolution
//! - [`config`] - Build options and defaults
//! - [`discover`] - Descriptor discovery in repository trees (CLI only)
//!
//! ## Usage
//!
//! ```bash
//! modwire test_data/hw_repo test_data/sw_repo
//! ```
//!
//! ```no_run
//! use modwire::{build_forest, descriptor, BuildConfig};
//!
//! let board = descriptor::from_str("gives:\n  gpio_3: {}\n", "board").unwrap();
//! let app = descriptor::from_str("takes:\n  gpio_3: {}\n", "app").unwrap();
//! let forest = build_forest([("board", &board), ("app", &app)], BuildConfig::default()).unwrap();
//! assert_eq!(forest.connection_count(), 1);
//! ```
//!
//! ## Matching
//!
//! A pin's `type` parameter is always present, derived from the pin name
//! when not declared (`gpio_3` has type `gpio` and index `3`), and carries
//! an implicit `=<type>` constraint. A take pin connects to a give pin in
//! another module when at least one parameter they share is satisfied by
//! the give pin's values and no shared parameter is contradicted.

pub mod config;
pub mod constraint;
pub mod descriptor;
pub mod error;
pub mod graph;

#[cfg(feature = "cli")]
pub mod discover;

// Re-export main types for convenience
pub use config::BuildConfig;
pub use descriptor::Descriptor;
pub use error::{ModwireError, Result};
pub use graph::{build_forest, build_module, Forest, Module, Pin};
