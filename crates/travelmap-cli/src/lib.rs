//! travelmap-cli
//! =============
//!
//! Command-line interface for the `travelmap-core` travel log.
//!
//! This crate primarily provides a binary (`travelmap-cli`). We include a
//! small library target so that docs.rs renders a documentation page and
//! shows this overview. See the README for full usage examples.
//!
//! Quick start
//! -----------
//!
//! Install the CLI from crates.io:
//!
//! ```text
//! cargo install travelmap-cli
//! ```
//!
//! Basic usage:
//!
//! ```text
//! travelmap-cli --help
//! travelmap-cli stats
//! travelmap-cli register --date 2024-05-01 --title 出張 --location 上海、中国
//! travelmap-cli map china
//! ```
//!
//! For programmatic access to the stores and render orchestration, use the
//! [`travelmap-core`] crate directly.

// This library target intentionally exposes no API; the binary is the primary
// deliverable. The presence of this file enables a rendered page on docs.rs.
