//! Quadra — proximity engine for sports-venue discovery.
//!
//! Haversine distance math with explicit unknown-coordinate handling,
//! a ranking pipeline for venue lists, a viewer-position chain
//! (manual → cached fix → IP lookup → built-in default), and thin
//! CLI/HTTP surfaces over them.

pub mod filter;
pub mod geo;
pub mod server;
pub mod venue;
pub mod viewer;
