//! URL handling module for Sitemap Grabber
//!
//! This module provides site-origin normalization, the case-insensitive keys
//! used for cycle detection, relative `<loc>` resolution, and blacklist
//! matching.

mod normalize;
mod site;

// Re-export main functions
pub use normalize::{is_blacklisted, resolve_location, visited_key};
pub use site::Site;
