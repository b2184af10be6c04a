//! Helper functions for URL and HTML generation

pub mod html;
pub mod url;
