//! Error types for the revscout protocol layer.

mod browser;
mod crawl;
mod provider;

pub use browser::*;
pub use crawl::*;
pub use provider::*;
