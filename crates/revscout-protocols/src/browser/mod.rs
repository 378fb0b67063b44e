//! Browser capability protocol.
//!
//! The crawl engine drives a browser only through these traits. A session
//! owns one or more pages; pages hand out element handles that stay valid
//! until the page navigates away.

mod traits;

pub use traits::*;
