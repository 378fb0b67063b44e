//! Common types used across revscout crates.

mod common;
mod message;
mod outcome;
mod review;
mod schema;

pub use common::*;
pub use message::*;
pub use outcome::*;
pub use review::*;
pub use schema::*;
