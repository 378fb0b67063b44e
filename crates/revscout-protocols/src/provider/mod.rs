//! Inference provider protocol definitions.
//!
//! Providers connect to chat completion APIs (OpenAI and compatible
//! services) and answer a single request with a single response.

mod request;
mod response;
mod traits;

pub use request::*;
pub use response::*;
pub use traits::*;
