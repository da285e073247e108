//! # Blogly Shared
//!
//! Wire types exchanged with clients: form payloads, read models and the
//! standard response envelopes.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse, FlashResponse};
