//! Request handlers
//!
//! Thin controllers: extract the requester and the path, call into the
//! workflow services, shape the response. All decisions live in the
//! services.

pub mod assignments;
pub mod bids;
pub mod discussion;
pub mod health;
pub mod phases;
pub mod reviews;
pub mod tracks;
