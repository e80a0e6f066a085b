//! Ports to the two external systems
//!
//! The Users and Submissions systems are reached only through these narrow
//! read-only contracts so they can be faked in tests. The concrete adapters
//! are blocking-per-request reqwest JSON clients with no retry policy: a
//! failed call is fatal to the current request.

mod submissions;
mod users;

pub use submissions::{HttpSubmissionsClient, Submission, SubmissionsPort};
pub use users::{ExternalTrack, HttpUsersClient, Role, TrackRole, UsersPort};
