//! Workflow engines
//!
//! The derived state machine and authorization core of ReviewFlow:
//!
//! - [`phase`]: track and paper phase, recomputed on every query from
//!   deadlines and data completeness, never stored
//! - [`rules`]: pure permission predicates composing roles and phases
//! - [`verification`]: per-action verification over live data
//! - [`assignment`]: bidding-based automatic assignment (three smallest
//!   load) and manual assignment
//! - [`bidding`]: bid intake
//! - [`reviews`]: review submission and access
//! - [`discussion`]: discussion comments and unanimous-consensus
//!   finalization
//! - [`tracks`]: bidding deadline policy and track analytics
//!
//! The engines hold no mutable state of their own; everything lives in the
//! repository and the two external systems.

pub mod assignment;
pub mod bidding;
pub mod discussion;
pub mod phase;
pub mod reviews;
pub mod rules;
pub mod tracks;
pub mod verification;

pub use assignment::AssignmentService;
pub use bidding::BidService;
pub use discussion::DiscussionService;
pub use phase::{PaperPhase, PhaseService, TrackPhase};
pub use reviews::ReviewService;
pub use tracks::TrackService;
pub use verification::VerificationService;
