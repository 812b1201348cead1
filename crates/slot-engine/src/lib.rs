//! # slot-engine
//!
//! Deterministic common free-time computation for group meeting scheduling.
//!
//! Given each participant's busy periods and/or stored free-time submissions,
//! the engine finds the windows during which every participant is free at
//! once. It is a set of pure functions over value data: it does no I/O, holds
//! no state between calls, and never blocks.
//!
//! ## Pipeline
//!
//! 1. [`interval`] -- normalize raw intervals into a sorted disjoint set
//! 2. [`freebusy`] -- complement busy periods into free intervals within a range
//! 3. [`overlap`] -- sweep-line intersection across all participants
//! 4. [`filter`] -- drop windows shorter than the required duration
//! 5. [`slots`] -- number the windows and build the invite summary
//!
//! ## Supporting modules
//!
//! - [`parse`] -- decode RFC 3339 / bare-date collaborator timestamps
//! - [`submission`] -- stored availability rows and their replace rules
//! - [`ports`] -- calendar and storage collaborator traits
//! - [`planner`] -- per-request orchestration over the collaborators
//! - [`error`] -- Error types

pub mod error;
pub mod filter;
pub mod freebusy;
pub mod interval;
pub mod overlap;
pub mod parse;
pub mod planner;
pub mod ports;
pub mod slots;
pub mod submission;

pub use error::SlotError;
pub use filter::filter_by_duration;
pub use freebusy::free_intervals;
pub use interval::{merge_intervals, BusyInterval, TimeInterval};
pub use overlap::common_free_windows;
pub use planner::{candidate_slots, plan_invite, InviteRequest, PlanOutcome, RawInviteRequest};
pub use slots::{assemble_slots, CandidateSlot, EventDetails, InviteResponse, InviteSummary};
pub use submission::{AvailabilitySubmission, SubmissionSource};
