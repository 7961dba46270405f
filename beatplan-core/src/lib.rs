//! Beatplan core: recurring visit plans for field-sales beats.
//!
//! Core concepts:
//! - **Beat**: a named route grouping a set of retailers
//! - **RecurrenceRule**: how a beat repeats (daily, weekly, monthly, every N days)
//! - **BeatPlan**: one dated occurrence of a beat with its retailer snapshot
//! - **Operation**: a pending write, applied to a `Backend` directly or parked
//!   in a `WriteQueue` while offline
//!
//! # Example
//!
//! ```
//! use beatplan_core::{expand, BeatRef, Frequency, RecurrenceRule, Until, Weekdays};
//! use chrono::NaiveDate;
//! use uuid::Uuid;
//!
//! let anchor = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let rule = RecurrenceRule {
//!     frequency: Frequency::Weekly {
//!         weekdays: Weekdays::from_indices([1, 3]).unwrap(),
//!     },
//!     until: Until::Date(NaiveDate::from_ymd_opt(2024, 1, 14).unwrap()),
//! };
//! let beat = BeatRef {
//!     id: Uuid::nil(),
//!     name: "North route".to_string(),
//! };
//!
//! let plans = expand(&rule, anchor, &beat, &["r-1".to_string()]).unwrap();
//! assert_eq!(plans.len(), 4);
//! ```

mod backend;
mod beat;
pub mod calendar;
mod clock;
mod connectivity;
mod draft;
mod expand;
mod operation;
mod queue;
mod recurrence;
mod replay;
mod weekday;
mod writer;

pub use backend::{Backend, MemoryBackend, MemoryBackendError};
pub use beat::{Beat, BeatId, BeatPlan, BeatRef, RetailerId};
pub use clock::{Clock, FixedClock, SystemClock};
pub use connectivity::{Connectivity, ManualConnectivity, Offline, Online};
pub use draft::{materialize, BeatDraft, CreateBeatError, NewBeat};
pub use expand::{expand, normalize};
pub use operation::Operation;
pub use queue::{MemoryQueue, MemoryQueueError, QueuedWrite, WriteQueue};
pub use recurrence::{Frequency, InvalidRuleError, RecurrenceRule, Until, PERMANENT_HORIZON_DAYS};
pub use replay::{replay, replay_if_online, ReplayError, ReplayReport};
pub use weekday::Weekdays;
pub use writer::{PlanWriter, SubmitError, SubmitReport};
