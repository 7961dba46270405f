//! REST backend for Beatplan.
//!
//! Applies [`beatplan_core::Operation`]s to the hosted database's REST
//! interface (`/rest/v1/<table>`), authenticating with the project API key.
//!
//! # Example
//!
//! ```ignore
//! use beatplan_core::{materialize, BeatDraft, MemoryQueue, Online, PlanWriter, SystemClock};
//! use beatplan_remote::RestBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = RestBackend::new("https://project.example.co", "api-key");
//!     let writer = PlanWriter::new(backend, MemoryQueue::new(), Online);
//!
//!     let draft: BeatDraft = load_draft();
//!     let new_beat = materialize(&draft, &SystemClock).unwrap();
//!     writer.submit(&new_beat.operations()).await.unwrap();
//! }
//! ```

mod client;
mod error;
mod rows;

pub use client::RestBackend;
pub use error::RemoteError;
pub use rows::{build_request, RestMethod, RestRequest, BEATS_TABLE, BEAT_PLANS_TABLE};
