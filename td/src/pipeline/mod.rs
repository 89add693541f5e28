//! Trip-planning pipeline
//!
//! Four stages run in a fixed order for every request: web search, budget
//! allocation, budget check, itinerary generation. The resulting state is
//! checkpointed per thread so later runs on the same thread carry history.

mod engine;

pub use engine::{PipelineEngine, PipelineError, TripRequest};
