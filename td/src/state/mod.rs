//! State management via the actor pattern
//!
//! The StateManager owns the checkpoint store on a dedicated task; all other
//! components hold a cloneable handle and talk to it over channels.

mod manager;
mod messages;

pub use manager::StateManager;
pub use messages::{StateCommand, StateError, StateResponse};
