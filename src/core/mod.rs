//! core/mod.rs
//!
//! The engine side of the crate:
//! - Data records the backend serves (`types`)
//! - The media element seam + the desktop audio engine (`element`)
//! - The engagement worker that talks to the EduCast API (`tracker`)
//!
//! Everything here runs on, or talks to, a background thread. The player
//! controller in `crate::player` stays single-threaded and only touches
//! these parts through channel handles, which keeps the state machine
//! testable without an audio device or a network.

pub mod element;
pub mod tracker;
pub mod types;
