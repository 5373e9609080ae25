//! Adapter implementations for port traits.
//!
//! - `live/` - Google Generative Language API
//! - `recording/` - Record interactions to cassettes
//! - `replaying/` - Replay interactions from cassettes

pub mod live;
pub mod recording;
pub mod replaying;
