//! Adapter implementations for port traits.
//!
//! - `live/`: real API brokers
//! - `recording/`: wrap a broker and record its interactions to a cassette
//! - `replaying/`: serve broker results from a cassette

pub mod live;
pub mod recording;
pub mod replaying;
