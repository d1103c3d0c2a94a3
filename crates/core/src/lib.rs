//! Pure domain logic for the auction insights assistant.
//!
//! Nothing in this crate performs I/O: intent detection, name extraction,
//! SQL guarding, valuation and reply formatting are all deterministic and
//! unit-tested here, and the service crates wire them to the outside world.

pub mod cache_key;
pub mod canned;
pub mod error;
pub mod format;
pub mod intent;
pub mod player;
pub mod player_name;
pub mod search;
pub mod sql_guard;
pub mod twiml;
pub mod types;
pub mod valuation;
