//! Domain models shared by the store and its hosts.
//!
//! - `quote` — the `Quote` record and the normalizer that coerces arbitrary
//!   JSON into one.
//! - `defaults` — the built-in seed collection used when nothing is stored.

pub mod defaults;
pub mod quote;
