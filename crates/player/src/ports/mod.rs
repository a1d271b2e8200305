//! Player port definitions.
//!
//! Ports are the only abstractions in the player: everything the session
//! controller needs from the outside world (clock, timers, durable storage,
//! the address bar and the remote reply endpoint) goes through a trait here.

pub mod outbound;
