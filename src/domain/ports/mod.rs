//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.

pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock};
