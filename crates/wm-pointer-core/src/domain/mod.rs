//! Domain entities for the pointer provider.
//!
//! Pure data types and arithmetic with no infrastructure dependencies:
//!
//! - [`event`] – the lifecycle kind and the immutable event record.
//! - [`geometry`] – the window client rectangle and coordinate normalisation.
//! - [`pointer`] – the tracked pointer the host framework receives.

pub mod event;
pub mod geometry;
pub mod pointer;
