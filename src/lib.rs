//! tetration - fractional tetration over arbitrary-precision complex numbers
//!
//! Computes T_b(h) = f^∘h(1) for f(z) = b^z with complex base and height.
//!
//! # Architecture
//!
//! - **numeric**: `rug` adapter for literal parsing and decimal rendering
//! - **solver**: fixed point, Koenigs linearization, Newton inversion and the
//!   integer tower fallback
//! - **sweep**: concurrent solves over a range of heights
//! - **report** / **cli**: rendering and the `tetrate` binary's front end

pub mod errors;
pub mod numeric;
pub mod solver;

// Re-export commonly used types
pub use errors::{Result, TetrationError};
pub use solver::{tetrate, Method, SolverConfig, Tetration, Tetrator};

// Batch and presentation layers
pub mod cli;
pub mod report;
pub mod sweep;
