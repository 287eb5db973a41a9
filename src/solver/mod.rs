//! Fractional tetration solver
//!
//! T_b(h) for complex base and height, through Koenigs linearization of
//! f(z) = b^z around an attracting fixed point, with an integer power
//! tower fallback.

pub mod depth;
pub mod fixed_point;
pub mod inverse;
pub mod koenigs;
pub mod map;
pub mod orchestrator;
pub mod tower;
pub mod types;

pub use depth::{select_depth, Tolerances};
pub use fixed_point::locate;
pub use inverse::{invert, Inversion};
pub use koenigs::KoenigsMap;
pub use map::ExpMap;
pub use orchestrator::{tetrate, Tetrator};
pub use tower::{integer_height, power_tower};
pub use types::{
    Convergence, FixedPoint, FixedPointStrategy, Method, SchroederDiagnostics, SolverConfig,
    Tetration,
};
