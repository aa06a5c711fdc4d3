//! Numerical utilities: linear interpolation, smoothing splines, and the dense solve behind them.

pub mod interp;
pub mod solve;
pub mod spline;

pub use interp::*;
pub use solve::*;
pub use spline::*;
