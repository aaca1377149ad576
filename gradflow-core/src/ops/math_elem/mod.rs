//! Element-wise math functions.

pub mod atan2;
pub mod exp;
pub mod ln;
pub mod sqrt;
pub mod trig;

pub use atan2::atan2_op;
pub use exp::exp_op;
pub use ln::ln_op;
pub use sqrt::sqrt_op;
pub use trig::{cos_op, sin_op, tanh_op};
