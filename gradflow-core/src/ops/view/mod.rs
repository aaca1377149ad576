//! Shape manipulation: reshape, expand, split and cat.
//!
//! Buffers are always contiguous, so every view operation produces a new
//! tensor. Reshape shares the input buffer; the others copy.

pub mod cat;
pub mod expand;
pub mod reshape;
pub mod split;

pub use cat::cat_op;
pub use expand::expand_op;
pub use reshape::reshape_op;
pub use split::split_op;

/// `(outer, dim_size, inner)` for slicing a contiguous `shape` along `dim`.
pub(crate) fn split_extents(shape: &[usize], dim: usize) -> (usize, usize, usize) {
    let outer = shape[..dim].iter().product();
    let inner = shape[dim + 1..].iter().product();
    (outer, shape[dim], inner)
}
