//! Reductions over axes.

pub mod mean;
pub mod sum;

pub use mean::mean_op;
pub use sum::sum_op;

use crate::error::GradFlowError;
use crate::tensor::utils::normalize_axes;

/// Resolves the `axes` argument of a reduction: `None` means every axis.
pub(crate) fn resolve_axes(axes: Option<&[usize]>, rank: usize) -> Result<Vec<usize>, GradFlowError> {
    match axes {
        None => Ok((0..rank).collect()),
        Some(axes) => normalize_axes(axes, rank),
    }
}

/// Shape of a reduction result: reduced axes become 1 with `keep_dims`,
/// and disappear otherwise.
pub(crate) fn reduced_shape(shape: &[usize], axes: &[usize], keep_dims: bool) -> Vec<usize> {
    shape
        .iter()
        .enumerate()
        .filter_map(|(i, &dim)| match (axes.contains(&i), keep_dims) {
            (false, _) => Some(dim),
            (true, true) => Some(1),
            (true, false) => None,
        })
        .collect()
}
