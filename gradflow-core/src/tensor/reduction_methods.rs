use crate::error::GradFlowError;
use crate::ops::reduction::{mean_op, sum_op};
use crate::tensor::Tensor;

impl Tensor {
    /// Sums over `axes`, dropping them unless `keep_dims`.
    pub fn sum(&self, axes: &[usize], keep_dims: bool) -> Result<Tensor, GradFlowError> {
        sum_op(self, Some(axes), keep_dims)
    }

    /// Sums every element into a 0-d tensor.
    pub fn sum_all(&self) -> Result<Tensor, GradFlowError> {
        sum_op(self, None, false)
    }

    /// Averages over `axes`, dropping them unless `keep_dims`.
    pub fn mean(&self, axes: &[usize], keep_dims: bool) -> Result<Tensor, GradFlowError> {
        mean_op(self, Some(axes), keep_dims)
    }

    /// Averages every element into a 0-d tensor.
    pub fn mean_all(&self) -> Result<Tensor, GradFlowError> {
        mean_op(self, None, false)
    }
}
