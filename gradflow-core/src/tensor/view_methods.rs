use crate::error::GradFlowError;
use crate::ops::linalg::transpose_op;
use crate::ops::view::{cat_op, expand_op, reshape_op, split_op};
use crate::tensor::Tensor;

impl Tensor {
    pub fn reshape(&self, new_shape: Vec<usize>) -> Result<Tensor, GradFlowError> {
        reshape_op(self, new_shape)
    }

    /// Broadcasts to `target_shape`.
    pub fn expand(&self, target_shape: Vec<usize>) -> Result<Tensor, GradFlowError> {
        expand_op(self, target_shape)
    }

    pub fn transpose(&self, dim0: usize, dim1: usize) -> Result<Tensor, GradFlowError> {
        transpose_op(self, dim0, dim1)
    }

    /// Matrix transpose of a 2-D tensor.
    pub fn t(&self) -> Result<Tensor, GradFlowError> {
        let rank = self.ndim();
        if rank != 2 {
            return Err(GradFlowError::DimensionMismatch {
                expected: 2,
                actual: rank,
            });
        }
        transpose_op(self, 0, 1)
    }

    /// Splits along `dim` into pieces of the given sizes (one graph node, several outputs).
    pub fn split(&self, sizes: &[usize], dim: usize) -> Result<Vec<Tensor>, GradFlowError> {
        split_op(self, sizes, dim)
    }

    /// Concatenates `tensors` along `dim`.
    pub fn cat(tensors: &[&Tensor], dim: usize) -> Result<Tensor, GradFlowError> {
        cat_op(tensors, dim)
    }
}
