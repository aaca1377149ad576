use num_traits::Float;

use crate::autograd::operation::{Operation, SavedTensors};
use crate::buffer::Buffer;
use crate::error::GradFlowError;
use crate::ops::linalg::transpose_op;
use crate::ops::{apply_single, binary_inputs, check_same_dtype, single_grad};
use crate::tensor::Tensor;

/// Naive `[m, k] x [k, n]` product of row-major matrices.
fn matmul_kernel<T: Float>(a: &[T], b: &[T], m: usize, k: usize, n: usize) -> Vec<T> {
    let mut output = vec![T::zero(); m * n];
    for i in 0..m {
        for p in 0..k {
            let a_ip = a[i * k + p];
            for j in 0..n {
                output[i * n + j] = output[i * n + j] + a_ip * b[p * n + j];
            }
        }
    }
    output
}

/// Backward operation context for matrix multiplication.
///
/// For `C = A @ B`: `dL/dA = G @ B^T` and `dL/dB = A^T @ G`.
#[derive(Debug)]
struct MatmulBackward;

impl Operation for MatmulBackward {
    fn name(&self) -> &'static str {
        "MatmulBackward"
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError> {
        let (a, b) = binary_inputs(inputs, "matmul_op")?;
        check_same_dtype(inputs, "matmul_op")?;
        let a_shape = a.shape();
        let b_shape = b.shape();
        if a_shape.len() != 2 || b_shape.len() != 2 || a_shape[1] != b_shape[0] {
            return Err(GradFlowError::IncompatibleShapes {
                shape1: a_shape,
                shape2: b_shape,
            });
        }
        let (m, k, n) = (a_shape[0], a_shape[1], b_shape[1]);

        let a_buffer = a.buffer();
        let b_buffer = b.buffer();
        let product = match (a_buffer.as_ref(), b_buffer.as_ref()) {
            (Buffer::F32(a_data), Buffer::F32(b_data)) => {
                Buffer::F32(matmul_kernel(a_data, b_data, m, k, n))
            }
            (Buffer::F64(a_data), Buffer::F64(b_data)) => {
                Buffer::F64(matmul_kernel(a_data, b_data, m, k, n))
            }
            (a_buf, b_buf) => {
                return Err(GradFlowError::DataTypeMismatch {
                    expected: a_buf.dtype(),
                    actual: b_buf.dtype(),
                    operation: "matmul_op".to_string(),
                })
            }
        };
        Ok(vec![Tensor::from_buffer(product, vec![m, n])?])
    }

    fn backward(
        &self,
        saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError> {
        let grad = single_grad(grad_outputs, self.name())?;
        let a = saved.input(0)?;
        let b = saved.input(1)?;
        let grad_a = matmul_op(grad, &transpose_op(b, 0, 1)?)?;
        let grad_b = matmul_op(&transpose_op(a, 0, 1)?, grad)?;
        Ok(vec![Some(grad_a), Some(grad_b)])
    }
}

/// 2-D matrix product `a @ b`.
///
/// # Errors
/// `IncompatibleShapes` unless `a` is `[m, k]` and `b` is `[k, n]`.
pub fn matmul_op(a: &Tensor, b: &Tensor) -> Result<Tensor, GradFlowError> {
    apply_single(MatmulBackward, &[a, b])
}

#[cfg(test)]
#[path = "matmul_test.rs"]
mod tests;
