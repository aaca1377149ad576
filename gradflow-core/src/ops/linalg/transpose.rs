use crate::autograd::operation::{Operation, SavedTensors};
use crate::buffer::Buffer;
use crate::error::GradFlowError;
use crate::ops::{apply_single, single_grad, unary_input};
use crate::tensor::utils::{calculate_strides, index_to_coord};
use crate::tensor::Tensor;

fn transpose_kernel<T: Copy>(data: &[T], shape: &[usize], dim0: usize, dim1: usize) -> Vec<T> {
    let input_strides = calculate_strides(shape);
    let mut output_shape = shape.to_vec();
    output_shape.swap(dim0, dim1);
    let output_strides = calculate_strides(&output_shape);
    (0..data.len())
        .map(|i| {
            let mut coord = index_to_coord(i, &output_strides, &output_shape);
            coord.swap(dim0, dim1);
            let index: usize = coord.iter().zip(&input_strides).map(|(c, s)| c * s).sum();
            data[index]
        })
        .collect()
}

/// Backward operation context for transpose, its own inverse.
#[derive(Debug)]
struct TransposeBackward {
    dim0: usize,
    dim1: usize,
}

impl Operation for TransposeBackward {
    fn name(&self) -> &'static str {
        "TransposeBackward"
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError> {
        let a = unary_input(inputs, "transpose_op")?;
        let (buffer, shape) = {
            let guard = a.try_read_data()?;
            (guard.buffer.clone(), guard.shape.clone())
        };
        let rank = shape.len();
        for axis in [self.dim0, self.dim1] {
            if axis >= rank {
                return Err(GradFlowError::InvalidAxis { axis, rank });
            }
        }
        let transposed = match buffer.as_ref() {
            Buffer::F32(data) => Buffer::F32(transpose_kernel(data, &shape, self.dim0, self.dim1)),
            Buffer::F64(data) => Buffer::F64(transpose_kernel(data, &shape, self.dim0, self.dim1)),
        };
        let mut output_shape = shape;
        output_shape.swap(self.dim0, self.dim1);
        Ok(vec![Tensor::from_buffer(transposed, output_shape)?])
    }

    fn backward(
        &self,
        _saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError> {
        let grad = single_grad(grad_outputs, self.name())?;
        Ok(vec![Some(transpose_op(grad, self.dim0, self.dim1)?)])
    }
}

/// Swaps two axes of `a`.
///
/// # Errors
/// `InvalidAxis` if either axis is out of range.
pub fn transpose_op(a: &Tensor, dim0: usize, dim1: usize) -> Result<Tensor, GradFlowError> {
    apply_single(TransposeBackward { dim0, dim1 }, &[a])
}

#[cfg(test)]
#[path = "transpose_test.rs"]
mod tests;
