use num_traits::Float;

use crate::autograd::operation::{Operation, SavedTensors};
use crate::buffer::Buffer;
use crate::error::GradFlowError;
use crate::ops::reduction::{reduced_shape, resolve_axes};
use crate::ops::view::reshape_op;
use crate::ops::{apply_single, single_grad, unary_input};
use crate::tensor::utils::{calculate_strides, index_to_coord};
use crate::tensor::Tensor;

/// Sums `data` (of `shape`) over the sorted `axes`. The result is laid out
/// with the reduced axes kept as size 1.
pub(crate) fn sum_kernel<T: Float>(data: &[T], shape: &[usize], axes: &[usize]) -> Vec<T> {
    let output_shape = reduced_shape(shape, axes, true);
    let output_strides = calculate_strides(&output_shape);
    let input_strides = calculate_strides(shape);
    let mut output = vec![T::zero(); output_shape.iter().product()];

    for (i, &value) in data.iter().enumerate() {
        let coord = index_to_coord(i, &input_strides, shape);
        let output_index: usize = coord
            .iter()
            .enumerate()
            .filter(|(dim, _)| !axes.contains(dim))
            .map(|(dim, &c)| c * output_strides[dim])
            .sum();
        output[output_index] = output[output_index] + value;
    }
    output
}

/// Backward operation context for summation.
///
/// The gradient of a sum is the upstream gradient broadcast back over the
/// reduced axes.
#[derive(Debug)]
struct SumBackward {
    axes: Vec<usize>,
    keep_dims: bool,
}

impl Operation for SumBackward {
    fn name(&self) -> &'static str {
        "SumBackward"
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError> {
        let a = unary_input(inputs, "sum_op")?;
        let (buffer, shape) = {
            let guard = a.try_read_data()?;
            (guard.buffer.clone(), guard.shape.clone())
        };
        let summed = match buffer.as_ref() {
            Buffer::F32(data) => Buffer::F32(sum_kernel(data, &shape, &self.axes)),
            Buffer::F64(data) => Buffer::F64(sum_kernel(data, &shape, &self.axes)),
        };
        Ok(vec![Tensor::from_buffer(
            summed,
            reduced_shape(&shape, &self.axes, self.keep_dims),
        )?])
    }

    fn backward(
        &self,
        saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError> {
        let grad = single_grad(grad_outputs, self.name())?;
        let input_shape = saved.input(0)?.shape();
        let kept = reshape_op(grad, reduced_shape(&input_shape, &self.axes, true))?;
        Ok(vec![Some(kept.expand_to_shape(&input_shape)?)])
    }
}

/// Sums the tensor over `axes` (`None` for all axes).
///
/// # Errors
/// `InvalidAxis` if an axis is out of range.
pub fn sum_op(a: &Tensor, axes: Option<&[usize]>, keep_dims: bool) -> Result<Tensor, GradFlowError> {
    let axes = resolve_axes(axes, a.ndim())?;
    apply_single(SumBackward { axes, keep_dims }, &[a])
}

#[cfg(test)]
#[path = "sum_test.rs"]
mod tests;
