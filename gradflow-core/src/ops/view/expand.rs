use crate::autograd::operation::{Operation, SavedTensors};
use crate::buffer::Buffer;
use crate::error::GradFlowError;
use crate::ops::{apply_single, single_grad, unary_input};
use crate::tensor::utils::{
    broadcast_shapes, calculate_strides, coord_to_index_broadcasted, index_to_coord,
};
use crate::tensor::Tensor;

pub(crate) fn expand_kernel<T: Copy>(
    source: &[T],
    source_shape: &[usize],
    target_shape: &[usize],
) -> Vec<T> {
    let source_strides = calculate_strides(source_shape);
    let target_strides = calculate_strides(target_shape);
    let numel: usize = target_shape.iter().product();
    (0..numel)
        .map(|i| {
            let coord = index_to_coord(i, &target_strides, target_shape);
            source[coord_to_index_broadcasted(&coord, source_shape, &source_strides)]
        })
        .collect()
}

/// Backward operation context for expand: the gradient is summed back over
/// the broadcast axes.
#[derive(Debug)]
struct ExpandBackward {
    target_shape: Vec<usize>,
}

impl Operation for ExpandBackward {
    fn name(&self) -> &'static str {
        "ExpandBackward"
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError> {
        let a = unary_input(inputs, "expand_op")?;
        let (buffer, shape) = {
            let guard = a.try_read_data()?;
            (guard.buffer.clone(), guard.shape.clone())
        };
        let broadcast = broadcast_shapes(&shape, &self.target_shape)?;
        if broadcast != self.target_shape {
            return Err(GradFlowError::BroadcastError {
                shape1: shape,
                shape2: self.target_shape.clone(),
            });
        }
        let expanded = match buffer.as_ref() {
            Buffer::F32(data) => Buffer::F32(expand_kernel(data, &shape, &self.target_shape)),
            Buffer::F64(data) => Buffer::F64(expand_kernel(data, &shape, &self.target_shape)),
        };
        Ok(vec![Tensor::from_buffer(expanded, self.target_shape.clone())?])
    }

    fn backward(
        &self,
        saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError> {
        let grad = single_grad(grad_outputs, self.name())?;
        Ok(vec![Some(grad.reduce_to_shape(&saved.input(0)?.shape())?)])
    }
}

/// Broadcasts `a` to `target_shape`, repeating size-1 and missing leading axes.
///
/// # Errors
/// `BroadcastError` if `a` cannot be broadcast to exactly `target_shape`.
pub fn expand_op(a: &Tensor, target_shape: Vec<usize>) -> Result<Tensor, GradFlowError> {
    apply_single(ExpandBackward { target_shape }, &[a])
}

#[cfg(test)]
#[path = "expand_test.rs"]
mod tests;
