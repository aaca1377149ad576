use std::sync::Arc;

use crate::autograd::operation::{Operation, SavedTensors};
use crate::error::GradFlowError;
use crate::ops::{apply_single, single_grad, unary_input};
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

#[derive(Debug)]
struct ReshapeBackward {
    new_shape: Vec<usize>,
}

impl Operation for ReshapeBackward {
    fn name(&self) -> &'static str {
        "ReshapeBackward"
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError> {
        let a = unary_input(inputs, "reshape_op")?;
        let guard = a.try_read_data()?;
        let new_numel: usize = self.new_shape.iter().product();
        if new_numel != guard.numel() {
            return Err(GradFlowError::ShapeMismatch {
                expected: guard.shape.clone(),
                actual: self.new_shape.clone(),
                operation: "reshape_op".to_string(),
            });
        }
        Ok(vec![Tensor::from_tensor_data(TensorData::shared(
            Arc::clone(&guard.buffer),
            self.new_shape.clone(),
        ))])
    }

    fn backward(
        &self,
        saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError> {
        let grad = single_grad(grad_outputs, self.name())?;
        Ok(vec![Some(reshape_op(grad, saved.input(0)?.shape())?)])
    }
}

/// Returns a tensor with the same elements and a new shape.
///
/// # Errors
/// `ShapeMismatch` if the element counts differ.
pub fn reshape_op(a: &Tensor, new_shape: Vec<usize>) -> Result<Tensor, GradFlowError> {
    apply_single(ReshapeBackward { new_shape }, &[a])
}

#[cfg(test)]
#[path = "reshape_test.rs"]
mod tests;
