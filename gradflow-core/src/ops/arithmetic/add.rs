use crate::autograd::operation::{Operation, SavedTensors};
use crate::error::GradFlowError;
use crate::ops::{apply_single, binary_elementwise, binary_inputs, single_grad};
use crate::tensor::Tensor;

/// Backward operation context for element-wise addition.
///
/// Both inputs receive the upstream gradient, summed over the axes they were
/// broadcast along.
#[derive(Debug)]
struct AddBackward;

impl Operation for AddBackward {
    fn name(&self) -> &'static str {
        "AddBackward"
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError> {
        let (a, b) = binary_inputs(inputs, "add_op")?;
        Ok(vec![binary_elementwise(a, b, "add_op", |x, y| x + y, |x, y| x + y)?])
    }

    fn backward(
        &self,
        saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError> {
        let grad = single_grad(grad_outputs, self.name())?;
        let grad_a = grad.reduce_to_shape(&saved.input(0)?.shape())?;
        let grad_b = grad.reduce_to_shape(&saved.input(1)?.shape())?;
        Ok(vec![Some(grad_a), Some(grad_b)])
    }
}

/// Performs element-wise addition `a + b` with broadcasting.
///
/// # Errors
/// `BroadcastError` for incompatible shapes, `DataTypeMismatch` for mixed dtypes.
pub fn add_op(a: &Tensor, b: &Tensor) -> Result<Tensor, GradFlowError> {
    apply_single(AddBackward, &[a, b])
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
