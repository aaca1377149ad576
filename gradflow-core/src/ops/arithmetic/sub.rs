use crate::autograd::operation::{Operation, SavedTensors};
use crate::error::GradFlowError;
use crate::ops::arithmetic::neg_op;
use crate::ops::{apply_single, binary_elementwise, binary_inputs, single_grad};
use crate::tensor::Tensor;

/// Backward operation context for element-wise subtraction.
#[derive(Debug)]
struct SubBackward;

impl Operation for SubBackward {
    fn name(&self) -> &'static str {
        "SubBackward"
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError> {
        let (a, b) = binary_inputs(inputs, "sub_op")?;
        Ok(vec![binary_elementwise(a, b, "sub_op", |x, y| x - y, |x, y| x - y)?])
    }

    fn backward(
        &self,
        saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError> {
        let grad = single_grad(grad_outputs, self.name())?;
        let grad_a = grad.reduce_to_shape(&saved.input(0)?.shape())?;
        let grad_b = neg_op(grad)?.reduce_to_shape(&saved.input(1)?.shape())?;
        Ok(vec![Some(grad_a), Some(grad_b)])
    }
}

/// Performs element-wise subtraction `a - b` with broadcasting.
pub fn sub_op(a: &Tensor, b: &Tensor) -> Result<Tensor, GradFlowError> {
    apply_single(SubBackward, &[a, b])
}

#[cfg(test)]
#[path = "sub_test.rs"]
mod tests;
