use crate::autograd::operation::{Operation, SavedTensors};
use crate::error::GradFlowError;
use crate::ops::arithmetic::mul_op;
use crate::ops::{apply_single, single_grad, unary_elementwise, unary_input};
use crate::tensor::Tensor;

/// Backward operation context for the exponential: `dL/da = g * exp(a)`.
#[derive(Debug)]
struct ExpBackward;

impl Operation for ExpBackward {
    fn name(&self) -> &'static str {
        "ExpBackward"
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError> {
        let a = unary_input(inputs, "exp_op")?;
        Ok(vec![unary_elementwise(a, f32::exp, f64::exp)?])
    }

    fn backward(
        &self,
        saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError> {
        let grad = single_grad(grad_outputs, self.name())?;
        Ok(vec![Some(mul_op(grad, saved.output(0)?)?)])
    }
}

/// Element-wise exponential.
pub fn exp_op(a: &Tensor) -> Result<Tensor, GradFlowError> {
    apply_single(ExpBackward, &[a])
}

#[cfg(test)]
#[path = "exp_test.rs"]
mod tests;
