use crate::autograd::operation::{Operation, SavedTensors};
use crate::error::GradFlowError;
use crate::ops::arithmetic::div_op;
use crate::ops::{apply_single, check_domain, single_grad, unary_elementwise, unary_input};
use crate::tensor::Tensor;

/// Backward operation context for the natural logarithm: `dL/da = g / a`.
#[derive(Debug)]
struct LnBackward;

impl Operation for LnBackward {
    fn name(&self) -> &'static str {
        "LnBackward"
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError> {
        let a = unary_input(inputs, "ln_op")?;
        check_domain(a, "ln_op", "logarithm of a non-positive number", |x| x <= 0.0)?;
        Ok(vec![unary_elementwise(a, f32::ln, f64::ln)?])
    }

    fn backward(
        &self,
        saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError> {
        let grad = single_grad(grad_outputs, self.name())?;
        Ok(vec![Some(div_op(grad, saved.input(0)?)?)])
    }
}

/// Element-wise natural logarithm.
///
/// # Errors
/// `DomainError` if any element is zero or negative.
pub fn ln_op(a: &Tensor) -> Result<Tensor, GradFlowError> {
    apply_single(LnBackward, &[a])
}

#[cfg(test)]
#[path = "ln_test.rs"]
mod tests;
