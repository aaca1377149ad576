use crate::autograd::operation::{Operation, SavedTensors};
use crate::error::GradFlowError;
use crate::ops::{
    apply_single, binary_elementwise, check_domain, single_grad, unary_elementwise, unary_input,
};
use crate::tensor::Tensor;

/// Backward operation context for the element-wise square root.
///
/// `dL/da = g / (2 * sqrt(a))`, computed from the saved output. At `a == 0`
/// the gradient is infinite, as the derivative is.
#[derive(Debug)]
struct SqrtBackward;

impl Operation for SqrtBackward {
    fn name(&self) -> &'static str {
        "SqrtBackward"
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError> {
        let a = unary_input(inputs, "sqrt_op")?;
        check_domain(a, "sqrt_op", "square root of a negative number", |x| x < 0.0)?;
        Ok(vec![unary_elementwise(a, f32::sqrt, f64::sqrt)?])
    }

    fn backward(
        &self,
        saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError> {
        let grad = single_grad(grad_outputs, self.name())?;
        let grad_a = binary_elementwise(
            grad,
            saved.output(0)?,
            "sqrt_backward",
            |g, out| g / (2.0 * out),
            |g, out| g / (2.0 * out),
        )?;
        Ok(vec![Some(grad_a)])
    }
}

/// Element-wise square root.
///
/// # Errors
/// `DomainError` if any element is negative.
pub fn sqrt_op(a: &Tensor) -> Result<Tensor, GradFlowError> {
    apply_single(SqrtBackward, &[a])
}

#[cfg(test)]
#[path = "sqrt_test.rs"]
mod tests;
