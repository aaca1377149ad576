use crate::autograd::operation::{Operation, SavedTensors};
use crate::error::GradFlowError;
use crate::ops::arithmetic::{mul_op, neg_op};
use crate::ops::{apply_single, binary_elementwise, binary_inputs, single_grad};
use crate::tensor::Tensor;

/// Backward operation context for element-wise division.
///
/// With `out = a / b`: `dL/da = g / b` and `dL/db = -g * out / b`.
#[derive(Debug)]
struct DivBackward;

impl Operation for DivBackward {
    fn name(&self) -> &'static str {
        "DivBackward"
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError> {
        let (a, b) = binary_inputs(inputs, "div_op")?;
        if b.try_read_data()?.buffer.any_f64(|x| x == 0.0) {
            return Err(GradFlowError::DivisionByZero);
        }
        Ok(vec![binary_elementwise(a, b, "div_op", |x, y| x / y, |x, y| x / y)?])
    }

    fn backward(
        &self,
        saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError> {
        let grad = single_grad(grad_outputs, self.name())?;
        let a = saved.input(0)?;
        let b = saved.input(1)?;
        let out = saved.output(0)?;

        let grad_a_unreduced = div_op(grad, b)?;
        let grad_b_unreduced = neg_op(&mul_op(&grad_a_unreduced, out)?)?;
        Ok(vec![
            Some(grad_a_unreduced.reduce_to_shape(&a.shape())?),
            Some(grad_b_unreduced.reduce_to_shape(&b.shape())?),
        ])
    }
}

/// Performs element-wise division `a / b` with broadcasting.
///
/// # Errors
/// `DivisionByZero` if any element of `b` is zero.
pub fn div_op(a: &Tensor, b: &Tensor) -> Result<Tensor, GradFlowError> {
    apply_single(DivBackward, &[a, b])
}

#[cfg(test)]
#[path = "div_test.rs"]
mod tests;
