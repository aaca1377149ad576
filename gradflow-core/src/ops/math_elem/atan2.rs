use crate::autograd::operation::{Operation, SavedTensors};
use crate::error::GradFlowError;
use crate::ops::arithmetic::mul_op;
use crate::ops::{apply_single, binary_elementwise, binary_inputs, single_grad};
use crate::tensor::Tensor;

/// Backward operation context for `atan2(y, x)`.
///
/// `dL/dy = g * x / (x^2 + y^2)` and `dL/dx = -g * y / (x^2 + y^2)`. Both
/// partials are undefined at the origin and come out as NaN there.
#[derive(Debug)]
struct Atan2Backward;

impl Operation for Atan2Backward {
    fn name(&self) -> &'static str {
        "Atan2Backward"
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError> {
        let (y, x) = binary_inputs(inputs, "atan2_op")?;
        Ok(vec![binary_elementwise(y, x, "atan2_op", f32::atan2, f64::atan2)?])
    }

    fn backward(
        &self,
        saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError> {
        let grad = single_grad(grad_outputs, self.name())?;
        let y = saved.input(0)?;
        let x = saved.input(1)?;

        let dy = binary_elementwise(
            y,
            x,
            "atan2_backward",
            |y, x| x / (x * x + y * y),
            |y, x| x / (x * x + y * y),
        )?;
        let dx = binary_elementwise(
            y,
            x,
            "atan2_backward",
            |y, x| -y / (x * x + y * y),
            |y, x| -y / (x * x + y * y),
        )?;
        let grad_y = mul_op(grad, &dy)?.reduce_to_shape(&y.shape())?;
        let grad_x = mul_op(grad, &dx)?.reduce_to_shape(&x.shape())?;
        Ok(vec![Some(grad_y), Some(grad_x)])
    }
}

/// Element-wise four-quadrant arctangent of `y / x`, with broadcasting.
pub fn atan2_op(y: &Tensor, x: &Tensor) -> Result<Tensor, GradFlowError> {
    apply_single(Atan2Backward, &[y, x])
}

#[cfg(test)]
#[path = "atan2_test.rs"]
mod tests;
