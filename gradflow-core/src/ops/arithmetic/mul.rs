use crate::autograd::operation::{Operation, SavedTensors};
use crate::error::GradFlowError;
use crate::ops::{apply_single, binary_elementwise, binary_inputs, single_grad};
use crate::tensor::Tensor;

/// Backward operation context for element-wise multiplication.
///
/// `dL/da = g * b` and `dL/db = g * a`, each reduced to its input's shape.
#[derive(Debug)]
struct MulBackward;

impl Operation for MulBackward {
    fn name(&self) -> &'static str {
        "MulBackward"
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError> {
        let (a, b) = binary_inputs(inputs, "mul_op")?;
        Ok(vec![binary_elementwise(a, b, "mul_op", |x, y| x * y, |x, y| x * y)?])
    }

    fn backward(
        &self,
        saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError> {
        let grad = single_grad(grad_outputs, self.name())?;
        let a = saved.input(0)?;
        let b = saved.input(1)?;

        let grad_a = mul_op(grad, b)?.reduce_to_shape(&a.shape())?;
        let grad_b = mul_op(grad, a)?.reduce_to_shape(&b.shape())?;
        Ok(vec![Some(grad_a), Some(grad_b)])
    }
}

/// Performs element-wise multiplication `a * b` with broadcasting.
pub fn mul_op(a: &Tensor, b: &Tensor) -> Result<Tensor, GradFlowError> {
    apply_single(MulBackward, &[a, b])
}

#[cfg(test)]
#[path = "mul_test.rs"]
mod tests;
