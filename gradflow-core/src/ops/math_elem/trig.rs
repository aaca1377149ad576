//! Sine, cosine and hyperbolic tangent.

use crate::autograd::operation::{Operation, SavedTensors};
use crate::error::GradFlowError;
use crate::ops::arithmetic::mul_op;
use crate::ops::{apply_single, single_grad, unary_elementwise, unary_input};
use crate::tensor::Tensor;

#[derive(Debug)]
struct SinBackward;

impl Operation for SinBackward {
    fn name(&self) -> &'static str {
        "SinBackward"
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError> {
        let a = unary_input(inputs, "sin_op")?;
        Ok(vec![unary_elementwise(a, f32::sin, f64::sin)?])
    }

    fn backward(
        &self,
        saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError> {
        let grad = single_grad(grad_outputs, self.name())?;
        let local = unary_elementwise(saved.input(0)?, f32::cos, f64::cos)?;
        Ok(vec![Some(mul_op(grad, &local)?)])
    }
}

#[derive(Debug)]
struct CosBackward;

impl Operation for CosBackward {
    fn name(&self) -> &'static str {
        "CosBackward"
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError> {
        let a = unary_input(inputs, "cos_op")?;
        Ok(vec![unary_elementwise(a, f32::cos, f64::cos)?])
    }

    fn backward(
        &self,
        saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError> {
        let grad = single_grad(grad_outputs, self.name())?;
        let local = unary_elementwise(saved.input(0)?, |x| -x.sin(), |x| -x.sin())?;
        Ok(vec![Some(mul_op(grad, &local)?)])
    }
}

/// `dL/da = g * (1 - tanh(a)^2)`, from the saved output.
#[derive(Debug)]
struct TanhBackward;

impl Operation for TanhBackward {
    fn name(&self) -> &'static str {
        "TanhBackward"
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError> {
        let a = unary_input(inputs, "tanh_op")?;
        Ok(vec![unary_elementwise(a, f32::tanh, f64::tanh)?])
    }

    fn backward(
        &self,
        saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError> {
        let grad = single_grad(grad_outputs, self.name())?;
        let local = unary_elementwise(saved.output(0)?, |t| 1.0 - t * t, |t| 1.0 - t * t)?;
        Ok(vec![Some(mul_op(grad, &local)?)])
    }
}

/// Element-wise sine.
pub fn sin_op(a: &Tensor) -> Result<Tensor, GradFlowError> {
    apply_single(SinBackward, &[a])
}

/// Element-wise cosine.
pub fn cos_op(a: &Tensor) -> Result<Tensor, GradFlowError> {
    apply_single(CosBackward, &[a])
}

/// Element-wise hyperbolic tangent.
pub fn tanh_op(a: &Tensor) -> Result<Tensor, GradFlowError> {
    apply_single(TanhBackward, &[a])
}

#[cfg(test)]
#[path = "trig_test.rs"]
mod tests;
