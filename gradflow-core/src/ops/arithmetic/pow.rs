use crate::autograd::operation::{Operation, SavedTensors};
use crate::error::GradFlowError;
use crate::ops::arithmetic::mul_op;
use crate::ops::{apply_single, check_domain, single_grad, unary_elementwise, unary_input};
use crate::tensor::Tensor;

/// Backward operation context for `a^exponent` with a constant exponent.
///
/// `dL/da = g * exponent * a^(exponent - 1)`.
#[derive(Debug)]
struct PowBackward {
    exponent: f64,
}

impl Operation for PowBackward {
    fn name(&self) -> &'static str {
        "PowBackward"
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError> {
        let a = unary_input(inputs, "pow_scalar_op")?;
        let p = self.exponent;
        if p.fract() != 0.0 {
            check_domain(
                a,
                "pow_scalar_op",
                "negative base with a non-integer exponent",
                |x| x < 0.0,
            )?;
        }
        Ok(vec![unary_elementwise(
            a,
            |x| x.powf(p as f32),
            |x| x.powf(p),
        )?])
    }

    fn backward(
        &self,
        saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError> {
        let grad = single_grad(grad_outputs, self.name())?;
        let p = self.exponent;
        // d/da a^0 is 0 everywhere, including a == 0 where the formula is 0 * inf.
        let local = if p == 0.0 {
            unary_elementwise(saved.input(0)?, |_| 0.0, |_| 0.0)?
        } else {
            unary_elementwise(
                saved.input(0)?,
                |x| p as f32 * x.powf(p as f32 - 1.0),
                |x| p * x.powf(p - 1.0),
            )?
        };
        Ok(vec![Some(mul_op(grad, &local)?)])
    }
}

/// Raises every element to a constant power.
///
/// # Errors
/// `DomainError` if `exponent` is not an integer and `a` has negative elements.
pub fn pow_scalar_op(a: &Tensor, exponent: f64) -> Result<Tensor, GradFlowError> {
    apply_single(PowBackward { exponent }, &[a])
}

#[cfg(test)]
#[path = "pow_test.rs"]
mod tests;
