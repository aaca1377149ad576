use crate::autograd::operation::{Operation, SavedTensors};
use crate::error::GradFlowError;
use crate::ops::{apply_single, single_grad, unary_elementwise, unary_input};
use crate::tensor::Tensor;

#[derive(Debug)]
struct NegBackward;

impl Operation for NegBackward {
    fn name(&self) -> &'static str {
        "NegBackward"
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError> {
        let a = unary_input(inputs, "neg_op")?;
        Ok(vec![unary_elementwise(a, |x| -x, |x| -x)?])
    }

    fn backward(
        &self,
        _saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError> {
        let grad = single_grad(grad_outputs, self.name())?;
        Ok(vec![Some(neg_op(grad)?)])
    }
}

/// Element-wise negation `-a`.
pub fn neg_op(a: &Tensor) -> Result<Tensor, GradFlowError> {
    apply_single(NegBackward, &[a])
}

#[cfg(test)]
#[path = "neg_test.rs"]
mod tests;
