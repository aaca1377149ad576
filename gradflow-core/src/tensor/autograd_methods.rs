// src/tensor/autograd_methods.rs

use std::sync::Arc;

use crate::autograd::engine::{run_backward, BackwardOptions};
use crate::autograd::graph::GraphNode;
use crate::error::GradFlowError;
use crate::ops::arithmetic::add_op;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

impl Tensor {
    /// Checks if the tensor requires gradient computation.
    pub fn requires_grad(&self) -> bool {
        self.read_data().requires_grad
    }

    /// Sets the `requires_grad` status of this tensor **in-place**.
    ///
    /// Only allowed on leaf tensors: the flag of an operation output is decided
    /// by its inputs when the operation runs.
    ///
    /// # Errors
    /// `GradFlowError::RequiresGradOnNonLeaf` if the tensor has a producer.
    pub fn requires_grad_(&self, requires_grad: bool) -> Result<(), GradFlowError> {
        let mut guard = self.try_write_data()?;
        if guard.grad_fn.is_some() {
            log::warn!(
                "requires_grad_({}) refused on a non-leaf tensor; detach() it first.",
                requires_grad
            );
            return Err(GradFlowError::RequiresGradOnNonLeaf);
        }
        guard.requires_grad = requires_grad;
        Ok(())
    }

    /// True if the tensor was created directly rather than by a tracked operation.
    pub fn is_leaf(&self) -> bool {
        self.read_data().grad_fn.is_none()
    }

    /// Returns the node that produced this tensor, if any.
    ///
    /// The node can be inspected (name, inputs, outputs) but not modified.
    pub fn grad_fn(&self) -> Option<Arc<GraphNode>> {
        self.read_data().grad_fn.clone()
    }

    /// Index of this tensor among the outputs of its producer.
    pub fn output_nr(&self) -> usize {
        self.read_data().output_nr
    }

    /// Returns the accumulated gradient, if a backward pass has reached this tensor.
    pub fn grad(&self) -> Option<Tensor> {
        self.read_data().grad.clone()
    }

    /// Resets the gradient of this tensor to None.
    pub fn zero_grad(&self) {
        self.write_data().grad = None;
    }

    /// Makes a non-leaf tensor keep its gradient after backward.
    ///
    /// No-op on leaves, which always keep theirs.
    ///
    /// # Errors
    /// `GradFlowError::RequiresGradNotMet` if the tensor does not require grad.
    pub fn retain_grad(&self) -> Result<(), GradFlowError> {
        let mut guard = self.try_write_data()?;
        if !guard.requires_grad {
            return Err(GradFlowError::RequiresGradNotMet);
        }
        if guard.grad_fn.is_some() {
            guard.retains_grad = true;
        }
        Ok(())
    }

    /// True if [`Tensor::retain_grad`] was called on this non-leaf tensor.
    pub fn retains_grad(&self) -> bool {
        self.read_data().retains_grad
    }

    /// Creates a new leaf sharing this tensor's data, without any history.
    ///
    /// The result has `requires_grad == false`; `self` is left untouched.
    pub fn detach(&self) -> Tensor {
        let guard = self.read_data();
        Tensor::from_tensor_data(TensorData::shared(
            Arc::clone(&guard.buffer),
            guard.shape.clone(),
        ))
    }

    /// Computes the gradients of this scalar tensor w.r.t. graph leaves.
    ///
    /// Gradients are added to any existing `grad`, and the graph's saved tensors
    /// are released. See [`Tensor::backward_with`].
    pub fn backward(&self) -> Result<(), GradFlowError> {
        self.backward_with(None, BackwardOptions::default())
    }

    /// Computes gradients with an explicit seed and options.
    ///
    /// # Arguments
    /// * `seed`: the gradient of the objective w.r.t. `self`. Required when
    ///   `self` has more than one element; must match its shape and dtype.
    /// * `options`: see [`BackwardOptions`].
    ///
    /// # Errors
    /// * `BackwardNonScalar` if no seed is given for a non-scalar tensor.
    /// * `ShapeMismatch` / `DataTypeMismatch` for a seed not matching `self`.
    /// * `RequiresGradNotMet` if `self` does not require grad.
    /// * `GraphReleased` if the graph was already consumed by a backward pass
    ///   without `retain_graph`.
    ///
    /// On error no gradient is modified.
    pub fn backward_with(
        &self,
        seed: Option<&Tensor>,
        options: BackwardOptions,
    ) -> Result<(), GradFlowError> {
        run_backward(self, seed, options)
    }

    /// Adds `grad` into this tensor's gradient (`+=`), creating it if absent.
    pub(crate) fn accumulate_grad(&self, grad: Tensor) -> Result<(), GradFlowError> {
        let (shape, existing) = {
            let guard = self.try_read_data()?;
            (guard.shape.clone(), guard.grad.clone())
        };
        let grad_shape = grad.shape();
        if grad_shape != shape {
            return Err(GradFlowError::ShapeMismatch {
                expected: shape,
                actual: grad_shape,
                operation: "accumulate_grad".to_string(),
            });
        }
        let updated = match existing {
            Some(existing) => add_op(&existing, &grad)?,
            None => grad.detach(),
        };
        self.try_write_data()?.grad = Some(updated);
        Ok(())
    }
}

#[cfg(test)]
#[path = "autograd_methods_test.rs"]
mod tests;
