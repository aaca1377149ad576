use crate::error::GradFlowError;
use crate::tensor::Tensor;
use std::fmt::Debug;

/// Detached snapshots of the tensors an operation saw and produced.
///
/// Captured by the graph when an operation is recorded, so a backward rule can
/// read `x` and `f(x)` without the graph holding a strong reference from a node
/// to its own outputs. Snapshots share the original buffers and carry no
/// autograd history.
#[derive(Debug, Clone)]
pub struct SavedTensors {
    pub(crate) inputs: Vec<Tensor>,
    pub(crate) outputs: Vec<Tensor>,
}

impl SavedTensors {
    pub fn new(inputs: Vec<Tensor>, outputs: Vec<Tensor>) -> Self {
        SavedTensors { inputs, outputs }
    }

    /// The `index`-th forward input.
    pub fn input(&self, index: usize) -> Result<&Tensor, GradFlowError> {
        self.inputs.get(index).ok_or_else(|| {
            GradFlowError::InternalError(format!("no saved input at index {}", index))
        })
    }

    /// The `index`-th forward output.
    pub fn output(&self, index: usize) -> Result<&Tensor, GradFlowError> {
        self.outputs.get(index).ok_or_else(|| {
            GradFlowError::InternalError(format!("no saved output at index {}", index))
        })
    }

    pub fn inputs(&self) -> &[Tensor] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Tensor] {
        &self.outputs
    }
}

/// A differentiable primitive: a forward rule and its vector-Jacobian product.
///
/// Every registered operation (add, mul, sqrt, split, ...) is a struct
/// implementing this trait. The struct holds the non-tensor parameters of the
/// call (an exponent, reduction axes, split sizes); tensors flow through
/// `forward` and come back through [`SavedTensors`].
///
/// `Debug + Send + Sync` is required because nodes holding a
/// `Box<dyn Operation>` are shared through `Arc` and may be inspected from any
/// thread holding a tensor.
pub trait Operation: Debug + Send + Sync {
    /// Stable operation name, as shown by `grad_fn` inspection.
    fn name(&self) -> &'static str;

    /// Computes the outputs from the raw input data.
    ///
    /// Implementations must return freshly allocated tensors without autograd
    /// metadata; the caller decides whether to attach a graph node. Domain and
    /// shape violations are reported here, before anything is recorded.
    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError>;

    /// Computes \( \frac{dL}{d\text{Input}_i} \) for every input given
    /// \( \frac{dL}{d\text{Output}_j} \) for every output.
    ///
    /// # Arguments
    /// * `saved`: snapshots of the forward inputs and outputs.
    /// * `grad_outputs`: one gradient per output, each with that output's shape.
    ///   Outputs that received no gradient are passed as zeros.
    ///
    /// # Returns
    /// One entry per input, in forward order. `None` means no gradient flows to
    /// that input. A `Some` gradient must have the shape of its input.
    fn backward(
        &self,
        saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError>;
}
