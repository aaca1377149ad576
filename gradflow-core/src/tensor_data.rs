use std::sync::Arc;

use crate::autograd::graph::GraphNode;
use crate::buffer::Buffer;
use crate::error::GradFlowError;
use crate::tensor::utils::calculate_strides;
use crate::tensor::Tensor;
use crate::types::DType;

/// Internal storage and metadata for a Tensor.
///
/// Wrapped in `Arc<RwLock<TensorData>>` by [`Tensor`] so that handles can be
/// cloned cheaply while autograd metadata (`grad`, `requires_grad`) stays
/// mutable through shared references.
#[derive(Debug)]
pub struct TensorData {
    /// Shared, immutable element storage.
    pub(crate) buffer: Arc<Buffer>,
    pub(crate) dtype: DType,
    /// The shape of the tensor. An empty shape is a 0-d scalar.
    pub(crate) shape: Vec<usize>,
    /// Row-major strides. Buffers are always contiguous.
    pub(crate) strides: Vec<usize>,

    // --- Autograd Metadata ---
    /// Whether operations on this tensor are recorded in the graph.
    pub(crate) requires_grad: bool,
    /// Accumulated gradient, populated by backward for leaves and retained tensors.
    pub(crate) grad: Option<Tensor>,
    /// The graph node that produced this tensor. `None` for leaves.
    pub(crate) grad_fn: Option<Arc<GraphNode>>,
    /// Index of this tensor among the outputs of `grad_fn`.
    pub(crate) output_nr: usize,
    /// Keep `grad` on this non-leaf after backward.
    pub(crate) retains_grad: bool,
}

impl TensorData {
    /// Creates a leaf `TensorData` from a buffer and shape.
    ///
    /// # Errors
    /// Returns `GradFlowError::TensorCreationError` if the buffer length does not
    /// match the number of elements implied by `shape`.
    pub fn from_buffer(buffer: Buffer, shape: Vec<usize>) -> Result<Self, GradFlowError> {
        let numel: usize = shape.iter().product();
        let data_len = buffer.len();
        if data_len != numel {
            return Err(GradFlowError::TensorCreationError { data_len, shape });
        }
        let strides = calculate_strides(&shape);
        Ok(TensorData {
            dtype: buffer.dtype(),
            buffer: Arc::new(buffer),
            shape,
            strides,
            requires_grad: false,
            grad: None,
            grad_fn: None,
            output_nr: 0,
            retains_grad: false,
        })
    }

    /// Creates a new `TensorData` with the given f32 data and shape.
    pub fn new(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Self, GradFlowError> {
        Self::from_buffer(Buffer::F32(data_vec), shape)
    }

    /// Creates a new `TensorData` with the given f64 data and shape.
    pub fn new_f64(data_vec: Vec<f64>, shape: Vec<usize>) -> Result<Self, GradFlowError> {
        Self::from_buffer(Buffer::F64(data_vec), shape)
    }

    /// A leaf sharing `buffer` without any autograd history.
    pub(crate) fn shared(buffer: Arc<Buffer>, shape: Vec<usize>) -> Self {
        let strides = calculate_strides(&shape);
        TensorData {
            dtype: buffer.dtype(),
            buffer,
            shape,
            strides,
            requires_grad: false,
            grad: None,
            grad_fn: None,
            output_nr: 0,
            retains_grad: false,
        }
    }

    pub fn buffer(&self) -> &Arc<Buffer> {
        &self.buffer
    }

    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }
}
