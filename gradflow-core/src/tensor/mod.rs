// src/tensor/mod.rs

use crate::buffer::Buffer;
use crate::error::GradFlowError;
use crate::tensor_data::TensorData;
use crate::types::DType;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

mod arithmetic_methods;
mod autograd_methods;
pub mod broadcast_utils;
pub mod create;
mod reduction_methods;
mod traits;
pub mod utils;
mod view_methods;

pub use create::{
    full, full_f64, full_like, ones, ones_f64, ones_like, rand, randn, zeros, zeros_f64, zeros_like,
};

/// Represents a multi-dimensional array (tensor) and a Value of the autograd graph.
///
/// `Tensor` uses `Arc<RwLock<TensorData>>` internally:
/// 1.  **Shared Ownership:** clones are cheap and point at the same node of the graph.
/// 2.  **Interior Mutability:** autograd metadata (`grad`, `requires_grad`) can be
///     updated through shared references.
pub struct Tensor {
    pub(crate) data: Arc<RwLock<TensorData>>,
}

impl Tensor {
    /// Creates a new Tensor with the given f32 data and shape.
    pub fn new(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Self, GradFlowError> {
        Ok(Self::from_tensor_data(TensorData::new(data_vec, shape)?))
    }

    /// Creates a new Tensor with the given f64 data and shape.
    pub fn new_f64(data_vec: Vec<f64>, shape: Vec<usize>) -> Result<Self, GradFlowError> {
        Ok(Self::from_tensor_data(TensorData::new_f64(data_vec, shape)?))
    }

    /// Creates a new F32 Tensor from a Vec<f32> and shape. Alias of [`Tensor::new`].
    pub fn from_vec_f32(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Self, GradFlowError> {
        Self::new(data_vec, shape)
    }

    /// Creates a new F64 Tensor from a Vec<f64> and shape. Alias of [`Tensor::new_f64`].
    pub fn from_vec_f64(data_vec: Vec<f64>, shape: Vec<usize>) -> Result<Self, GradFlowError> {
        Self::new_f64(data_vec, shape)
    }

    /// Creates a tensor from an already typed buffer.
    pub fn from_buffer(buffer: Buffer, shape: Vec<usize>) -> Result<Self, GradFlowError> {
        Ok(Self::from_tensor_data(TensorData::from_buffer(buffer, shape)?))
    }

    /// Creates a 0-dimensional F32 tensor.
    pub fn scalar(value: f32) -> Self {
        Self::from_tensor_data(TensorData::shared(Arc::new(Buffer::F32(vec![value])), vec![]))
    }

    /// Creates a 0-dimensional F64 tensor.
    pub fn scalar_f64(value: f64) -> Self {
        Self::from_tensor_data(TensorData::shared(Arc::new(Buffer::F64(vec![value])), vec![]))
    }

    /// Creates a 0-dimensional tensor of the given dtype.
    pub(crate) fn scalar_of(dtype: DType, value: f64) -> Self {
        match dtype {
            DType::F32 => Self::scalar(value as f32),
            DType::F64 => Self::scalar_f64(value),
        }
    }

    pub(crate) fn from_tensor_data(tensor_data: TensorData) -> Self {
        Tensor {
            data: Arc::new(RwLock::new(tensor_data)),
        }
    }

    /// Returns the data type (`DType`) of the tensor elements.
    pub fn dtype(&self) -> DType {
        self.read_data().dtype
    }

    /// Returns a clone of the tensor's shape.
    pub fn shape(&self) -> Vec<usize> {
        self.read_data().shape.clone()
    }

    /// Returns a clone of the tensor's strides.
    pub fn strides(&self) -> Vec<usize> {
        self.read_data().strides.clone()
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.read_data().shape.len()
    }

    /// Returns the number of elements in the tensor.
    pub fn numel(&self) -> usize {
        self.read_data().numel()
    }

    /// Returns the shared data buffer.
    pub fn buffer(&self) -> Arc<Buffer> {
        Arc::clone(&self.read_data().buffer)
    }

    /// Acquires a read lock on the tensor's data.
    /// Panics if the RwLock is poisoned.
    pub fn read_data(&self) -> RwLockReadGuard<'_, TensorData> {
        self.data.read().expect("RwLock poisoned")
    }

    /// Acquires a write lock on the tensor's data.
    /// Panics if the RwLock is poisoned.
    pub fn write_data(&self) -> RwLockWriteGuard<'_, TensorData> {
        self.data.write().expect("RwLock poisoned")
    }

    /// Non-panicking variant of [`Tensor::read_data`].
    pub(crate) fn try_read_data(&self) -> Result<RwLockReadGuard<'_, TensorData>, GradFlowError> {
        self.data.read().map_err(|_| GradFlowError::LockPoisoned)
    }

    /// Non-panicking variant of [`Tensor::write_data`].
    pub(crate) fn try_write_data(
        &self,
    ) -> Result<RwLockWriteGuard<'_, TensorData>, GradFlowError> {
        self.data.write().map_err(|_| GradFlowError::LockPoisoned)
    }

    /// Pointer identity of the underlying node.
    pub fn id_ptr(&self) -> *const RwLock<TensorData> {
        Arc::as_ptr(&self.data)
    }

    /// True if both handles refer to the same tensor.
    pub fn ptr_eq(&self, other: &Tensor) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Attempts to get the tensor data as a `Vec<f32>`.
    /// Returns an error if the tensor is not F32.
    pub fn get_f32_data(&self) -> Result<Vec<f32>, GradFlowError> {
        Ok(self.read_data().buffer.try_get_f32()?.to_vec())
    }

    /// Attempts to get the tensor data as a `Vec<f64>`.
    /// Returns an error if the tensor is not F64.
    pub fn get_f64_data(&self) -> Result<Vec<f64>, GradFlowError> {
        Ok(self.read_data().buffer.try_get_f64()?.to_vec())
    }

    /// Copies the elements out as f64 regardless of dtype.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.read_data().buffer.to_f64_vec()
    }

    /// Returns the single element of a one-element tensor as f64.
    pub fn item(&self) -> Result<f64, GradFlowError> {
        let guard = self.read_data();
        if guard.numel() != 1 {
            return Err(GradFlowError::ShapeMismatch {
                expected: vec![],
                actual: guard.shape.clone(),
                operation: "item".to_string(),
            });
        }
        Ok(guard.buffer.to_f64_vec()[0])
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
