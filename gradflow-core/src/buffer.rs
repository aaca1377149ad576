use crate::error::GradFlowError;
use crate::types::DType;

/// Typed, contiguous CPU storage backing a tensor.
///
/// Buffers are immutable once created and are shared through `Arc<Buffer>`
/// between a tensor, its detached copies and the snapshots saved for backward.
#[derive(Debug, Clone, PartialEq)]
pub enum Buffer {
    /// Buffer holding f32 data.
    F32(Vec<f32>),
    /// Buffer holding f64 data.
    F64(Vec<f64>),
}

impl Buffer {
    pub fn dtype(&self) -> DType {
        match self {
            Buffer::F32(_) => DType::F32,
            Buffer::F64(_) => DType::F64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Buffer::F32(v) => v.len(),
            Buffer::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attempts to get the underlying slice if this is an F32 buffer.
    pub fn try_get_f32(&self) -> Result<&[f32], GradFlowError> {
        match self {
            Buffer::F32(v) => Ok(v.as_slice()),
            Buffer::F64(_) => Err(GradFlowError::DataTypeMismatch {
                expected: DType::F32,
                actual: DType::F64,
                operation: "try_get_f32".to_string(),
            }),
        }
    }

    /// Attempts to get the underlying slice if this is an F64 buffer.
    pub fn try_get_f64(&self) -> Result<&[f64], GradFlowError> {
        match self {
            Buffer::F64(v) => Ok(v.as_slice()),
            Buffer::F32(_) => Err(GradFlowError::DataTypeMismatch {
                expected: DType::F64,
                actual: DType::F32,
                operation: "try_get_f64".to_string(),
            }),
        }
    }

    /// Copies the elements out as f64, whatever the storage type.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            Buffer::F32(v) => v.iter().map(|&x| x as f64).collect(),
            Buffer::F64(v) => v.clone(),
        }
    }

    /// Builds a buffer of `dtype` from f64 values (narrowing for F32).
    pub fn from_f64_vec(dtype: DType, values: Vec<f64>) -> Buffer {
        match dtype {
            DType::F32 => Buffer::F32(values.into_iter().map(|x| x as f32).collect()),
            DType::F64 => Buffer::F64(values),
        }
    }

    /// Returns true if any element, seen as f64, satisfies `pred`.
    pub fn any_f64<P: Fn(f64) -> bool>(&self, pred: P) -> bool {
        match self {
            Buffer::F32(v) => v.iter().any(|&x| pred(x as f64)),
            Buffer::F64(v) => v.iter().any(|&x| pred(x)),
        }
    }

    /// Applies an element-wise function, keeping the storage type.
    pub fn map<F32Op, F64Op>(&self, op_f32: F32Op, op_f64: F64Op) -> Buffer
    where
        F32Op: Fn(f32) -> f32,
        F64Op: Fn(f64) -> f64,
    {
        match self {
            Buffer::F32(v) => Buffer::F32(v.iter().map(|&x| op_f32(x)).collect()),
            Buffer::F64(v) => Buffer::F64(v.iter().map(|&x| op_f64(x)).collect()),
        }
    }
}
