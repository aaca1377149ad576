use crate::types::DType;
use thiserror::Error;

/// Broad classification of a [`GradFlowError`].
///
/// Domain errors come from a primitive's forward rule, shape errors from
/// broadcasting or an unseeded non-scalar backward, and graph errors from
/// misuse of the autograd graph itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Domain,
    Shape,
    Graph,
    Internal,
}

/// Custom error type for the gradflow engine.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum GradFlowError {
    #[error("Domain error in {operation}: {message}")]
    DomainError { operation: String, message: String },

    #[error("Division by zero error")]
    DivisionByZero,

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Cannot broadcast shapes: {shape1:?} and {shape2:?}")]
    BroadcastError {
        shape1: Vec<usize>,
        shape2: Vec<usize>,
    },

    #[error("Incompatible shapes for operation: {shape1:?} and {shape2:?}")]
    IncompatibleShapes {
        shape1: Vec<usize>,
        shape2: Vec<usize>,
    },

    #[error("Dimension mismatch: expected rank {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Backward called on non-scalar tensor without explicit gradient.")]
    BackwardNonScalar,

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Invalid axis {axis} for tensor of rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    #[error("DType mismatch for operation '{operation}': expected {expected:?}, got {actual:?}")]
    DataTypeMismatch {
        expected: DType,
        actual: DType,
        operation: String,
    },

    #[error("Operation requires tensor to require grad, but it doesn't.")]
    RequiresGradNotMet,

    #[error("requires_grad can only be changed on leaf tensors. Use detach() first.")]
    RequiresGradOnNonLeaf,

    #[error("Saved tensors of '{operation}' were already released by a previous backward pass. Pass retain_graph = true to backward through the graph a second time.")]
    GraphReleased { operation: String },

    #[error("Backward of '{operation}' returned {actual} gradients, expected {expected}")]
    GradientCountMismatch {
        operation: String,
        expected: usize,
        actual: usize,
    },

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("RwLock poisoned while accessing tensor data")]
    LockPoisoned,
}

impl GradFlowError {
    /// Returns the taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GradFlowError::DomainError { .. } | GradFlowError::DivisionByZero => ErrorKind::Domain,
            GradFlowError::ShapeMismatch { .. }
            | GradFlowError::BroadcastError { .. }
            | GradFlowError::IncompatibleShapes { .. }
            | GradFlowError::DimensionMismatch { .. }
            | GradFlowError::BackwardNonScalar
            | GradFlowError::TensorCreationError { .. }
            | GradFlowError::InvalidAxis { .. }
            | GradFlowError::DataTypeMismatch { .. } => ErrorKind::Shape,
            GradFlowError::RequiresGradNotMet
            | GradFlowError::RequiresGradOnNonLeaf
            | GradFlowError::GraphReleased { .. }
            | GradFlowError::GradientCountMismatch { .. } => ErrorKind::Graph,
            GradFlowError::InternalError(_) | GradFlowError::LockPoisoned => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let domain = GradFlowError::DomainError {
            operation: "sqrt_op".to_string(),
            message: "negative input".to_string(),
        };
        assert_eq!(domain.kind(), ErrorKind::Domain);
        assert_eq!(GradFlowError::BackwardNonScalar.kind(), ErrorKind::Shape);
        assert_eq!(GradFlowError::RequiresGradNotMet.kind(), ErrorKind::Graph);
        assert_eq!(
            GradFlowError::GraphReleased { operation: "mul".to_string() }.kind(),
            ErrorKind::Graph
        );
    }

    #[test]
    fn test_error_display() {
        let err = GradFlowError::BroadcastError {
            shape1: vec![2, 2],
            shape2: vec![3],
        };
        assert_eq!(err.to_string(), "Cannot broadcast shapes: [2, 2] and [3]");
    }
}
