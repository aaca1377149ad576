//! # gradflow-core
//!
//! A dynamic computation graph with reverse-mode automatic differentiation.
//!
//! Every [`Tensor`] is a value of the graph. Applying an operation to tensors
//! that require gradients records a [`GraphNode`] linking the result to its
//! inputs; [`Tensor::backward`] then walks those records in reverse and adds
//! gradients into the leaves.
//!
//! ```
//! use gradflow_core::Tensor;
//!
//! let x = Tensor::scalar_f64(2.0);
//! x.requires_grad_(true)?;
//! let y = x.mul(&x)?.mul_scalar(3.0)?.add_scalar(4.0)?;
//! y.backward()?;
//! assert_eq!(x.grad().unwrap().item()?, 12.0);
//! # Ok::<(), gradflow_core::GradFlowError>(())
//! ```

pub mod autograd;
pub mod buffer;
pub mod error;
pub mod ops;
pub mod tensor;
pub mod tensor_data;
pub mod types;
pub mod utils;

pub use tensor::Tensor;
pub use tensor::{
    full, full_f64, full_like, ones, ones_f64, ones_like, rand, randn, zeros, zeros_f64, zeros_like,
};

pub use autograd::{
    check_grad, enable_grad, is_grad_enabled, no_grad, set_grad_enabled, BackwardOptions, Edge,
    EnableGradGuard, GradCheckError, GradModeGuard, GraphNode, NoGradGuard, NodeId, Operation,
    SavedTensors,
};
pub use buffer::Buffer;
pub use error::{ErrorKind, GradFlowError};
pub use ops::apply_op;
pub use types::DType;

// Re-export traits required by public functions/structs
pub use num_traits;
