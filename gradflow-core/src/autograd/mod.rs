//! # Automatic differentiation
//!
//! - [`operation`]: the [`Operation`] trait every differentiable primitive implements.
//! - [`graph`]: [`GraphNode`] and [`Edge`], the records linking outputs to inputs.
//! - [`engine`]: the reverse-mode traversal behind [`Tensor::backward`](crate::Tensor::backward).
//! - [`grad_mode`]: the thread-local switch controlling graph construction.
//! - [`grad_check`]: finite-difference gradient validation.

pub mod engine;
pub mod grad_check;
pub mod grad_mode;
pub mod graph;
pub mod operation;

pub use engine::BackwardOptions;
pub use grad_check::{check_grad, GradCheckError};
pub use grad_mode::{
    enable_grad, is_grad_enabled, no_grad, set_grad_enabled, EnableGradGuard, GradModeGuard,
    NoGradGuard,
};
pub use graph::{Edge, GraphNode, NodeId};
pub use operation::{Operation, SavedTensors};
