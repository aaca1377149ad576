//! Finite-difference validation of analytical gradients.

use approx::relative_eq;
use thiserror::Error;

use crate::autograd::engine::BackwardOptions;
use crate::autograd::grad_mode::NoGradGuard;
use crate::buffer::Buffer;
use crate::error::GradFlowError;
use crate::tensor::Tensor;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input tensor at index {input_index}, element index {element_index}: Analytical grad {analytical_grad:?} != Numerical grad {numerical_grad:?}. Difference: {difference:?}")]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },

    #[error("Forward function execution failed during gradient check: {0}")]
    ForwardPassError(GradFlowError),

    #[error("Backward pass execution failed during gradient check: {0}")]
    BackwardPassError(GradFlowError),

    #[error("Tensor error during intermediate calculation: {0}")]
    TensorError(GradFlowError),

    #[error("Input tensor {input_index} requires grad but has no gradient after backward pass.")]
    MissingAnalyticalGrad { input_index: usize },

    #[error("Numerical gradient is NaN or infinite for input {input_index}, element {element_index}. Details: Loss+: {loss_plus:?}, Loss-: {loss_minus:?}")]
    NumericalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },

    #[error("Analytical gradient is NaN or infinite for input {input_index}, element {element_index}. Value: {value:?}")]
    AnalyticalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        value: f64,
    },

    #[error("Gradient check input tensor must be a leaf node (no grad_fn). Input index: {input_index}")]
    InputNotLeaf { input_index: usize },

    #[error("Function did not propagate requires_grad correctly.")]
    RequiresGradPropagationError,
}

impl From<GradFlowError> for GradCheckError {
    fn from(err: GradFlowError) -> Self {
        GradCheckError::TensorError(err)
    }
}

/// `sum(output * output_grad)`, the scalar whose derivative the check compares.
fn calculate_loss(output: &Tensor, output_grad: &Tensor) -> Result<f64, GradCheckError> {
    let output_shape = output.shape();
    let grad_shape = output_grad.shape();
    if output_shape != grad_shape {
        return Err(GradCheckError::TensorError(GradFlowError::ShapeMismatch {
            expected: output_shape,
            actual: grad_shape,
            operation: "check_grad".to_string(),
        }));
    }
    Ok(output
        .to_f64_vec()
        .iter()
        .zip(output_grad.to_f64_vec())
        .map(|(o, g)| o * g)
        .sum())
}

/// Replaces element `element_index` of `original` (data `values`) by `value`.
fn perturbed(
    original: &Tensor,
    values: &[f64],
    element_index: usize,
    value: f64,
) -> Result<Tensor, GradFlowError> {
    let mut data = values.to_vec();
    data[element_index] = value;
    Tensor::from_buffer(
        Buffer::from_f64_vec(original.dtype(), data),
        original.shape(),
    )
}

/// Checks analytical gradients against numerical gradients using central finite differences.
///
/// `func` is evaluated once with tracking to get the analytical gradients
/// (seeded with `output_grad`), then twice per input element with tracking
/// disabled, at `x + epsilon` and `x - epsilon`. Both dtypes are supported;
/// F32 inputs need a larger `epsilon` and looser tolerances.
///
/// # Arguments
/// * `func`: the function under test. Must build its output from `inputs`.
/// * `inputs`: leaf tensors. Only those with `requires_grad` are checked.
/// * `output_grad`: seed for the backward pass, shaped like the output.
/// * `abs_tol`, `rel_tol`: passed to `approx::relative_eq!` as `epsilon` and
///   `max_relative`.
///
/// Input gradients are reset before the check and hold the analytical
/// gradients afterwards.
pub fn check_grad<F>(
    func: F,
    inputs: &[Tensor],
    output_grad: &Tensor,
    epsilon: f64,
    abs_tol: f64,
    rel_tol: f64,
) -> Result<(), GradCheckError>
where
    F: Fn(&[Tensor]) -> Result<Tensor, GradFlowError>,
{
    for (i, input) in inputs.iter().enumerate() {
        if input.requires_grad() && !input.is_leaf() {
            return Err(GradCheckError::InputNotLeaf { input_index: i });
        }
        input.zero_grad();
    }

    // --- Analytical gradients ---
    let output = func(inputs).map_err(GradCheckError::ForwardPassError)?;
    let any_input_requires_grad = inputs.iter().any(|t| t.requires_grad());
    if any_input_requires_grad && !output.requires_grad() {
        return Err(GradCheckError::RequiresGradPropagationError);
    }
    if output.requires_grad() {
        output
            .backward_with(Some(output_grad), BackwardOptions::default())
            .map_err(GradCheckError::BackwardPassError)?;
    }

    // --- Numerical gradients ---
    let _no_grad = NoGradGuard::new();
    let detached: Vec<Tensor> = inputs.iter().map(Tensor::detach).collect();

    for (i, original_input) in inputs.iter().enumerate() {
        if !original_input.requires_grad() {
            continue;
        }
        let analytical = original_input
            .grad()
            .ok_or(GradCheckError::MissingAnalyticalGrad { input_index: i })?
            .to_f64_vec();
        let values = original_input.to_f64_vec();

        for (elem_idx, &x) in values.iter().enumerate() {
            let mut shifted = detached.clone();

            shifted[i] = perturbed(original_input, &values, elem_idx, x + epsilon)?;
            let output_plus = func(&shifted).map_err(GradCheckError::ForwardPassError)?;
            let loss_plus = calculate_loss(&output_plus, output_grad)?;

            shifted[i] = perturbed(original_input, &values, elem_idx, x - epsilon)?;
            let output_minus = func(&shifted).map_err(GradCheckError::ForwardPassError)?;
            let loss_minus = calculate_loss(&output_minus, output_grad)?;

            let numerical_grad = (loss_plus - loss_minus) / (2.0 * epsilon);
            let analytical_grad = analytical[elem_idx];

            if !numerical_grad.is_finite() {
                return Err(GradCheckError::NumericalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    loss_plus,
                    loss_minus,
                });
            }
            if !analytical_grad.is_finite() {
                return Err(GradCheckError::AnalyticalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    value: analytical_grad,
                });
            }
            if !relative_eq!(
                analytical_grad,
                numerical_grad,
                epsilon = abs_tol,
                max_relative = rel_tol
            ) {
                return Err(GradCheckError::GradientMismatch {
                    input_index: i,
                    element_index: elem_idx,
                    analytical_grad,
                    numerical_grad,
                    difference: (analytical_grad - numerical_grad).abs(),
                });
            }
        }
    }
    log::debug!("check_grad passed for {} inputs", inputs.len());
    Ok(())
}

#[cfg(test)]
#[path = "grad_check_test.rs"]
mod tests;
