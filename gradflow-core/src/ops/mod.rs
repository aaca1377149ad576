//! # Tensor Operations Module (`ops`)
//!
//! The registry of differentiable primitives. Operations are grouped by kind:
//!
//! - [`arithmetic`]: broadcasting element-wise arithmetic (add, sub, mul, div, neg, pow).
//! - [`math_elem`]: element-wise math functions (sqrt, ln, exp, sin, cos, tanh, atan2).
//! - [`reduction`]: sum and mean over axes.
//! - [`view`]: shape manipulation (reshape, expand, split, cat).
//! - [`linalg`]: 2-D matmul and transpose.
//!
//! Each primitive is a struct implementing [`Operation`] plus an `xxx_op`
//! function that hands it to [`apply_op`]. Tensor methods (`a.mul(&b)`) are
//! thin wrappers over the `_op` functions.

use std::sync::Arc;

use crate::autograd::grad_mode::{is_grad_enabled, NoGradGuard};
use crate::autograd::graph::GraphNode;
use crate::autograd::operation::Operation;
use crate::buffer::Buffer;
use crate::error::GradFlowError;
use crate::tensor::utils::{
    broadcast_shapes, calculate_strides, coord_to_index_broadcasted, index_to_coord,
};
use crate::tensor::Tensor;
use crate::types::DType;

pub mod arithmetic;
pub mod linalg;
pub mod math_elem;
pub mod reduction;
pub mod view;

/// Applies a registered operation to `inputs`.
///
/// The forward rule runs first, with tracking disabled; if it fails nothing is
/// recorded. When grad mode
/// is enabled and at least one input requires grad, every output is marked
/// `requires_grad` and linked to a single new [`GraphNode`]. Otherwise the
/// outputs are plain leaves.
pub fn apply_op<O>(op: O, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError>
where
    O: Operation + 'static,
{
    let outputs = {
        // Forward rules may reuse other ops; only this application is recorded.
        let _no_grad = NoGradGuard::new();
        op.forward(inputs)?
    };
    // An output aliasing an input handle, an earlier output, or carrying
    // history of its own would get its producer link rewritten.
    let mut distinct: Vec<Tensor> = Vec::with_capacity(outputs.len());
    for out in outputs {
        let aliased = out.grad_fn().is_some()
            || inputs.iter().any(|input| input.ptr_eq(&out))
            || distinct.iter().any(|earlier| earlier.ptr_eq(&out));
        distinct.push(if aliased { out.detach() } else { out });
    }
    let outputs = distinct;

    let track = is_grad_enabled() && inputs.iter().any(|t| t.requires_grad());
    if !track {
        return Ok(outputs);
    }

    let node = Arc::new(GraphNode::new(Box::new(op), inputs, &outputs));
    for (index, output) in outputs.iter().enumerate() {
        let mut guard = output.try_write_data()?;
        guard.requires_grad = true;
        guard.grad_fn = Some(Arc::clone(&node));
        guard.output_nr = index;
    }
    log::trace!(
        "recorded {} (node {}) with {} inputs, {} outputs",
        node.name(),
        node.id(),
        inputs.len(),
        outputs.len()
    );
    Ok(outputs)
}

/// [`apply_op`] for operations producing exactly one output.
pub(crate) fn apply_single<O>(op: O, inputs: &[&Tensor]) -> Result<Tensor, GradFlowError>
where
    O: Operation + 'static,
{
    let name = op.name();
    let mut outputs = apply_op(op, inputs)?;
    match (outputs.pop(), outputs.is_empty()) {
        (Some(output), true) => Ok(output),
        _ => Err(GradFlowError::InternalError(format!(
            "{} was expected to produce a single output",
            name
        ))),
    }
}

/// Checks that every input tensor has the same dtype and returns it.
pub(crate) fn check_same_dtype(inputs: &[&Tensor], operation: &str) -> Result<DType, GradFlowError> {
    let first = inputs
        .first()
        .ok_or_else(|| GradFlowError::InternalError(format!("{} called without inputs", operation)))?
        .dtype();
    for input in &inputs[1..] {
        let dtype = input.dtype();
        if dtype != first {
            return Err(GradFlowError::DataTypeMismatch {
                expected: first,
                actual: dtype,
                operation: operation.to_string(),
            });
        }
    }
    Ok(first)
}

/// Returns the single input of a unary operation.
pub(crate) fn unary_input<'a>(
    inputs: &[&'a Tensor],
    operation: &str,
) -> Result<&'a Tensor, GradFlowError> {
    match inputs {
        [input] => Ok(*input),
        _ => Err(GradFlowError::InternalError(format!(
            "{} expects 1 input, got {}",
            operation,
            inputs.len()
        ))),
    }
}

/// Returns both inputs of a binary operation.
pub(crate) fn binary_inputs<'a>(
    inputs: &[&'a Tensor],
    operation: &str,
) -> Result<(&'a Tensor, &'a Tensor), GradFlowError> {
    match inputs {
        [a, b] => Ok((*a, *b)),
        _ => Err(GradFlowError::InternalError(format!(
            "{} expects 2 inputs, got {}",
            operation,
            inputs.len()
        ))),
    }
}

/// Returns the single upstream gradient of a one-output operation.
pub(crate) fn single_grad<'a>(
    grad_outputs: &'a [Tensor],
    operation: &str,
) -> Result<&'a Tensor, GradFlowError> {
    match grad_outputs {
        [grad] => Ok(grad),
        _ => Err(GradFlowError::GradientCountMismatch {
            operation: operation.to_string(),
            expected: 1,
            actual: grad_outputs.len(),
        }),
    }
}

/// Fails with a `DomainError` if any element of `input` satisfies `invalid`.
pub(crate) fn check_domain<P>(
    input: &Tensor,
    operation: &str,
    message: &str,
    invalid: P,
) -> Result<(), GradFlowError>
where
    P: Fn(f64) -> bool,
{
    if input.try_read_data()?.buffer.any_f64(invalid) {
        return Err(GradFlowError::DomainError {
            operation: operation.to_string(),
            message: message.to_string(),
        });
    }
    Ok(())
}

/// Applies an element-wise function to a tensor, keeping shape and dtype.
pub(crate) fn unary_elementwise<F32Op, F64Op>(
    input: &Tensor,
    op_f32: F32Op,
    op_f64: F64Op,
) -> Result<Tensor, GradFlowError>
where
    F32Op: Fn(f32) -> f32,
    F64Op: Fn(f64) -> f64,
{
    let (buffer, shape) = {
        let guard = input.try_read_data()?;
        (Arc::clone(&guard.buffer), guard.shape.clone())
    };
    Tensor::from_buffer(buffer.map(op_f32, op_f64), shape)
}

/// Applies a binary element-wise function with NumPy broadcasting.
pub(crate) fn binary_elementwise<F32Op, F64Op>(
    a: &Tensor,
    b: &Tensor,
    operation: &str,
    op_f32: F32Op,
    op_f64: F64Op,
) -> Result<Tensor, GradFlowError>
where
    F32Op: Fn(f32, f32) -> f32,
    F64Op: Fn(f64, f64) -> f64,
{
    check_same_dtype(&[a, b], operation)?;
    let (a_buffer, a_shape) = {
        let guard = a.try_read_data()?;
        (Arc::clone(&guard.buffer), guard.shape.clone())
    };
    let (b_buffer, b_shape) = {
        let guard = b.try_read_data()?;
        (Arc::clone(&guard.buffer), guard.shape.clone())
    };
    let output_shape = broadcast_shapes(&a_shape, &b_shape)?;

    let buffer = match (a_buffer.as_ref(), b_buffer.as_ref()) {
        (Buffer::F32(a_data), Buffer::F32(b_data)) => Buffer::F32(broadcast_kernel(
            a_data,
            &a_shape,
            b_data,
            &b_shape,
            &output_shape,
            op_f32,
        )),
        (Buffer::F64(a_data), Buffer::F64(b_data)) => Buffer::F64(broadcast_kernel(
            a_data,
            &a_shape,
            b_data,
            &b_shape,
            &output_shape,
            op_f64,
        )),
        (a_buf, b_buf) => {
            return Err(GradFlowError::DataTypeMismatch {
                expected: a_buf.dtype(),
                actual: b_buf.dtype(),
                operation: operation.to_string(),
            })
        }
    };
    Tensor::from_buffer(buffer, output_shape)
}

fn broadcast_kernel<T, F>(
    a: &[T],
    a_shape: &[usize],
    b: &[T],
    b_shape: &[usize],
    output_shape: &[usize],
    op: F,
) -> Vec<T>
where
    T: Copy,
    F: Fn(T, T) -> T,
{
    if a_shape == b_shape {
        return a.iter().zip(b).map(|(&x, &y)| op(x, y)).collect();
    }
    let numel: usize = output_shape.iter().product();
    let output_strides = calculate_strides(output_shape);
    let a_strides = calculate_strides(a_shape);
    let b_strides = calculate_strides(b_shape);
    (0..numel)
        .map(|i| {
            let coord = index_to_coord(i, &output_strides, output_shape);
            let a_index = coord_to_index_broadcasted(&coord, a_shape, &a_strides);
            let b_index = coord_to_index_broadcasted(&coord, b_shape, &b_strides);
            op(a[a_index], b[b_index])
        })
        .collect()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
