// src/tensor/create.rs

use crate::buffer::Buffer;
use crate::error::GradFlowError;
use crate::tensor::Tensor;
use crate::types::DType;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Creates a new F32 tensor filled with zeros with the specified shape.
pub fn zeros(shape: &[usize]) -> Result<Tensor, GradFlowError> {
    full(shape, 0.0)
}

/// Creates a new F64 tensor filled with zeros with the specified shape.
pub fn zeros_f64(shape: &[usize]) -> Result<Tensor, GradFlowError> {
    full_f64(shape, 0.0)
}

/// Creates a new F32 tensor filled with ones with the specified shape.
pub fn ones(shape: &[usize]) -> Result<Tensor, GradFlowError> {
    full(shape, 1.0)
}

/// Creates a new F64 tensor filled with ones with the specified shape.
pub fn ones_f64(shape: &[usize]) -> Result<Tensor, GradFlowError> {
    full_f64(shape, 1.0)
}

/// Creates a new F32 tensor filled with `value`.
pub fn full(shape: &[usize], value: f32) -> Result<Tensor, GradFlowError> {
    let numel = shape.iter().product();
    Tensor::new(vec![value; numel], shape.to_vec())
}

/// Creates a new F64 tensor filled with `value`.
pub fn full_f64(shape: &[usize], value: f64) -> Result<Tensor, GradFlowError> {
    let numel = shape.iter().product();
    Tensor::new_f64(vec![value; numel], shape.to_vec())
}

/// Creates a tensor with the shape and dtype of `tensor`, filled with `value`.
pub fn full_like(tensor: &Tensor, value: f64) -> Result<Tensor, GradFlowError> {
    let (shape, dtype) = {
        let guard = tensor.read_data();
        (guard.shape.clone(), guard.dtype)
    };
    full_of(dtype, &shape, value)
}

/// Creates a tensor filled with zeros, with the shape and dtype of `tensor`.
pub fn zeros_like(tensor: &Tensor) -> Result<Tensor, GradFlowError> {
    full_like(tensor, 0.0)
}

/// Creates a tensor filled with ones, with the shape and dtype of `tensor`.
pub fn ones_like(tensor: &Tensor) -> Result<Tensor, GradFlowError> {
    full_like(tensor, 1.0)
}

pub(crate) fn full_of(dtype: DType, shape: &[usize], value: f64) -> Result<Tensor, GradFlowError> {
    match dtype {
        DType::F32 => full(shape, value as f32),
        DType::F64 => full_f64(shape, value),
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Creates a tensor of `dtype` with values drawn uniformly from `[0, 1)`.
/// A seed makes the draw reproducible.
pub fn rand(shape: &[usize], dtype: DType, seed: Option<u64>) -> Result<Tensor, GradFlowError> {
    let numel: usize = shape.iter().product();
    let mut rng = make_rng(seed);
    let buffer = match dtype {
        DType::F32 => Buffer::F32((0..numel).map(|_| rng.gen::<f32>()).collect()),
        DType::F64 => Buffer::F64((0..numel).map(|_| rng.gen::<f64>()).collect()),
    };
    Tensor::from_buffer(buffer, shape.to_vec())
}

/// Creates a tensor of `dtype` with values drawn from the standard normal distribution.
pub fn randn(shape: &[usize], dtype: DType, seed: Option<u64>) -> Result<Tensor, GradFlowError> {
    let numel: usize = shape.iter().product();
    let mut rng = make_rng(seed);
    let buffer = match dtype {
        DType::F32 => Buffer::F32((0..numel).map(|_| StandardNormal.sample(&mut rng)).collect()),
        DType::F64 => Buffer::F64((0..numel).map(|_| StandardNormal.sample(&mut rng)).collect()),
    };
    Tensor::from_buffer(buffer, shape.to_vec())
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
