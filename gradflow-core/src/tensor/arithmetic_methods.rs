// src/tensor/arithmetic_methods.rs

use crate::error::GradFlowError;
use crate::ops::arithmetic::{
    add_op, add_scalar_op, div_op, div_scalar_op, mul_op, mul_scalar_op, neg_op, pow_scalar_op,
    rsub_scalar_op, sub_op, sub_scalar_op,
};
use crate::ops::linalg::matmul_op;
use crate::ops::math_elem::{atan2_op, cos_op, exp_op, ln_op, sin_op, sqrt_op, tanh_op};
use crate::tensor::Tensor;

impl Tensor {
    /// Element-wise `self + other` with broadcasting.
    pub fn add(&self, other: &Tensor) -> Result<Tensor, GradFlowError> {
        add_op(self, other)
    }

    /// Element-wise `self - other` with broadcasting.
    pub fn sub(&self, other: &Tensor) -> Result<Tensor, GradFlowError> {
        sub_op(self, other)
    }

    /// Element-wise `self * other` with broadcasting.
    pub fn mul(&self, other: &Tensor) -> Result<Tensor, GradFlowError> {
        mul_op(self, other)
    }

    /// Element-wise `self / other` with broadcasting.
    pub fn div(&self, other: &Tensor) -> Result<Tensor, GradFlowError> {
        div_op(self, other)
    }

    pub fn neg(&self) -> Result<Tensor, GradFlowError> {
        neg_op(self)
    }

    /// Raises every element to the constant power `exponent`.
    pub fn pow_scalar(&self, exponent: f64) -> Result<Tensor, GradFlowError> {
        pow_scalar_op(self, exponent)
    }

    pub fn add_scalar(&self, scalar: f64) -> Result<Tensor, GradFlowError> {
        add_scalar_op(self, scalar)
    }

    pub fn sub_scalar(&self, scalar: f64) -> Result<Tensor, GradFlowError> {
        sub_scalar_op(self, scalar)
    }

    /// `scalar - self`.
    pub fn rsub_scalar(&self, scalar: f64) -> Result<Tensor, GradFlowError> {
        rsub_scalar_op(self, scalar)
    }

    pub fn mul_scalar(&self, scalar: f64) -> Result<Tensor, GradFlowError> {
        mul_scalar_op(self, scalar)
    }

    pub fn div_scalar(&self, scalar: f64) -> Result<Tensor, GradFlowError> {
        div_scalar_op(self, scalar)
    }

    pub fn sqrt(&self) -> Result<Tensor, GradFlowError> {
        sqrt_op(self)
    }

    /// Natural logarithm.
    pub fn ln(&self) -> Result<Tensor, GradFlowError> {
        ln_op(self)
    }

    pub fn exp(&self) -> Result<Tensor, GradFlowError> {
        exp_op(self)
    }

    pub fn sin(&self) -> Result<Tensor, GradFlowError> {
        sin_op(self)
    }

    pub fn cos(&self) -> Result<Tensor, GradFlowError> {
        cos_op(self)
    }

    pub fn tanh(&self) -> Result<Tensor, GradFlowError> {
        tanh_op(self)
    }

    /// Four-quadrant arctangent of `self / x`, `self` being the y coordinate.
    pub fn atan2(&self, x: &Tensor) -> Result<Tensor, GradFlowError> {
        atan2_op(self, x)
    }

    /// 2-D matrix product.
    pub fn matmul(&self, other: &Tensor) -> Result<Tensor, GradFlowError> {
        matmul_op(self, other)
    }
}
