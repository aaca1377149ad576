//! Broadcasting element-wise arithmetic.

pub mod add;
pub mod div;
pub mod mul;
pub mod neg;
pub mod pow;
pub mod sub;

pub use add::add_op;
pub use div::div_op;
pub use mul::mul_op;
pub use neg::neg_op;
pub use pow::pow_scalar_op;
pub use sub::sub_op;

use crate::error::GradFlowError;
use crate::tensor::Tensor;

/// `a + scalar`, the scalar taking the dtype of `a`.
pub fn add_scalar_op(a: &Tensor, scalar: f64) -> Result<Tensor, GradFlowError> {
    add_op(a, &Tensor::scalar_of(a.dtype(), scalar))
}

/// `a - scalar`.
pub fn sub_scalar_op(a: &Tensor, scalar: f64) -> Result<Tensor, GradFlowError> {
    sub_op(a, &Tensor::scalar_of(a.dtype(), scalar))
}

/// `scalar - a`.
pub fn rsub_scalar_op(a: &Tensor, scalar: f64) -> Result<Tensor, GradFlowError> {
    sub_op(&Tensor::scalar_of(a.dtype(), scalar), a)
}

/// `a * scalar`.
pub fn mul_scalar_op(a: &Tensor, scalar: f64) -> Result<Tensor, GradFlowError> {
    mul_op(a, &Tensor::scalar_of(a.dtype(), scalar))
}

/// `a / scalar`. Fails with `DivisionByZero` for a zero scalar.
pub fn div_scalar_op(a: &Tensor, scalar: f64) -> Result<Tensor, GradFlowError> {
    div_op(a, &Tensor::scalar_of(a.dtype(), scalar))
}
