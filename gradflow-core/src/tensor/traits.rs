// src/tensor/traits.rs

use std::fmt::{self, Debug};
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

use crate::error::GradFlowError;
use crate::tensor::Tensor;

impl Clone for Tensor {
    /// Clones the Tensor. This is a shallow clone: both handles are the same
    /// value of the graph and share `grad` and `requires_grad`.
    fn clone(&self) -> Self {
        Tensor {
            data: Arc::clone(&self.data),
        }
    }
}

impl Debug for Tensor {
    /// Shows shape, dtype, autograd state and a preview of the data.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let td = match self.data.read() {
            Ok(guard) => guard,
            Err(_) => return write!(f, "Tensor(<poisoned>)"),
        };
        let values = td.buffer.to_f64_vec();
        write!(f, "Tensor(shape={:?}, dtype={:?}, data=", td.shape, td.dtype)?;
        if values.len() <= 8 {
            write!(f, "{:?}", values)?;
        } else {
            write!(f, "{:?} ... ({} elements)", &values[..8], values.len())?;
        }
        if let Some(node) = &td.grad_fn {
            write!(f, ", grad_fn={}", node.name())?;
        } else if td.requires_grad {
            write!(f, ", requires_grad=true")?;
        }
        write!(f, ")")
    }
}

impl PartialEq for Tensor {
    /// Two tensors are equal if they have the same shape, dtype and elements.
    /// Autograd state is not compared.
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.data, &other.data) {
            return true;
        }
        let self_guard = self.read_data();
        let other_guard = other.read_data();
        self_guard.shape == other_guard.shape && self_guard.buffer == other_guard.buffer
    }
}

// Operator overloads mirror the fallible methods: `(&a + &b)?`.

impl<'a> Add<&'a Tensor> for &'a Tensor {
    type Output = Result<Tensor, GradFlowError>;

    fn add(self, rhs: &'a Tensor) -> Self::Output {
        crate::ops::arithmetic::add_op(self, rhs)
    }
}

impl<'a> Sub<&'a Tensor> for &'a Tensor {
    type Output = Result<Tensor, GradFlowError>;

    fn sub(self, rhs: &'a Tensor) -> Self::Output {
        crate::ops::arithmetic::sub_op(self, rhs)
    }
}

impl<'a> Mul<&'a Tensor> for &'a Tensor {
    type Output = Result<Tensor, GradFlowError>;

    fn mul(self, rhs: &'a Tensor) -> Self::Output {
        crate::ops::arithmetic::mul_op(self, rhs)
    }
}

impl<'a> Div<&'a Tensor> for &'a Tensor {
    type Output = Result<Tensor, GradFlowError>;

    fn div(self, rhs: &'a Tensor) -> Self::Output {
        crate::ops::arithmetic::div_op(self, rhs)
    }
}

impl Add<f64> for &Tensor {
    type Output = Result<Tensor, GradFlowError>;

    fn add(self, rhs: f64) -> Self::Output {
        crate::ops::arithmetic::add_scalar_op(self, rhs)
    }
}

impl Sub<f64> for &Tensor {
    type Output = Result<Tensor, GradFlowError>;

    fn sub(self, rhs: f64) -> Self::Output {
        crate::ops::arithmetic::sub_scalar_op(self, rhs)
    }
}

impl Mul<f64> for &Tensor {
    type Output = Result<Tensor, GradFlowError>;

    fn mul(self, rhs: f64) -> Self::Output {
        crate::ops::arithmetic::mul_scalar_op(self, rhs)
    }
}

impl Div<f64> for &Tensor {
    type Output = Result<Tensor, GradFlowError>;

    fn div(self, rhs: f64) -> Self::Output {
        crate::ops::arithmetic::div_scalar_op(self, rhs)
    }
}

impl Neg for &Tensor {
    type Output = Result<Tensor, GradFlowError>;

    fn neg(self) -> Self::Output {
        crate::ops::arithmetic::neg_op(self)
    }
}
