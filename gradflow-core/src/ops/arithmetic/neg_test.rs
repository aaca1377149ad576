use super::*;
use crate::autograd::grad_check::check_grad;
use crate::utils::testing::check_tensor_near;

#[test]
fn test_neg_forward_backward() {
    let a = Tensor::new(vec![1.0, -2.0, 0.0], vec![3]).unwrap();
    a.requires_grad_(true).unwrap();
    let out = neg_op(&a).unwrap();
    check_tensor_near(&out, &[3], &[-1.0, 2.0, 0.0], 1e-6);

    let seed = Tensor::new(vec![1.0, 2.0, 3.0], vec![3]).unwrap();
    out.backward_with(Some(&seed), Default::default()).unwrap();
    check_tensor_near(&a.grad().unwrap(), &[3], &[-1.0, -2.0, -3.0], 1e-6);
}

#[test]
fn test_neg_grad_check() {
    let a = Tensor::new_f64(vec![1.5, -0.5], vec![2]).unwrap();
    a.requires_grad_(true).unwrap();
    let output_grad = Tensor::new_f64(vec![2.0, -3.0], vec![2]).unwrap();
    check_grad(|inputs| neg_op(&inputs[0]), &[a], &output_grad, 1e-6, 1e-7, 1e-5).unwrap();
}
