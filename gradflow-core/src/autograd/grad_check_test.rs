use super::*;
use crate::autograd::operation::{Operation, SavedTensors};
use crate::ops::{apply_single, unary_elementwise};

/// Squares its input but reports `g` as the gradient, i.e. a wrong rule.
#[derive(Debug)]
struct BrokenSquare;

impl Operation for BrokenSquare {
    fn name(&self) -> &'static str {
        "BrokenSquareBackward"
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError> {
        Ok(vec![unary_elementwise(inputs[0], |x| x * x, |x| x * x)?])
    }

    fn backward(
        &self,
        _saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError> {
        Ok(vec![Some(grad_outputs[0].clone())])
    }
}

#[test]
fn test_check_grad_accepts_correct_gradient() {
    let x = Tensor::new_f64(vec![0.5, -1.5, 2.0], vec![3]).unwrap();
    x.requires_grad_(true).unwrap();
    let output_grad = Tensor::new_f64(vec![1.0, 0.5, -2.0], vec![3]).unwrap();

    let result = check_grad(|inputs| inputs[0].mul(&inputs[0]), &[x.clone()], &output_grad, 1e-6, 1e-7, 1e-5);
    assert!(result.is_ok(), "{:?}", result);
    // The analytical gradient stays on the input afterwards.
    assert_eq!(x.grad().unwrap().to_f64_vec(), vec![1.0, -1.5, -8.0]);
}

#[test]
fn test_check_grad_detects_wrong_rule() {
    let x = Tensor::new_f64(vec![3.0], vec![1]).unwrap();
    x.requires_grad_(true).unwrap();
    let output_grad = Tensor::new_f64(vec![1.0], vec![1]).unwrap();

    let err = check_grad(
        |inputs| apply_single(BrokenSquare, &[&inputs[0]]),
        &[x],
        &output_grad,
        1e-6,
        1e-7,
        1e-5,
    )
    .unwrap_err();
    match err {
        GradCheckError::GradientMismatch {
            input_index,
            element_index,
            analytical_grad,
            numerical_grad,
            ..
        } => {
            assert_eq!((input_index, element_index), (0, 0));
            assert_eq!(analytical_grad, 1.0);
            assert!((numerical_grad - 6.0).abs() < 1e-4);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_check_grad_skips_inputs_without_grad() {
    let x = Tensor::new_f64(vec![1.0, 2.0], vec![2]).unwrap();
    x.requires_grad_(true).unwrap();
    let c = Tensor::new_f64(vec![4.0, 5.0], vec![2]).unwrap();
    let output_grad = Tensor::new_f64(vec![1.0, 1.0], vec![2]).unwrap();

    check_grad(|inputs| inputs[0].mul(&inputs[1]), &[x, c.clone()], &output_grad, 1e-6, 1e-7, 1e-5)
        .unwrap();
    assert!(c.grad().is_none());
}

#[test]
fn test_check_grad_rejects_non_leaf_input() {
    let x = Tensor::scalar_f64(1.0);
    x.requires_grad_(true).unwrap();
    let y = x.mul_scalar(2.0).unwrap();
    let output_grad = Tensor::scalar_f64(1.0);

    let err = check_grad(|inputs| Ok(inputs[0].clone()), &[y], &output_grad, 1e-6, 1e-7, 1e-5)
        .unwrap_err();
    assert_eq!(err, GradCheckError::InputNotLeaf { input_index: 0 });
}

#[test]
fn test_check_grad_output_grad_shape_mismatch() {
    let x = Tensor::new_f64(vec![1.0, 2.0], vec![2]).unwrap();
    x.requires_grad_(true).unwrap();
    let output_grad = Tensor::new_f64(vec![1.0, 1.0, 1.0], vec![3]).unwrap();

    let err = check_grad(|inputs| inputs[0].exp(), &[x], &output_grad, 1e-6, 1e-7, 1e-5).unwrap_err();
    assert!(matches!(
        err,
        GradCheckError::BackwardPassError(GradFlowError::ShapeMismatch { .. })
    ));
}
