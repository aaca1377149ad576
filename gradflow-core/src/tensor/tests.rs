use super::*;

#[test]
fn test_tensor_new_and_accessors() {
    let t = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap();
    assert_eq!(t.shape(), vec![2, 3]);
    assert_eq!(t.strides(), vec![3, 1]);
    assert_eq!(t.ndim(), 2);
    assert_eq!(t.numel(), 6);
    assert_eq!(t.dtype(), DType::F32);
    assert_eq!(t.get_f32_data().unwrap(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert!(t.get_f64_data().is_err());
}

#[test]
fn test_tensor_new_f64() {
    let t = Tensor::new_f64(vec![1.5, -2.5], vec![2]).unwrap();
    assert_eq!(t.dtype(), DType::F64);
    assert_eq!(t.get_f64_data().unwrap(), vec![1.5, -2.5]);
    assert_eq!(t.to_f64_vec(), vec![1.5, -2.5]);
}

#[test]
fn test_tensor_creation_error() {
    let err = Tensor::new(vec![1.0, 2.0, 3.0], vec![2, 2]).unwrap_err();
    assert_eq!(
        err,
        GradFlowError::TensorCreationError {
            data_len: 3,
            shape: vec![2, 2]
        }
    );
}

#[test]
fn test_scalar_and_item() {
    let s = Tensor::scalar_f64(3.5);
    assert_eq!(s.shape(), Vec::<usize>::new());
    assert_eq!(s.numel(), 1);
    assert_eq!(s.item().unwrap(), 3.5);

    let one = Tensor::new(vec![2.0], vec![1, 1]).unwrap();
    assert_eq!(one.item().unwrap(), 2.0);

    let many = Tensor::new(vec![1.0, 2.0], vec![2]).unwrap();
    assert!(matches!(
        many.item(),
        Err(GradFlowError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_clone_is_same_value() {
    let a = Tensor::new(vec![1.0], vec![1]).unwrap();
    let b = a.clone();
    assert!(a.ptr_eq(&b));
    b.requires_grad_(true).unwrap();
    assert!(a.requires_grad());
}

#[test]
fn test_partial_eq_compares_contents() {
    let a = Tensor::new(vec![1.0, 2.0], vec![2]).unwrap();
    let b = Tensor::new(vec![1.0, 2.0], vec![2]).unwrap();
    let c = Tensor::new(vec![1.0, 2.0], vec![1, 2]).unwrap();
    let d = Tensor::new_f64(vec![1.0, 2.0], vec![2]).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_ne!(a, d);
}

#[test]
fn test_debug_format() {
    let a = Tensor::new(vec![1.0, 2.0], vec![2]).unwrap();
    let text = format!("{:?}", a);
    assert!(text.contains("shape=[2]"));
    assert!(text.contains("F32"));

    a.requires_grad_(true).unwrap();
    assert!(format!("{:?}", a).contains("requires_grad=true"));
    let b = a.exp().unwrap();
    assert!(format!("{:?}", b).contains("grad_fn=ExpBackward"));

    let big = Tensor::new(vec![0.0; 20], vec![20]).unwrap();
    assert!(format!("{:?}", big).contains("(20 elements)"));
}

#[test]
fn test_operators_return_results() {
    let a = Tensor::new_f64(vec![1.0, 2.0], vec![2]).unwrap();
    let b = Tensor::new_f64(vec![3.0, 4.0], vec![2]).unwrap();

    assert_eq!((&a + &b).unwrap().to_f64_vec(), vec![4.0, 6.0]);
    assert_eq!((&a - &b).unwrap().to_f64_vec(), vec![-2.0, -2.0]);
    assert_eq!((&a * &b).unwrap().to_f64_vec(), vec![3.0, 8.0]);
    assert_eq!((&b / &a).unwrap().to_f64_vec(), vec![3.0, 2.0]);
    assert_eq!((-&a).unwrap().to_f64_vec(), vec![-1.0, -2.0]);

    assert_eq!((&a + 1.0).unwrap().to_f64_vec(), vec![2.0, 3.0]);
    assert_eq!((&a - 1.0).unwrap().to_f64_vec(), vec![0.0, 1.0]);
    assert_eq!((&a * 3.0).unwrap().to_f64_vec(), vec![3.0, 6.0]);
    assert_eq!((&b / 2.0).unwrap().to_f64_vec(), vec![1.5, 2.0]);

    let c = Tensor::new_f64(vec![1.0, 2.0, 3.0], vec![3]).unwrap();
    assert!(matches!(
        &a + &c,
        Err(GradFlowError::BroadcastError { .. })
    ));
}

#[test]
fn test_operators_record_graph() {
    let x = Tensor::new_f64(vec![2.0], vec![]).unwrap();
    x.requires_grad_(true).unwrap();
    let y = (&(&x * &x).unwrap() + 1.0).unwrap();
    y.backward().unwrap();
    assert_eq!(x.grad().unwrap().item().unwrap(), 4.0);
}

#[test]
fn test_mixed_dtype_rejected() {
    let a = Tensor::new(vec![1.0], vec![1]).unwrap();
    let b = Tensor::new_f64(vec![1.0], vec![1]).unwrap();
    assert!(matches!(
        a.add(&b),
        Err(GradFlowError::DataTypeMismatch { .. })
    ));
}
