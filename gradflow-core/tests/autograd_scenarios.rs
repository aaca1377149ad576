use approx::assert_relative_eq;
use gradflow_core::{check_grad, BackwardOptions, GradFlowError, Tensor};

mod common;
use common::{grad_values, init_logger, leaf};

#[test]
fn test_polynomial_gradient() {
    init_logger();
    // y = 3x^2 + 4, dy/dx at x = 2 is 12
    let x = leaf(vec![2.0], vec![]);
    let y = x.pow_scalar(2.0).unwrap().mul_scalar(3.0).unwrap().add_scalar(4.0).unwrap();
    assert_eq!(y.item().unwrap(), 16.0);
    y.backward().unwrap();
    assert_relative_eq!(grad_values(&x)[0], 12.0, epsilon = 1e-12);
}

#[test]
fn test_composite_function_gradients() {
    init_logger();
    // f(x, y) = sqrt(x^2 + y^2) * atan2(y, x) - exp(x) * ln(y)
    let x = leaf(vec![1.0], vec![]);
    let y = leaf(vec![2.0], vec![]);
    let f = |inputs: &[Tensor]| -> Result<Tensor, GradFlowError> {
        let (x, y) = (&inputs[0], &inputs[1]);
        let r = x.mul(x)?.add(&y.mul(y)?)?.sqrt()?;
        let theta = y.atan2(x)?;
        r.mul(&theta)?.sub(&x.exp()?.mul(&y.ln()?)?)
    };

    let out = f(&[x.clone(), y.clone()]).unwrap();
    out.backward().unwrap();

    let (xv, yv) = (1.0f64, 2.0f64);
    let r = (xv * xv + yv * yv).sqrt();
    let theta = yv.atan2(xv);
    let df_dx = xv / r * theta - r * yv / (r * r) - xv.exp() * yv.ln();
    let df_dy = yv / r * theta + r * xv / (r * r) - xv.exp() / yv;
    assert_relative_eq!(grad_values(&x)[0], df_dx, epsilon = 1e-10);
    assert_relative_eq!(grad_values(&y)[0], df_dy, epsilon = 1e-10);

    let seed = Tensor::scalar_f64(1.0);
    check_grad(f, &[x, y], &seed, 1e-6, 1e-7, 1e-5).unwrap();
}

#[test]
fn test_diamond_and_reuse() {
    init_logger();
    let a = leaf(vec![1.5], vec![]);
    let b = a.mul_scalar(2.0).unwrap();
    let c = a.mul_scalar(4.0).unwrap();
    let d = b.add(&c).unwrap();
    d.backward().unwrap();
    assert_eq!(grad_values(&a), vec![6.0]);
}

#[test]
fn test_gradient_accumulation_law() {
    init_logger();
    let x = leaf(vec![1.0, -2.0], vec![2]);
    for _ in 0..3 {
        x.mul(&x).unwrap().sum_all().unwrap().backward().unwrap();
    }
    assert_eq!(grad_values(&x), vec![6.0, -12.0]);
}

#[test]
fn test_detach_law() {
    init_logger();
    let x = leaf(vec![3.0], vec![]);
    let frozen = x.mul_scalar(2.0).unwrap().detach();
    let y = x.mul(&frozen).unwrap();
    y.backward().unwrap();
    // d(x * c)/dx with c = 6 treated as a constant.
    assert_eq!(grad_values(&x), vec![6.0]);
    assert!(frozen.grad().is_none());
}

#[test]
fn test_retained_gradient_law() {
    init_logger();
    let x = leaf(vec![1.0, 2.0], vec![2]);
    let h = x.exp().unwrap();
    h.retain_grad().unwrap();
    let loss = h.sum_all().unwrap().mul_scalar(2.0).unwrap();
    loss.backward().unwrap();
    assert_eq!(grad_values(&h), vec![2.0, 2.0]);
    let expected = [2.0 * 1.0f64.exp(), 2.0 * 2.0f64.exp()];
    for (g, e) in grad_values(&x).iter().zip(expected) {
        assert_relative_eq!(*g, e, epsilon = 1e-12);
    }
}

#[test]
fn test_released_graph_reports_error() {
    init_logger();
    let x = leaf(vec![0.5], vec![]);
    let y = x.sin().unwrap().mul(&x).unwrap();
    y.backward_with(None, BackwardOptions::retain_graph(true)).unwrap();
    y.backward().unwrap();
    let before = grad_values(&x);
    let err = y.backward().unwrap_err();
    assert!(matches!(err, GradFlowError::GraphReleased { .. }));
    assert_eq!(grad_values(&x), before);
}

#[test]
fn test_domain_errors_record_nothing() {
    init_logger();
    let x = leaf(vec![-1.0, 4.0], vec![2]);
    assert!(matches!(x.ln(), Err(GradFlowError::DomainError { .. })));
    assert!(matches!(x.sqrt(), Err(GradFlowError::DomainError { .. })));
    let zero = Tensor::new_f64(vec![0.0, 1.0], vec![2]).unwrap();
    assert_eq!(x.div(&zero).unwrap_err(), GradFlowError::DivisionByZero);
    assert!(x.grad().is_none());
}

#[test]
fn test_mixed_precision_chain_f32() {
    init_logger();
    let x = Tensor::new(vec![0.5, 1.0, 1.5], vec![3]).unwrap();
    x.requires_grad_(true).unwrap();
    let loss = x.tanh().unwrap().mul(&x.cos().unwrap()).unwrap().sum_all().unwrap();
    loss.backward().unwrap();
    let grad = x.grad().unwrap().get_f32_data().unwrap();
    for (g, v) in grad.iter().zip([0.5f32, 1.0, 1.5]) {
        let t = v.tanh();
        let expected = (1.0 - t * t) * v.cos() - t * v.sin();
        assert_relative_eq!(*g, expected, epsilon = 1e-5);
    }
}

#[test]
fn test_polar_rose_matches_finite_differences() {
    init_logger();
    // f(x, y) = sqrt(x^2 + y^2) * (1 + 0.5 * cos(3.4 * atan2(y, x))) at (1, 2)
    let f = |inputs: &[Tensor]| -> Result<Tensor, GradFlowError> {
        let (x, y) = (&inputs[0], &inputs[1]);
        let r = x.pow_scalar(2.0)?.add(&y.pow_scalar(2.0)?)?.sqrt()?;
        let wave = y.atan2(x)?.mul_scalar(3.4)?.cos()?.mul_scalar(0.5)?.add_scalar(1.0)?;
        r.mul(&wave)
    };
    let x = leaf(vec![1.0], vec![]);
    let y = leaf(vec![2.0], vec![]);
    let seed = Tensor::scalar_f64(1.0);
    check_grad(f, &[x.clone(), y.clone()], &seed, 1e-6, 1e-8, 1e-4).unwrap();

    // Closed form, for good measure.
    let (xv, yv) = (1.0f64, 2.0f64);
    let r = (xv * xv + yv * yv).sqrt();
    let theta = yv.atan2(xv);
    let wave = 1.0 + 0.5 * (3.4 * theta).cos();
    let dwave_dtheta = -0.5 * 3.4 * (3.4 * theta).sin();
    let df_dx = xv / r * wave + r * dwave_dtheta * (-yv / (r * r));
    let df_dy = yv / r * wave + r * dwave_dtheta * (xv / (r * r));
    assert_relative_eq!(grad_values(&x)[0], df_dx, epsilon = 1e-10);
    assert_relative_eq!(grad_values(&y)[0], df_dy, epsilon = 1e-10);
}

#[test]
fn test_diamond_scenario() {
    init_logger();
    // b = a + 2; c = 5a; d = b + c => dd/da = 1 + 5
    let a = leaf(vec![3.0], vec![]);
    let b = a.add_scalar(2.0).unwrap();
    let c = a.mul_scalar(5.0).unwrap();
    let d = b.add(&c).unwrap();
    d.backward().unwrap();
    assert_eq!(grad_values(&a), vec![6.0]);
}

#[test]
fn test_tracking_disabled_law() {
    init_logger();
    let x = leaf(vec![1.0, 2.0], vec![2]);
    let y = gradflow_core::no_grad(|| x.mul(&x).and_then(|t| t.sum_all())).unwrap();
    assert!(!y.requires_grad());
    assert!(y.grad_fn().is_none());
    assert_eq!(y.backward().unwrap_err(), GradFlowError::RequiresGradNotMet);
}
