//! # Autograd walkthrough
//!
//! 1.  Differentiates a small scalar expression and inspects its graph.
//! 2.  Validates a composite function with `check_grad`.
//! 3.  Fits `y = 2x - 1` by gradient descent, updating the parameters
//!     inside a no-grad scope.
//!
//! Run with `RUST_LOG=debug` to see the engine's log output.

use gradflow_core::{check_grad, no_grad, randn, DType, GradFlowError, Tensor};

fn print_graph(t: &Tensor) {
    let mut current = t.grad_fn();
    let mut depth = 0;
    while let Some(node) = current {
        println!("{:indent$}{} (node {})", "", node.name(), node.id(), indent = depth * 2);
        current = node.inputs().iter().find_map(|edge| edge.grad_fn());
        depth += 1;
    }
}

fn linear_fit() -> Result<(), GradFlowError> {
    let x = randn(&[32, 1], DType::F64, Some(42))?;
    let y = x.mul_scalar(2.0)?.sub_scalar(1.0)?;

    let mut w = Tensor::new_f64(vec![0.0], vec![1, 1])?;
    let mut b = Tensor::new_f64(vec![0.0], vec![1])?;
    let learning_rate = 0.1;

    for epoch in 0..100 {
        w.requires_grad_(true)?;
        b.requires_grad_(true)?;

        let prediction = x.matmul(&w)?.add(&b)?;
        let diff = prediction.sub(&y)?;
        let loss = diff.mul(&diff)?.mean_all()?;
        loss.backward()?;

        let (grad_w, grad_b) = match (w.grad(), b.grad()) {
            (Some(gw), Some(gb)) => (gw, gb),
            _ => return Err(GradFlowError::InternalError("missing parameter gradient".into())),
        };
        let (new_w, new_b) = no_grad(|| -> Result<(Tensor, Tensor), GradFlowError> {
            Ok((
                w.sub(&grad_w.mul_scalar(learning_rate)?)?,
                b.sub(&grad_b.mul_scalar(learning_rate)?)?,
            ))
        })?;
        w = new_w;
        b = new_b;

        if epoch % 20 == 0 {
            println!("epoch {:3}: loss = {:.6}", epoch, loss.item()?);
        }
    }
    println!("fitted w = {:.4}, b = {:.4}", w.item()?, b.item()?);
    Ok(())
}

fn main() -> Result<(), GradFlowError> {
    env_logger::init();

    // --- 1. y = 3x^2 + 4 ---
    let x = Tensor::scalar_f64(2.0);
    x.requires_grad_(true)?;
    let y = x.pow_scalar(2.0)?.mul_scalar(3.0)?.add_scalar(4.0)?;
    println!("y = {:?}", y);
    print_graph(&y);
    y.backward()?;
    println!("dy/dx at x = 2: {}", x.grad().map_or(f64::NAN, |g| g.to_f64_vec()[0]));

    // --- 2. Gradient check ---
    let a = Tensor::new_f64(vec![0.3, -0.7, 1.2], vec![3])?;
    let b = Tensor::new_f64(vec![1.1, 0.4, -0.2], vec![3])?;
    a.requires_grad_(true)?;
    b.requires_grad_(true)?;
    let seed = Tensor::new_f64(vec![1.0, 1.0, 1.0], vec![3])?;
    let result = check_grad(
        |inputs| inputs[0].sin()?.mul(&inputs[1].exp()?)?.atan2(&inputs[1]),
        &[a, b],
        &seed,
        1e-6,
        1e-7,
        1e-5,
    );
    println!("check_grad: {:?}", result);

    // --- 3. Linear regression ---
    linear_fit()
}
