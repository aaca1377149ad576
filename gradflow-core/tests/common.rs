use gradflow_core::Tensor;

// Added allow(dead_code) because usage across different test crates isn't detected easily.
#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// F64 leaf tensor with `requires_grad` set.
#[allow(dead_code)]
pub fn leaf(data: Vec<f64>, shape: Vec<usize>) -> Tensor {
    let t = Tensor::new_f64(data, shape).expect("Test tensor creation failed");
    t.requires_grad_(true).expect("Fresh tensors are leaves");
    t
}

/// The gradient of `t` as f64 values.
#[allow(dead_code)]
pub fn grad_values(t: &Tensor) -> Vec<f64> {
    t.grad().expect("Tensor has no gradient").to_f64_vec()
}
