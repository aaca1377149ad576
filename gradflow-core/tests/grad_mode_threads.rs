use std::sync::{Arc, Barrier};
use std::thread;

use gradflow_core::{is_grad_enabled, no_grad, set_grad_enabled, EnableGradGuard, NoGradGuard};

mod common;
use common::{init_logger, leaf};

#[test]
fn test_no_grad_is_per_thread() {
    init_logger();
    let barrier = Arc::new(Barrier::new(2));

    let quiet = {
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            let _guard = NoGradGuard::new();
            barrier.wait();
            let x = leaf(vec![1.0], vec![]);
            let y = x.mul_scalar(2.0).unwrap();
            barrier.wait();
            y.requires_grad()
        })
    };

    let tracking = {
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            let x = leaf(vec![1.0], vec![]);
            let y = x.mul_scalar(2.0).unwrap();
            barrier.wait();
            y.requires_grad()
        })
    };

    assert!(!quiet.join().unwrap());
    assert!(tracking.join().unwrap());
    assert!(is_grad_enabled());
}

#[test]
fn test_guards_nest_and_restore() {
    assert!(is_grad_enabled());
    {
        let _outer = NoGradGuard::new();
        assert!(!is_grad_enabled());
        {
            let _inner = EnableGradGuard::new();
            assert!(is_grad_enabled());
            let x = leaf(vec![1.0], vec![]);
            assert!(x.exp().unwrap().requires_grad());
        }
        assert!(!is_grad_enabled());
        let _explicit = set_grad_enabled(true);
        assert!(is_grad_enabled());
    }
    assert!(is_grad_enabled());
}

#[test]
fn test_no_grad_closure_restores_after_error() {
    let x = leaf(vec![-1.0], vec![]);
    let result = no_grad(|| x.ln());
    assert!(result.is_err());
    assert!(is_grad_enabled());
}

#[test]
fn test_tensors_move_across_threads() {
    init_logger();
    let x = leaf(vec![2.0], vec![]);
    let y = x.mul(&x).unwrap();
    let handle = thread::spawn(move || y.backward());
    handle.join().unwrap().unwrap();
    assert_eq!(x.grad().unwrap().item().unwrap(), 4.0);
}
