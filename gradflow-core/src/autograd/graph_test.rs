use super::*;
use crate::autograd::engine::BackwardOptions;

fn leaf(values: Vec<f64>) -> Tensor {
    let n = values.len();
    let t = Tensor::new_f64(values, vec![n]).unwrap();
    t.requires_grad_(true).unwrap();
    t
}

#[test]
fn test_node_records_inputs_in_order() {
    let a = leaf(vec![1.0, 2.0]);
    let b = leaf(vec![3.0, 4.0]);
    let c = a.sub(&b).unwrap();

    let node = c.grad_fn().unwrap();
    assert_eq!(node.name(), "SubBackward");
    assert_eq!(node.num_outputs(), 1);
    let inputs = node.inputs();
    assert_eq!(inputs.len(), 2);
    assert!(inputs[0].tensor().ptr_eq(&a));
    assert!(inputs[1].tensor().ptr_eq(&b));
    assert!(inputs[0].grad_fn().is_none());
    assert!(inputs[0].requires_grad());
}

#[test]
fn test_edges_point_at_producers() {
    let a = leaf(vec![1.0, 2.0]);
    let b = a.exp().unwrap();
    let c = b.mul(&a).unwrap();

    let node = c.grad_fn().unwrap();
    let producer = node.inputs()[0].grad_fn().unwrap();
    assert_eq!(producer.name(), "ExpBackward");
    assert_eq!(producer.id(), b.grad_fn().unwrap().id());
    assert_eq!(node.inputs()[0].output_nr(), 0);
    assert!(node.inputs()[1].grad_fn().is_none());
}

#[test]
fn test_node_ids_are_unique() {
    let a = leaf(vec![1.0]);
    let b = a.exp().unwrap();
    let c = a.exp().unwrap();
    assert_ne!(b.grad_fn().unwrap().id(), c.grad_fn().unwrap().id());
}

#[test]
fn test_outputs_are_weak() {
    let a = leaf(vec![1.0]);
    let node = {
        let b = a.exp().unwrap();
        let node = b.grad_fn().unwrap();
        assert!(node.output(0).unwrap().ptr_eq(&b));
        node
    };
    // The node does not keep its output alive.
    assert!(node.output(0).is_none());
    assert!(node.output(1).is_none());
}

#[test]
fn test_multi_output_node() {
    let a = leaf(vec![1.0, 2.0, 3.0]);
    let parts = a.split(&[1, 2], 0).unwrap();
    let node = parts[0].grad_fn().unwrap();
    assert_eq!(node.num_outputs(), 2);
    assert!(Arc::ptr_eq(&node, &parts[1].grad_fn().unwrap()));
    assert_eq!(parts[0].output_nr(), 0);
    assert_eq!(parts[1].output_nr(), 1);
}

#[test]
fn test_release_after_backward() {
    let a = leaf(vec![1.0, 2.0]);
    let loss = a.mul(&a).unwrap().sum_all().unwrap();
    let square = loss.grad_fn().unwrap().inputs()[0].grad_fn().unwrap();
    assert!(!square.is_released());

    loss.backward_with(None, BackwardOptions::retain_graph(true)).unwrap();
    assert!(!square.is_released());

    loss.backward().unwrap();
    assert!(square.is_released());
    assert!(loss.grad_fn().unwrap().is_released());
    assert!(matches!(
        square.saved(),
        Err(GradFlowError::GraphReleased { .. })
    ));
}

#[test]
fn test_collect_dependencies_counts_shared_producers() {
    // x -> (b = x*2) -> c = b*b (two edges from c to b)
    let x = leaf(vec![1.0]);
    let b = x.mul_scalar(2.0).unwrap();
    let c = b.mul(&b).unwrap();
    let d = c.add(&b).unwrap();

    let root = d.grad_fn().unwrap();
    let traversal = collect_dependencies(&root);
    assert_eq!(traversal.nodes.len(), 3);

    let b_id = b.grad_fn().unwrap().id();
    let c_id = c.grad_fn().unwrap().id();
    assert_eq!(traversal.dependencies[&root.id()], 0);
    assert_eq!(traversal.dependencies[&c_id], 1);
    assert_eq!(traversal.dependencies[&b_id], 3);
}

#[test]
fn test_dropping_long_chain_does_not_recurse() {
    let x = leaf(vec![1.0]);
    let mut y = x.clone();
    for _ in 0..50_000 {
        y = y.add_scalar(1.0).unwrap();
    }
    assert_eq!(y.to_f64_vec(), vec![50_001.0]);
    drop(y);
    assert!(x.is_leaf());
}

#[test]
fn test_debug_lists_next_functions() {
    let a = leaf(vec![1.0]);
    let b = a.exp().unwrap().ln().unwrap();
    let text = format!("{:?}", b.grad_fn().unwrap());
    assert!(text.contains("GraphNode"));
    assert!(text.contains("ExpBackward"));
    assert!(text.contains("released: false"));
}
