//! Reverse-mode traversal.
//!
//! The engine counts, for every node reachable from the output, how many
//! consumer edges point at it, then processes nodes from a ready stack: a node's
//! backward rule only runs once every consumer has added its contribution to the
//! node's pending output gradients. A value reached through several paths
//! therefore sees the sum of all contributions exactly once.
//!
//! A pass is all-or-nothing. Contributions to leaves and retained tensors are
//! buffered and committed only after every backward rule succeeded, and saved
//! tensors are released only then.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::autograd::grad_mode::NoGradGuard;
use crate::autograd::graph::{collect_dependencies, GraphNode, GraphTraversal, NodeId};
use crate::error::GradFlowError;
use crate::ops::arithmetic::add_op;
use crate::tensor::create::full_of;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

/// Options for [`Tensor::backward_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackwardOptions {
    /// Keep the saved tensors of every visited node so the same graph can be
    /// traversed again. Without it a second pass through these nodes fails with
    /// `GradFlowError::GraphReleased`.
    pub retain_graph: bool,
}

impl BackwardOptions {
    pub fn retain_graph(retain_graph: bool) -> Self {
        BackwardOptions { retain_graph }
    }
}

/// Gradient contributions destined for leaves and retained tensors.
#[derive(Default)]
struct GradSink {
    pending: HashMap<*const RwLock<TensorData>, (Tensor, Tensor)>,
}

impl GradSink {
    fn add(&mut self, target: &Tensor, grad: Tensor) -> Result<(), GradFlowError> {
        match self.pending.remove(&target.id_ptr()) {
            Some((tensor, existing)) => {
                let summed = add_op(&existing, &grad)?;
                self.pending.insert(tensor.id_ptr(), (tensor, summed));
            }
            None => {
                self.pending.insert(target.id_ptr(), (target.clone(), grad));
            }
        }
        Ok(())
    }

    fn commit(self) -> Result<(), GradFlowError> {
        for (_, (tensor, grad)) in self.pending {
            tensor.accumulate_grad(grad)?;
        }
        Ok(())
    }
}

fn add_into_slot(slot: &mut Option<Tensor>, grad: Tensor) -> Result<(), GradFlowError> {
    *slot = Some(match slot.take() {
        Some(existing) => add_op(&existing, &grad)?,
        None => grad,
    });
    Ok(())
}

/// Checks the seed against the output, or builds the implicit `1` seed.
fn initial_gradient(root: &Tensor, seed: Option<&Tensor>) -> Result<Tensor, GradFlowError> {
    let (shape, dtype) = {
        let guard = root.try_read_data()?;
        (guard.shape.clone(), guard.dtype)
    };
    match seed {
        Some(seed) => {
            let (seed_shape, seed_dtype) = {
                let guard = seed.try_read_data()?;
                (guard.shape.clone(), guard.dtype)
            };
            if seed_shape != shape {
                return Err(GradFlowError::ShapeMismatch {
                    expected: shape,
                    actual: seed_shape,
                    operation: "backward".to_string(),
                });
            }
            if seed_dtype != dtype {
                return Err(GradFlowError::DataTypeMismatch {
                    expected: dtype,
                    actual: seed_dtype,
                    operation: "backward".to_string(),
                });
            }
            Ok(seed.detach())
        }
        None => {
            if shape.iter().product::<usize>() != 1 {
                return Err(GradFlowError::BackwardNonScalar);
            }
            full_of(dtype, &shape, 1.0)
        }
    }
}

/// Runs a backward pass from `root`. See [`Tensor::backward_with`].
pub(crate) fn run_backward(
    root: &Tensor,
    seed: Option<&Tensor>,
    options: BackwardOptions,
) -> Result<(), GradFlowError> {
    let (requires_grad, root_fn, root_output_nr, root_retains) = {
        let guard = root.try_read_data()?;
        (
            guard.requires_grad,
            guard.grad_fn.clone(),
            guard.output_nr,
            guard.retains_grad,
        )
    };
    let seed = initial_gradient(root, seed)?;
    if !requires_grad {
        return Err(GradFlowError::RequiresGradNotMet);
    }

    // Backward rules compose ordinary ops; none of that may be recorded.
    let _no_grad = NoGradGuard::new();

    let root_node = match root_fn {
        Some(node) => node,
        None => {
            log::debug!("backward() called on a leaf tensor; accumulating the seed directly.");
            return root.accumulate_grad(seed);
        }
    };

    let GraphTraversal {
        nodes,
        mut dependencies,
    } = collect_dependencies(&root_node);
    log::debug!(
        "backward from {} (node {}): {} reachable nodes, retain_graph = {}",
        root_node.name(),
        root_node.id(),
        nodes.len(),
        options.retain_graph
    );

    if let Some(released) = nodes.values().find(|node| node.is_released()) {
        return Err(GradFlowError::GraphReleased {
            operation: released.name().to_string(),
        });
    }

    let mut sink = GradSink::default();
    if root_retains {
        sink.add(root, seed.clone())?;
    }

    let mut pending: HashMap<NodeId, Vec<Option<Tensor>>> = HashMap::new();
    let mut root_slots = vec![None; root_node.num_outputs()];
    root_slots[root_output_nr] = Some(seed);
    pending.insert(root_node.id(), root_slots);

    let mut ready: Vec<Arc<GraphNode>> = vec![Arc::clone(&root_node)];
    let mut visited: Vec<Arc<GraphNode>> = Vec::with_capacity(nodes.len());

    while let Some(node) = ready.pop() {
        log::trace!("backward: visiting {} (node {})", node.name(), node.id());
        let saved = node.saved()?;
        let slots = pending
            .remove(&node.id())
            .unwrap_or_else(|| vec![None; node.num_outputs()]);

        let mut grad_outputs = Vec::with_capacity(slots.len());
        for (index, slot) in slots.into_iter().enumerate() {
            grad_outputs.push(match slot {
                Some(grad) => grad,
                None => crate::tensor::create::zeros_like(saved.output(index)?)?,
            });
        }

        let input_grads = node.operation().backward(&saved, &grad_outputs)?;
        if input_grads.len() != node.inputs().len() {
            return Err(GradFlowError::GradientCountMismatch {
                operation: node.name().to_string(),
                expected: node.inputs().len(),
                actual: input_grads.len(),
            });
        }

        for (edge, grad) in node.inputs().iter().zip(input_grads) {
            let input = edge.tensor();
            let (producer, output_nr, input_requires_grad, input_retains, input_shape) = {
                let guard = input.try_read_data()?;
                (
                    guard.grad_fn.clone(),
                    guard.output_nr,
                    guard.requires_grad,
                    guard.retains_grad,
                    guard.shape.clone(),
                )
            };

            if let Some(grad) = grad {
                let grad_shape = grad.shape();
                if grad_shape != input_shape {
                    return Err(GradFlowError::ShapeMismatch {
                        expected: input_shape,
                        actual: grad_shape,
                        operation: format!("{} backward", node.name()),
                    });
                }
                if input_requires_grad && (producer.is_none() || input_retains) {
                    sink.add(input, grad.clone())?;
                }
                if let Some(producer) = &producer {
                    let slots = pending
                        .entry(producer.id())
                        .or_insert_with(|| vec![None; producer.num_outputs()]);
                    add_into_slot(&mut slots[output_nr], grad)?;
                }
            }

            if let Some(producer) = producer {
                let remaining = dependencies.get_mut(&producer.id()).ok_or_else(|| {
                    GradFlowError::InternalError(format!(
                        "node {} missing from dependency table",
                        producer.id()
                    ))
                })?;
                *remaining -= 1;
                if *remaining == 0 {
                    ready.push(producer);
                }
            }
        }

        visited.push(node);
    }

    if visited.len() != nodes.len() {
        return Err(GradFlowError::InternalError(format!(
            "backward visited {} of {} reachable nodes",
            visited.len(),
            nodes.len()
        )));
    }

    sink.commit()?;
    if !options.retain_graph {
        for node in &visited {
            node.release()?;
        }
    }
    log::debug!("backward finished: {} nodes processed", visited.len());
    Ok(())
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
