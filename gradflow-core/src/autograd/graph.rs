use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};

use crate::autograd::operation::{Operation, SavedTensors};
use crate::error::GradFlowError;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

/// Unique identifier for graph nodes.
pub type NodeId = u64;

static NODE_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn new_node_id() -> NodeId {
    NODE_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Link from a node to one of the tensors it consumed.
#[derive(Debug, Clone)]
pub struct Edge {
    tensor: Tensor,
}

impl Edge {
    /// The input tensor.
    pub fn tensor(&self) -> &Tensor {
        &self.tensor
    }

    /// The node that produced the input, `None` for a leaf.
    pub fn grad_fn(&self) -> Option<Arc<GraphNode>> {
        self.tensor.grad_fn()
    }

    /// Which output of `grad_fn` the input is.
    pub fn output_nr(&self) -> usize {
        self.tensor.read_data().output_nr
    }

    pub fn requires_grad(&self) -> bool {
        self.tensor.requires_grad()
    }
}

/// Record of one operation application made while tracking was enabled.
///
/// A node owns its input tensors (and through them their own producers), so
/// the whole history of a tensor stays alive exactly as long as the tensor.
/// Outputs are only referenced weakly to avoid a tensor <-> node cycle.
pub struct GraphNode {
    id: NodeId,
    op: Box<dyn Operation>,
    inputs: Vec<Edge>,
    outputs: Vec<Weak<RwLock<TensorData>>>,
    saved: RwLock<Option<SavedTensors>>,
}

impl GraphNode {
    pub(crate) fn new(op: Box<dyn Operation>, inputs: &[&Tensor], outputs: &[Tensor]) -> Self {
        let saved = SavedTensors::new(
            inputs.iter().map(|t| t.detach()).collect(),
            outputs.iter().map(|t| t.detach()).collect(),
        );
        GraphNode {
            id: new_node_id(),
            op,
            inputs: inputs.iter().map(|&t| Edge { tensor: t.clone() }).collect(),
            outputs: outputs.iter().map(|t| Arc::downgrade(&t.data)).collect(),
            saved: RwLock::new(Some(saved)),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Name of the operation that created this node, e.g. `"MulBackward"`.
    pub fn name(&self) -> &'static str {
        self.op.name()
    }

    pub fn operation(&self) -> &dyn Operation {
        self.op.as_ref()
    }

    /// The ordered input edges.
    pub fn inputs(&self) -> &[Edge] {
        &self.inputs
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// The `index`-th output if it is still alive.
    pub fn output(&self, index: usize) -> Option<Tensor> {
        self.outputs
            .get(index)
            .and_then(Weak::upgrade)
            .map(|data| Tensor { data })
    }

    /// True once a backward pass without `retain_graph` went through this node.
    pub fn is_released(&self) -> bool {
        self.saved.read().map(|saved| saved.is_none()).unwrap_or(true)
    }

    pub(crate) fn saved(&self) -> Result<SavedTensors, GradFlowError> {
        let guard = self.saved.read().map_err(|_| GradFlowError::LockPoisoned)?;
        guard.clone().ok_or_else(|| GradFlowError::GraphReleased {
            operation: self.name().to_string(),
        })
    }

    pub(crate) fn release(&self) -> Result<(), GradFlowError> {
        let mut guard = self.saved.write().map_err(|_| GradFlowError::LockPoisoned)?;
        *guard = None;
        Ok(())
    }
}

impl fmt::Debug for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let next: Vec<Option<&'static str>> = self
            .inputs
            .iter()
            .map(|edge| edge.grad_fn().map(|node| node.name()))
            .collect();
        f.debug_struct("GraphNode")
            .field("id", &self.id)
            .field("op", &self.op)
            .field("next_functions", &next)
            .field("num_outputs", &self.outputs.len())
            .field("released", &self.is_released())
            .finish()
    }
}

impl Drop for GraphNode {
    /// Tears the history down iteratively. Dropping the last handle of a long
    /// chain would otherwise recurse once per node.
    fn drop(&mut self) {
        let mut orphans: Vec<Arc<GraphNode>> = Vec::new();
        take_sole_producers(&mut self.inputs, &mut orphans);
        while let Some(node) = orphans.pop() {
            if let Ok(mut node) = Arc::try_unwrap(node) {
                take_sole_producers(&mut node.inputs, &mut orphans);
            }
        }
    }
}

/// Moves out the producers of inputs this node is the last owner of.
fn take_sole_producers(inputs: &mut Vec<Edge>, orphans: &mut Vec<Arc<GraphNode>>) {
    for edge in inputs.drain(..) {
        if let Ok(lock) = Arc::try_unwrap(edge.tensor.data) {
            let mut data = lock.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(producer) = data.grad_fn.take() {
                orphans.push(producer);
            }
        }
    }
}

/// Nodes reachable from a root, with the number of consumer edges each has.
pub(crate) struct GraphTraversal {
    pub(crate) nodes: HashMap<NodeId, Arc<GraphNode>>,
    pub(crate) dependencies: HashMap<NodeId, usize>,
}

/// Walks the graph backwards from `root` and counts, for every reachable node,
/// how many edges from other reachable nodes point at it.
///
/// Iterative on purpose: deep chains (thousands of ops) must not overflow the
/// stack.
pub(crate) fn collect_dependencies(root: &Arc<GraphNode>) -> GraphTraversal {
    let mut nodes: HashMap<NodeId, Arc<GraphNode>> = HashMap::new();
    let mut dependencies: HashMap<NodeId, usize> = HashMap::new();
    let mut stack = vec![Arc::clone(root)];
    nodes.insert(root.id(), Arc::clone(root));
    dependencies.insert(root.id(), 0);

    while let Some(node) = stack.pop() {
        for edge in node.inputs() {
            if let Some(producer) = edge.grad_fn() {
                let producer_id = producer.id();
                *dependencies.entry(producer_id).or_insert(0) += 1;
                if !nodes.contains_key(&producer_id) {
                    nodes.insert(producer_id, Arc::clone(&producer));
                    stack.push(producer);
                }
            }
        }
    }

    GraphTraversal { nodes, dependencies }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
