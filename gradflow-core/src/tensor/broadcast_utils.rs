use crate::error::GradFlowError;
use crate::ops::reduction::sum_op;
use crate::ops::view::{expand_op, reshape_op};
use crate::tensor::Tensor;

impl Tensor {
    /// Reduces the tensor (gradient) to match a target shape by summing along broadcasted dimensions.
    ///
    /// The backward counterpart of broadcasting: leading axes the target does not
    /// have are summed away, and so are axes where the target has size 1 but
    /// `self` does not.
    pub fn reduce_to_shape(&self, target_shape: &[usize]) -> Result<Tensor, GradFlowError> {
        let current_shape = self.shape();
        if current_shape == target_shape {
            return Ok(self.clone());
        }

        let current_rank = current_shape.len();
        let target_rank = target_shape.len();
        if current_rank < target_rank {
            return Err(GradFlowError::ShapeMismatch {
                expected: target_shape.to_vec(),
                actual: current_shape,
                operation: "reduce_to_shape".to_string(),
            });
        }

        let rank_diff = current_rank - target_rank;
        let mut axes_to_reduce: Vec<usize> = (0..rank_diff).collect();
        for (i, &target_dim) in target_shape.iter().enumerate() {
            let current_dim = current_shape[rank_diff + i];
            if current_dim == target_dim {
                continue;
            }
            if target_dim != 1 {
                return Err(GradFlowError::ShapeMismatch {
                    expected: target_shape.to_vec(),
                    actual: current_shape,
                    operation: "reduce_to_shape".to_string(),
                });
            }
            axes_to_reduce.push(rank_diff + i);
        }

        let reduced = if axes_to_reduce.is_empty() {
            self.clone()
        } else {
            sum_op(self, Some(&axes_to_reduce), false)?
        };
        if reduced.shape() == target_shape {
            Ok(reduced)
        } else {
            // Size-1 target axes were dropped by the sum.
            reshape_op(&reduced, target_shape.to_vec())
        }
    }

    /// Broadcasts the tensor (gradient) up to `target_shape`.
    ///
    /// Used where a reduced gradient has to be spread back over the input it
    /// came from.
    pub fn expand_to_shape(&self, target_shape: &[usize]) -> Result<Tensor, GradFlowError> {
        if self.shape() == target_shape {
            return Ok(self.clone());
        }
        expand_op(self, target_shape.to_vec())
    }
}
