use crate::autograd::operation::{Operation, SavedTensors};
use crate::buffer::Buffer;
use crate::error::GradFlowError;
use crate::ops::view::split::split_buffer;
use crate::ops::view::split_extents;
use crate::ops::{apply_single, check_same_dtype, single_grad};
use crate::tensor::Tensor;

fn cat_kernel<T: Copy>(parts: &[&[T]], outer: usize, sizes: &[usize], inner: usize) -> Vec<T> {
    let total: usize = sizes.iter().sum();
    let mut output = Vec::with_capacity(outer * total * inner);
    for o in 0..outer {
        for (part, &size) in parts.iter().zip(sizes) {
            let chunk = size * inner;
            output.extend_from_slice(&part[o * chunk..(o + 1) * chunk]);
        }
    }
    output
}

/// Joins contiguous buffers along an axis. `sizes[i]` is the length of that
/// axis in `buffers[i]`; `outer` and `inner` are shared by all of them.
pub(crate) fn cat_buffers(
    buffers: &[&Buffer],
    outer: usize,
    sizes: &[usize],
    inner: usize,
    operation: &str,
) -> Result<Buffer, GradFlowError> {
    let dtype = match buffers.first() {
        Some(first) => first.dtype(),
        None => {
            return Err(GradFlowError::InternalError(format!(
                "{} called without inputs",
                operation
            )))
        }
    };
    match dtype {
        crate::types::DType::F32 => {
            let parts = buffers
                .iter()
                .map(|b| b.try_get_f32())
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Buffer::F32(cat_kernel(&parts, outer, sizes, inner)))
        }
        crate::types::DType::F64 => {
            let parts = buffers
                .iter()
                .map(|b| b.try_get_f64())
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Buffer::F64(cat_kernel(&parts, outer, sizes, inner)))
        }
    }
}

/// Backward operation context for cat: the gradient is split back into the
/// input sizes.
#[derive(Debug)]
struct CatBackward {
    dim: usize,
}

impl Operation for CatBackward {
    fn name(&self) -> &'static str {
        "CatBackward"
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError> {
        check_same_dtype(inputs, "cat_op")?;
        let shapes: Vec<Vec<usize>> = inputs.iter().map(|t| t.shape()).collect();
        let first = &shapes[0];
        if self.dim >= first.len() {
            return Err(GradFlowError::InvalidAxis {
                axis: self.dim,
                rank: first.len(),
            });
        }
        for shape in &shapes[1..] {
            let compatible = shape.len() == first.len()
                && shape
                    .iter()
                    .zip(first)
                    .enumerate()
                    .all(|(i, (a, b))| i == self.dim || a == b);
            if !compatible {
                return Err(GradFlowError::IncompatibleShapes {
                    shape1: first.clone(),
                    shape2: shape.clone(),
                });
            }
        }

        let sizes: Vec<usize> = shapes.iter().map(|s| s[self.dim]).collect();
        let (outer, _, inner) = split_extents(first, self.dim);
        let buffers: Vec<_> = inputs.iter().map(|t| t.buffer()).collect();
        let refs: Vec<&Buffer> = buffers.iter().map(|b| b.as_ref()).collect();
        let joined = cat_buffers(&refs, outer, &sizes, inner, "cat_op")?;

        let mut output_shape = first.clone();
        output_shape[self.dim] = sizes.iter().sum();
        Ok(vec![Tensor::from_buffer(joined, output_shape)?])
    }

    fn backward(
        &self,
        saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError> {
        let grad = single_grad(grad_outputs, self.name())?;
        let grad_shape = grad.shape();
        let sizes: Vec<usize> = saved
            .inputs()
            .iter()
            .map(|t| t.shape()[self.dim])
            .collect();
        let (outer, dim_size, inner) = split_extents(&grad_shape, self.dim);
        split_buffer(&grad.buffer(), outer, dim_size, inner, &sizes)
            .into_iter()
            .zip(saved.inputs())
            .map(|(piece, input)| Tensor::from_buffer(piece, input.shape()).map(Some))
            .collect()
    }
}

/// Concatenates tensors along `dim`. All other axes must match.
///
/// # Errors
/// `InvalidAxis`, `IncompatibleShapes` or `DataTypeMismatch` for bad inputs.
pub fn cat_op(tensors: &[&Tensor], dim: usize) -> Result<Tensor, GradFlowError> {
    if tensors.is_empty() {
        return Err(GradFlowError::InternalError(
            "cat_op needs at least one tensor".to_string(),
        ));
    }
    apply_single(CatBackward { dim }, tensors)
}

#[cfg(test)]
#[path = "cat_test.rs"]
mod tests;
