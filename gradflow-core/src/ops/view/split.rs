use crate::autograd::operation::{Operation, SavedTensors};
use crate::buffer::Buffer;
use crate::error::GradFlowError;
use crate::ops::view::cat::cat_buffers;
use crate::ops::view::split_extents;
use crate::ops::{apply_op, unary_input};
use crate::tensor::Tensor;

fn split_kernel<T: Copy>(data: &[T], outer: usize, dim_size: usize, inner: usize, sizes: &[usize]) -> Vec<Vec<T>> {
    let mut pieces: Vec<Vec<T>> = sizes
        .iter()
        .map(|&size| Vec::with_capacity(outer * size * inner))
        .collect();
    for o in 0..outer {
        let mut start = o * dim_size * inner;
        for (piece, &size) in pieces.iter_mut().zip(sizes) {
            let end = start + size * inner;
            piece.extend_from_slice(&data[start..end]);
            start = end;
        }
    }
    pieces
}

/// Splits a contiguous buffer along an axis described by `(outer, dim_size, inner)`.
pub(crate) fn split_buffer(
    buffer: &Buffer,
    outer: usize,
    dim_size: usize,
    inner: usize,
    sizes: &[usize],
) -> Vec<Buffer> {
    match buffer {
        Buffer::F32(data) => split_kernel(data, outer, dim_size, inner, sizes)
            .into_iter()
            .map(Buffer::F32)
            .collect(),
        Buffer::F64(data) => split_kernel(data, outer, dim_size, inner, sizes)
            .into_iter()
            .map(Buffer::F64)
            .collect(),
    }
}

/// Backward operation context for split, the one multi-output primitive.
///
/// The input gradient is the concatenation of the piece gradients. Pieces that
/// were never used downstream arrive as zeros.
#[derive(Debug)]
struct SplitBackward {
    sizes: Vec<usize>,
    dim: usize,
}

impl Operation for SplitBackward {
    fn name(&self) -> &'static str {
        "SplitBackward"
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError> {
        let a = unary_input(inputs, "split_op")?;
        let (buffer, shape) = {
            let guard = a.try_read_data()?;
            (guard.buffer.clone(), guard.shape.clone())
        };
        if self.dim >= shape.len() {
            return Err(GradFlowError::InvalidAxis {
                axis: self.dim,
                rank: shape.len(),
            });
        }
        let total: usize = self.sizes.iter().sum();
        if total != shape[self.dim] {
            let mut requested = shape.clone();
            requested[self.dim] = total;
            return Err(GradFlowError::ShapeMismatch {
                expected: shape,
                actual: requested,
                operation: "split_op".to_string(),
            });
        }

        let (outer, dim_size, inner) = split_extents(&shape, self.dim);
        split_buffer(&buffer, outer, dim_size, inner, &self.sizes)
            .into_iter()
            .zip(&self.sizes)
            .map(|(piece, &size)| {
                let mut piece_shape = shape.clone();
                piece_shape[self.dim] = size;
                Tensor::from_buffer(piece, piece_shape)
            })
            .collect()
    }

    fn backward(
        &self,
        saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError> {
        if grad_outputs.len() != self.sizes.len() {
            return Err(GradFlowError::GradientCountMismatch {
                operation: self.name().to_string(),
                expected: self.sizes.len(),
                actual: grad_outputs.len(),
            });
        }
        let input_shape = saved.input(0)?.shape();
        let (outer, _, inner) = split_extents(&input_shape, self.dim);
        let buffers: Vec<_> = grad_outputs.iter().map(Tensor::buffer).collect();
        let refs: Vec<&Buffer> = buffers.iter().map(|b| b.as_ref()).collect();
        let joined = cat_buffers(&refs, outer, &self.sizes, inner, self.name())?;
        Ok(vec![Some(Tensor::from_buffer(joined, input_shape)?)])
    }
}

/// Splits `a` along `dim` into consecutive pieces of the given `sizes`.
///
/// All pieces share one graph node; each knows its position through
/// [`Tensor::output_nr`].
///
/// # Errors
/// `InvalidAxis` for an out-of-range `dim`, `ShapeMismatch` if the sizes do
/// not add up to the length of `dim`.
pub fn split_op(a: &Tensor, sizes: &[usize], dim: usize) -> Result<Vec<Tensor>, GradFlowError> {
    apply_op(
        SplitBackward {
            sizes: sizes.to_vec(),
            dim,
        },
        &[a],
    )
}

#[cfg(test)]
#[path = "split_test.rs"]
mod tests;
