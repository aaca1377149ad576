use crate::autograd::operation::{Operation, SavedTensors};
use crate::buffer::Buffer;
use crate::error::GradFlowError;
use crate::ops::arithmetic::div_scalar_op;
use crate::ops::reduction::sum::sum_kernel;
use crate::ops::reduction::{reduced_shape, resolve_axes};
use crate::ops::view::reshape_op;
use crate::ops::{apply_single, single_grad, unary_input};
use crate::tensor::Tensor;

/// Backward operation context for the mean: the upstream gradient divided by
/// the number of reduced elements, broadcast back over the reduced axes.
#[derive(Debug)]
struct MeanBackward {
    axes: Vec<usize>,
    keep_dims: bool,
}

impl MeanBackward {
    fn count(&self, shape: &[usize]) -> usize {
        self.axes.iter().map(|&axis| shape[axis]).product()
    }
}

impl Operation for MeanBackward {
    fn name(&self) -> &'static str {
        "MeanBackward"
    }

    fn forward(&self, inputs: &[&Tensor]) -> Result<Vec<Tensor>, GradFlowError> {
        let a = unary_input(inputs, "mean_op")?;
        let (buffer, shape) = {
            let guard = a.try_read_data()?;
            (guard.buffer.clone(), guard.shape.clone())
        };
        let count = self.count(&shape);
        let averaged = match buffer.as_ref() {
            Buffer::F32(data) => Buffer::F32(
                sum_kernel(data, &shape, &self.axes)
                    .into_iter()
                    .map(|x| x / count as f32)
                    .collect(),
            ),
            Buffer::F64(data) => Buffer::F64(
                sum_kernel(data, &shape, &self.axes)
                    .into_iter()
                    .map(|x| x / count as f64)
                    .collect(),
            ),
        };
        Ok(vec![Tensor::from_buffer(
            averaged,
            reduced_shape(&shape, &self.axes, self.keep_dims),
        )?])
    }

    fn backward(
        &self,
        saved: &SavedTensors,
        grad_outputs: &[Tensor],
    ) -> Result<Vec<Option<Tensor>>, GradFlowError> {
        let grad = single_grad(grad_outputs, self.name())?;
        let input_shape = saved.input(0)?.shape();
        let count = self.count(&input_shape);
        if count == 0 {
            // Nothing was averaged, so nothing receives gradient.
            return Ok(vec![Some(crate::tensor::create::zeros_like(saved.input(0)?)?)]);
        }
        let kept = reshape_op(grad, reduced_shape(&input_shape, &self.axes, true))?;
        let scaled = div_scalar_op(&kept, count as f64)?;
        Ok(vec![Some(scaled.expand_to_shape(&input_shape)?)])
    }
}

/// Averages the tensor over `axes` (`None` for all axes).
///
/// # Errors
/// `InvalidAxis` if an axis is out of range.
pub fn mean_op(a: &Tensor, axes: Option<&[usize]>, keep_dims: bool) -> Result<Tensor, GradFlowError> {
    let axes = resolve_axes(axes, a.ndim())?;
    apply_single(MeanBackward { axes, keep_dims }, &[a])
}

#[cfg(test)]
#[path = "mean_test.rs"]
mod tests;
