use crate::nn::GraphError;
use crate::nn::nodes::{ForwardContext, TraitNode, check_parents_count};
use crate::tensor::Tensor;

use super::invalid_parent_index;

/// 逐行 log_softmax
#[derive(Debug, Clone)]
pub(in crate::nn) struct LogSoftmax {
    shape: Vec<usize>,
}

impl LogSoftmax {
    pub(in crate::nn) fn new(parent_shapes: &[&[usize]]) -> Result<Self, GraphError> {
        check_parents_count("LogSoftmax", parent_shapes, 1)?;
        Ok(Self {
            shape: parent_shapes[0].to_vec(),
        })
    }
}

impl TraitNode for LogSoftmax {
    fn type_name(&self) -> &'static str {
        "LogSoftmax"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(
        &mut self,
        parents: &[&Tensor],
        _ctx: &mut ForwardContext<'_>,
    ) -> Result<Tensor, GraphError> {
        Ok(parents[0].log_softmax_rows())
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        _parents: &[&Tensor],
        value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if parent_index != 0 {
            return Err(invalid_parent_index(self.type_name(), parent_index));
        }
        // dx = g - softmax(x) * Σ_j g_j
        let softmax = value.exp();
        Ok(upstream - softmax.mul_col(&upstream.sum_cols()))
    }
}
