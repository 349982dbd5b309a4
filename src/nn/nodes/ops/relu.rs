use crate::nn::GraphError;
use crate::nn::nodes::{ForwardContext, TraitNode, check_parents_count};
use crate::tensor::Tensor;

use super::invalid_parent_index;

#[derive(Debug, Clone)]
pub(in crate::nn) struct Relu {
    shape: Vec<usize>,
}

impl Relu {
    pub(in crate::nn) fn new(parent_shapes: &[&[usize]]) -> Result<Self, GraphError> {
        check_parents_count("Relu", parent_shapes, 1)?;
        Ok(Self {
            shape: parent_shapes[0].to_vec(),
        })
    }
}

impl TraitNode for Relu {
    fn type_name(&self) -> &'static str {
        "Relu"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(
        &mut self,
        parents: &[&Tensor],
        _ctx: &mut ForwardContext<'_>,
    ) -> Result<Tensor, GraphError> {
        Ok(parents[0].map(|x| x.max(0.0)))
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if parent_index != 0 {
            return Err(invalid_parent_index(self.type_name(), parent_index));
        }
        // x = 0 处取次梯度0
        let mask = parents[0].map(|x| if x > 0.0 { 1.0 } else { 0.0 });
        Ok(upstream * &mask)
    }
}
