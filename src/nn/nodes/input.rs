use crate::nn::GraphError;
use crate::tensor::Tensor;

use super::{ForwardContext, TraitNode, leaf_node_error};

/// 输入节点：值由外部通过`Graph::set_node_value`设置（如节点特征），不参与训练
#[derive(Debug, Clone)]
pub(in crate::nn) struct Input {
    shape: Vec<usize>,
}

impl Input {
    pub(in crate::nn) fn new(shape: &[usize]) -> Result<Self, GraphError> {
        if shape.len() != 2 {
            return Err(GraphError::InvalidOperation(format!(
                "输入节点的形状须为[rows, cols]，实际为{shape:?}"
            )));
        }
        Ok(Self {
            shape: shape.to_vec(),
        })
    }
}

impl TraitNode for Input {
    fn type_name(&self) -> &'static str {
        "Input"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn is_leaf(&self) -> bool {
        true
    }

    fn calc_value_by_parents(
        &mut self,
        _parents: &[&Tensor],
        _ctx: &mut ForwardContext<'_>,
    ) -> Result<Tensor, GraphError> {
        Err(leaf_node_error(self.type_name()))
    }

    fn calc_grad_to_parent(
        &self,
        _parent_index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        _upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Err(leaf_node_error(self.type_name()))
    }
}
