use crate::nn::{GraphError, Init};
use crate::tensor::Tensor;

use super::{ForwardContext, TraitNode, leaf_node_error};

/// 参数节点：可训练的叶子节点，记录自己的初始化策略以便`reset_parameter`重新初始化
#[derive(Debug, Clone)]
pub(in crate::nn) struct Parameter {
    shape: Vec<usize>,
    init: Init,
}

impl Parameter {
    pub(in crate::nn) fn new(shape: &[usize], init: Init) -> Result<Self, GraphError> {
        // 1. 必要的验证
        if shape.len() != 2 || shape.contains(&0) {
            return Err(GraphError::InvalidOperation(format!(
                "参数张量的形状须为非空的[rows, cols]，实际为{shape:?}"
            )));
        }

        // 2. 返回
        Ok(Self {
            shape: shape.to_vec(),
            init,
        })
    }

    pub(in crate::nn) const fn init(&self) -> Init {
        self.init
    }
}

impl TraitNode for Parameter {
    fn type_name(&self) -> &'static str {
        "Parameter"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn is_leaf(&self) -> bool {
        true
    }

    fn is_trainable(&self) -> bool {
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
