use crate::nn::GraphError;
use crate::nn::nodes::{ForwardContext, TraitNode, check_parents_count};
use crate::tensor::Tensor;

use super::invalid_parent_index;

/// 两个同形状节点逐元素相加
#[derive(Debug, Clone)]
pub(in crate::nn) struct Add {
    shape: Vec<usize>,
}

impl Add {
    pub(in crate::nn) fn new(parent_shapes: &[&[usize]]) -> Result<Self, GraphError> {
        // 1. 必要的验证
        check_parents_count("Add", parent_shapes, 2)?;
        if parent_shapes[0] != parent_shapes[1] {
            return Err(GraphError::ShapeMismatch {
                expected: parent_shapes[0].to_vec(),
                got: parent_shapes[1].to_vec(),
                message: "Add节点的所有父节点形状必须相同".to_string(),
            });
        }

        // 2. 返回
        Ok(Self {
            shape: parent_shapes[0].to_vec(),
        })
    }
}

impl TraitNode for Add {
    fn type_name(&self) -> &'static str {
        "Add"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(
        &mut self,
        parents: &[&Tensor],
        _ctx: &mut ForwardContext<'_>,
    ) -> Result<Tensor, GraphError> {
        Ok(parents[0] + parents[1])
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        match parent_index {
            0 | 1 => Ok(upstream.clone()),
            _ => Err(invalid_parent_index(self.type_name(), parent_index)),
        }
    }
}
