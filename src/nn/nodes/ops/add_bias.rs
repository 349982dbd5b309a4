use crate::nn::GraphError;
use crate::nn::nodes::{ForwardContext, TraitNode, check_parents_count};
use crate::tensor::Tensor;

use super::invalid_parent_index;

/// 偏置相加：`[n, m]`的每一行都加上`[1, m]`的偏置
#[derive(Debug, Clone)]
pub(in crate::nn) struct AddBias {
    shape: Vec<usize>,
}

impl AddBias {
    pub(in crate::nn) fn new(parent_shapes: &[&[usize]]) -> Result<Self, GraphError> {
        // 1. 必要的验证
        check_parents_count("AddBias", parent_shapes, 2)?;
        let (x, bias) = (parent_shapes[0], parent_shapes[1]);
        if bias != [1, x[1]] {
            return Err(GraphError::ShapeMismatch {
                expected: vec![1, x[1]],
                got: bias.to_vec(),
                message: "偏置的形状须为[1, 输入列数]".to_string(),
            });
        }

        // 2. 返回
        Ok(Self { shape: x.to_vec() })
    }
}

impl TraitNode for AddBias {
    fn type_name(&self) -> &'static str {
        "AddBias"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(
        &mut self,
        parents: &[&Tensor],
        _ctx: &mut ForwardContext<'_>,
    ) -> Result<Tensor, GraphError> {
        Ok(parents[0].add_row(parents[1]))
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        match parent_index {
            0 => Ok(upstream.clone()),
            // 偏置被广播到了每一行，梯度按行累加
            1 => Ok(upstream.sum_rows()),
            _ => Err(invalid_parent_index(self.type_name(), parent_index)),
        }
    }
}
