use crate::nn::GraphError;
use crate::nn::nodes::{ForwardContext, TraitNode, check_parents_count};
use crate::tensor::Tensor;

use super::invalid_parent_index;

/// 矩阵乘法：`C = A @ B`，`A: [n, k]`，`B: [k, m]`
#[derive(Debug, Clone)]
pub(in crate::nn) struct MatMul {
    shape: Vec<usize>,
}

impl MatMul {
    pub(in crate::nn) fn new(parent_shapes: &[&[usize]]) -> Result<Self, GraphError> {
        // 1. 必要的验证
        check_parents_count("MatMul", parent_shapes, 2)?;
        let (a, b) = (parent_shapes[0], parent_shapes[1]);
        if a[1] != b[0] {
            return Err(GraphError::ShapeMismatch {
                expected: vec![a[1], b[1]],
                got: b.to_vec(),
                message: format!("MatMul节点的第1个父节点形状为{a:?}，第2个父节点的行数须等于其列数"),
            });
        }

        // 2. 返回
        Ok(Self {
            shape: vec![a[0], b[1]],
        })
    }
}

impl TraitNode for MatMul {
    fn type_name(&self) -> &'static str {
        "MatMul"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(
        &mut self,
        parents: &[&Tensor],
        _ctx: &mut ForwardContext<'_>,
    ) -> Result<Tensor, GraphError> {
        Ok(parents[0].mat_mul(parents[1]))
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        match parent_index {
            // dL/dA = G @ B^T
            0 => Ok(upstream.mat_mul(&parents[1].transpose())),
            // dL/dB = A^T @ G
            1 => Ok(parents[0].transpose().mat_mul(upstream)),
            _ => Err(invalid_parent_index(self.type_name(), parent_index)),
        }
    }
}
