use std::rc::Rc;

use crate::nn::GraphError;
use crate::nn::nodes::{ForwardContext, TraitNode, check_parents_count};
use crate::sparse::{Reduce, SparseTensor};
use crate::tensor::Tensor;

use super::invalid_parent_index;

/// 消息传递：`out = adj_t @ x`（求和或均值聚合）。
/// 邻接矩阵不是计算图的节点，不参与求导；多个层共享同一份邻接矩阵。
#[derive(Debug, Clone)]
pub(in crate::nn) struct Propagate {
    adj_t: Rc<SparseTensor>,
    reduce: Reduce,
    shape: Vec<usize>,
}

impl Propagate {
    pub(in crate::nn) fn new(
        parent_shapes: &[&[usize]],
        adj_t: Rc<SparseTensor>,
        reduce: Reduce,
    ) -> Result<Self, GraphError> {
        // 1. 必要的验证
        check_parents_count("Propagate", parent_shapes, 1)?;
        let x = parent_shapes[0];
        if x[0] != adj_t.num_cols() {
            return Err(GraphError::ShapeMismatch {
                expected: vec![adj_t.num_cols(), x[1]],
                got: x.to_vec(),
                message: format!("邻接矩阵尺寸为{:?}，特征行数须等于其列数", adj_t.sizes()),
            });
        }

        // 2. 返回
        Ok(Self {
            shape: vec![adj_t.num_rows(), x[1]],
            adj_t,
            reduce,
        })
    }
}

impl TraitNode for Propagate {
    fn type_name(&self) -> &'static str {
        "Propagate"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(
        &mut self,
        parents: &[&Tensor],
        _ctx: &mut ForwardContext<'_>,
    ) -> Result<Tensor, GraphError> {
        Ok(self.adj_t.spmm(parents[0], self.reduce))
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if parent_index != 0 {
            return Err(invalid_parent_index(self.type_name(), parent_index));
        }
        Ok(self.adj_t.spmm_transpose(upstream, self.reduce))
    }
}
