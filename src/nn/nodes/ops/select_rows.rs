use std::rc::Rc;

use crate::nn::GraphError;
use crate::nn::nodes::{ForwardContext, TraitNode, check_parents_count};
use crate::tensor::Tensor;

use super::invalid_parent_index;

/// 按节点索引取出若干行（如训练集节点的输出）
#[derive(Debug, Clone)]
pub(in crate::nn) struct SelectRows {
    index: Rc<[usize]>,
    parent_rows: usize,
    shape: Vec<usize>,
}

impl SelectRows {
    pub(in crate::nn) fn new(parent_shapes: &[&[usize]], index: Rc<[usize]>) -> Result<Self, GraphError> {
        // 1. 必要的验证
        check_parents_count("SelectRows", parent_shapes, 1)?;
        let x = parent_shapes[0];
        if let Some(&bad) = index.iter().find(|&&i| i >= x[0]) {
            return Err(GraphError::InvalidOperation(format!(
                "行索引{bad}越界（父节点共{}行）",
                x[0]
            )));
        }

        // 2. 返回
        Ok(Self {
            shape: vec![index.len(), x[1]],
            parent_rows: x[0],
            index,
        })
    }
}

impl TraitNode for SelectRows {
    fn type_name(&self) -> &'static str {
        "SelectRows"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(
        &mut self,
        parents: &[&Tensor],
        _ctx: &mut ForwardContext<'_>,
    ) -> Result<Tensor, GraphError> {
        Ok(parents[0].select_rows(&self.index))
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
        Ok(upstream.scatter_add_rows(&self.index, self.parent_rows))
    }
}
