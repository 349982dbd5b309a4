use std::rc::Rc;

use crate::nn::GraphError;
use crate::nn::nodes::ops::invalid_parent_index;
use crate::nn::nodes::{ForwardContext, TraitNode, check_parents_count};
use crate::tensor::Tensor;

/// 负对数似然损失（均值）：输入为逐行的对数概率`[n, c]`，标签为`n`个类别号，
/// ```text
/// loss = -(1/n) Σ_i input[i, target_i]
/// ```
/// 输出形状为`[1, 1]`。
#[derive(Debug, Clone)]
pub(in crate::nn) struct NllLoss {
    target: Rc<[usize]>,
    shape: Vec<usize>,
}

impl NllLoss {
    pub(in crate::nn) fn new(parent_shapes: &[&[usize]], target: Rc<[usize]>) -> Result<Self, GraphError> {
        // 1. 必要的验证
        check_parents_count("NllLoss", parent_shapes, 1)?;
        let input = parent_shapes[0];
        if input[0] == 0 {
            return Err(GraphError::InvalidOperation(
                "NllLoss的输入不能为空（0行）".to_string(),
            ));
        }
        if target.len() != input[0] {
            return Err(GraphError::ShapeMismatch {
                expected: vec![input[0]],
                got: vec![target.len()],
                message: "标签个数须等于输入行数".to_string(),
            });
        }
        if let Some(&bad) = target.iter().find(|&&t| t >= input[1]) {
            return Err(GraphError::InvalidOperation(format!(
                "标签{bad}超出了类别数{}",
                input[1]
            )));
        }

        // 2. 返回
        Ok(Self {
            target,
            shape: vec![1, 1],
        })
    }
}

impl TraitNode for NllLoss {
    fn type_name(&self) -> &'static str {
        "NllLoss"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(
        &mut self,
        parents: &[&Tensor],
        _ctx: &mut ForwardContext<'_>,
    ) -> Result<Tensor, GraphError> {
        let input = parents[0];
        let n = self.target.len() as f32;
        let sum: f32 = self
            .target
            .iter()
            .enumerate()
            .map(|(i, &t)| input[[i, t]])
            .sum();
        Ok(Tensor::from(-sum / n))
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
        let scale = upstream.number().ok_or_else(|| {
            GraphError::ComputationError(format!(
                "损失的上游梯度须为[1, 1]，实际为{:?}",
                upstream.shape()
            ))
        })?;
        let mut grad = Tensor::zeros(parents[0].shape());
        let weight = -scale / self.target.len() as f32;
        for (i, &t) in self.target.iter().enumerate() {
            grad[[i, t]] = weight;
        }
        Ok(grad)
    }
}
