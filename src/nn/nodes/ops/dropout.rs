use rand::Rng;

use crate::nn::GraphError;
use crate::nn::nodes::{ForwardContext, TraitNode, check_parents_count};
use crate::tensor::Tensor;

use super::invalid_parent_index;

/// 反向随机失活（inverted dropout）。
/// 训练模式下每个元素以概率`p`置零，保留的元素乘以`1/(1-p)`；评估模式下原样输出。
#[derive(Debug, Clone)]
pub(in crate::nn) struct Dropout {
    p: f32,
    shape: Vec<usize>,
    /// 最近一次训练模式前向所用的掩码（已含缩放系数），评估模式下为None
    mask: Option<Tensor>,
}

impl Dropout {
    pub(in crate::nn) fn new(parent_shapes: &[&[usize]], p: f32) -> Result<Self, GraphError> {
        // 1. 必要的验证
        check_parents_count("Dropout", parent_shapes, 1)?;
        if !(0.0..=1.0).contains(&p) {
            return Err(GraphError::InvalidOperation(format!(
                "Dropout的概率须在[0, 1]内，实际为{p}"
            )));
        }

        // 2. 返回
        Ok(Self {
            p,
            shape: parent_shapes[0].to_vec(),
            mask: None,
        })
    }
}

impl TraitNode for Dropout {
    fn type_name(&self) -> &'static str {
        "Dropout"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(
        &mut self,
        parents: &[&Tensor],
        ctx: &mut ForwardContext<'_>,
    ) -> Result<Tensor, GraphError> {
        let x = parents[0];
        if !ctx.is_train_mode || self.p == 0.0 {
            self.mask = None;
            return Ok(x.clone());
        }
        let mask = if self.p >= 1.0 {
            Tensor::zeros(x.shape())
        } else {
            let scale = 1.0 / (1.0 - self.p);
            let data: Vec<f32> = (0..x.size())
                .map(|_| if ctx.rng.r#gen::<f32>() < self.p { 0.0 } else { scale })
                .collect();
            Tensor::new(&data, x.shape())
        };
        let value = x * &mask;
        self.mask = Some(mask);
        Ok(value)
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
        Ok(match &self.mask {
            Some(mask) => upstream * mask,
            None => upstream.clone(),
        })
    }
}
