//! 节点分类准确率评估器

use crate::data::error::DataError;

/// 按数据集名称构造的评估器，指标为分类准确率
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluator {
    name: String,
}

impl Evaluator {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 返回`y_true`与`y_pred`逐位相同的比例，范围[0, 1]
    pub fn eval(&self, y_true: &[usize], y_pred: &[usize]) -> Result<f32, DataError> {
        if y_true.len() != y_pred.len() {
            return Err(DataError::ShapeMismatch {
                expected: vec![y_true.len()],
                got: vec![y_pred.len()],
            });
        }
        if y_true.is_empty() {
            return Err(DataError::EmptyInput(format!(
                "{}的评估器没有收到任何样本",
                self.name
            )));
        }
        let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
        Ok(correct as f32 / y_true.len() as f32)
    }
}
