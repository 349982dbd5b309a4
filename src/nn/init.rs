/*
 * @Author       : 老董
 * @Description  : 参数初始化策略
 */

use rand::rngs::StdRng;

use crate::tensor::Tensor;

/// 参数初始化策略。权重形状约定为`[fan_in, fan_out]`。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Init {
    /// 全零
    Zeros,
    /// 常数初始化
    Constant(f32),
    /// Xavier/Glorot 均匀分布：`U(-a, a)`，`a = sqrt(6 / (fan_in + fan_out))`
    XavierUniform,
    /// `torch.nn.Linear`默认的 Kaiming 均匀分布（a=√5）：`U(-1/sqrt(fan_in), 1/sqrt(fan_in))`
    KaimingUniform,
    /// 对称均匀分布`U(-bound, bound)`，常用于偏置（bound 取对应权重的`1/sqrt(fan_in)`）
    Uniform { bound: f32 },
}

impl Init {
    /// 使用指定的 RNG 生成初始化后的 Tensor
    pub fn generate(&self, shape: &[usize], rng: &mut StdRng) -> Tensor {
        let (fan_in, fan_out) = (shape[0], shape.get(1).copied().unwrap_or(1));
        match *self {
            Self::Zeros => Tensor::zeros(shape),
            Self::Constant(v) => &Tensor::ones(shape) * v,
            Self::XavierUniform => {
                let bound = (6.0 / (fan_in + fan_out) as f32).sqrt();
                Tensor::new_uniform(-bound, bound, shape, rng)
            }
            Self::KaimingUniform => {
                let bound = 1.0 / (fan_in.max(1) as f32).sqrt();
                Tensor::new_uniform(-bound, bound, shape, rng)
            }
            Self::Uniform { bound } => Tensor::new_uniform(-bound, bound, shape, rng),
        }
    }
}
