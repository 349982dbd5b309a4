//! 训练配置。命令行参数最终都落到[`TrainConfig`]上，库内不再读取任何隐式状态

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::data::SyntheticConfig;
use crate::nn::ConvKind;
use crate::train::TrainError;

/// 不需要下载、按种子生成的数据集名
pub const SYNTHETIC_DATASET: &str = "synthetic";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// `ogbn-products`、`ogbn-arxiv`或`synthetic`
    pub dataset: String,
    /// OGB 数据集根目录
    pub root: PathBuf,
    pub log_steps: usize,
    pub use_sage: bool,
    pub num_layers: usize,
    pub hidden_channels: usize,
    pub dropout: f32,
    pub lr: f32,
    pub epochs: usize,
    pub runs: usize,
    /// 是否把节点特征替换为`noise_path`中的噪声特征
    pub noise_on_feature: bool,
    pub noise_path: PathBuf,
    /// 模型参数文件的输出目录
    pub output_dir: PathBuf,
    /// 为空时使用系统熵源
    pub seed: Option<u64>,
    /// 仅在`dataset == "synthetic"`时使用
    pub synthetic: SyntheticConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            dataset: "ogbn-products".to_string(),
            root: PathBuf::from("dataset"),
            log_steps: 1,
            use_sage: false,
            num_layers: 3,
            hidden_channels: 256,
            dropout: 0.5,
            lr: 0.01,
            epochs: 100,
            runs: 1,
            noise_on_feature: false,
            noise_path: PathBuf::from("noise.feature"),
            output_dir: PathBuf::from("."),
            seed: None,
            synthetic: SyntheticConfig::default(),
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<(), TrainError> {
        let invalid = |msg: String| Err(TrainError::InvalidConfig(msg));
        if self.log_steps == 0 {
            return invalid("log_steps须大于0".to_string());
        }
        if self.num_layers < 2 {
            return invalid(format!("num_layers须至少为2，实际为{}", self.num_layers));
        }
        if self.hidden_channels == 0 {
            return invalid("hidden_channels须大于0".to_string());
        }
        if !(0.0..=1.0).contains(&self.dropout) {
            return invalid(format!("dropout须在[0, 1]内，实际为{}", self.dropout));
        }
        if !(self.lr.is_finite() && self.lr > 0.0) {
            return invalid(format!("lr须为正数，实际为{}", self.lr));
        }
        if self.epochs == 0 || self.runs == 0 {
            return invalid(format!(
                "epochs与runs须大于0，实际为{}与{}",
                self.epochs, self.runs
            ));
        }
        Ok(())
    }

    pub const fn conv_kind(&self) -> ConvKind {
        ConvKind::from_use_sage(self.use_sage)
    }

    pub fn is_synthetic(&self) -> bool {
        self.dataset == SYNTHETIC_DATASET
    }

    /// 单行 JSON，用于启动日志
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("<无法序列化配置: {e}>"))
    }
}
