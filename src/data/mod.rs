//! 数据加载模块
//!
//! 提供节点分类任务所需的数据集、划分与评估功能。
//!
//! # 主要组件
//!
//! - [`NodePropPredDataset`]: 单图节点分类数据集（OGB 原始布局或合成图）
//! - [`GraphData`]: 节点特征、标签与稀疏邻接矩阵
//! - [`SplitIdx`]: 训练/验证/测试节点索引
//! - [`Evaluator`]: 分类准确率
//! - [`load_noise_features`]: 读取用于替换节点特征的随机噪声（`.npy`）
//! - [`DataError`]: 数据加载错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use ogbn_gnn::data::{NodePropPredDataset, Evaluator};
//!
//! let dataset = NodePropPredDataset::load("dataset", "ogbn-products")?;
//! let evaluator = Evaluator::new(dataset.name());
//! let acc = evaluator.eval(&y_true, &y_pred)?;
//! ```

pub mod datasets;
pub mod error;
mod evaluator;
mod graph;
mod noise;

#[cfg(test)]
mod tests;

pub use datasets::{DatasetMeta, NodePropPredDataset, SyntheticConfig};
pub use error::DataError;
pub use evaluator::Evaluator;
pub use graph::{GraphData, Split, SplitIdx};
pub use noise::load_noise_features;
