//! 数据加载错误类型定义

use std::path::PathBuf;
use thiserror::Error;

/// 数据加载相关错误
#[derive(Debug, Error)]
pub enum DataError {
    /// 文件未找到
    #[error("文件未找到: {0}")]
    FileNotFound(PathBuf),

    /// IO 错误
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    /// 格式错误（如 CSV 某行无法解析）
    #[error("格式错误: {0}")]
    FormatError(String),

    /// 索引越界
    #[error("索引越界: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// 形状不匹配
    #[error("形状不匹配: 期望 {expected:?}, 实际 {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// 数据集划分不合法（如训练/验证/测试集有交集）
    #[error("数据集划分不合法: {0}")]
    InvalidSplit(String),

    /// 不支持的数据集名称
    #[error("未知的数据集: {0}（支持 ogbn-products、ogbn-arxiv、synthetic）")]
    UnknownDataset(String),

    /// 评估输入为空
    #[error("评估输入为空: {0}")]
    EmptyInput(String),

    /// .npy 文件读取错误
    #[error("npy 读取错误: {0}")]
    NpyError(String),
}
