use thiserror::Error;
mod ops;
pub use self::ops::*;

/// 张量层面的错误。张量内核遇到误用时直接以此类错误信息panic，
/// 上层（计算图、数据加载）在调用内核前自行做形状校验并返回各自的`Result`。
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    // 数字比较用
    #[error("{value_name}须{operator}{threshold}")]
    ValueMustSatisfyComparison {
        value_name: String,
        operator: ComparisonOperator,
        threshold: usize,
    },
    // 张量二元运算
    #[error(
        "形状不一致，故无法{operator}：第一个张量的形状为{tensor1_shape:?}，第二个张量的形状为{tensor2_shape:?}"
    )]
    OperatorError {
        operator: Operator,
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },

    #[error("数据长度{len}与形状{shape:?}不匹配")]
    DataLenMismatch { len: usize, shape: Vec<usize> },
    #[error("行索引{index}越界（共{rows}行）")]
    RowIndexOutOfBounds { index: usize, rows: usize },

    // 稀疏张量
    #[error("稀疏张量的坐标({row}, {col})超出了尺寸{sizes:?}")]
    SparseIndexOutOfBounds {
        row: usize,
        col: usize,
        sizes: (usize, usize),
    },
    #[error("行坐标、列坐标与边权的个数须一致：{rows}、{cols}、{values}")]
    SparseLenMismatch {
        rows: usize,
        cols: usize,
        values: usize,
    },
}
