//! 单张图的数据（特征、标签、邻接矩阵）以及训练/验证/测试划分

use tracing::debug;

use crate::data::error::DataError;
use crate::sparse::{SparseTensor, gcn_norm};
use crate::tensor::Tensor;

/// 节点分类任务的一张图
///
/// - `x`: 节点特征 [N, F]
/// - `y`: 节点标签，长度为 N
/// - `adj_t`: 转置邻接矩阵 [N, N]，第`i`行是指向节点`i`的邻居
#[derive(Debug, Clone)]
pub struct GraphData {
    x: Tensor,
    y: Vec<usize>,
    adj_t: SparseTensor,
}

impl GraphData {
    pub fn new(x: Tensor, y: Vec<usize>, adj_t: SparseTensor) -> Result<Self, DataError> {
        let n = adj_t.num_rows();
        if adj_t.num_cols() != n {
            return Err(DataError::ShapeMismatch {
                expected: vec![n, n],
                got: vec![adj_t.num_rows(), adj_t.num_cols()],
            });
        }
        if x.rows() != n {
            return Err(DataError::ShapeMismatch {
                expected: vec![n, x.cols()],
                got: x.shape().to_vec(),
            });
        }
        if y.len() != n {
            return Err(DataError::ShapeMismatch {
                expected: vec![n],
                got: vec![y.len()],
            });
        }
        Ok(Self { x, y, adj_t })
    }

    pub fn num_nodes(&self) -> usize {
        self.y.len()
    }

    pub fn num_features(&self) -> usize {
        self.x.cols()
    }

    pub fn num_edges(&self) -> usize {
        self.adj_t.nnz()
    }

    pub fn x(&self) -> &Tensor {
        &self.x
    }

    pub fn y(&self) -> &[usize] {
        &self.y
    }

    pub fn adj_t(&self) -> &SparseTensor {
        &self.adj_t
    }

    /// 替换节点特征（如换成随机噪声特征）。行数须等于节点数，列数不限
    pub fn set_x(&mut self, x: Tensor) -> Result<(), DataError> {
        if x.rows() != self.num_nodes() {
            return Err(DataError::ShapeMismatch {
                expected: vec![self.num_nodes(), x.cols()],
                got: x.shape().to_vec(),
            });
        }
        self.x = x;
        Ok(())
    }

    /// 用 GCN 对称归一化后的邻接矩阵替换`adj_t`
    pub fn normalize_adj(&mut self) {
        self.adj_t = gcn_norm(&self.adj_t);
        debug!(nnz = self.adj_t.nnz(), "邻接矩阵已归一化");
    }
}

/// 数据集划分的三个部分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Valid,
    Test,
}

impl Split {
    pub const ALL: [Self; 3] = [Self::Train, Self::Valid, Self::Test];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Valid => "valid",
            Self::Test => "test",
        }
    }
}

/// 训练/验证/测试节点索引。三者两两不相交，但不必覆盖全部节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIdx {
    train: Vec<usize>,
    valid: Vec<usize>,
    test: Vec<usize>,
}

impl SplitIdx {
    pub fn new(
        train: Vec<usize>,
        valid: Vec<usize>,
        test: Vec<usize>,
        num_nodes: usize,
    ) -> Result<Self, DataError> {
        let mut owner: Vec<Option<Split>> = vec![None; num_nodes];
        for (split, index) in [(Split::Train, &train), (Split::Valid, &valid), (Split::Test, &test)] {
            for &i in index {
                if i >= num_nodes {
                    return Err(DataError::IndexOutOfBounds {
                        index: i,
                        len: num_nodes,
                    });
                }
                match owner[i] {
                    Some(other) if other == split => {
                        return Err(DataError::InvalidSplit(format!(
                            "节点{i}在{}中重复出现",
                            split.as_str()
                        )));
                    }
                    Some(other) => {
                        return Err(DataError::InvalidSplit(format!(
                            "节点{i}同时出现在{}和{}中",
                            other.as_str(),
                            split.as_str()
                        )));
                    }
                    None => {}
                }
                owner[i] = Some(split);
            }
        }
        Ok(Self { train, valid, test })
    }

    pub fn get(&self, split: Split) -> &[usize] {
        match split {
            Split::Train => &self.train,
            Split::Valid => &self.valid,
            Split::Test => &self.test,
        }
    }

    pub fn train(&self) -> &[usize] {
        &self.train
    }

    pub fn valid(&self) -> &[usize] {
        &self.valid
    }

    pub fn test(&self) -> &[usize] {
        &self.test
    }
}
