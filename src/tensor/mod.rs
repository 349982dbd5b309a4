use ndarray::Array2;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::errors::TensorError;

mod approx_eq;
mod matrix;
mod ops;


/// 定义张量的结构体。本项目里所有张量都是二阶的（矩阵）：
/// 节点特征为`[N, F]`，权重为`[in, out]`，偏置为`[1, out]`，标量损失为`[1, 1]`。
/// 注：只要通过Tensor初始化的都是张量（即使标量也是张量）；
/// 而通常意义上的数字（类型为usize、i32、f32等）就只是纯数（number），在这里不被认为是张量。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    data: Array2<f32>,
}

impl Tensor {
    /// 创建一个张量，`shape`须为`[rows, cols]`，`data`按行优先排列，
    /// 其长度必须等于`rows * cols`，否则会panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Self {
        let (rows, cols) = Self::check_shape(shape);
        assert!(
            data.len() == rows * cols,
            "{}",
            TensorError::DataLenMismatch {
                len: data.len(),
                shape: shape.to_vec(),
            }
        );
        let data = Array2::from_shape_vec((rows, cols), data.to_vec())
            .unwrap_or_else(|_| Array2::zeros((rows, cols)));
        Self { data }
    }

    /// 全零张量
    pub fn zeros(shape: &[usize]) -> Self {
        let (rows, cols) = Self::check_shape(shape);
        Self {
            data: Array2::zeros((rows, cols)),
        }
    }

    /// 全一张量
    pub fn ones(shape: &[usize]) -> Self {
        let (rows, cols) = Self::check_shape(shape);
        Self {
            data: Array2::ones((rows, cols)),
        }
    }

    /// 创建一个随机张量，其值在[low, high]的闭区间。
    /// 使用外部传入的`rng`，以便在给定种子时结果可复现。
    pub fn new_uniform(low: f32, high: f32, shape: &[usize], rng: &mut StdRng) -> Self {
        let (rows, cols) = Self::check_shape(shape);
        if low == high {
            return &Self::ones(shape) * low;
        }
        let dist = Uniform::from(low..=high);
        let data = Array2::from_shape_simple_fn((rows, cols), || dist.sample(rng));
        Self { data }
    }

    /// 直接由`ndarray`的二维数组构建
    pub fn from_array(data: Array2<f32>) -> Self {
        Self { data }
    }

    pub(crate) fn data(&self) -> &Array2<f32> {
        &self.data
    }

    /// 形状，恒为`[rows, cols]`
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// 张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    /// 转化为纯数（number）。若形状为`[1, 1]`，则返回Some(number)，否则返回None
    pub fn number(&self) -> Option<f32> {
        if self.shape() == [1, 1] {
            Some(self.data[[0, 0]])
        } else {
            None
        }
    }

    /// 按行优先顺序导出所有元素
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }

    /// 是否所有元素都是有限值（非NaN、非inf）
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }
}

// 私有方法
impl Tensor {
    fn check_shape(shape: &[usize]) -> (usize, usize) {
        assert!(
            shape.len() == 2,
            "张量形状须为[rows, cols]，实际为{:?}",
            shape
        );
        (shape[0], shape[1])
    }
}

impl std::ops::Index<[usize; 2]> for Tensor {
    type Output = f32;

    fn index(&self, index: [usize; 2]) -> &f32 {
        &self.data[index]
    }
}

impl std::ops::IndexMut<[usize; 2]> for Tensor {
    fn index_mut(&mut self, index: [usize; 2]) -> &mut f32 {
        &mut self.data[index]
    }
}

impl From<f32> for Tensor {
    /// 将`f32`转换为形状为`[1, 1]`的张量
    fn from(scalar: f32) -> Self {
        Self::new(&[scalar], &[1, 1])
    }
}
