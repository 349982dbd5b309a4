//! 矩阵类运算：矩阵乘法、转置、按行取/散、按轴求和、行广播以及逐行的 argmax / log_softmax

use ndarray::{Array2, Axis};

use crate::errors::{ComparisonOperator, Operator, TensorError};
use crate::tensor::Tensor;

impl Tensor {
    /// 实现矩阵乘法。需要保证前一个张量的列数（col）等于后一个张量的行数（row），否则会panic。
    pub fn mat_mul(&self, other: &Self) -> Self {
        assert!(
            self.cols() == other.rows(),
            "{}",
            TensorError::OperatorError {
                operator: Operator::MatMul,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: other.shape().to_vec(),
            }
        );
        Self {
            data: self.data.dot(&other.data),
        }
    }

    /// 转置，返回一个新的（行优先存储的）张量
    pub fn transpose(&self) -> Self {
        let mut data = Array2::zeros((self.cols(), self.rows()));
        data.assign(&self.data.t());
        Self { data }
    }

    /// 按`index`依次取出对应行，组成形状为`[index.len(), cols]`的新张量。
    /// 索引越界会panic。
    pub fn select_rows(&self, index: &[usize]) -> Self {
        let rows = self.rows();
        if let Some(&bad) = index.iter().find(|&&i| i >= rows) {
            panic!(
                "{}",
                TensorError::RowIndexOutOfBounds { index: bad, rows }
            );
        }
        Self {
            data: self.data.select(Axis(0), index),
        }
    }

    /// `select_rows`的逆操作：构造`[rows, cols]`的零张量，
    /// 再把`self`的第k行累加到结果的第`index[k]`行。
    pub fn scatter_add_rows(&self, index: &[usize], rows: usize) -> Self {
        assert!(
            index.len() == self.rows(),
            "索引个数{}须等于张量行数{}",
            index.len(),
            self.rows()
        );
        let mut data = Array2::zeros((rows, self.cols()));
        for (k, &target) in index.iter().enumerate() {
            assert!(
                target < rows,
                "{}",
                TensorError::RowIndexOutOfBounds {
                    index: target,
                    rows
                }
            );
            let mut dst = data.row_mut(target);
            dst += &self.data.row(k);
        }
        Self { data }
    }

    /// 沿行方向求和（把所有行加起来），返回形状为`[1, cols]`的张量
    pub fn sum_rows(&self) -> Self {
        Self {
            data: self.data.sum_axis(Axis(0)).insert_axis(Axis(0)),
        }
    }

    /// 沿列方向求和（每行内部相加），返回形状为`[rows, 1]`的张量
    pub fn sum_cols(&self) -> Self {
        Self {
            data: self.data.sum_axis(Axis(1)).insert_axis(Axis(1)),
        }
    }

    /// 对所有元素求和
    pub fn sum(&self) -> f32 {
        self.data.sum()
    }

    /// 每一行都加上形状为`[1, cols]`的`row`（偏置广播）
    pub fn add_row(&self, row: &Self) -> Self {
        assert!(
            row.rows() == 1 && row.cols() == self.cols(),
            "{}",
            TensorError::OperatorError {
                operator: Operator::Add,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: row.shape().to_vec(),
            }
        );
        Self {
            data: &self.data + &row.data,
        }
    }

    /// 每一行都乘以形状为`[rows, 1]`的`col`中对应的系数
    pub fn mul_col(&self, col: &Self) -> Self {
        assert!(
            col.cols() == 1 && col.rows() == self.rows(),
            "{}",
            TensorError::OperatorError {
                operator: Operator::Mul,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: col.shape().to_vec(),
            }
        );
        Self {
            data: &self.data * &col.data,
        }
    }

    pub fn map<F: Fn(f32) -> f32>(&self, f: F) -> Self {
        Self {
            data: self.data.mapv(f),
        }
    }

    pub fn exp(&self) -> Self {
        self.map(f32::exp)
    }

    pub fn sqrt(&self) -> Self {
        self.map(f32::sqrt)
    }

    /// 逐行取最大值所在的列号，并列时取最靠前的一列
    pub fn argmax_rows(&self) -> Vec<usize> {
        assert!(
            self.cols() >= 1,
            "{}",
            TensorError::ValueMustSatisfyComparison {
                value_name: "列数".to_string(),
                operator: ComparisonOperator::GreaterOrEqual,
                threshold: 1,
            }
        );
        self.data
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = 0;
                for (j, &v) in row.iter().enumerate() {
                    if v > row[best] {
                        best = j;
                    }
                }
                best
            })
            .collect()
    }

    /// 逐行计算数值稳定的 log_softmax：
    /// ```text
    /// log_softmax(x)_i = x_i - max(x) - log(Σ exp(x_j - max(x)))
    /// ```
    pub fn log_softmax_rows(&self) -> Self {
        let mut data = self.data.clone();
        for mut row in data.rows_mut() {
            let max = row.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
            let log_sum_exp = row.iter().map(|&v| (v - max).exp()).sum::<f32>().ln() + max;
            row.mapv_inplace(|v| v - log_sum_exp);
        }
        Self { data }
    }
}
