//! # 稀疏邻接矩阵
//!
//! 以 CSR（压缩行）格式存储的稀疏矩阵，专门用来表示图的（转置）邻接矩阵`adj_t`：
//! 第`i`行列出的是向节点`i`传递消息的所有源节点`j`及其边权`v_ij`。
//!
//! 只提供图卷积需要的几种运算：
//! - [`SparseTensor::set_diag`]：把对角线（自环）统一设为权重1
//! - [`SparseTensor::sum_rows`]：按行求和得到（加权）度
//! - [`SparseTensor::scale_rows_cols`]：按行、列系数缩放边权
//! - [`SparseTensor::spmm`] / [`SparseTensor::spmm_transpose`]：稀疏-稠密矩阵乘（求和或求均值）及其反向

mod norm;

#[cfg(test)]
mod tests;

pub use norm::{deg_inv_sqrt, gcn_norm};

use ndarray::Array2;

use crate::errors::TensorError;
use crate::tensor::Tensor;

/// 稀疏矩阵乘法中邻居消息的聚合方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduce {
    /// 加权求和：`out_i = Σ_j v_ij x_j`
    Sum,
    /// 加权求和后除以该行非零元个数：`out_i = Σ_j v_ij x_j / nnz(i)`，空行结果为0
    Mean,
}

/// CSR 格式的稀疏矩阵
#[derive(Debug, Clone, PartialEq)]
pub struct SparseTensor {
    num_rows: usize,
    num_cols: usize,
    /// 长度为`num_rows + 1`，第`i`行的非零元位于`[rowptr[i], rowptr[i+1])`
    rowptr: Vec<usize>,
    /// 每个非零元的列号，行内升序且无重复
    col: Vec<usize>,
    /// 边权；`None`表示所有边权均为1
    value: Option<Vec<f32>>,
}

impl SparseTensor {
    /// 由 COO 坐标创建稀疏矩阵。坐标会按（行, 列）排序，重复坐标合并为一个，
    /// 有边权时重复坐标的边权相加。
    pub fn from_coo(
        row: &[usize],
        col: &[usize],
        value: Option<&[f32]>,
        sizes: (usize, usize),
    ) -> Result<Self, TensorError> {
        let values_len = value.map_or(row.len(), <[f32]>::len);
        if row.len() != col.len() || values_len != row.len() {
            return Err(TensorError::SparseLenMismatch {
                rows: row.len(),
                cols: col.len(),
                values: values_len,
            });
        }
        if let Some((&r, &c)) = row
            .iter()
            .zip(col)
            .find(|&(&r, &c)| r >= sizes.0 || c >= sizes.1)
        {
            return Err(TensorError::SparseIndexOutOfBounds {
                row: r,
                col: c,
                sizes,
            });
        }

        let mut order: Vec<usize> = (0..row.len()).collect();
        order.sort_unstable_by_key(|&k| (row[k], col[k]));

        let mut rowptr = vec![0usize; sizes.0 + 1];
        let mut out_col = Vec::with_capacity(row.len());
        let mut out_value = value.map(|_| Vec::with_capacity(row.len()));
        let mut last: Option<(usize, usize)> = None;
        for k in order {
            let key = (row[k], col[k]);
            if last == Some(key) {
                // 重复坐标
                if let (Some(out), Some(v)) = (out_value.as_mut(), value) {
                    if let Some(acc) = out.last_mut() {
                        *acc += v[k];
                    }
                }
                continue;
            }
            last = Some(key);
            rowptr[key.0 + 1] += 1;
            out_col.push(key.1);
            if let (Some(out), Some(v)) = (out_value.as_mut(), value) {
                out.push(v[k]);
            }
        }
        for i in 0..sizes.0 {
            rowptr[i + 1] += rowptr[i];
        }

        Ok(Self {
            num_rows: sizes.0,
            num_cols: sizes.1,
            rowptr,
            col: out_col,
            value: out_value,
        })
    }

    /// 由稠密矩阵中的非零元创建（主要用于测试和小图）
    pub fn from_dense(dense: &Tensor) -> Self {
        let mut row = Vec::new();
        let mut col = Vec::new();
        let mut value = Vec::new();
        for ((i, j), &v) in dense.data().indexed_iter() {
            if v != 0.0 {
                row.push(i);
                col.push(j);
                value.push(v);
            }
        }
        // 按行优先遍历，坐标已经有序且无重复
        let mut sparse = Self::from_coo(&row, &col, Some(value.as_slice()), (dense.rows(), dense.cols()))
            .unwrap_or_else(|_| Self::empty((dense.rows(), dense.cols())));
        if value.iter().all(|&v| v == 1.0) {
            sparse.value = None;
        }
        sparse
    }

    /// 没有任何非零元的稀疏矩阵
    pub fn empty(sizes: (usize, usize)) -> Self {
        Self {
            num_rows: sizes.0,
            num_cols: sizes.1,
            rowptr: vec![0; sizes.0 + 1],
            col: Vec::new(),
            value: None,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn sizes(&self) -> (usize, usize) {
        (self.num_rows, self.num_cols)
    }

    /// 非零元个数
    pub fn nnz(&self) -> usize {
        self.col.len()
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// 只保留稀疏结构，丢弃边权（所有边权视为1）
    pub fn without_value(&self) -> Self {
        Self {
            num_rows: self.num_rows,
            num_cols: self.num_cols,
            rowptr: self.rowptr.clone(),
            col: self.col.clone(),
            value: None,
        }
    }

    /// 第`i`行的非零元个数
    pub fn row_nnz(&self, i: usize) -> usize {
        self.rowptr[i + 1] - self.rowptr[i]
    }

    /// 遍历第`i`行的所有（列号, 边权）
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, f32)> + '_ {
        (self.rowptr[i]..self.rowptr[i + 1]).map(move |k| (self.col[k], self.value_at(k)))
    }

    /// 坐标`(i, j)`处的边权，不存在时为0
    pub fn get(&self, i: usize, j: usize) -> f32 {
        let cols = &self.col[self.rowptr[i]..self.rowptr[i + 1]];
        cols.binary_search(&j)
            .map_or(0.0, |pos| self.value_at(self.rowptr[i] + pos))
    }

    /// 把对角线元素统一设为1：先移除已有的自环，再为每个`i < min(rows, cols)`插入`(i, i, 1)`
    pub fn set_diag(&self) -> Self {
        let mut row = Vec::with_capacity(self.nnz() + self.num_rows);
        let mut col = Vec::with_capacity(self.nnz() + self.num_rows);
        let mut value = Vec::with_capacity(self.nnz() + self.num_rows);
        for i in 0..self.num_rows {
            for (j, v) in self.row(i) {
                if i != j {
                    row.push(i);
                    col.push(j);
                    value.push(v);
                }
            }
        }
        for i in 0..self.num_rows.min(self.num_cols) {
            row.push(i);
            col.push(i);
            value.push(1.0);
        }
        let value = self.value.as_ref().map(|_| value.as_slice());
        Self::from_coo(&row, &col, value, self.sizes())
            .unwrap_or_else(|_| Self::empty(self.sizes()))
    }

    /// 按行求和（即加权入度），返回长度为`num_rows`的向量
    pub fn sum_rows(&self) -> Vec<f32> {
        (0..self.num_rows)
            .map(|i| self.row(i).map(|(_, v)| v).sum::<f32>())
            .collect()
    }

    /// 边权缩放：`v_ij <- left[i] * v_ij * right[j]`
    pub fn scale_rows_cols(&self, left: &[f32], right: &[f32]) -> Self {
        assert!(
            left.len() == self.num_rows && right.len() == self.num_cols,
            "缩放系数长度({}, {})与稀疏矩阵尺寸{:?}不符",
            left.len(),
            right.len(),
            self.sizes()
        );
        let mut value = Vec::with_capacity(self.nnz());
        for i in 0..self.num_rows {
            for (j, v) in self.row(i) {
                value.push(left[i] * v * right[j]);
            }
        }
        Self {
            value: Some(value),
            ..self.clone()
        }
    }

    /// 稀疏-稠密矩阵乘：`[rows, cols] @ [cols, f] -> [rows, f]`
    pub fn spmm(&self, x: &Tensor, reduce: Reduce) -> Tensor {
        assert!(
            x.rows() == self.num_cols,
            "稀疏矩阵尺寸{:?}与稠密矩阵形状{:?}无法相乘",
            self.sizes(),
            x.shape()
        );
        let x = x.data();
        let mut out = Array2::<f32>::zeros((self.num_rows, x.ncols()));
        for i in 0..self.num_rows {
            let scale = self.reduce_scale(i, reduce);
            if scale == 0.0 {
                continue;
            }
            let mut dst = out.row_mut(i);
            for (j, v) in self.row(i) {
                dst.scaled_add(v * scale, &x.row(j));
            }
        }
        Tensor::from_array(out)
    }

    /// `spmm`对稠密输入的反向：`adj^T @ grad`（均值聚合时每行先按`1/nnz`缩放）。
    /// `grad`形状为`[rows, f]`，返回`[cols, f]`
    pub fn spmm_transpose(&self, grad: &Tensor, reduce: Reduce) -> Tensor {
        assert!(
            grad.rows() == self.num_rows,
            "稀疏矩阵尺寸{:?}的转置与稠密矩阵形状{:?}无法相乘",
            self.sizes(),
            grad.shape()
        );
        let grad = grad.data();
        let mut out = Array2::<f32>::zeros((self.num_cols, grad.ncols()));
        for i in 0..self.num_rows {
            let scale = self.reduce_scale(i, reduce);
            if scale == 0.0 {
                continue;
            }
            let src = grad.row(i);
            for (j, v) in self.row(i) {
                out.row_mut(j).scaled_add(v * scale, &src);
            }
        }
        Tensor::from_array(out)
    }

    /// 转为稠密矩阵（仅用于测试和小图）
    pub fn to_dense(&self) -> Tensor {
        let mut dense = Tensor::zeros(&[self.num_rows, self.num_cols]);
        for i in 0..self.num_rows {
            for (j, v) in self.row(i) {
                dense[[i, j]] = v;
            }
        }
        dense
    }
}

// 私有方法
impl SparseTensor {
    fn value_at(&self, k: usize) -> f32 {
        self.value.as_ref().map_or(1.0, |v| v[k])
    }

    fn reduce_scale(&self, i: usize, reduce: Reduce) -> f32 {
        match reduce {
            Reduce::Sum => 1.0,
            Reduce::Mean => match self.row_nnz(i) {
                0 => 0.0,
                n => 1.0 / n as f32,
            },
        }
    }
}
