use approx::assert_abs_diff_eq;

use super::{Reduce, SparseTensor, deg_inv_sqrt, gcn_norm};
use crate::assert_err;
use crate::errors::TensorError;
use crate::tensor::Tensor;

/// 路径图 0-1-2 加上孤立节点3（对称邻接）
fn path_with_isolated() -> SparseTensor {
    let row = [0, 1, 1, 2];
    let col = [1, 0, 2, 1];
    SparseTensor::from_coo(&row, &col, None, (4, 4)).unwrap()
}

#[test]
fn test_from_coo_sorts_and_dedups() {
    let row = [1, 0, 1, 0];
    let col = [0, 1, 0, 1];
    let adj = SparseTensor::from_coo(&row, &col, None, (2, 2)).unwrap();
    assert_eq!(adj.nnz(), 2);
    assert_eq!(adj.row(0).collect::<Vec<_>>(), vec![(1, 1.0)]);

    // 有边权时重复坐标的边权相加
    let adj = SparseTensor::from_coo(&row, &col, Some(&[1.0, 2.0, 3.0, 4.0]), (2, 2)).unwrap();
    assert_eq!(adj.get(1, 0), 4.0);
    assert_eq!(adj.get(0, 1), 6.0);
    assert_eq!(adj.get(0, 0), 0.0);
}

#[test]
fn test_from_coo_rejects_bad_input() {
    assert_err!(
        SparseTensor::from_coo(&[0, 5], &[1, 0], None, (3, 3)),
        TensorError::SparseIndexOutOfBounds { row: 5, col: 0, .. }
    );
    assert_err!(
        SparseTensor::from_coo(&[0, 1], &[1], None, (3, 3)),
        TensorError::SparseLenMismatch { .. }
    );
}

#[test]
fn test_set_diag_replaces_existing_self_loops() {
    let dense = Tensor::new(&[3.0, 1.0, 1.0, 0.0], &[2, 2]);
    let adj = SparseTensor::from_dense(&dense).set_diag();
    assert_eq!(adj.to_dense(), Tensor::new(&[1.0, 1.0, 1.0, 1.0], &[2, 2]));
}

#[test]
fn test_deg_inv_sqrt_handles_zero_degree() {
    let adj = path_with_isolated();
    let dis = deg_inv_sqrt(&adj);
    assert_abs_diff_eq!(dis[0], 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(dis[1], 1.0 / 2.0f32.sqrt(), epsilon = 1e-6);
    assert_abs_diff_eq!(dis[2], 1.0, epsilon = 1e-6);
    // 孤立节点的系数恰好为0，而不是inf/NaN
    assert_eq!(dis[3], 0.0);
}

#[test]
fn test_gcn_norm_scales_by_inverse_sqrt_degree() {
    let adj = path_with_isolated();
    let norm = gcn_norm(&adj);

    // set_diag 后度为 [2, 3, 2, 1]
    let deg = [2.0f32, 3.0, 2.0, 1.0];
    for i in 0..4 {
        for (j, v) in norm.row(i) {
            let expected = deg[i].powf(-0.5) * deg[j].powf(-0.5);
            assert_abs_diff_eq!(v, expected, epsilon = 1e-6);
        }
    }
    assert_abs_diff_eq!(norm.get(3, 3), 1.0, epsilon = 1e-6);
    assert!(norm.to_dense().is_finite());
    // 结果仍然对称
    let dense = norm.to_dense();
    assert_abs_diff_eq!(dense.clone(), dense.transpose(), epsilon = 1e-6);
}

#[test]
fn test_spmm_sum_and_mean() {
    let adj = path_with_isolated();
    let x = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0], &[4, 2]);

    let sum = adj.spmm(&x, Reduce::Sum);
    assert_eq!(sum, adj.to_dense().mat_mul(&x));

    let mean = adj.spmm(&x, Reduce::Mean);
    // 节点1有两个邻居(0, 2)，孤立节点3为0
    assert_eq!(
        mean,
        Tensor::new(&[3.0, 4.0, 3.0, 4.0, 3.0, 4.0, 0.0, 0.0], &[4, 2])
    );
}

#[test]
fn test_spmm_transpose_matches_dense() {
    let dense = Tensor::new(&[0.0, 2.0, 0.0, 1.0, 0.0, 3.0, 0.0, 0.5, 0.0], &[3, 3]);
    let adj = SparseTensor::from_dense(&dense);
    let grad = Tensor::new(&[1.0, -1.0, 2.0, 0.5, 3.0, 1.0], &[3, 2]);

    let out = adj.spmm_transpose(&grad, Reduce::Sum);
    assert_abs_diff_eq!(out, dense.transpose().mat_mul(&grad), epsilon = 1e-6);

    // 均值聚合：每行先除以该行非零元个数
    let row_scale = Tensor::new(&[1.0, 0.5, 1.0], &[3, 1]);
    let expected = dense.transpose().mat_mul(&grad.mul_col(&row_scale));
    let out = adj.spmm_transpose(&grad, Reduce::Mean);
    assert_abs_diff_eq!(out, expected, epsilon = 1e-6);
}

#[test]
fn test_without_value_keeps_structure() {
    let dense = Tensor::new(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0], &[3, 3]);
    let normalized = gcn_norm(&SparseTensor::from_dense(&dense));
    let structure = normalized.without_value();
    assert!(!structure.has_value());
    assert_eq!(structure.nnz(), normalized.nnz());
    // 自环保留，边权全部为1
    assert_eq!(structure.get(0, 0), 1.0);
    assert_eq!(structure.get(1, 2), 1.0);
    assert_eq!(structure.get(0, 2), 0.0);
}
