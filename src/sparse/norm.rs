//! GCN 的对称归一化：`D^-1/2 (A + I) D^-1/2`

use tracing::debug;

use super::SparseTensor;

/// 按行求度后取`deg^-0.5`；度为0的节点（倒数为inf）系数记为0，绝不产生NaN/inf
pub fn deg_inv_sqrt(adj_t: &SparseTensor) -> Vec<f32> {
    adj_t
        .sum_rows()
        .into_iter()
        .map(|deg| {
            let d = deg.powf(-0.5);
            if d.is_infinite() { 0.0 } else { d }
        })
        .collect()
}

/// 预先计算 GCN 归一化后的邻接矩阵：
/// 1. `set_diag`：每个对角元设为1（已有自环被替换而不是累加）；
/// 2. 按行求度，取`deg^-0.5`，inf 置0；
/// 3. 每条边`v_ij`乘以`deg_inv_sqrt[i] * deg_inv_sqrt[j]`。
///
/// 邻接矩阵须为方阵。不会失败：孤立节点只会得到全0的行和列。
pub fn gcn_norm(adj_t: &SparseTensor) -> SparseTensor {
    let adj_t = adj_t.set_diag();
    let dis = deg_inv_sqrt(&adj_t);
    let zero_degree = dis.iter().filter(|&&d| d == 0.0).count();
    debug!(
        nnz = adj_t.nnz(),
        zero_degree, "已完成邻接矩阵的对称归一化"
    );
    adj_t.scale_rows_cols(&dis, &dis)
}
