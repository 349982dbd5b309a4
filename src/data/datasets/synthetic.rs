//! 分块随机图（planted partition）：同类节点之间以较高概率连边，
//! 特征为类别独热向量加均匀噪声。用于无需下载数据的冒烟测试与单元测试。

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::data::error::DataError;
use crate::data::graph::{GraphData, SplitIdx};
use crate::sparse::SparseTensor;
use crate::tensor::Tensor;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticConfig {
    pub num_nodes: usize,
    pub num_classes: usize,
    pub num_features: usize,
    /// 同类节点之间的连边概率
    pub p_in: f64,
    /// 异类节点之间的连边概率
    pub p_out: f64,
    /// 特征噪声的幅度：每个元素加上`U(-noise, noise)`
    pub feature_noise: f32,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            num_nodes: 200,
            num_classes: 4,
            num_features: 16,
            p_in: 0.1,
            p_out: 0.01,
            feature_noise: 0.5,
            seed: 0,
        }
    }
}

impl SyntheticConfig {
    fn validate(&self) -> Result<(), DataError> {
        let invalid = |msg: String| Err(DataError::FormatError(format!("合成数据集配置不合法: {msg}")));
        if self.num_nodes < 3 {
            return invalid(format!("节点数须至少为3，实际为{}", self.num_nodes));
        }
        if self.num_classes == 0 || self.num_features == 0 {
            return invalid("类别数与特征维度须大于0".to_string());
        }
        if !(0.0..=1.0).contains(&self.p_in) || !(0.0..=1.0).contains(&self.p_out) {
            return invalid(format!("连边概率须在[0, 1]内：p_in={}, p_out={}", self.p_in, self.p_out));
        }
        if self.feature_noise < 0.0 {
            return invalid(format!("噪声幅度须非负，实际为{}", self.feature_noise));
        }
        Ok(())
    }
}

pub(super) fn generate(config: &SyntheticConfig) -> Result<(GraphData, SplitIdx), DataError> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let n = config.num_nodes;

    let y: Vec<usize> = (0..n).map(|i| i % config.num_classes).collect();

    let mut x = Tensor::new_uniform(
        -config.feature_noise,
        config.feature_noise,
        &[n, config.num_features],
        &mut rng,
    );
    for (i, &label) in y.iter().enumerate() {
        x[[i, label % config.num_features]] += 1.0;
    }

    let mut row = Vec::new();
    let mut col = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let p = if y[i] == y[j] { config.p_in } else { config.p_out };
            if rng.gen_bool(p) {
                row.extend([i, j]);
                col.extend([j, i]);
            }
        }
    }
    let adj_t = SparseTensor::from_coo(&row, &col, None, (n, n))
        .map_err(|e| DataError::FormatError(e.to_string()))?;

    // 60% / 20% / 20% 随机划分，每部分至少一个节点
    let mut perm: Vec<usize> = (0..n).collect();
    perm.shuffle(&mut rng);
    let num_train = (n * 6 / 10).max(1);
    let num_valid = (n * 2 / 10).max(1);
    let test = perm.split_off(num_train + num_valid);
    let valid = perm.split_off(num_train);
    let split_idx = SplitIdx::new(perm, valid, test, n)?;

    let graph = GraphData::new(x, y, adj_t)?;
    info!(num_nodes = n, num_edges = graph.num_edges(), seed = config.seed, "已生成合成数据集");
    Ok((graph, split_idx))
}
