/*
 * @Author       : 老董
 * @Description  : GraphSAGE 卷积层（均值聚合）
 */

use std::rc::Rc;

use super::GraphConv;
use crate::nn::{Graph, GraphError, Init, Module, NodeId};
use crate::sparse::{Reduce, SparseTensor};

/// GraphSAGE 卷积层：
/// ```text
/// out = mean_agg(adj_t, x) @ W_l + b_l + x @ W_r
/// ```
/// 其中`mean_agg`只看邻接结构、忽略边权：对每个目标节点的邻居特征求和后除以邻居个数（无邻居时为0）。
/// 即使`adj_t`已经过`gcn_norm`，其自环仍计入邻居，但归一化系数不参与聚合。
/// `lin_l`、`lin_r`采用`torch.nn.Linear`的默认初始化，`lin_r`不带偏置。
#[derive(Debug, Clone)]
pub struct SageConv {
    lin_l_weight: NodeId,
    lin_l_bias: NodeId,
    lin_r_weight: NodeId,
    in_features: usize,
    out_features: usize,
    name: String,
}

impl SageConv {
    pub fn new(graph: &mut Graph, in_features: usize, out_features: usize, name: &str) -> Result<Self, GraphError> {
        let bias_bound = 1.0 / (in_features.max(1) as f32).sqrt();
        let lin_l_weight = graph.new_parameter_node(
            &[in_features, out_features],
            Init::KaimingUniform,
            Some(&format!("{name}.lin_l.weight")),
        )?;
        let lin_l_bias = graph.new_parameter_node(
            &[1, out_features],
            Init::Uniform { bound: bias_bound },
            Some(&format!("{name}.lin_l.bias")),
        )?;
        let lin_r_weight = graph.new_parameter_node(
            &[in_features, out_features],
            Init::KaimingUniform,
            Some(&format!("{name}.lin_r.weight")),
        )?;
        Ok(Self {
            lin_l_weight,
            lin_l_bias,
            lin_r_weight,
            in_features,
            out_features,
            name: name.to_string(),
        })
    }
}

impl GraphConv for SageConv {
    fn forward(&self, graph: &mut Graph, x: NodeId, adj_t: &Rc<SparseTensor>) -> Result<NodeId, GraphError> {
        // 邻居部分
        let agg = graph.new_propagate_node(x, unweighted_adj(adj_t), Reduce::Mean, None)?;
        let left = graph.new_mat_mul_node(agg, self.lin_l_weight, None)?;
        let left = graph.new_add_bias_node(left, self.lin_l_bias, None)?;
        // 根节点部分
        let right = graph.new_mat_mul_node(x, self.lin_r_weight, None)?;
        graph.new_add_node(left, right, None)
    }

    fn in_features(&self) -> usize {
        self.in_features
    }

    fn out_features(&self) -> usize {
        self.out_features
    }

    fn reset_parameters(&self, graph: &mut Graph) -> Result<(), GraphError> {
        graph.reset_parameter(self.lin_l_weight)?;
        graph.reset_parameter(self.lin_l_bias)?;
        graph.reset_parameter(self.lin_r_weight)
    }
}

/// 去掉边权的邻接矩阵；本身没有边权时直接共享
pub(in crate::nn) fn unweighted_adj(adj_t: &Rc<SparseTensor>) -> Rc<SparseTensor> {
    if adj_t.has_value() {
        Rc::new(adj_t.without_value())
    } else {
        Rc::clone(adj_t)
    }
}

impl Module for SageConv {
    fn named_parameters(&self) -> Vec<(String, NodeId)> {
        vec![
            (format!("{}.lin_l.weight", self.name), self.lin_l_weight),
            (format!("{}.lin_l.bias", self.name), self.lin_l_bias),
            (format!("{}.lin_r.weight", self.name), self.lin_r_weight),
        ]
    }
}
