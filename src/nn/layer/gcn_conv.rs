/*
 * @Author       : 老董
 * @Description  : GCN 卷积层
 */

use std::rc::Rc;

use super::GraphConv;
use crate::nn::{Graph, GraphError, Init, Module, NodeId};
use crate::sparse::{Reduce, SparseTensor};

/// GCN 卷积层：`out = adj_t @ (x @ W) + b`
///
/// 本层不再做归一化，`adj_t`须事先经过`gcn_norm`。
///
/// # 参数形状
/// - `W`: [in_features, out_features]，Glorot 均匀初始化
/// - `b`: [1, out_features]，零初始化
#[derive(Debug, Clone)]
pub struct GcnConv {
    weight: NodeId,
    bias: NodeId,
    in_features: usize,
    out_features: usize,
    /// 参数名前缀，如`convs.0`
    name: String,
}

impl GcnConv {
    pub fn new(graph: &mut Graph, in_features: usize, out_features: usize, name: &str) -> Result<Self, GraphError> {
        let weight = graph.new_parameter_node(
            &[in_features, out_features],
            Init::XavierUniform,
            Some(&format!("{name}.weight")),
        )?;
        let bias = graph.new_parameter_node(&[1, out_features], Init::Zeros, Some(&format!("{name}.bias")))?;
        Ok(Self {
            weight,
            bias,
            in_features,
            out_features,
            name: name.to_string(),
        })
    }

    pub const fn weight(&self) -> NodeId {
        self.weight
    }

    pub const fn bias(&self) -> NodeId {
        self.bias
    }
}

impl GraphConv for GcnConv {
    fn forward(&self, graph: &mut Graph, x: NodeId, adj_t: &Rc<SparseTensor>) -> Result<NodeId, GraphError> {
        // 先做线性变换再传播：out 维度通常小于 in 维度
        let h = graph.new_mat_mul_node(x, self.weight, None)?;
        let h = graph.new_propagate_node(h, Rc::clone(adj_t), Reduce::Sum, None)?;
        graph.new_add_bias_node(h, self.bias, None)
    }

    fn in_features(&self) -> usize {
        self.in_features
    }

    fn out_features(&self) -> usize {
        self.out_features
    }

    fn reset_parameters(&self, graph: &mut Graph) -> Result<(), GraphError> {
        graph.reset_parameter(self.weight)?;
        graph.reset_parameter(self.bias)
    }
}

impl Module for GcnConv {
    fn named_parameters(&self) -> Vec<(String, NodeId)> {
        vec![
            (format!("{}.weight", self.name), self.weight),
            (format!("{}.bias", self.name), self.bias),
        ]
    }
}
