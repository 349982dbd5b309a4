/*
 * @Author       : 老董
 * @Description  : 多层图卷积网络（GCN / GraphSAGE 共用一套结构）
 */

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::layer::{Conv, GcnConv, GraphConv, SageConv, unweighted_adj};
use super::{Graph, GraphError, Module, NodeId, StateDict};
use crate::sparse::SparseTensor;

/// 图卷积算子的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvKind {
    Gcn,
    Sage,
}

impl ConvKind {
    pub const fn from_use_sage(use_sage: bool) -> Self {
        if use_sage { Self::Sage } else { Self::Gcn }
    }

    /// 用于日志和模型文件名的大写名称
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gcn => "GCN",
            Self::Sage => "SAGE",
        }
    }
}

impl fmt::Display for ConvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 多层图卷积网络
///
/// 结构：`in -> hidden`、`(num_layers - 2)`个`hidden -> hidden`、`hidden -> out`；
/// 除最后一层外，每层之后依次接 ReLU 与 Dropout（仅训练模式生效）；
/// 最后对输出逐行做 log_softmax。
///
/// # 使用示例
/// ```ignore
/// let mut graph = Graph::new_with_seed(42);
/// let model = GraphConvNet::new(&mut graph, ConvKind::Gcn, 100, 256, 47, 3, 0.5)?;
/// let x = graph.new_input_node(&[n, 100], Some("x"))?;
/// let out = model.forward(&mut graph, x, &adj_t)?;
/// ```
#[derive(Debug, Clone)]
pub struct GraphConvNet {
    kind: ConvKind,
    convs: Vec<Conv>,
    dropout: f32,
}

impl GraphConvNet {
    pub fn new(
        graph: &mut Graph,
        kind: ConvKind,
        in_channels: usize,
        hidden_channels: usize,
        out_channels: usize,
        num_layers: usize,
        dropout: f32,
    ) -> Result<Self, GraphError> {
        // 1. 必要的验证
        if num_layers < 2 {
            return Err(GraphError::InvalidOperation(format!(
                "图卷积网络至少需要2层，实际为{num_layers}层"
            )));
        }
        if !(0.0..=1.0).contains(&dropout) {
            return Err(GraphError::InvalidOperation(format!(
                "dropout须在[0, 1]内，实际为{dropout}"
            )));
        }

        // 2. 逐层创建
        let mut dims = Vec::with_capacity(num_layers + 1);
        dims.push(in_channels);
        dims.extend(std::iter::repeat_n(hidden_channels, num_layers - 1));
        dims.push(out_channels);

        let mut convs = Vec::with_capacity(num_layers);
        for (i, pair) in dims.windows(2).enumerate() {
            let name = format!("convs.{i}");
            let conv: Conv = match kind {
                ConvKind::Gcn => GcnConv::new(graph, pair[0], pair[1], &name)?.into(),
                ConvKind::Sage => SageConv::new(graph, pair[0], pair[1], &name)?.into(),
            };
            convs.push(conv);
        }

        // 3. 返回
        Ok(Self {
            kind,
            convs,
            dropout,
        })
    }

    /// 在图中追加整个网络的运算节点，返回 log_softmax 输出节点`[N, out]`
    pub fn forward(&self, graph: &mut Graph, x: NodeId, adj_t: &Rc<SparseTensor>) -> Result<NodeId, GraphError> {
        let (last, hidden) = self
            .convs
            .split_last()
            .ok_or_else(|| GraphError::InvalidOperation("网络没有任何层".to_string()))?;
        // SAGE 各层共享同一份去掉边权的邻接矩阵
        let adj_t = match self.kind {
            ConvKind::Gcn => Rc::clone(adj_t),
            ConvKind::Sage => unweighted_adj(adj_t),
        };
        let mut h = x;
        for conv in hidden {
            h = conv.forward(graph, h, &adj_t)?;
            h = graph.new_relu_node(h, None)?;
            h = graph.new_dropout_node(h, self.dropout, None)?;
        }
        let h = last.forward(graph, h, &adj_t)?;
        graph.new_log_softmax_node(h, None)
    }

    /// 按各层的初始化策略重新初始化所有参数
    pub fn reset_parameters(&self, graph: &mut Graph) -> Result<(), GraphError> {
        for conv in &self.convs {
            conv.reset_parameters(graph)?;
        }
        Ok(())
    }

    pub const fn kind(&self) -> ConvKind {
        self.kind
    }

    /// 输入特征维度（即第一层的输入维度）
    pub fn in_channels(&self) -> usize {
        self.convs.first().map_or(0, GraphConv::in_features)
    }

    pub fn out_channels(&self) -> usize {
        self.convs.last().map_or(0, GraphConv::out_features)
    }

    pub fn num_layers(&self) -> usize {
        self.convs.len()
    }

    pub const fn dropout(&self) -> f32 {
        self.dropout
    }

    /// 导出当前所有参数值
    pub fn state_dict(&self, graph: &Graph) -> Result<StateDict, GraphError> {
        let mut state = StateDict::new();
        for (name, id) in self.named_parameters() {
            let value = graph
                .get_node_value(id)?
                .ok_or_else(|| GraphError::ComputationError(format!("参数 {name} 没有值")))?;
            state.insert(name, value.clone());
        }
        Ok(state)
    }

    /// 载入参数值。键须与`named_parameters`完全一致，且每个张量形状须与参数相同
    pub fn load_state_dict(&self, graph: &mut Graph, state: &StateDict) -> Result<(), GraphError> {
        let named = self.named_parameters();
        if let Some(unexpected) = state.keys().find(|k| !named.iter().any(|(n, _)| n == *k)) {
            return Err(GraphError::InvalidOperation(format!(
                "状态字典中存在模型没有的参数：{unexpected}"
            )));
        }
        for (name, id) in named {
            let value = state.get(&name).ok_or_else(|| {
                GraphError::InvalidOperation(format!("状态字典中缺少参数：{name}"))
            })?;
            graph.set_node_value(id, value)?;
        }
        Ok(())
    }
}

impl Module for GraphConvNet {
    fn named_parameters(&self) -> Vec<(String, NodeId)> {
        self.convs.iter().flat_map(Module::named_parameters).collect()
    }
}
