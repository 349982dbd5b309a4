/*
 * @Author       : 老董
 * @Description  : 图卷积层
 *
 * 每个图卷积层在创建时只登记参数节点；调用`forward`时才向图中追加运算节点，
 * 返回本层输出节点的`NodeId`。
 */

mod gcn_conv;
mod sage_conv;

pub use gcn_conv::GcnConv;
pub use sage_conv::SageConv;
pub(in crate::nn) use sage_conv::unweighted_adj;

use std::rc::Rc;

use enum_dispatch::enum_dispatch;

use crate::nn::{Graph, GraphError, Module, NodeId};
use crate::sparse::SparseTensor;

/// 图卷积算子的公共接口
#[enum_dispatch]
pub trait GraphConv {
    /// 在图中追加本层的运算节点：输入特征`x: [N, in]`，输出`[N, out]`
    fn forward(&self, graph: &mut Graph, x: NodeId, adj_t: &Rc<SparseTensor>) -> Result<NodeId, GraphError>;

    fn in_features(&self) -> usize;

    fn out_features(&self) -> usize;

    /// 按各参数的初始化策略重新初始化本层参数
    fn reset_parameters(&self, graph: &mut Graph) -> Result<(), GraphError>;
}

/// 可选的图卷积算子
#[enum_dispatch(GraphConv)]
#[derive(Debug, Clone)]
pub enum Conv {
    Gcn(GcnConv),
    Sage(SageConv),
}

impl Module for Conv {
    fn named_parameters(&self) -> Vec<(String, NodeId)> {
        match self {
            Self::Gcn(conv) => conv.named_parameters(),
            Self::Sage(conv) => conv.named_parameters(),
        }
    }
}
