/*
 * @Author       : 老董
 * @Description  : 负责神经网络（neural network）的构建：计算图、图卷积层、优化器与参数存取
 */

mod graph;
mod init;
pub mod layer;
mod model;
mod module;
mod nodes;
pub mod optimizer;
mod state_dict;

pub use graph::{Graph, GraphError};
pub use init::Init;
pub use layer::{Conv, GcnConv, GraphConv, SageConv};
pub use model::{ConvKind, GraphConvNet};
pub use module::Module;
pub use nodes::NodeId;
pub use optimizer::{Adam, Optimizer};
pub use state_dict::StateDict;

#[cfg(test)]
mod tests;
