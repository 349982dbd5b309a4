//! # ogbn_gnn
//!
//! 用纯rust在[OGB](https://ogb.stanford.edu)节点属性预测数据集（如`ogbn-products`）上
//! 全图训练 GCN / GraphSAGE 做节点分类：读取数据、归一化邻接矩阵、训练与评估、保存模型参数。
//! 计算所需的稠密张量、稀疏邻接矩阵与带反向传播的计算图均在本crate内实现。
//!

pub mod data;
pub mod errors;
pub mod nn;
pub mod sparse;
pub mod tensor;
pub mod train;
pub mod utils;
