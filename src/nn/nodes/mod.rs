/*
 * @Author       : 老董
 * @Description  : 计算图节点：节点句柄、节点类型与节点特性
 *
 * 所有节点都是二阶张量（见`Tensor`），节点在创建时即确定输出形状，
 * 前向时按父节点的值计算本节点的值，反向时以 VJP（向量-雅可比积）的方式
 * 把上游梯度传给各个父节点。
 */

mod input;
mod loss;
mod ops;
mod parameter;

pub(in crate::nn) use input::Input;
pub(in crate::nn) use loss::*;
pub(in crate::nn) use ops::*;
pub(in crate::nn) use parameter::Parameter;

use std::fmt;

use enum_dispatch::enum_dispatch;
use rand::rngs::StdRng;

use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 节点在所属计算图中的编号。编号按创建顺序递增，父节点的编号总是小于子节点。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    pub(in crate::nn) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 前向计算时节点可用的图级别上下文
pub(in crate::nn) struct ForwardContext<'a> {
    pub is_train_mode: bool,
    pub rng: &'a mut StdRng,
}

#[enum_dispatch]
#[derive(Debug, Clone)]
pub(in crate::nn) enum NodeType {
    Input(Input),
    Parameter(Parameter),
    MatMul(MatMul),
    Propagate(Propagate),
    Add(Add),
    AddBias(AddBias),
    Relu(Relu),
    Dropout(Dropout),
    LogSoftmax(LogSoftmax),
    SelectRows(SelectRows),
    NllLoss(NllLoss),
}

#[enum_dispatch(NodeType)]
pub(in crate::nn) trait TraitNode {
    /// 节点类型名，用于生成类似"MatMul_3"的默认节点名
    fn type_name(&self) -> &'static str;

    /// 本节点值的形状（创建节点时即已确定）
    fn value_expected_shape(&self) -> &[usize];

    /// 叶子节点（输入、参数）的值由外部设置，不由父节点计算
    fn is_leaf(&self) -> bool {
        false
    }

    /// 返回该节点的值是否应该在训练过程中被更新
    fn is_trainable(&self) -> bool {
        false
    }

    // 根据父节点的值计算本节点的值（调用前图已保证所有父节点都有值，且`parents`与父节点顺序一致）
    fn calc_value_by_parents(
        &mut self,
        parents: &[&Tensor],
        ctx: &mut ForwardContext<'_>,
    ) -> Result<Tensor, GraphError>;

    /// 已知上游梯度`upstream`（与本节点值同形状），计算损失对第`parent_index`个父节点的梯度
    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError>;
}

/// 计算图中的一个节点：节点本身（`NodeType`）加上图为其维护的值、梯度与拓扑信息
#[derive(Debug, Clone)]
pub(in crate::nn) struct NodeHandle {
    id: NodeId,
    name: String,
    parents: Vec<NodeId>,
    raw_node: NodeType,
    value: Option<Tensor>,
    grad: Option<Tensor>,
}

impl NodeHandle {
    pub fn new<T: Into<NodeType>>(id: NodeId, name: String, parents: Vec<NodeId>, raw_node: T) -> Self {
        Self {
            id,
            name,
            parents,
            raw_node: raw_node.into(),
            value: None,
            grad: None,
        }
    }

    pub const fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    pub const fn raw_node(&self) -> &NodeType {
        &self.raw_node
    }

    pub fn raw_node_mut(&mut self) -> &mut NodeType {
        &mut self.raw_node
    }

    pub fn shape(&self) -> &[usize] {
        self.raw_node.value_expected_shape()
    }

    pub fn is_leaf(&self) -> bool {
        self.raw_node.is_leaf()
    }

    pub fn is_trainable(&self) -> bool {
        self.raw_node.is_trainable()
    }

    pub const fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: Option<Tensor>) {
        self.value = value;
    }

    pub const fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    pub fn set_grad(&mut self, grad: Option<Tensor>) {
        self.grad = grad;
    }

    /// 累加梯度（同一参数被多条路径使用、或多次反向传播之间未清零时）
    pub fn accumulate_grad(&mut self, grad: &Tensor) {
        match self.grad.as_mut() {
            Some(acc) => *acc += grad,
            None => self.grad = Some(grad.clone()),
        }
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "节点[id={}, name={}, type={}]", self.id, self.name, self.raw_node.type_name())
    }
}

/// 校验父节点个数，供各节点的`new`使用
pub(in crate::nn) fn check_parents_count(
    type_name: &str,
    parent_shapes: &[&[usize]],
    expected: usize,
) -> Result<(), GraphError> {
    if parent_shapes.len() == expected {
        Ok(())
    } else {
        Err(GraphError::InvalidOperation(format!(
            "{type_name}节点需要{expected}个父节点，实际为{}个",
            parent_shapes.len()
        )))
    }
}

/// 叶子节点没有父节点，任何"由父节点计算"的调用都是crate内部的错误
pub(in crate::nn) fn leaf_node_error(type_name: &str) -> GraphError {
    GraphError::InvalidOperation(format!("{type_name}节点是叶子节点，其值不由父节点计算"))
}
