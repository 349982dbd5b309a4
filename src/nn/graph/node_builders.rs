use std::rc::Rc;

use super::{Graph, GraphError};
use crate::nn::nodes::{
    Add, AddBias, Dropout, Input, LogSoftmax, MatMul, NllLoss, NodeHandle, NodeType, Parameter,
    Propagate, Relu, SelectRows, TraitNode,
};
use crate::nn::{Init, NodeId};
use crate::sparse::{Reduce, SparseTensor};

impl Graph {
    /// 新建输入节点，其值须之后由`set_node_value`设置
    pub fn new_input_node(&mut self, shape: &[usize], name: Option<&str>) -> Result<NodeId, GraphError> {
        let node = Input::new(shape)?;
        self.add_node(node, &[], name)
    }

    /// 新建参数节点，并立即按`init`用图的 RNG 初始化
    pub fn new_parameter_node(
        &mut self,
        shape: &[usize],
        init: Init,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = Parameter::new(shape, init)?;
        let id = self.add_node(node, &[], name)?;
        self.reset_parameter(id)?;
        Ok(id)
    }

    pub fn new_mat_mul_node(&mut self, a: NodeId, b: NodeId, name: Option<&str>) -> Result<NodeId, GraphError> {
        let node = MatMul::new(&self.parent_shapes(&[a, b])?)?;
        self.add_node(node, &[a, b], name)
    }

    /// 新建消息传递节点：`out = adj_t @ x`
    pub fn new_propagate_node(
        &mut self,
        x: NodeId,
        adj_t: Rc<SparseTensor>,
        reduce: Reduce,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = Propagate::new(&self.parent_shapes(&[x])?, adj_t, reduce)?;
        self.add_node(node, &[x], name)
    }

    pub fn new_add_node(&mut self, a: NodeId, b: NodeId, name: Option<&str>) -> Result<NodeId, GraphError> {
        let node = Add::new(&self.parent_shapes(&[a, b])?)?;
        self.add_node(node, &[a, b], name)
    }

    pub fn new_add_bias_node(
        &mut self,
        x: NodeId,
        bias: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = AddBias::new(&self.parent_shapes(&[x, bias])?)?;
        self.add_node(node, &[x, bias], name)
    }

    pub fn new_relu_node(&mut self, x: NodeId, name: Option<&str>) -> Result<NodeId, GraphError> {
        let node = Relu::new(&self.parent_shapes(&[x])?)?;
        self.add_node(node, &[x], name)
    }

    pub fn new_dropout_node(&mut self, x: NodeId, p: f32, name: Option<&str>) -> Result<NodeId, GraphError> {
        let node = Dropout::new(&self.parent_shapes(&[x])?, p)?;
        self.add_node(node, &[x], name)
    }

    pub fn new_log_softmax_node(&mut self, x: NodeId, name: Option<&str>) -> Result<NodeId, GraphError> {
        let node = LogSoftmax::new(&self.parent_shapes(&[x])?)?;
        self.add_node(node, &[x], name)
    }

    pub fn new_select_rows_node(
        &mut self,
        x: NodeId,
        index: Rc<[usize]>,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = SelectRows::new(&self.parent_shapes(&[x])?, index)?;
        self.add_node(node, &[x], name)
    }

    pub fn new_nll_loss_node(
        &mut self,
        input: NodeId,
        target: Rc<[usize]>,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = NllLoss::new(&self.parent_shapes(&[input])?, target)?;
        self.add_node(node, &[input], name)
    }
}

// 私有方法
impl Graph {
    fn parent_shapes(&self, parents: &[NodeId]) -> Result<Vec<&[usize]>, GraphError> {
        parents
            .iter()
            .map(|&id| self.get_node(id).map(NodeHandle::shape))
            .collect()
    }

    fn add_node<T: Into<NodeType>>(
        &mut self,
        raw_node: T,
        parents: &[NodeId],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let raw_node: NodeType = raw_node.into();
        let id = NodeId(self.nodes.len() as u64);
        let name = match name {
            Some(name) => {
                if self.find_node(name).is_some() {
                    return Err(GraphError::DuplicateNodeName(name.to_string()));
                }
                name.to_string()
            }
            None => format!("{}_{}", raw_node.type_name(), id.0),
        };
        self.nodes
            .push(NodeHandle::new(id, name, parents.to_vec(), raw_node));
        Ok(id)
    }
}
