use super::{Graph, GraphError};
use crate::nn::NodeId;
use crate::nn::nodes::{NodeHandle, NodeType};
use crate::tensor::Tensor;

impl Graph {
    // ========== 节点查询 ==========

    pub(in crate::nn) fn get_node(&self, id: NodeId) -> Result<&NodeHandle, GraphError> {
        self.nodes.get(id.index()).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::nn) fn get_node_mut(&mut self, id: NodeId) -> Result<&mut NodeHandle, GraphError> {
        self.nodes.get_mut(id.index()).ok_or(GraphError::NodeNotFound(id))
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn get_node_name(&self, id: NodeId) -> Result<&str, GraphError> {
        Ok(self.get_node(id)?.name())
    }

    pub fn get_node_parents(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        Ok(self.get_node(id)?.parents().to_vec())
    }

    /// 节点值的形状（创建节点时即已确定，与是否已前向无关）
    pub fn get_node_shape(&self, id: NodeId) -> Result<Vec<usize>, GraphError> {
        Ok(self.get_node(id)?.shape().to_vec())
    }

    /// 按名称查找节点
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.name() == name).map(NodeHandle::id)
    }

    /// 图中所有可训练节点（参数），按创建顺序
    pub fn get_trainable_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.is_trainable())
            .map(NodeHandle::id)
            .collect()
    }

    // ========== 值与梯度 ==========

    pub fn get_node_value(&self, id: NodeId) -> Result<Option<&Tensor>, GraphError> {
        Ok(self.get_node(id)?.value())
    }

    /// 设置叶子节点（输入、参数）的值，形状须与节点创建时的形状一致
    pub fn set_node_value(&mut self, id: NodeId, value: &Tensor) -> Result<(), GraphError> {
        let node = self.get_node_mut(id)?;
        if !node.is_leaf() {
            return Err(GraphError::InvalidOperation(format!(
                "{node}不是叶子节点，其值只能由前向传播计算"
            )));
        }
        if node.shape() != value.shape() {
            return Err(GraphError::ShapeMismatch {
                expected: node.shape().to_vec(),
                got: value.shape().to_vec(),
                message: format!("{node}的值形状与创建时不一致"),
            });
        }
        node.set_value(Some(value.clone()));
        Ok(())
    }

    pub fn get_node_grad(&self, id: NodeId) -> Result<Option<&Tensor>, GraphError> {
        Ok(self.get_node(id)?.grad())
    }

    /// 清空所有节点的梯度
    pub fn zero_grad(&mut self) {
        for node in &mut self.nodes {
            node.set_grad(None);
        }
    }

    /// 按参数节点自身的初始化策略重新初始化其值，并清空其梯度
    pub fn reset_parameter(&mut self, id: NodeId) -> Result<(), GraphError> {
        let idx = id.index();
        let node = self.nodes.get_mut(idx).ok_or(GraphError::NodeNotFound(id))?;
        let NodeType::Parameter(param) = node.raw_node() else {
            return Err(GraphError::InvalidOperation(format!(
                "{node}不是参数节点，无法重置"
            )));
        };
        let value = param.init().generate(node.shape(), &mut self.rng);
        node.set_value(Some(value));
        node.set_grad(None);
        Ok(())
    }

    /// 从`target`出发向上收集其所有祖先（含自身），按编号升序即为拓扑序
    pub(in crate::nn::graph) fn ancestors(&self, target: NodeId) -> Result<Vec<NodeId>, GraphError> {
        self.get_node(target)?;
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![target];
        visited[target.index()] = true;
        while let Some(id) = stack.pop() {
            for &parent in self.get_node(id)?.parents() {
                if !visited[parent.index()] {
                    visited[parent.index()] = true;
                    stack.push(parent);
                }
            }
        }
        Ok(visited
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v)
            .map(|(i, _)| NodeId(i as u64))
            .collect())
    }
}
