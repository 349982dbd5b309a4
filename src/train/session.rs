//! 训练会话：持有计算图、模型、优化器以及构建好的前向/损失节点，
//! 并提供单步训练[`train`]与全图评估[`test`]

use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, info};

use crate::data::{Evaluator, GraphData, Split, SplitIdx};
use crate::nn::{Adam, Graph, GraphConvNet, GraphError, Module, NodeId, Optimizer};
use crate::train::{EpochResult, TrainError};

#[derive(Debug)]
pub struct Session {
    graph: Graph,
    model: GraphConvNet,
    optimizer: Adam,
    /// 节点特征输入`[N, in]`
    x: NodeId,
    /// 全图的 log_softmax 输出`[N, C]`
    out: NodeId,
    /// 训练节点上的 NLL 损失`[1, 1]`
    loss: NodeId,
    y: Vec<usize>,
    split_idx: SplitIdx,
}

impl Session {
    /// 在`graph`中为`model`搭好前向与损失节点，并写入节点特征。
    ///
    /// `data`应已完成邻接矩阵归一化（以及可能的特征替换）；
    /// 特征维度与模型输入维度不一致时返回`GraphError::ShapeMismatch`。
    pub fn new(
        mut graph: Graph,
        model: GraphConvNet,
        data: &GraphData,
        split_idx: SplitIdx,
        lr: f32,
    ) -> Result<Self, TrainError> {
        let adj_t = Rc::new(data.adj_t().clone());
        let x = graph.new_input_node(&[data.num_nodes(), model.in_channels()], Some("x"))?;
        graph.set_node_value(x, data.x())?;

        let out = model.forward(&mut graph, x, &adj_t)?;
        let train_idx: Rc<[usize]> = split_idx.train().into();
        let train_y: Rc<[usize]> = train_idx.iter().map(|&i| data.y()[i]).collect();
        let train_out = graph.new_select_rows_node(out, train_idx, Some("train_out"))?;
        let loss = graph.new_nll_loss_node(train_out, train_y, Some("loss"))?;

        let optimizer = Adam::with_params(&model.parameters(), lr, 0.9, 0.999, 1e-8);
        debug!(
            nodes = graph.nodes_count(),
            params = model.num_params(),
            "计算图构建完成"
        );
        Ok(Self {
            graph,
            model,
            optimizer,
            x,
            out,
            loss,
            y: data.y().to_vec(),
            split_idx,
        })
    }

    /// 重新初始化模型参数并清空优化器状态，开始新一次运行
    pub fn reset(&mut self) -> Result<(), TrainError> {
        self.model.reset_parameters(&mut self.graph)?;
        self.optimizer.reset();
        self.optimizer.zero_grad(&mut self.graph)?;
        Ok(())
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn model(&self) -> &GraphConvNet {
        &self.model
    }

    pub const fn input(&self) -> NodeId {
        self.x
    }

    pub const fn output(&self) -> NodeId {
        self.out
    }

    pub const fn loss(&self) -> NodeId {
        self.loss
    }

    pub fn split_idx(&self) -> &SplitIdx {
        &self.split_idx
    }

    /// eval 模式下对全图做一次前向，返回每个节点的预测类别
    pub fn predict(&mut self) -> Result<Vec<usize>, TrainError> {
        let out = self.out;
        let pred = self.graph.no_grad_scope(|graph| -> Result<Vec<usize>, GraphError> {
            graph.forward(out)?;
            graph
                .get_node_value(out)?
                .map(|value| value.argmax_rows())
                .ok_or_else(|| GraphError::ComputationError(format!("输出节点{out}没有值")))
        })?;
        Ok(pred)
    }
}

/// 训练一步：全图前向，只在训练节点上计算损失，反向传播后由 Adam 更新参数。返回损失值
pub fn train(session: &mut Session) -> Result<f32, TrainError> {
    let start = Instant::now();
    let graph = &mut session.graph;
    graph.set_train_mode();
    session.optimizer.zero_grad(graph)?;
    graph.forward(session.loss)?;
    let loss = graph.backward(session.loss)?;
    session.optimizer.step(graph)?;
    info!(loss, elapsed = ?start.elapsed(), "训练一步");
    Ok(loss)
}

/// 评估：eval 模式下全图前向（不做 Dropout，不反向），分别计算三个划分上的准确率
pub fn test(session: &mut Session, evaluator: &Evaluator) -> Result<EpochResult, TrainError> {
    let pred = session.predict()?;
    let mut acc = [0.0f32; 3];
    for (slot, split) in acc.iter_mut().zip(Split::ALL) {
        let index = session.split_idx.get(split);
        let y_true: Vec<usize> = index.iter().map(|&i| session.y[i]).collect();
        let y_pred: Vec<usize> = index.iter().map(|&i| pred[i]).collect();
        *slot = evaluator.eval(&y_true, &y_pred)?;
    }
    Ok(EpochResult::new(acc[0], acc[1], acc[2]))
}
