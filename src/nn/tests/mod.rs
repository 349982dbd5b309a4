mod graph_backward;
mod model;

use crate::nn::{Graph, GraphError, NodeId};
use crate::tensor::Tensor;

/// 前向后读取标量损失
fn loss_value(graph: &mut Graph, loss: NodeId) -> Result<f32, GraphError> {
    graph.forward(loss)?;
    Ok(graph
        .get_node_value(loss)?
        .and_then(Tensor::number)
        .expect("损失应为[1, 1]"))
}

/// 对叶子节点`param`逐元素做中心差分，返回数值梯度
fn numerical_grad(graph: &mut Graph, loss: NodeId, param: NodeId, h: f32) -> Result<Tensor, GraphError> {
    let base = graph.get_node_value(param)?.expect("参数应有值").clone();
    let mut grad = Tensor::zeros(base.shape());
    for i in 0..base.rows() {
        for j in 0..base.cols() {
            let mut plus = base.clone();
            plus[[i, j]] += h;
            graph.set_node_value(param, &plus)?;
            let loss_plus = loss_value(graph, loss)?;

            let mut minus = base.clone();
            minus[[i, j]] -= h;
            graph.set_node_value(param, &minus)?;
            let loss_minus = loss_value(graph, loss)?;

            grad[[i, j]] = (loss_plus - loss_minus) / (2.0 * h);
        }
    }
    graph.set_node_value(param, &base)?;
    Ok(grad)
}

/// 清零后做一次前向+反向，返回`param`的解析梯度
fn analytic_grad(graph: &mut Graph, loss: NodeId, param: NodeId) -> Result<Tensor, GraphError> {
    graph.zero_grad();
    graph.forward(loss)?;
    graph.backward(loss)?;
    Ok(graph.get_node_grad(param)?.expect("参数应有梯度").clone())
}
