//! 各可导节点的梯度与中心差分结果对比。
//! 统一的损失构造：`输出 -> log_softmax -> nll_loss`。

use std::rc::Rc;

use approx::assert_abs_diff_eq;

use super::{analytic_grad, loss_value, numerical_grad};
use crate::assert_err;
use crate::nn::{Graph, GraphError, Init, NodeId};
use crate::sparse::{Reduce, SparseTensor};
use crate::tensor::Tensor;

const H: f32 = 5e-3;
const TOL: f32 = 2e-2;

fn nll_head(graph: &mut Graph, out: NodeId, labels: &[usize]) -> Result<NodeId, GraphError> {
    let logp = graph.new_log_softmax_node(out, None)?;
    graph.new_nll_loss_node(logp, Rc::from(labels.to_vec()), Some("loss"))
}

fn check_grad(graph: &mut Graph, loss: NodeId, param: NodeId) -> Result<(), GraphError> {
    let analytic = analytic_grad(graph, loss, param)?;
    let numerical = numerical_grad(graph, loss, param, H)?;
    assert_abs_diff_eq!(analytic, numerical, epsilon = TOL);
    Ok(())
}

fn path_graph() -> Rc<SparseTensor> {
    // 0 - 1 - 2，节点3孤立；带非1边权
    let adj = Tensor::new(
        &[
            0.0, 0.5, 0.0, 0.0, //
            0.5, 0.0, 2.0, 0.0, //
            0.0, 2.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 0.0,
        ],
        &[4, 4],
    );
    Rc::new(SparseTensor::from_dense(&adj))
}

#[test]
fn test_log_softmax_nll_value() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = graph.new_input_node(&[2, 3], Some("x"))?;
    let loss = nll_head(&mut graph, x, &[0, 2])?;
    graph.set_node_value(x, &Tensor::zeros(&[2, 3]))?;

    // 均匀分布时损失为 ln(3)
    assert_abs_diff_eq!(loss_value(&mut graph, loss)?, 3.0f32.ln(), epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_linear_grads() -> Result<(), GraphError> {
    let mut graph = Graph::new_with_seed(1);
    let x = graph.new_input_node(&[3, 4], Some("x"))?;
    let w = graph.new_parameter_node(&[4, 3], Init::XavierUniform, Some("w"))?;
    let b = graph.new_parameter_node(&[1, 3], Init::Uniform { bound: 0.5 }, Some("b"))?;
    let h = graph.new_mat_mul_node(x, w, None)?;
    let out = graph.new_add_bias_node(h, b, None)?;
    let loss = nll_head(&mut graph, out, &[0, 2, 1])?;
    graph.set_node_value(
        x,
        &Tensor::new(
            &[0.3, -1.2, 0.8, 0.5, 1.1, 0.4, -0.6, 0.9, -0.2, 0.7, 1.5, -1.0],
            &[3, 4],
        ),
    )?;

    check_grad(&mut graph, loss, w)?;
    check_grad(&mut graph, loss, b)?;
    // 输入节点不需要梯度
    assert_eq!(graph.get_node_grad(x)?, None);
    Ok(())
}

#[test]
fn test_propagate_grads() -> Result<(), GraphError> {
    for reduce in [Reduce::Sum, Reduce::Mean] {
        let mut graph = Graph::new_with_seed(2);
        let x = graph.new_parameter_node(&[4, 3], Init::Uniform { bound: 1.0 }, Some("x"))?;
        let out = graph.new_propagate_node(x, path_graph(), reduce, None)?;
        let loss = nll_head(&mut graph, out, &[1, 0, 2, 1])?;
        check_grad(&mut graph, loss, x)?;
    }
    Ok(())
}

#[test]
fn test_relu_grads() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = graph.new_parameter_node(&[3, 2], Init::Zeros, Some("x"))?;
    let out = graph.new_relu_node(x, None)?;
    let loss = nll_head(&mut graph, out, &[0, 1, 1])?;
    // 远离0，避开不可导点
    graph.set_node_value(x, &Tensor::new(&[0.5, -0.7, 1.2, -0.3, -0.9, 0.4], &[3, 2]))?;

    check_grad(&mut graph, loss, x)?;
    let grad = graph.get_node_grad(x)?.unwrap();
    assert_eq!(grad[[0, 1]], 0.0);
    assert_eq!(grad[[2, 0]], 0.0);
    Ok(())
}

#[test]
fn test_select_rows_and_add_grads() -> Result<(), GraphError> {
    let mut graph = Graph::new_with_seed(3);
    let a = graph.new_parameter_node(&[4, 3], Init::Uniform { bound: 1.0 }, Some("a"))?;
    let b = graph.new_parameter_node(&[4, 3], Init::Uniform { bound: 1.0 }, Some("b"))?;
    let sum = graph.new_add_node(a, b, None)?;
    // 重复索引：梯度须累加到同一行
    let picked = graph.new_select_rows_node(sum, Rc::from(vec![1, 3, 1]), None)?;
    let loss = nll_head(&mut graph, picked, &[0, 2, 1])?;

    check_grad(&mut graph, loss, a)?;
    check_grad(&mut graph, loss, b)?;
    // 未被选中的行梯度为0
    let grad = graph.get_node_grad(a)?.unwrap();
    assert!((0..3).all(|j| grad[[0, j]] == 0.0 && grad[[2, j]] == 0.0));
    Ok(())
}

#[test]
fn test_shared_parameter_grads_accumulate() -> Result<(), GraphError> {
    // 同一参数经两条路径汇合：y = x @ w + relu(x @ w)
    let mut graph = Graph::new_with_seed(4);
    let x = graph.new_input_node(&[2, 3], Some("x"))?;
    let w = graph.new_parameter_node(&[3, 2], Init::Uniform { bound: 1.0 }, Some("w"))?;
    let h = graph.new_mat_mul_node(x, w, None)?;
    let r = graph.new_relu_node(h, None)?;
    let out = graph.new_add_node(h, r, None)?;
    let loss = nll_head(&mut graph, out, &[1, 0])?;
    graph.set_node_value(x, &Tensor::new(&[0.9, -0.4, 0.2, -0.5, 0.8, 1.3], &[2, 3]))?;
    // x @ w 的各元素远离0
    graph.set_node_value(w, &Tensor::new(&[0.5, -0.3, 0.2, 0.8, -0.4, 0.6], &[3, 2]))?;

    check_grad(&mut graph, loss, w)?;
    Ok(())
}

#[test]
fn test_backward_accumulates_until_zero_grad() -> Result<(), GraphError> {
    let mut graph = Graph::new_with_seed(5);
    let w = graph.new_parameter_node(&[2, 3], Init::Uniform { bound: 1.0 }, Some("w"))?;
    let loss = nll_head(&mut graph, w, &[0, 1])?;

    let once = analytic_grad(&mut graph, loss, w)?;
    graph.forward(loss)?;
    graph.backward(loss)?;
    assert_abs_diff_eq!(graph.get_node_grad(w)?.unwrap(), &(&once * 2.0), epsilon = 1e-6);

    graph.zero_grad();
    assert_eq!(graph.get_node_grad(w)?, None);
    Ok(())
}

#[test]
fn test_backward_requires_scalar_loss() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let w = graph.new_parameter_node(&[2, 3], Init::Zeros, Some("w"))?;
    let out = graph.new_relu_node(w, None)?;

    // 未前向
    assert_err!(graph.backward(out), GraphError::ComputationError(_));
    graph.forward(out)?;
    assert_err!(graph.backward(out), GraphError::InvalidOperation(_));
    Ok(())
}

#[test]
fn test_backward_returns_loss() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let w = graph.new_parameter_node(&[1, 4], Init::Zeros, Some("w"))?;
    let loss = nll_head(&mut graph, w, &[3])?;
    graph.forward(loss)?;
    assert_abs_diff_eq!(graph.backward(loss)?, 4.0f32.ln(), epsilon = 1e-6);

    // 均匀分布下 dL/dw = softmax - onehot
    let expected = Tensor::new(&[0.25, 0.25, 0.25, -0.75], &[1, 4]);
    assert_abs_diff_eq!(graph.get_node_grad(w)?.unwrap(), &expected, epsilon = 1e-6);
    Ok(())
}
