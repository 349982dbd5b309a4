use std::rc::Rc;

use approx::assert_abs_diff_eq;

use crate::assert_err;
use crate::nn::{ConvKind, GraphConvNet, Graph, GraphError, Module};
use crate::sparse::{SparseTensor, gcn_norm};
use crate::tensor::Tensor;

fn ring(n: usize) -> Rc<SparseTensor> {
    let row: Vec<usize> = (0..n).flat_map(|i| [i, (i + 1) % n]).collect();
    let col: Vec<usize> = (0..n).flat_map(|i| [(i + 1) % n, i]).collect();
    let adj = SparseTensor::from_coo(&row, &col, None, (n, n)).expect("合法的环形图");
    Rc::new(gcn_norm(&adj))
}

#[test]
fn test_model_rejects_bad_hyperparameters() {
    let mut graph = Graph::new();
    assert_err!(
        GraphConvNet::new(&mut graph, ConvKind::Gcn, 4, 8, 3, 1, 0.5),
        GraphError::InvalidOperation(_)
    );
    assert_err!(
        GraphConvNet::new(&mut graph, ConvKind::Sage, 4, 8, 3, 2, 1.5),
        GraphError::InvalidOperation(_)
    );
    assert_err!(
        GraphConvNet::new(&mut graph, ConvKind::Sage, 4, 8, 3, 2, -0.1),
        GraphError::InvalidOperation(_)
    );
}

#[test]
fn test_gcn_model_parameters() -> Result<(), GraphError> {
    let mut graph = Graph::new_with_seed(0);
    let model = GraphConvNet::new(&mut graph, ConvKind::Gcn, 5, 4, 3, 3, 0.5)?;
    assert_eq!(model.num_layers(), 3);
    assert_eq!(model.num_params(), 6);

    let shapes = model.state_dict(&graph)?.shapes();
    let expected = [
        ("convs.0.weight", vec![5, 4]),
        ("convs.0.bias", vec![1, 4]),
        ("convs.1.weight", vec![4, 4]),
        ("convs.1.bias", vec![1, 4]),
        ("convs.2.weight", vec![4, 3]),
        ("convs.2.bias", vec![1, 3]),
    ];
    assert_eq!(shapes.len(), expected.len());
    for (name, shape) in expected {
        assert_eq!(shapes.get(name), Some(&shape), "{name}");
    }
    Ok(())
}

#[test]
fn test_sage_model_parameters() -> Result<(), GraphError> {
    let mut graph = Graph::new_with_seed(0);
    let model = GraphConvNet::new(&mut graph, ConvKind::Sage, 5, 4, 3, 2, 0.0)?;
    assert_eq!(model.kind(), ConvKind::Sage);
    assert_eq!(model.num_params(), 6);
    let names: Vec<String> = model.named_parameters().into_iter().map(|(n, _)| n).collect();
    assert_eq!(
        names,
        [
            "convs.0.lin_l.weight",
            "convs.0.lin_l.bias",
            "convs.0.lin_r.weight",
            "convs.1.lin_l.weight",
            "convs.1.lin_l.bias",
            "convs.1.lin_r.weight",
        ]
    );
    assert_eq!(model.parameters(), graph.get_trainable_nodes());
    Ok(())
}

#[test]
fn test_model_forward_outputs_log_probabilities() -> Result<(), GraphError> {
    for kind in [ConvKind::Gcn, ConvKind::Sage] {
        let mut graph = Graph::new_with_seed(3);
        let model = GraphConvNet::new(&mut graph, kind, 3, 8, 4, 3, 0.5)?;
        let x = graph.new_input_node(&[6, 3], Some("x"))?;
        let out = model.forward(&mut graph, x, &ring(6))?;
        assert_eq!(graph.get_node_shape(out)?, vec![6, 4]);

        let values: Vec<f32> = (0..18).map(|i| (i as f32 * 0.37).sin()).collect();
        graph.set_node_value(x, &Tensor::new(&values, &[6, 3]))?;
        graph.forward(out)?;
        let probs = graph.get_node_value(out)?.unwrap().exp();
        assert_abs_diff_eq!(probs.sum_cols(), Tensor::ones(&[6, 1]), epsilon = 1e-5);
    }
    Ok(())
}

#[test]
fn test_sage_model_uses_adjacency_structure_only() -> Result<(), GraphError> {
    // 归一化后的邻接与其无权版本，对 SAGE 网络应给出相同输出
    let normalized = ring(5);
    let structure = Rc::new(normalized.without_value());
    let values: Vec<f32> = (0..10).map(|i| (i as f32 * 0.61).cos()).collect();
    let mut outputs = Vec::new();
    for adj_t in [&normalized, &structure] {
        let mut graph = Graph::new_with_seed(8);
        let model = GraphConvNet::new(&mut graph, ConvKind::Sage, 2, 4, 3, 3, 0.0)?;
        let x = graph.new_input_node(&[5, 2], Some("x"))?;
        let out = model.forward(&mut graph, x, adj_t)?;
        graph.set_node_value(x, &Tensor::new(&values, &[5, 2]))?;
        graph.forward(out)?;
        outputs.push(graph.get_node_value(out)?.unwrap().clone());
    }
    assert_abs_diff_eq!(&outputs[0], &outputs[1], epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_model_eval_mode_is_deterministic() -> Result<(), GraphError> {
    let mut graph = Graph::new_with_seed(4);
    let model = GraphConvNet::new(&mut graph, ConvKind::Gcn, 2, 16, 3, 2, 0.5)?;
    let x = graph.new_input_node(&[6, 2], Some("x"))?;
    let out = model.forward(&mut graph, x, &ring(6))?;
    graph.set_node_value(x, &Tensor::ones(&[6, 2]))?;

    graph.set_eval_mode();
    graph.forward(out)?;
    let first = graph.get_node_value(out)?.unwrap().clone();
    graph.forward(out)?;
    assert_eq!(graph.get_node_value(out)?, Some(&first));
    Ok(())
}

#[test]
fn test_model_reset_parameters() -> Result<(), GraphError> {
    let mut graph = Graph::new_with_seed(5);
    let model = GraphConvNet::new(&mut graph, ConvKind::Sage, 3, 4, 2, 2, 0.5)?;
    let before = model.state_dict(&graph)?;
    model.reset_parameters(&mut graph)?;
    let after = model.state_dict(&graph)?;
    assert_eq!(before.shapes(), after.shapes());
    assert_ne!(before, after);
    Ok(())
}

#[test]
fn test_same_seed_same_initialization() -> Result<(), GraphError> {
    let init = |seed| -> Result<_, GraphError> {
        let mut graph = Graph::new_with_seed(seed);
        let model = GraphConvNet::new(&mut graph, ConvKind::Gcn, 3, 4, 2, 3, 0.5)?;
        model.state_dict(&graph)
    };
    assert_eq!(init(9)?, init(9)?);
    Ok(())
}

#[test]
fn test_conv_kind_names() {
    assert_eq!(ConvKind::from_use_sage(false), ConvKind::Gcn);
    assert_eq!(ConvKind::from_use_sage(true), ConvKind::Sage);
    assert_eq!(ConvKind::Gcn.to_string(), "GCN");
    assert_eq!(ConvKind::Sage.as_str(), "SAGE");
}
