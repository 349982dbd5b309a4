
use crate::data::{NodePropPredDataset, SyntheticConfig};
use crate::nn::{ConvKind, Graph, GraphConvNet};
use crate::train::Session;

/// 在小型合成图上搭一个不带 Dropout 的会话
fn small_session(kind: ConvKind, num_nodes: usize, hidden: usize, lr: f32) -> Session {
    let config = SyntheticConfig {
        num_nodes,
        num_classes: 2,
        num_features: 3,
        p_in: 1.0,
        p_out: 0.0,
        ..SyntheticConfig::default()
    };
    let mut dataset = NodePropPredDataset::synthetic(&config).unwrap();
    let mut graph = Graph::new_with_seed(7);
    let model = GraphConvNet::new(&mut graph, kind, 3, hidden, 2, 2, 0.0).unwrap();
    dataset.graph_mut().normalize_adj();
    let (data, split_idx) = dataset.into_parts();
    Session::new(graph, model, &data, split_idx, lr).unwrap()
}
