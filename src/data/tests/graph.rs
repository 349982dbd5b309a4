use crate::assert_err;
use crate::data::{DataError, GraphData, Split, SplitIdx};
use crate::sparse::SparseTensor;
use crate::tensor::Tensor;

fn path3() -> SparseTensor {
    SparseTensor::from_coo(&[0, 1, 1, 2], &[1, 0, 2, 1], None, (3, 3)).unwrap()
}

#[test]
fn test_graph_data_invariants() {
    let graph = GraphData::new(Tensor::zeros(&[3, 2]), vec![0, 1, 0], path3()).unwrap();
    assert_eq!(graph.num_nodes(), 3);
    assert_eq!(graph.num_features(), 2);
    assert_eq!(graph.num_edges(), 4);

    assert_err!(
        GraphData::new(Tensor::zeros(&[4, 2]), vec![0, 1, 0], path3()),
        DataError::ShapeMismatch { .. }
    );
    assert_err!(
        GraphData::new(Tensor::zeros(&[3, 2]), vec![0, 1], path3()),
        DataError::ShapeMismatch { .. }
    );
    assert_err!(
        GraphData::new(Tensor::zeros(&[3, 2]), vec![0, 1, 0], SparseTensor::empty((3, 4))),
        DataError::ShapeMismatch { .. }
    );
}

#[test]
fn test_set_x_allows_other_width() {
    let mut graph = GraphData::new(Tensor::zeros(&[3, 2]), vec![0, 1, 0], path3()).unwrap();
    graph.set_x(Tensor::ones(&[3, 5])).unwrap();
    assert_eq!(graph.num_features(), 5);
    assert_err!(graph.set_x(Tensor::ones(&[2, 5])), DataError::ShapeMismatch { .. });
}

#[test]
fn test_normalize_adj() {
    let mut graph = GraphData::new(Tensor::zeros(&[3, 2]), vec![0, 1, 0], path3()).unwrap();
    graph.normalize_adj();
    // 加自环后度为 [2, 3, 2]
    let adj = graph.adj_t();
    assert_eq!(adj.nnz(), 7);
    assert!((adj.get(0, 0) - 0.5).abs() < 1e-6);
    assert!((adj.get(0, 1) - 1.0 / 6f32.sqrt()).abs() < 1e-6);
    assert!((adj.get(1, 1) - 1.0 / 3.0).abs() < 1e-6);
}

#[test]
fn test_split_idx() {
    let split = SplitIdx::new(vec![0, 2], vec![1], vec![], 4).unwrap();
    assert_eq!(split.get(Split::Train), &[0, 2]);
    assert_eq!(split.valid(), &[1]);
    assert!(split.test().is_empty());
    assert_eq!(Split::ALL.map(|s| s.as_str()), ["train", "valid", "test"]);

    assert_err!(
        SplitIdx::new(vec![0, 4], vec![], vec![], 4),
        DataError::IndexOutOfBounds { index: 4, len: 4 }
    );
    assert_err!(
        SplitIdx::new(vec![0, 1], vec![2], vec![1], 4),
        DataError::InvalidSplit(msg) if msg.contains("节点1")
    );
    assert_err!(
        SplitIdx::new(vec![0, 1], vec![2], vec![1], 4),
        DataError::InvalidSplit(msg) if msg.contains("train和test")
    );
    // 同一划分内的重复索引单独报告
    assert_err!(
        SplitIdx::new(vec![3, 3], vec![], vec![], 4),
        DataError::InvalidSplit(msg) if msg == "节点3在train中重复出现"
    );
}
