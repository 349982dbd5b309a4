use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

use super::temp_dir;
use crate::assert_err;
use crate::data::{DataError, DatasetMeta, NodePropPredDataset};

fn write_plain(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn write_gz(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut encoder = GzEncoder::new(fs::File::create(path).unwrap(), Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

/// 4个节点的小型 ogbn-products：边表 0-1、1-2，节点3孤立
fn write_products(root: &Path) {
    let dir = root.join("ogbn_products");
    write_gz(&dir.join("raw/edge.csv.gz"), "0,1\n1,2\n");
    write_plain(
        &dir.join("raw/node-feat.csv"),
        "0.1,0.2,0.3\n1.0,-1.0,0.5\n2.0,0.0,0.0\n-0.5,0.25,1.0\n",
    );
    write_gz(&dir.join("raw/node-label.csv.gz"), "0\n46\n3\n1\n");
    let split = dir.join("split/sales_ranking");
    write_gz(&split.join("train.csv.gz"), "0\n1\n");
    write_gz(&split.join("valid.csv.gz"), "2\n");
    write_gz(&split.join("test.csv.gz"), "3\n");
}

#[test]
fn test_dataset_meta() {
    let meta = DatasetMeta::find("ogbn-products").unwrap();
    assert_eq!(meta.split, "sales_ranking");
    assert_eq!(meta.num_classes, 47);
    assert_eq!(meta.dir_name(), "ogbn_products");
    assert_eq!(DatasetMeta::find("ogbn-arxiv").unwrap().num_classes, 40);
    assert_err!(DatasetMeta::find("ogbn-papers100M"), DataError::UnknownDataset(_));
}

#[test]
fn test_load_products_layout() {
    let root = temp_dir("ogb_ok");
    write_products(&root);

    let dataset = NodePropPredDataset::load(&root, "ogbn-products").unwrap();
    assert_eq!(dataset.name(), "ogbn-products");
    assert_eq!(dataset.num_classes(), 47);

    let graph = dataset.graph();
    assert_eq!(graph.num_nodes(), 4);
    assert_eq!(graph.num_features(), 3);
    assert_eq!(graph.y(), &[0, 46, 3, 1]);
    assert_eq!(graph.x()[[1, 1]], -1.0);
    // 补上反向边后共4条有向边
    assert_eq!(graph.num_edges(), 4);
    assert_eq!(graph.adj_t().get(1, 0), 1.0);
    assert_eq!(graph.adj_t().get(0, 1), 1.0);
    assert_eq!(graph.adj_t().row_nnz(3), 0);

    let split = dataset.split_idx();
    assert_eq!(split.train(), &[0, 1]);
    assert_eq!(split.valid(), &[2]);
    assert_eq!(split.test(), &[3]);
    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_missing_file() {
    let root = temp_dir("ogb_missing");
    write_products(&root);
    fs::remove_file(root.join("ogbn_products/raw/edge.csv.gz")).unwrap();
    assert_err!(
        NodePropPredDataset::load(&root, "ogbn-products"),
        DataError::FileNotFound(path) if path.ends_with("raw/edge.csv")
    );
    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_malformed_rows() {
    let root = temp_dir("ogb_malformed");
    write_products(&root);
    write_plain(&root.join("ogbn_products/raw/node-feat.csv"), "0.1,0.2,0.3\n1.0,x,0.5\n");
    assert_err!(
        NodePropPredDataset::load(&root, "ogbn-products"),
        DataError::FormatError(msg) if msg.contains("node-feat.csv:2")
    );

    write_plain(&root.join("ogbn_products/raw/node-feat.csv"), "0.1,0.2,0.3\n1.0,0.5\n");
    assert_err!(
        NodePropPredDataset::load(&root, "ogbn-products"),
        DataError::FormatError(_)
    );
    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_edge_out_of_range() {
    let root = temp_dir("ogb_edge_range");
    write_products(&root);
    write_gz(&root.join("ogbn_products/raw/edge.csv.gz"), "0,1\n1,9\n");
    assert_err!(
        NodePropPredDataset::load(&root, "ogbn-products"),
        DataError::FormatError(_)
    );
    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_label_out_of_range() {
    let root = temp_dir("ogb_label_range");
    write_products(&root);
    write_gz(&root.join("ogbn_products/raw/node-label.csv.gz"), "0\n47\n3\n1\n");
    assert_err!(
        NodePropPredDataset::load(&root, "ogbn-products"),
        DataError::FormatError(msg) if msg.contains("47")
    );
    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_overlapping_split() {
    let root = temp_dir("ogb_overlap");
    write_products(&root);
    write_gz(&root.join("ogbn_products/split/sales_ranking/test.csv.gz"), "2\n3\n");
    assert_err!(
        NodePropPredDataset::load(&root, "ogbn-products"),
        DataError::InvalidSplit(_)
    );
    fs::remove_dir_all(&root).ok();
}
