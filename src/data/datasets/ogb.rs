//! OGB 原始文件解析
//!
//! 目录布局：
//! ```text
//! <dataset_dir>/raw/edge.csv[.gz]          每行 "src,dst"
//! <dataset_dir>/raw/node-feat.csv[.gz]     每行一个节点的特征，逗号分隔
//! <dataset_dir>/raw/node-label.csv[.gz]    每行一个标签
//! <dataset_dir>/split/<split>/{train,valid,test}.csv[.gz]  每行一个节点索引
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

use flate2::read::GzDecoder;
use tracing::info;

use super::DatasetMeta;
use crate::data::error::DataError;
use crate::data::graph::{GraphData, SplitIdx};
use crate::sparse::SparseTensor;
use crate::tensor::Tensor;

pub(super) fn load_raw(dataset_dir: &Path, meta: &DatasetMeta) -> Result<(GraphData, SplitIdx), DataError> {
    let start = Instant::now();
    let raw_dir = dataset_dir.join("raw");

    let (features, num_features) = read_features(&resolve(&raw_dir, "node-feat.csv")?)?;
    let num_nodes = features.len() / num_features.max(1);
    let x = Tensor::new(&features, &[num_nodes, num_features]);

    let y = read_integers(&resolve(&raw_dir, "node-label.csv")?)?;
    let edges = read_edges(&resolve(&raw_dir, "edge.csv")?)?;

    // adj_t 的行是消息的接收方（dst），列是发送方（src）
    let mut row = Vec::with_capacity(edges.len() * 2);
    let mut col = Vec::with_capacity(edges.len() * 2);
    for &(src, dst) in &edges {
        row.push(dst);
        col.push(src);
        if meta.add_inverse_edge {
            row.push(src);
            col.push(dst);
        }
    }
    let adj_t = SparseTensor::from_coo(&row, &col, None, (num_nodes, num_nodes)).map_err(|e| {
        DataError::FormatError(format!("边表与节点数{num_nodes}不符: {e}"))
    })?;

    let split_dir = dataset_dir.join("split").join(meta.split);
    let split_idx = SplitIdx::new(
        read_integers(&resolve(&split_dir, "train.csv")?)?,
        read_integers(&resolve(&split_dir, "valid.csv")?)?,
        read_integers(&resolve(&split_dir, "test.csv")?)?,
        num_nodes,
    )?;

    let graph = GraphData::new(x, y, adj_t)?;
    info!(
        dataset = meta.name,
        num_nodes,
        num_features,
        num_edges = graph.num_edges(),
        elapsed = ?start.elapsed(),
        "数据集加载完成"
    );
    Ok((graph, split_idx))
}

/// 优先使用未压缩的文件，其次是同名的 .gz 文件
fn resolve(dir: &Path, base_name: &str) -> Result<PathBuf, DataError> {
    let plain = dir.join(base_name);
    if plain.exists() {
        return Ok(plain);
    }
    let gz = dir.join(format!("{base_name}.gz"));
    if gz.exists() {
        return Ok(gz);
    }
    Err(DataError::FileNotFound(plain))
}

fn open(path: &Path) -> Result<Box<dyn BufRead>, DataError> {
    let file = File::open(path).map_err(|_| DataError::FileNotFound(path.to_path_buf()))?;
    Ok(if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    })
}

/// 逐行调用`f(行号, 去掉首尾空白的内容)`，跳过空行
fn for_each_line<F>(path: &Path, mut f: F) -> Result<(), DataError>
where
    F: FnMut(usize, &str) -> Result<(), DataError>,
{
    for (lineno, line) in open(path)?.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            f(lineno + 1, line)?;
        }
    }
    Ok(())
}

fn format_error(path: &Path, lineno: usize, message: impl std::fmt::Display) -> DataError {
    DataError::FormatError(format!("{}:{lineno}: {message}", path.display()))
}

fn parse_index(path: &Path, lineno: usize, field: &str) -> Result<usize, DataError> {
    let value: f64 = field
        .trim()
        .parse()
        .map_err(|_| format_error(path, lineno, format!("无法解析为整数: `{field}`")))?;
    if value < 0.0 || value.fract() != 0.0 || !value.is_finite() {
        return Err(format_error(path, lineno, format!("不是非负整数: `{field}`")));
    }
    Ok(value as usize)
}

fn read_edges(path: &Path) -> Result<Vec<(usize, usize)>, DataError> {
    let mut edges = Vec::new();
    for_each_line(path, |lineno, line| {
        let mut fields = line.split(',');
        match (fields.next(), fields.next(), fields.next()) {
            (Some(src), Some(dst), None) => {
                edges.push((parse_index(path, lineno, src)?, parse_index(path, lineno, dst)?));
                Ok(())
            }
            _ => Err(format_error(path, lineno, "每行须为`src,dst`")),
        }
    })?;
    Ok(edges)
}

/// 返回按行优先展开的特征以及特征维度
fn read_features(path: &Path) -> Result<(Vec<f32>, usize), DataError> {
    let mut data = Vec::new();
    let mut width = None;
    for_each_line(path, |lineno, line| {
        let before = data.len();
        for field in line.split(',') {
            let v: f32 = field
                .trim()
                .parse()
                .map_err(|_| format_error(path, lineno, format!("无法解析为浮点数: `{field}`")))?;
            data.push(v);
        }
        let len = data.len() - before;
        match width {
            None => width = Some(len),
            Some(w) if w != len => {
                return Err(format_error(path, lineno, format!("特征维度为{len}，与首行的{w}不一致")));
            }
            Some(_) => {}
        }
        Ok(())
    })?;
    Ok((data, width.unwrap_or(0)))
}

/// 每行一个非负整数（标签或节点索引）
fn read_integers(path: &Path) -> Result<Vec<usize>, DataError> {
    let mut values = Vec::new();
    for_each_line(path, |lineno, line| {
        values.push(parse_index(path, lineno, line)?);
        Ok(())
    })?;
    Ok(values)
}
