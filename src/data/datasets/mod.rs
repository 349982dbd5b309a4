//! 节点属性预测数据集
//!
//! - [`NodePropPredDataset::load`]: 读取 OGB 原始布局（CSV，可为 .gz）的数据集
//! - [`NodePropPredDataset::synthetic`]: 按固定种子生成的分块随机图，无需下载

mod ogb;
mod synthetic;

pub use synthetic::SyntheticConfig;

use std::path::Path;

use crate::data::error::DataError;
use crate::data::graph::{GraphData, SplitIdx};

/// 支持的 OGB 数据集的元信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetMeta {
    pub name: &'static str,
    /// `split/`下的划分目录名
    pub split: &'static str,
    pub num_classes: usize,
    /// 原始边表只存了单向边时，是否补上反向边
    pub add_inverse_edge: bool,
}

const OGB_DATASETS: [DatasetMeta; 2] = [
    DatasetMeta {
        name: "ogbn-products",
        split: "sales_ranking",
        num_classes: 47,
        add_inverse_edge: true,
    },
    DatasetMeta {
        name: "ogbn-arxiv",
        split: "time",
        num_classes: 40,
        add_inverse_edge: true,
    },
];

impl DatasetMeta {
    pub fn find(name: &str) -> Result<&'static Self, DataError> {
        OGB_DATASETS
            .iter()
            .find(|meta| meta.name == name)
            .ok_or_else(|| DataError::UnknownDataset(name.to_string()))
    }

    /// 数据集在根目录下的子目录名（`-`替换为`_`）
    pub fn dir_name(&self) -> String {
        self.name.replace('-', "_")
    }
}

/// 单图节点分类数据集：一张图 + 固定的训练/验证/测试划分
#[derive(Debug, Clone)]
pub struct NodePropPredDataset {
    name: String,
    graph: GraphData,
    split_idx: SplitIdx,
    num_classes: usize,
}

impl NodePropPredDataset {
    /// 由已校验的各部分组装，标签须小于`num_classes`
    pub fn new(name: &str, graph: GraphData, split_idx: SplitIdx, num_classes: usize) -> Result<Self, DataError> {
        if let Some(&bad) = graph.y().iter().find(|&&label| label >= num_classes) {
            return Err(DataError::FormatError(format!(
                "标签{bad}超出了类别数{num_classes}"
            )));
        }
        Ok(Self {
            name: name.to_string(),
            graph,
            split_idx,
            num_classes,
        })
    }

    /// 从`root/<数据集目录>/`读取 OGB 原始文件
    pub fn load<P: AsRef<Path>>(root: P, name: &str) -> Result<Self, DataError> {
        let meta = DatasetMeta::find(name)?;
        let (graph, split_idx) = ogb::load_raw(&root.as_ref().join(meta.dir_name()), meta)?;
        Self::new(meta.name, graph, split_idx, meta.num_classes)
    }

    /// 按配置生成合成数据集
    pub fn synthetic(config: &SyntheticConfig) -> Result<Self, DataError> {
        let (graph, split_idx) = synthetic::generate(config)?;
        Self::new("synthetic", graph, split_idx, config.num_classes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn graph(&self) -> &GraphData {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut GraphData {
        &mut self.graph
    }

    pub fn split_idx(&self) -> &SplitIdx {
        &self.split_idx
    }

    /// 拆分为图与划分，供训练流程分别持有
    pub fn into_parts(self) -> (GraphData, SplitIdx) {
        (self.graph, self.split_idx)
    }
}
