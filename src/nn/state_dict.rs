/*
 * @Author       : 老董
 * @Description  : 状态字典：参数名 -> 参数值，序列化为 bincode 二进制文件
 */

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::GraphError;
use crate::tensor::Tensor;

/// 按参数名有序排列的参数表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDict {
    tensors: BTreeMap<String, Tensor>,
}

impl StateDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: String, tensor: Tensor) -> Option<Tensor> {
        self.tensors.insert(name, tensor)
    }

    pub fn get(&self, name: &str) -> Option<&Tensor> {
        self.tensors.get(name)
    }

    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.tensors.keys()
    }

    /// 每个参数的形状
    pub fn shapes(&self) -> BTreeMap<String, Vec<usize>> {
        self.tensors
            .iter()
            .map(|(name, t)| (name.clone(), t.shape().to_vec()))
            .collect()
    }

    /// 保存到文件（已存在则覆盖）
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), GraphError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            GraphError::ComputationError(format!("无法创建参数文件{}: {e}", path.display()))
        })?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, self)
            .map_err(|e| GraphError::ComputationError(format!("写入参数文件失败: {e}")))?;
        writer
            .flush()
            .map_err(|e| GraphError::ComputationError(format!("写入参数文件失败: {e}")))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            GraphError::ComputationError(format!("无法打开参数文件{}: {e}", path.display()))
        })?;
        bincode::deserialize_from(BufReader::new(file))
            .map_err(|e| GraphError::ComputationError(format!("解析参数文件失败: {e}")))
    }
}
