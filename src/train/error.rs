use thiserror::Error;

use crate::data::DataError;
use crate::nn::GraphError;

/// 训练流程中的错误
#[derive(Error, Debug)]
pub enum TrainError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("输出文件读写失败：{0}")]
    Io(#[from] std::io::Error),
    #[error("训练配置不合法：{0}")]
    InvalidConfig(String),
    #[error("第{run}次运行不存在（共{runs}次）")]
    InvalidRun { run: usize, runs: usize },
    #[error("第{0}次运行还没有任何结果")]
    EmptyRun(usize),
}
