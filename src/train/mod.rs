//! # 训练流程
//!
//! - [`TrainConfig`]: 全部超参数与路径
//! - [`Session`] / [`train`] / [`test`]: 单步训练与全图评估
//! - [`Logger`]: 按最佳验证准确率汇总每次运行
//! - [`CheckpointName`]: 参数文件命名
//! - [`run`]: 串起以上各步的完整流程

mod checkpoint;
mod config;
mod error;
mod logger;
mod runner;
mod session;

pub use checkpoint::CheckpointName;
pub use config::{SYNTHETIC_DATASET, TrainConfig};
pub use error::TrainError;
pub use logger::{EpochResult, Logger, RunStatistics};
pub use runner::{TrainReport, epoch_line, run};
pub use session::{Session, test, train};

#[cfg(test)]
mod tests;
