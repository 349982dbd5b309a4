//! 记录每次运行、每个 epoch 的训练/验证/测试准确率，并按最佳验证准确率汇总

use serde::{Deserialize, Serialize};

use crate::train::TrainError;

/// 一个 epoch 在三个划分上的准确率（取值`[0, 1]`）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochResult {
    pub train: f32,
    pub valid: f32,
    pub test: f32,
}

impl EpochResult {
    pub const fn new(train: f32, valid: f32, test: f32) -> Self {
        Self { train, valid, test }
    }
}

/// 单次运行的汇总。`final_*`取自验证准确率最高的 epoch（并列时取最早的）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// 从1开始计
    pub best_epoch: usize,
    pub highest_train: f32,
    pub highest_valid: f32,
    pub final_train: f32,
    pub final_test: f32,
}

#[derive(Debug, Clone)]
pub struct Logger {
    results: Vec<Vec<EpochResult>>,
    info: Option<String>,
}

impl Logger {
    /// `info`为可选的附加信息（如配置），在汇总所有运行时一并打印
    pub fn new(runs: usize, info: Option<String>) -> Self {
        Self {
            results: vec![Vec::new(); runs],
            info,
        }
    }

    pub fn num_runs(&self) -> usize {
        self.results.len()
    }

    pub fn add_result(&mut self, run: usize, result: EpochResult) -> Result<(), TrainError> {
        let runs = self.num_runs();
        self.results
            .get_mut(run)
            .ok_or(TrainError::InvalidRun { run, runs })?
            .push(result);
        Ok(())
    }

    pub fn results(&self, run: usize) -> Result<&[EpochResult], TrainError> {
        self.results
            .get(run)
            .map(Vec::as_slice)
            .ok_or(TrainError::InvalidRun {
                run,
                runs: self.num_runs(),
            })
    }

    pub fn statistics(&self, run: usize) -> Result<RunStatistics, TrainError> {
        let results = self.results(run)?;
        let first = results.first().ok_or(TrainError::EmptyRun(run))?;

        let mut best = 0;
        let mut highest_train = first.train;
        for (epoch, r) in results.iter().enumerate().skip(1) {
            // 严格大于：并列时保留最早的 epoch
            if r.valid > results[best].valid {
                best = epoch;
            }
            highest_train = highest_train.max(r.train);
        }
        Ok(RunStatistics {
            best_epoch: best + 1,
            highest_train,
            highest_valid: results[best].valid,
            final_train: results[best].train,
            final_test: results[best].test,
        })
    }

    /// 汇总文本（百分数）。`Some(run)`为单次运行，`None`为所有运行的`均值 ± 标准差`
    pub fn summary(&self, run: Option<usize>) -> Result<Vec<String>, TrainError> {
        match run {
            Some(run) => {
                let s = self.statistics(run)?;
                Ok(vec![
                    format!("Run {:02}:", run + 1),
                    format!("Highest Train: {:.2}", 100.0 * s.highest_train),
                    format!("Highest Valid: {:.2}", 100.0 * s.highest_valid),
                    format!("   Best Epoch: {}", s.best_epoch),
                    format!("  Final Train: {:.2}", 100.0 * s.final_train),
                    format!("   Final Test: {:.2}", 100.0 * s.final_test),
                ])
            }
            None => {
                let all = (0..self.num_runs())
                    .map(|run| self.statistics(run))
                    .collect::<Result<Vec<_>, _>>()?;
                let line = |label: &str, pick: fn(&RunStatistics) -> f32| {
                    let values: Vec<f32> = all.iter().map(|s| 100.0 * pick(s)).collect();
                    let (mean, std) = mean_std(&values);
                    format!("{label}: {mean:.2} ± {std:.2}")
                };
                let mut lines = Vec::with_capacity(6);
                if let Some(info) = &self.info {
                    lines.push(info.clone());
                }
                lines.push("All runs:".to_string());
                lines.push(line("Highest Train", |s| s.highest_train));
                lines.push(line("Highest Valid", |s| s.highest_valid));
                lines.push(line("  Final Train", |s| s.final_train));
                lines.push(line("   Final Test", |s| s.final_test));
                Ok(lines)
            }
        }
    }

    pub fn print_statistics(&self, run: Option<usize>) -> Result<(), TrainError> {
        for line in self.summary(run)? {
            println!("{line}");
        }
        Ok(())
    }
}

/// 均值与样本标准差（`n - 1`为分母）；只有一个值时标准差记为0
fn mean_std(values: &[f32]) -> (f32, f32) {
    let n = values.len();
    if n == 0 {
        return (0.0, 0.0);
    }
    let mean = values.iter().sum::<f32>() / n as f32;
    if n == 1 {
        return (mean, 0.0);
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / (n - 1) as f32;
    (mean, var.sqrt())
}
