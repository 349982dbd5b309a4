/*
 * @Author       : 老董
 * @Description  : 命令行入口：在 OGB 节点分类数据集上训练 GCN / GraphSAGE
 */

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ogbn_gnn::train::{self, TrainConfig};

/// OGBN-Products (GNN)
#[derive(Parser, Debug)]
#[command(name = "ogbn_gnn", version, about = "OGBN-Products (GNN)", long_about = None)]
struct Args {
    #[arg(long = "log_steps", default_value_t = 1)]
    log_steps: usize,

    /// 使用 GraphSAGE（默认为 GCN）
    #[arg(long = "use_sage")]
    use_sage: bool,

    #[arg(long = "num_layers", default_value_t = 3)]
    num_layers: usize,

    #[arg(long = "hidden_channels", default_value_t = 256)]
    hidden_channels: usize,

    #[arg(long, default_value_t = 0.5)]
    dropout: f32,

    #[arg(long, default_value_t = 0.01)]
    lr: f32,

    #[arg(long, default_value_t = 100)]
    epochs: usize,

    #[arg(long, default_value_t = 1)]
    runs: usize,

    /// 用`noise_path`中的随机特征替换节点特征
    #[arg(long = "noise_on_feature")]
    noise_on_feature: bool,

    /// `ogbn-products`、`ogbn-arxiv`或`synthetic`
    #[arg(long, default_value = "ogbn-products")]
    dataset: String,

    /// OGB 数据集根目录
    #[arg(long, default_value = "dataset")]
    root: PathBuf,

    /// 噪声特征文件（二维 f32 的 .npy 数组）
    #[arg(long = "noise_path", default_value = "noise.feature")]
    noise_path: PathBuf,

    /// 模型参数文件的输出目录
    #[arg(long = "output_dir", default_value = ".")]
    output_dir: PathBuf,

    /// 随机数种子；不指定时取自系统熵源
    #[arg(long)]
    seed: Option<u64>,
}

impl From<Args> for TrainConfig {
    fn from(args: Args) -> Self {
        Self {
            dataset: args.dataset,
            root: args.root,
            log_steps: args.log_steps,
            use_sage: args.use_sage,
            num_layers: args.num_layers,
            hidden_channels: args.hidden_channels,
            dropout: args.dropout,
            lr: args.lr,
            epochs: args.epochs,
            runs: args.runs,
            noise_on_feature: args.noise_on_feature,
            noise_path: args.noise_path,
            output_dir: args.output_dir,
            seed: args.seed,
            ..Self::default()
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ogbn_gnn=info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    println!("{args:?}");
    let config = TrainConfig::from(args);
    let report = train::run(&config).context("训练失败")?;
    println!("模型参数已保存到 {}", report.checkpoint.display());
    Ok(())
}
