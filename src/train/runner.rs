//! 完整训练流程：加载数据 → 建模 → 归一化 → （可选）替换特征 → 逐 epoch 训练与评估 → 汇总 → 保存参数

use std::path::PathBuf;
use std::time::Instant;

use tracing::info;

use crate::data::{Evaluator, NodePropPredDataset, load_noise_features};
use crate::nn::{Graph, GraphConvNet, StateDict};
use crate::train::{CheckpointName, EpochResult, Logger, Session, TrainConfig, TrainError, test, train};

/// 一次完整训练的产出
#[derive(Debug)]
pub struct TrainReport {
    pub logger: Logger,
    /// 每次运行、每个 epoch 的训练损失
    pub losses: Vec<Vec<f32>>,
    /// 最后一次运行结束时的参数
    pub state_dict: StateDict,
    pub checkpoint: PathBuf,
}

pub fn run(config: &TrainConfig) -> Result<TrainReport, TrainError> {
    // 1. 必要的验证
    config.validate()?;
    info!(config = %config.to_json(), "训练配置");

    // 2. 数据
    let mut dataset = if config.is_synthetic() {
        NodePropPredDataset::synthetic(&config.synthetic)?
    } else {
        NodePropPredDataset::load(&config.root, &config.dataset)?
    };
    let evaluator = Evaluator::new(dataset.name());
    let num_classes = dataset.num_classes();

    // 3. 模型（按原始特征维度创建，之后才做归一化与特征替换）
    let mut graph = match config.seed {
        Some(seed) => Graph::new_with_seed(seed),
        None => Graph::new(),
    };
    info!(seed = ?graph.seed(), kind = %config.conv_kind(), "创建模型");
    let model = GraphConvNet::new(
        &mut graph,
        config.conv_kind(),
        dataset.graph().num_features(),
        config.hidden_channels,
        num_classes,
        config.num_layers,
        config.dropout,
    )?;

    let data = dataset.graph_mut();
    let start = Instant::now();
    data.normalize_adj();
    info!(elapsed = ?start.elapsed(), "邻接矩阵归一化完成");
    if config.noise_on_feature {
        let noise = load_noise_features(&config.noise_path, data.num_nodes())?;
        data.set_x(noise)?;
    }

    let (data, split_idx) = dataset.into_parts();
    let mut session = Session::new(graph, model, &data, split_idx, config.lr)?;

    // 4. 训练
    let mut logger = Logger::new(config.runs, Some(config.to_json()));
    let mut losses = Vec::with_capacity(config.runs);
    for run in 0..config.runs {
        session.reset()?;
        let mut run_losses = Vec::with_capacity(config.epochs);
        for epoch in 1..=config.epochs {
            let loss = train(&mut session)?;
            let result = test(&mut session, &evaluator)?;
            logger.add_result(run, result)?;
            run_losses.push(loss);

            if epoch % config.log_steps == 0 {
                println!("{}", epoch_line(epoch, loss, &result));
            }
        }
        logger.print_statistics(Some(run))?;
        losses.push(run_losses);
    }
    if config.runs > 1 {
        logger.print_statistics(None)?;
    }

    // 5. 保存
    let state_dict = session.model().state_dict(session.graph())?;
    let checkpoint = CheckpointName::select(config.use_sage, config.noise_on_feature)
        .path_in(&config.output_dir);
    std::fs::create_dir_all(&config.output_dir)?;
    state_dict.save(&checkpoint)?;
    info!(path = %checkpoint.display(), "模型参数已保存");

    Ok(TrainReport {
        logger,
        losses,
        state_dict,
        checkpoint,
    })
}

/// `Epoch: 01, Loss: 0.1234, Train: 12.34%, Valid: 12.34% Test: 12.34%`
pub fn epoch_line(epoch: usize, loss: f32, result: &EpochResult) -> String {
    format!(
        "Epoch: {epoch:02}, Loss: {loss:.4}, Train: {:.2}%, Valid: {:.2}% Test: {:.2}%",
        100.0 * result.train,
        100.0 * result.valid,
        100.0 * result.test
    )
}
