/*
 * @Author       : 老董
 * @Description  : Module trait 定义
 */

use super::NodeId;

/// 模块 trait
///
/// - `forward()` **不是** trait 方法（各层所需的输入不同）
/// - `new()` **不是** trait 方法（参数各异）
/// - `named_parameters()` 返回（参数名, 参数节点）列表，参数名即状态字典中的键
pub trait Module {
    /// 获取所有可训练参数及其名称（按固定顺序）
    fn named_parameters(&self) -> Vec<(String, NodeId)>;

    /// 获取所有可训练参数
    fn parameters(&self) -> Vec<NodeId> {
        self.named_parameters().into_iter().map(|(_, id)| id).collect()
    }

    /// 获取参数（张量）个数
    fn num_params(&self) -> usize {
        self.named_parameters().len()
    }
}
