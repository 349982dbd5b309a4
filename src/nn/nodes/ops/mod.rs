mod add;
mod add_bias;
mod dropout;
mod log_softmax;
mod mat_mul;
mod propagate;
mod relu;
mod select_rows;

pub(in crate::nn) use add::Add;
pub(in crate::nn) use add_bias::AddBias;
pub(in crate::nn) use dropout::Dropout;
pub(in crate::nn) use log_softmax::LogSoftmax;
pub(in crate::nn) use mat_mul::MatMul;
pub(in crate::nn) use propagate::Propagate;
pub(in crate::nn) use relu::Relu;
pub(in crate::nn) use select_rows::SelectRows;

use crate::nn::GraphError;

pub(in crate::nn) fn invalid_parent_index(type_name: &str, parent_index: usize) -> GraphError {
    GraphError::ComputationError(format!(
        "{type_name}节点没有第{parent_index}个父节点。不该触及本错误，否则说明crate代码有问题"
    ))
}
