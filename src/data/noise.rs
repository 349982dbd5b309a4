//! 随机噪声特征的读取（`.npy`格式的二维`f32`数组）

use std::path::Path;

use ndarray::Array2;
use ndarray_npy::read_npy;
use tracing::info;

use crate::data::error::DataError;
use crate::tensor::Tensor;

/// 读取噪声特征，行数须等于节点数`num_nodes`
pub fn load_noise_features<P: AsRef<Path>>(path: P, num_nodes: usize) -> Result<Tensor, DataError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DataError::FileNotFound(path.to_path_buf()));
    }
    let array: Array2<f32> = read_npy(path).map_err(|e| DataError::NpyError(format!("{}: {e}", path.display())))?;
    if array.nrows() != num_nodes {
        return Err(DataError::ShapeMismatch {
            expected: vec![num_nodes, array.ncols()],
            got: array.shape().to_vec(),
        });
    }
    info!(path = %path.display(), shape = ?array.shape(), "已读取噪声特征");
    Ok(Tensor::from_array(array))
}
