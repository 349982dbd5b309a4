//! 训练结束后模型参数文件的命名

use std::fmt;
use std::path::{Path, PathBuf};

use crate::nn::ConvKind;

/// 四种参数文件名：`{GCN,SAGE}[.rand].state_dict`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointName {
    kind: ConvKind,
    noise_on_feature: bool,
}

impl CheckpointName {
    pub const fn new(kind: ConvKind, noise_on_feature: bool) -> Self {
        Self {
            kind,
            noise_on_feature,
        }
    }

    pub const fn select(use_sage: bool, noise_on_feature: bool) -> Self {
        Self::new(ConvKind::from_use_sage(use_sage), noise_on_feature)
    }

    pub fn file_name(&self) -> String {
        if self.noise_on_feature {
            format!("{}.rand.state_dict", self.kind)
        } else {
            format!("{}.state_dict", self.kind)
        }
    }

    pub fn path_in<P: AsRef<Path>>(&self, dir: P) -> PathBuf {
        dir.as_ref().join(self.file_name())
    }
}

impl fmt::Display for CheckpointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}
