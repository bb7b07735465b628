//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `CropConfig`：输入体积/像素上限与参考帧。
//! 默认值即生产配置；设置文件只需写出想覆盖的字段。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用配置，参考帧取 `BASE_FRAME`。
//! - `#[serde(default)]` 让设置文件缺字段时回退默认值。
//! - `validate` 在加载设置后调用，拒绝明显错误的取值。

use serde::{Deserialize, Serialize};

use super::geometry::{ReferenceFrame, BASE_FRAME};
use super::CropError;

/// 裁剪处理配置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// 读取原始字节时允许的最大文件体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 参考帧（裁剪常量）。
    pub frame: ReferenceFrame,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            frame: BASE_FRAME,
        }
    }
}

impl CropConfig {
    pub fn validate(&self) -> Result<(), CropError> {
        if self.max_file_size == 0 {
            return Err(CropError::InvalidFormat("max_file_size 必须大于 0".to_string()));
        }
        if self.max_decoded_pixels == 0 {
            return Err(CropError::InvalidFormat("max_decoded_pixels 必须大于 0".to_string()));
        }
        if self.max_decoded_bytes < 8 * 1024 * 1024 {
            return Err(CropError::InvalidFormat("max_decoded_bytes 不能小于 8MB".to_string()));
        }

        self.frame.validate().map_err(CropError::InvalidFormat)
    }
}
