//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 负责把用户选择的本地文件读成原始字节，并在“尽可能早”的阶段执行输入校验。
//! 目标是尽快失败，减少不必要内存与 CPU 消耗。
//!
//! ## 实现思路
//!
//! - 存在性 + metadata 体积限制，超限时不读取文件内容。
//! - 读取后做一次文件签名（magic bytes）校验。
//!
//! 加载函数不持有 `self`，可直接在 `spawn_blocking` 中调用。

use bytes::Bytes;
use std::path::Path;

use super::source::{ImageSource, RawImageData};
use super::{CardCropper, CropConfig, CropError};

impl CardCropper {
    /// 按来源加载原始字节。
    pub(crate) fn load_source(
        source: &ImageSource,
        config: &CropConfig,
    ) -> Result<RawImageData, CropError> {
        match source {
            ImageSource::FilePath(path) => Self::load_from_file(path, config),
        }
    }

    /// 从本地路径加载图片原始字节。
    pub(crate) fn load_from_file(
        path: &str,
        config: &CropConfig,
    ) -> Result<RawImageData, CropError> {
        log::info!("📁 开始读取本地图片 - 路径: {}", path);

        let file_path = Path::new(path);
        if !file_path.exists() {
            return Err(CropError::FileSystem(format!("文件不存在：{}", path)));
        }

        let metadata = std::fs::metadata(file_path)
            .map_err(|e| CropError::FileSystem(format!("无法读取文件信息：{}", e)))?;

        if metadata.len() > config.max_file_size {
            return Err(CropError::ResourceLimit(format!(
                "文件过大：{:.2} MB（限制：{:.2} MB）",
                metadata.len() as f64 / 1024.0 / 1024.0,
                config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        let bytes = std::fs::read(file_path)
            .map_err(|e| CropError::FileSystem(format!("无法读取图片文件：{}", e)))?;
        Self::validate_image_signature(&bytes)?;

        Ok(RawImageData {
            bytes: Bytes::from(bytes),
            source_hint: "file",
        })
    }

    /// 通过文件签名（magic bytes）校验输入是否为图片。
    fn validate_image_signature(bytes: &[u8]) -> Result<(), CropError> {
        if bytes.is_empty() {
            return Err(CropError::InvalidFormat("图片内容为空".to_string()));
        }

        let kind = infer::get(bytes)
            .ok_or_else(|| CropError::InvalidFormat("无法识别图片类型".to_string()))?;

        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(CropError::InvalidFormat(format!(
                "文件签名不是图片类型：{}",
                kind.mime_type()
            )));
        }

        Ok(())
    }
}
