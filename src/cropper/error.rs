//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载“加载 → 解码”阶段的所有错误来源，避免字符串拼接式错误处理。
//! 裁剪与编码阶段不返回错误：按约定以 `None` 表示“无结果”，由调用方静默跳过。

/// 图片加载/解码统一错误类型。
///
/// 批处理时该错误只记录日志，不会中断同批次的其他图片。
#[derive(Debug, thiserror::Error)]
pub enum CropError {
    #[error("解码错误：{0}")]
    Decode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),
}

impl CropError {
    /// 稳定的错误码，供日志检索与上层分支判断。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode_failed",
            Self::InvalidFormat(_) => "invalid_format",
            Self::FileSystem(_) => "file_system",
            Self::ResourceLimit(_) => "resource_limit",
        }
    }

    /// 出错所在的处理阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::FileSystem(_) | Self::InvalidFormat(_) => "load",
            Self::Decode(_) | Self::ResourceLimit(_) => "decode",
        }
    }
}
