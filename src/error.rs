//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义应用级 `AppError` 枚举，覆盖剪贴板、图片加载、文件系统、导出与设置。
//! 裁剪核心本身不返回错误（以 `None` 表示无结果），这里只承载外围协作方的失败。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `CropError` 与 `std::io::Error` 提供 `From` 转换，无需手动 map。

use crate::cropper::CropError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 剪贴板读写操作失败
    #[error("剪贴板操作失败: {0}")]
    Clipboard(String),

    /// 图片加载 / 解码错误
    #[error("{0}")]
    Image(#[from] CropError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 输出目录不可用或写入失败
    #[error("存储目录不可用: {0}")]
    Storage(String),

    /// 设置文件无效
    #[error("设置无效: {0}")]
    Settings(String),

    /// 命令行用法错误
    #[error("用法错误: {0}")]
    Usage(String),
}
