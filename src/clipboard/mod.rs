//! 剪贴板模块
//!
//! # 设计思路
//!
//! 粘贴时取出系统剪贴板中的图片，转成可裁剪的 `Raster`。
//! 裁剪结果只通过导出落盘，不写回剪贴板。
//!
//! # 实现思路
//!
//! - 通过 `arboard` 读取剪贴板 RGBA 数据。
//! - 剪贴板中没有图片时返回 `Ok(None)`，由调用方决定跳过。

mod reader;

pub use reader::{raster_from_clipboard_image, read_clipboard_image};
