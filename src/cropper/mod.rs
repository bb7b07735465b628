//! # 卡图裁剪模块（cropper）
//!
//! ## 设计思路
//!
//! 该模块将“来源加载 → 解码 → 比例归一化 → 裁剪遮罩 → 输出句柄”
//! 按职责拆分为多个子模块，核心几何与绘制部分不依赖任何 I/O。
//!
//! - `geometry`：参考坐标系常量与按比例换算的裁剪计划
//! - `surface`：最小 2D 绘制能力（tiny-skia 实现）
//! - `clip`：圆角矩形裁剪路径
//! - `normalize`：超宽截图切成 16:9
//! - `engine`：裁剪 + 圆角遮罩 + PNG 编码
//! - `handler`：统一编排与批处理
//! - `loader/decoder`：来源加载与解码安全校验
//! - `config/error/source/handle`：配置、错误、中间数据模型、输出句柄
//!
//! ## 新同事快速上手
//!
//! ```text
//! ImageSource
//!    ↓
//! loader.rs（体积 + 签名校验）
//!    ↓
//! decoder.rs（像素/内存上限 + 解码）
//!    ↓
//! normalize.rs（宽屏 → 16:9，其余直通）
//!    ↓
//! engine.rs（按 ratio 缩放的裁剪区域 + 圆角遮罩 → PNG）
//!    ↓
//! handle.rs（登记输出，返回 ImageHandle）
//! ```
//!
//! 核心几何与绘制失败一律返回 `None` 并记录日志；加载/解码阶段返回 `CropError`，
//! 由 `handler` 统一记录后跳过该图片。

pub mod clip;
mod config;
mod decoder;
pub mod engine;
mod error;
pub mod geometry;
mod handle;
mod handler;
mod loader;
pub mod normalize;
mod source;
pub mod surface;

pub use config::CropConfig;
pub use engine::{crop_and_mask, crop_and_mask_raster, process_image};
pub use error::CropError;
pub use geometry::{BASE_FRAME, CropArea, CropPlan, Rect, ReferenceFrame};
pub use handle::{HandleStore, ImageHandle};
pub use handler::CardCropper;
pub use normalize::{Normalization, NormalizedImage, normalize};
pub use source::ImageSource;
pub use surface::{PixmapSurface, Raster, Surface};
