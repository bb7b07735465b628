//! # 卡图裁剪工具：库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  命令行 (main.rs, clap)                   │
//! │        文件选择 / --paste / --out-dir / --settings        │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓ ImageSource / Raster
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↓                 库 (Rust)                         │
//! │                                                          │
//! │  ┌─ cropper ──── CardCropper 批处理编排                   │
//! │  │   ├─ loader/decoder   来源加载·签名校验·解码           │
//! │  │   ├─ normalize        超宽截图 → 16:9                  │
//! │  │   ├─ engine/clip      比例裁剪 + 圆角遮罩 → PNG        │
//! │  │   └─ handle           输出句柄登记表                   │
//! │  │                                                       │
//! │  ├─ session ──── 当前结果 + 历史（事件驱动）              │
//! │  ├─ export ───── cropped_YYYYMMDD_HHmmss.png 落盘         │
//! │  ├─ clipboard ── 粘贴读取                                │
//! │  ├─ settings ─── JSON 设置                               │
//! │  └─ error ────── AppError (统一错误类型)                  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`cropper`] | 卡图裁剪核心：几何常量、归一化、圆角遮罩、批处理 |
//! | [`session`] | 会话状态：当前结果与历史列表 |
//! | [`export`] | 输出目录管理与文件命名 |
//! | [`clipboard`] | 剪贴板图片读取 |
//! | [`settings`] | 设置文件读写 |
//! | [`error`] | 统一错误类型 `AppError` |

pub mod error;
pub mod clipboard;
pub mod cropper;
pub mod export;
pub mod session;
pub mod settings;
