//! # 输出句柄
//!
//! ## 设计思路
//!
//! 每次成功裁剪都会得到一份 PNG 字节，登记到 `HandleStore` 后返回不透明的 `ImageHandle`。
//! 句柄归调用方所有：核心从不主动释放，是否 `revoke` 由历史记录/下载等上层决定。
//!
//! ## 实现思路
//!
//! - 句柄使用 uuid v4，保证每次调用都不同（即使输入完全相同）。
//! - 存储的是不可变 `Bytes`，读取时只增加引用计数，不复制数据。

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use uuid::Uuid;

/// 编码后输出图片的不透明句柄。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(Uuid);

impl ImageHandle {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blob:md-card-cropper/{}", self.0)
    }
}

/// 句柄 → 编码字节 的登记表，可跨线程共享。
#[derive(Debug, Clone, Default)]
pub struct HandleStore {
    blobs: Arc<Mutex<HashMap<ImageHandle, Bytes>>>,
}

impl HandleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取得登记表；锁中毒时继续使用内部数据。
    fn blobs(&self) -> MutexGuard<'_, HashMap<ImageHandle, Bytes>> {
        self.blobs.lock().unwrap_or_else(|poisoned| {
            log::warn!("⚠️ 句柄表锁已中毒，继续使用");
            poisoned.into_inner()
        })
    }

    /// 登记一份输出并返回新句柄。
    pub fn register(&self, blob: Bytes) -> ImageHandle {
        let handle = ImageHandle::new();
        self.blobs().insert(handle, blob);
        handle
    }

    /// 读取句柄对应的编码字节。
    pub fn get(&self, handle: &ImageHandle) -> Option<Bytes> {
        self.blobs().get(handle).cloned()
    }

    /// 释放句柄；句柄不存在时返回 `false`。
    pub fn revoke(&self, handle: &ImageHandle) -> bool {
        self.blobs().remove(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.blobs().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
