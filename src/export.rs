//! 裁剪结果导出模块
//!
//! # 设计思路
//!
//! 将句柄对应的 PNG 写入输出目录，文件名沿用 `cropped_YYYYMMDD_HHmmss.png` 格式。
//! 同一秒内导出多张时自动追加 `_1`、`_2` 后缀，避免互相覆盖。
//!
//! # 实现思路
//!
//! - 优先使用用户配置的输出目录，未设置时回退到当前目录下的 `cropped`。
//! - 目录不存在时自动 `create_dir_all`，避免上层判断。
//! - 所有可能失败的操作均返回 `Result`，不使用 `expect()` / `unwrap()`。

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::cropper::{HandleStore, ImageHandle};
use crate::error::AppError;

const DEFAULT_OUTPUT_DIR: &str = "cropped";

/// 输出目录信息
#[derive(Debug, Clone, Serialize)]
pub struct OutputDirInfo {
    pub path: String,
    pub total_size: u64,
    pub file_count: u64,
}

/// 生成下载文件名：`cropped_YYYYMMDD_HHmmss.png`。
pub fn download_file_name(now: &NaiveDateTime) -> String {
    format!("cropped_{}.png", now.format("%Y%m%d_%H%M%S"))
}

/// 获取输出目录（不存在则创建）
///
/// # 返回
/// - `Ok(PathBuf)`：可用的输出目录
/// - `Err(AppError::Storage)`：无法创建目录
pub fn resolve_output_dir(custom_dir: Option<&str>) -> Result<PathBuf, AppError> {
    let path = match custom_dir {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(DEFAULT_OUTPUT_DIR),
    };

    if !path.exists() {
        fs::create_dir_all(&path).map_err(|e| {
            AppError::Storage(format!("创建输出目录 '{}' 失败: {}", path.display(), e))
        })?;
    }

    Ok(path)
}

/// 将句柄对应的 PNG 写入目录，返回最终文件路径。
pub fn save_handle(
    store: &HandleStore,
    handle: &ImageHandle,
    dir: &Path,
    now: &NaiveDateTime,
) -> Result<PathBuf, AppError> {
    let blob = store
        .get(handle)
        .ok_or_else(|| AppError::Storage(format!("句柄已失效: {}", handle)))?;

    if !dir.exists() {
        fs::create_dir_all(dir)
            .map_err(|e| AppError::Storage(format!("创建输出目录失败: {}", e)))?;
    }

    let file_path = unique_path(dir, &download_file_name(now));
    fs::write(&file_path, &blob)?;

    log::info!(
        "💾 已保存裁剪结果 - {} ({} KB)",
        file_path.display(),
        blob.len() / 1024
    );

    Ok(file_path)
}

/// 目录下已存在同名文件时追加 `_1`、`_2`… 后缀。
fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((stem, ext)) => (stem, format!(".{}", ext)),
        None => (file_name, String::new()),
    };

    (1u32..)
        .map(|n| dir.join(format!("{}_{}{}", stem, n, ext)))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// 获取输出目录信息（路径 + 占用大小 + 文件数）
pub fn output_dir_info(dir: &Path) -> Result<OutputDirInfo, AppError> {
    let mut total_size: u64 = 0;
    let mut file_count: u64 = 0;

    for entry in fs::read_dir(dir)?.flatten() {
        if let Ok(metadata) = entry.metadata() {
            if metadata.is_file() {
                total_size += metadata.len();
                file_count += 1;
            }
        }
    }

    Ok(OutputDirInfo {
        path: dir.to_string_lossy().to_string(),
        total_size,
        file_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use chrono::NaiveDate;

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 10, 12)
            .and_then(|d| d.and_hms_opt(9, 5, 7))
            .expect("valid date")
    }

    #[test]
    fn file_name_uses_timestamp_format() {
        assert_eq!(download_file_name(&fixed_time()), "cropped_20241012_090507.png");
    }

    #[test]
    fn save_creates_missing_dir_and_suffixes_collisions() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let dir = tmp.path().join("nested").join("out");
        let store = HandleStore::new();
        let first = store.register(Bytes::from_static(b"first"));
        let second = store.register(Bytes::from_static(b"second"));

        let a = save_handle(&store, &first, &dir, &fixed_time()).expect("save first");
        let b = save_handle(&store, &second, &dir, &fixed_time()).expect("save second");
        let c = save_handle(&store, &first, &dir, &fixed_time()).expect("save third");

        assert_eq!(a.file_name().and_then(|n| n.to_str()), Some("cropped_20241012_090507.png"));
        assert_eq!(b.file_name().and_then(|n| n.to_str()), Some("cropped_20241012_090507_1.png"));
        assert_eq!(c.file_name().and_then(|n| n.to_str()), Some("cropped_20241012_090507_2.png"));
        assert_eq!(fs::read(&b).expect("read back"), b"second");

        let info = output_dir_info(&dir).expect("dir info");
        assert_eq!(info.file_count, 3);
        assert_eq!(info.total_size, 5 + 6 + 5);
    }

    #[test]
    fn revoked_handle_is_storage_error() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let store = HandleStore::new();
        let handle = store.register(Bytes::from_static(b"x"));
        store.revoke(&handle);

        let result = save_handle(&store, &handle, tmp.path(), &fixed_time());
        assert!(matches!(result, Err(AppError::Storage(_))));
    }

    #[test]
    fn resolve_output_dir_creates_custom_dir() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let custom = tmp.path().join("cards");
        let custom_str = custom.to_string_lossy().to_string();

        let resolved = resolve_output_dir(Some(&custom_str)).expect("resolve");
        assert_eq!(resolved, custom);
        assert!(custom.is_dir());
    }
}
