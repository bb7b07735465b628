//! 应用设置模块
//!
//! # 设计思路
//!
//! 设置以 JSON 文件保存：输出目录与裁剪配置（含可覆盖的参考帧）。
//! 文件缺失时使用默认值；字段缺失时逐项回退默认值。
//!
//! # 实现思路
//!
//! - `serde` + `#[serde(default)]` 负责宽松解析。
//! - 解析后立即 `validate`，无效配置以 `AppError::Settings` 拒绝，而不是带病运行。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cropper::CropConfig;
use crate::error::AppError;

/// 应用设置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// 导出目录；为空时使用默认目录。
    pub output_dir: Option<String>,
    /// 裁剪配置。
    pub crop: CropConfig,
}

impl AppSettings {
    /// 读取设置文件；文件不存在时返回默认设置。
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            log::info!("📄 设置文件不存在，使用默认设置: {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let settings = serde_json::from_str::<Self>(&content)
            .map_err(|e| AppError::Settings(format!("解析设置文件失败: {}", e)))?;

        settings
            .crop
            .validate()
            .map_err(|e| AppError::Settings(e.to_string()))?;

        log::info!("📄 已加载设置: {}", path.display());
        Ok(settings)
    }

    /// 写入设置文件（必要时创建父目录）。
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Storage(format!("创建设置目录失败: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Settings(format!("序列化设置失败: {}", e)))?;

        fs::write(path, content)?;
        Ok(())
    }
}
