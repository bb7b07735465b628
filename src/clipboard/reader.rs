//! 剪贴板读取：粘贴时获取图片。

use crate::cropper::Raster;
use crate::error::AppError;

/// 读取剪贴板中的图片。
///
/// # 返回
/// - `Ok(Some(raster))`：剪贴板中有图片
/// - `Ok(None)`：剪贴板中没有图片（例如只有文本）
/// - `Err(AppError::Clipboard)`：无法访问剪贴板
pub fn read_clipboard_image() -> Result<Option<Raster>, AppError> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| AppError::Clipboard(format!("无法访问剪贴板: {}", e)))?;

    match clipboard.get_image() {
        Ok(image_data) => {
            log::info!(
                "📋 读取到剪贴板图片 - {}x{}",
                image_data.width,
                image_data.height
            );
            raster_from_clipboard_image(image_data).map(Some)
        }
        Err(arboard::Error::ContentNotAvailable) => {
            log::info!("📋 剪贴板中没有图片");
            Ok(None)
        }
        Err(e) => Err(AppError::Clipboard(format!("读取剪贴板图片失败: {}", e))),
    }
}

/// 将 arboard 的 RGBA 数据转换为 `Raster`。
pub fn raster_from_clipboard_image(image_data: arboard::ImageData<'_>) -> Result<Raster, AppError> {
    let width = u32::try_from(image_data.width)
        .map_err(|_| AppError::Clipboard("剪贴板图片宽度超出范围".to_string()))?;
    let height = u32::try_from(image_data.height)
        .map_err(|_| AppError::Clipboard("剪贴板图片高度超出范围".to_string()))?;

    let image = image::RgbaImage::from_raw(width, height, image_data.bytes.into_owned())
        .ok_or_else(|| AppError::Clipboard("创建图像缓冲区失败".to_string()))?;

    Raster::from_rgba(image)
        .ok_or_else(|| AppError::Clipboard(format!("剪贴板图片尺寸无效: {}x{}", width, height)))
}
