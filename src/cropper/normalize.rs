//! # 宽高比归一化
//!
//! ## 设计思路
//!
//! 截图可能来自不同宽高比的设备（超宽屏、手机等）。裁剪常量针对约 16:9 的参考帧定义，
//! 因此先把输入统一成“至少与参考帧一样高”的工作图，保证卡图区域落在同一屏幕内容上。
//!
//! ## 实现思路
//!
//! - `height / width >= min_aspect`：直接借用原图（`Cow::Borrowed`），不复制像素。
//! - 否则视为超宽截图：宽度按 16:9 取 `height / 9 * 16`，水平居中切片，
//!   并向下偏移 `wide_top_offset * newWidth / frame.width` 跳过顶部 UI 条。
//! - 不设最小尺寸下限，极小图片按同样公式计算，结果可能只有 1px 宽。

use std::borrow::Cow;

use super::geometry::{truncate_dimension, Rect, ReferenceFrame};
use super::surface::{PixmapSurface, Raster, Surface};

/// 归一化方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// 原图已足够高，直接透传。
    PassThrough,
    /// 超宽图被切成居中的 16:9 切片。
    WideSlice,
}

/// 归一化后的工作图。
#[derive(Debug, Clone)]
pub struct NormalizedImage<'a> {
    raster: Cow<'a, Raster>,
    kind: Normalization,
}

impl<'a> NormalizedImage<'a> {
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn kind(&self) -> Normalization {
        self.kind
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }
}

/// 超宽截图的 16:9 切片宽度。
pub fn wide_slice_width(height: u32) -> u32 {
    truncate_dimension(height as f64 / 9.0 * 16.0)
}

/// 超宽截图在原图中的切片区域。
pub fn wide_slice_source(image_width: u32, image_height: u32, frame: &ReferenceFrame) -> Rect {
    let slice_width = wide_slice_width(image_height) as f64;
    Rect::new(
        (image_width as f64 - slice_width) / 2.0,
        frame.wide_top_offset * slice_width / frame.width,
        slice_width,
        image_height as f64,
    )
}

/// 是否需要做超宽切片。
pub fn is_too_wide(width: u32, height: u32, frame: &ReferenceFrame) -> bool {
    (height as f64 / width as f64) < frame.min_aspect
}

/// 将输入图片归一化为参考宽高比的工作图。
///
/// 仅在分配新画布失败时返回 `None`。
pub fn normalize<'a>(image: &'a Raster, frame: &ReferenceFrame) -> Option<NormalizedImage<'a>> {
    let (width, height) = (image.width(), image.height());

    if !is_too_wide(width, height, frame) {
        return Some(NormalizedImage {
            raster: Cow::Borrowed(image),
            kind: Normalization::PassThrough,
        });
    }

    let slice_width = wide_slice_width(height);
    let Some(mut surface) = PixmapSurface::new(slice_width, height) else {
        log::warn!(
            "⚠️ 归一化画布分配失败：{}x{}（原图 {}x{}）",
            slice_width,
            height,
            width,
            height
        );
        return None;
    };

    let source = wide_slice_source(width, height, frame);
    let destination = Rect::new(0.0, 0.0, slice_width as f64, height as f64);
    surface.draw_image(image, source, destination);

    log::debug!(
        "超宽截图切片：{}x{} -> {}x{}（x={:.2}, y={:.2}）",
        width,
        height,
        slice_width,
        height,
        source.x,
        source.y
    );

    Some(NormalizedImage {
        raster: Cow::Owned(surface.into_raster()),
        kind: Normalization::WideSlice,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cropper::geometry::BASE_FRAME;
    use image::{Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> Raster {
        let image = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 251) as u8, (y % 241) as u8, ((x + y) % 255) as u8, 255])
        });
        Raster::from_rgba(image).expect("raster")
    }

    #[test]
    fn full_hd_passes_through_without_copy() {
        let source = gradient(1920, 1080);
        let normalized = normalize(&source, &BASE_FRAME).expect("normalized");

        assert_eq!(normalized.kind(), Normalization::PassThrough);
        assert_eq!((normalized.width(), normalized.height()), (1920, 1080));
        assert!(std::ptr::eq(normalized.raster(), &source));
    }

    #[test]
    fn ultra_wide_is_sliced_to_sixteen_by_nine() {
        let source = gradient(2560, 1080);
        let normalized = normalize(&source, &BASE_FRAME).expect("normalized");

        assert_eq!(normalized.kind(), Normalization::WideSlice);
        assert_eq!((normalized.width(), normalized.height()), (1920, 1080));

        let slice = wide_slice_source(2560, 1080, &BASE_FRAME);
        assert_eq!(slice.x, 320.0);
        assert_eq!(slice.y, 26.0 * 1920.0 / 1024.0);
    }

    #[test]
    fn wide_slice_samples_centered_content() {
        // 纵向偏移为整数：26 * 1024 / 1024 = 26
        let height = 576;
        let source = gradient(1400, height);
        let normalized = normalize(&source, &BASE_FRAME).expect("normalized");
        assert_eq!(normalized.width(), 1024);

        let x_offset = (1400 - 1024) / 2;
        let expected = source.pixel(x_offset + 10, 26 + 40).expect("source pixel");
        assert_eq!(normalized.raster().pixel(10, 40), Some(expected));

        // 偏移导致底部 26 行超出原图，保持透明
        assert_eq!(normalized.raster().pixel(10, height - 1).map(|p| p[3]), Some(0));
    }

    #[test]
    fn threshold_boundary_is_pass_through() {
        assert!(!is_too_wide(100, 56, &BASE_FRAME));
        assert!(is_too_wide(100, 55, &BASE_FRAME));
    }

    #[test]
    fn one_pixel_high_wide_image_still_normalizes() {
        // 1 / 9 * 16 = 1.77 → 1
        let source = gradient(10, 1);
        let normalized = normalize(&source, &BASE_FRAME).expect("1px slice is still allocatable");
        assert_eq!((normalized.width(), normalized.height()), (1, 1));
    }
}
