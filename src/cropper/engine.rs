//! # 裁剪与圆角遮罩引擎
//!
//! ## 设计思路
//!
//! 整条核心链路是“输入栅格 + 参考帧”的纯函数：不读写任何共享状态，
//! 每次调用独立分配自己的画布，可安全并发。
//!
//! ## 实现思路
//!
//! 1. `ratio = normalized.width / frame.width`
//! 2. 分配 `crop.width * ratio` × `crop.height * ratio` 的画布
//! 3. 透明填充
//! 4. 在整块画布上安装圆角裁剪，半径 `corner_radius * ratio`
//! 5. 再次透明填充（与参考输出逐字节一致，去掉也不改变像素）
//! 6. 以图片底边为锚点绘制卡图区域
//! 7. 编码为 PNG
//!
//! 画布分配失败或编码无数据时返回 `None`，不向上抛错。

use bytes::Bytes;
use tiny_skia::Color;

use super::clip::build_rounded_clip;
use super::geometry::{CropPlan, Rect, ReferenceFrame};
use super::normalize::{normalize, NormalizedImage};
use super::surface::{PixmapSurface, Raster, Surface};

/// 按裁剪方案在画布上完成绘制（不含编码）。
///
/// `fill_passes` 仅供测试关闭两次透明填充，用于验证其无副作用。
fn render(
    normalized: &NormalizedImage<'_>,
    plan: &CropPlan,
    fill_passes: bool,
) -> Option<PixmapSurface> {
    let (width, height) = plan.canvas_size();
    let Some(mut surface) = PixmapSurface::new(width, height) else {
        log::warn!(
            "⚠️ 输出画布分配失败：{}x{}（ratio={:.4}）",
            width,
            height,
            plan.ratio
        );
        return None;
    };

    let full = Rect::new(0.0, 0.0, width as f64, height as f64);

    if fill_passes {
        surface.fill_rect(full, Color::TRANSPARENT);
    }

    build_rounded_clip(
        &mut surface,
        0.0,
        0.0,
        width as f64,
        height as f64,
        plan.corner_radius,
    );

    if fill_passes {
        surface.fill_rect(full, Color::TRANSPARENT);
    }

    surface.draw_image(normalized.raster(), plan.source, plan.destination);

    Some(surface)
}

/// 裁剪卡图区域并加圆角遮罩，返回 PNG 字节。
pub fn crop_and_mask(normalized: &NormalizedImage<'_>, frame: &ReferenceFrame) -> Option<Bytes> {
    let plan = CropPlan::new(frame, normalized.width(), normalized.height());
    let surface = render(normalized, &plan, true)?;
    surface.encode_png()
}

/// 裁剪卡图区域并加圆角遮罩，返回未编码的栅格。
pub fn crop_and_mask_raster(normalized: &NormalizedImage<'_>, frame: &ReferenceFrame) -> Option<Raster> {
    let plan = CropPlan::new(frame, normalized.width(), normalized.height());
    render(normalized, &plan, true).map(PixmapSurface::into_raster)
}

/// 核心入口：归一化 → 裁剪遮罩 → PNG。
pub fn process_image(image: &Raster, frame: &ReferenceFrame) -> Option<Bytes> {
    let normalized = normalize(image, frame)?;
    crop_and_mask(&normalized, frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cropper::geometry::BASE_FRAME;
    use image::{Rgba, RgbaImage};

    /// 竖屏截图：1024 宽时 ratio = 1，卡图区域完整落在图内。
    fn portrait(width: u32, height: u32) -> Raster {
        let image = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 90, 255])
        });
        Raster::from_rgba(image).expect("raster")
    }

    #[test]
    fn output_size_follows_ratio() {
        let source = portrait(1024, 1400);
        let normalized = normalize(&source, &BASE_FRAME).expect("normalized");
        let raster = crop_and_mask_raster(&normalized, &BASE_FRAME).expect("raster");

        assert_eq!((raster.width(), raster.height()), (596, 869));
    }

    #[test]
    fn corners_are_transparent_and_center_is_opaque() {
        let source = portrait(1024, 1400);
        let normalized = normalize(&source, &BASE_FRAME).expect("normalized");
        let raster = crop_and_mask_raster(&normalized, &BASE_FRAME).expect("raster");
        let (w, h) = (raster.width(), raster.height());

        for (x, y) in [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)] {
            assert_eq!(raster.pixel(x, y).map(|p| p[3]), Some(0), "corner ({x}, {y})");
        }
        assert_eq!(raster.pixel(w / 2, h / 2).map(|p| p[3]), Some(255));
    }

    #[test]
    fn crop_samples_region_anchored_to_bottom() {
        let source = portrait(1024, 1400);
        let normalized = normalize(&source, &BASE_FRAME).expect("normalized");
        let raster = crop_and_mask_raster(&normalized, &BASE_FRAME).expect("raster");

        // 源区域左上角为 (176, 1400 - 1216) = (176, 184)
        let expected = source.pixel(176 + 300, 184 + 400).expect("source pixel");
        assert_eq!(raster.pixel(300, 400), Some(expected));
    }

    #[test]
    fn transparent_fills_do_not_change_pixels() {
        let source = portrait(1024, 1400);
        let normalized = normalize(&source, &BASE_FRAME).expect("normalized");
        let plan = CropPlan::new(&BASE_FRAME, normalized.width(), normalized.height());

        let with_fills = render(&normalized, &plan, true).expect("render").into_raster();
        let without_fills = render(&normalized, &plan, false).expect("render").into_raster();

        assert_eq!(with_fills.data(), without_fills.data());
    }

    #[test]
    fn repeated_runs_are_byte_identical() {
        let source = portrait(1024, 1400);
        let first = process_image(&source, &BASE_FRAME).expect("png");
        let second = process_image(&source, &BASE_FRAME).expect("png");
        assert_eq!(first, second);
    }

    #[test]
    fn tiny_input_yields_no_result() {
        // ratio = 1 / 1024，596 * ratio < 1 → 画布宽度截断为 0
        let source = portrait(1, 1);
        assert!(process_image(&source, &BASE_FRAME).is_none());
    }

    #[test]
    fn full_hd_source_region_above_image_stays_transparent() {
        // 1080 - 1216 * 1.875 < 0：输出上部没有源像素
        let source = portrait(1920, 1080);
        let normalized = normalize(&source, &BASE_FRAME).expect("normalized");
        let raster = crop_and_mask_raster(&normalized, &BASE_FRAME).expect("raster");

        assert_eq!((raster.width(), raster.height()), (1117, 1629));
        assert_eq!(raster.pixel(500, 100).map(|p| p[3]), Some(0));
        // 源 y = -1200 + 1300 = 100，落在图内
        assert_eq!(raster.pixel(500, 1300).map(|p| p[3]), Some(255));
    }
}
