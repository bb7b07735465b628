//! # 绘图表面
//!
//! ## 设计思路
//!
//! 裁剪引擎只依赖一个最小的 2D 绘图能力：填充矩形、安装裁剪路径、按源/目标矩形绘制图片。
//! 这一能力抽象为 `Surface` trait，生产实现 `PixmapSurface` 基于 `tiny-skia`，
//! 测试可以替换为记录调用的假实现。
//!
//! ## 实现思路
//!
//! - `Raster` 持有预乘 alpha 的 `Pixmap`，与 `image::RgbaImage`（非预乘）互相转换。
//! - 裁剪区域用 `Mask` 表示，多次 `clip` 取交集，与 canvas 的 `clip()` 语义一致。
//! - `draw_image` 复刻 canvas 9 参数 `drawImage`：源矩形先与图片求交，
//!   目标矩形按同一比例收缩，源图片之外的区域保持原样（透明）。

use bytes::Bytes;
use image::RgbaImage;
use tiny_skia::{
    Color, ColorU8, FillRule, FilterQuality, IntSize, Mask, Paint, Path, Pattern, Pixmap,
    SpreadMode, Transform,
};

use super::geometry::Rect;

/// 已解码的栅格图片（预乘 RGBA）。
#[derive(Clone)]
pub struct Raster {
    pixmap: Pixmap,
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Raster {
    /// 从非预乘 RGBA 图像构建；零尺寸返回 `None`。
    pub fn from_rgba(image: RgbaImage) -> Option<Self> {
        let size = IntSize::from_wh(image.width(), image.height())?;
        let mut data = image.into_raw();

        for px in data.chunks_exact_mut(4) {
            if px[3] == u8::MAX {
                continue;
            }
            let color = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
            px[0] = color.red();
            px[1] = color.green();
            px[2] = color.blue();
        }

        Pixmap::from_vec(data, size).map(|pixmap| Self { pixmap })
    }

    /// 分配全透明栅格；零尺寸返回 `None`。
    pub fn transparent(width: u32, height: u32) -> Option<Self> {
        Pixmap::new(width, height).map(|pixmap| Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// 预乘 RGBA 原始字节。
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// 读取单个像素（非预乘 RGBA），越界返回 `None`。
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some([color.red(), color.green(), color.blue(), color.alpha()])
    }

    /// 转回非预乘 RGBA 图像。
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut bytes = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.pixels() {
            let color = px.demultiply();
            bytes.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }

        RgbaImage::from_raw(self.width(), self.height(), bytes)
            .unwrap_or_else(|| RgbaImage::new(self.width(), self.height()))
    }

    pub(crate) fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

/// 最小 2D 绘图能力。
pub trait Surface {
    /// 画布尺寸（像素）。
    fn size(&self) -> (u32, u32);

    /// 以 source-over 方式在当前裁剪区域内填充矩形。
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// 安装裁剪路径，与已有裁剪区域取交集。`None` 表示空区域。
    fn clip(&mut self, path: Option<&Path>);

    /// 将 `image` 的 `src` 区域绘制到画布的 `dst` 区域。
    fn draw_image(&mut self, image: &Raster, src: Rect, dst: Rect);
}

/// 基于 `tiny-skia` 的单次使用画布。
pub struct PixmapSurface {
    pixmap: Pixmap,
    clip: Option<Mask>,
}

impl PixmapSurface {
    /// 分配画布；任一维度为 0 时返回 `None`（画布获取失败）。
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            pixmap: Pixmap::new(width, height)?,
            clip: None,
        })
    }

    /// 编码为 PNG（无损，保留 alpha）。
    pub fn encode_png(&self) -> Option<Bytes> {
        match self.pixmap.encode_png() {
            Ok(data) if !data.is_empty() => Some(Bytes::from(data)),
            Ok(_) => {
                log::warn!("⚠️ PNG 编码结果为空");
                None
            }
            Err(err) => {
                log::warn!("⚠️ PNG 编码失败：{}", err);
                None
            }
        }
    }

    pub fn into_raster(self) -> Raster {
        Raster { pixmap: self.pixmap }
    }
}

fn to_skia_rect(rect: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_xywh(
        rect.x as f32,
        rect.y as f32,
        rect.width as f32,
        rect.height as f32,
    )
}

impl Surface for PixmapSurface {
    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(rect) = to_skia_rect(rect) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(color);
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), self.clip.as_ref());
    }

    fn clip(&mut self, path: Option<&Path>) {
        let (width, height) = self.size();

        let Some(path) = path else {
            self.clip = Mask::new(width, height);
            return;
        };

        match self.clip.as_mut() {
            Some(mask) => mask.intersect_path(path, FillRule::Winding, true, Transform::identity()),
            None => {
                if let Some(mut mask) = Mask::new(width, height) {
                    mask.fill_path(path, FillRule::Winding, true, Transform::identity());
                    self.clip = Some(mask);
                }
            }
        }
    }

    fn draw_image(&mut self, image: &Raster, src: Rect, dst: Rect) {
        if src.width <= 0.0 || src.height <= 0.0 || dst.width <= 0.0 || dst.height <= 0.0 {
            return;
        }

        let scale_x = dst.width / src.width;
        let scale_y = dst.height / src.height;

        let bounds = Rect::new(0.0, 0.0, image.width() as f64, image.height() as f64);
        let Some(visible) = src.intersect(&bounds) else {
            return;
        };

        let target = Rect::new(
            dst.x + (visible.x - src.x) * scale_x,
            dst.y + (visible.y - src.y) * scale_y,
            visible.width * scale_x,
            visible.height * scale_y,
        );
        let Some(target) = to_skia_rect(target) else {
            return;
        };

        let transform = Transform::from_row(
            scale_x as f32,
            0.0,
            0.0,
            scale_y as f32,
            (dst.x - src.x * scale_x) as f32,
            (dst.y - src.y * scale_y) as f32,
        );
        let paint = Paint {
            shader: Pattern::new(
                image.pixmap().as_ref(),
                SpreadMode::Pad,
                FilterQuality::Bilinear,
                1.0,
                transform,
            ),
            ..Paint::default()
        };

        self.pixmap
            .fill_rect(target, &paint, Transform::identity(), self.clip.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> Raster {
        Raster::from_rgba(RgbaImage::from_pixel(width, height, Rgba(color)))
            .expect("raster should be created")
    }

    #[test]
    fn zero_sized_surface_is_rejected() {
        assert!(PixmapSurface::new(0, 10).is_none());
        assert!(Raster::transparent(10, 0).is_none());
        assert!(Raster::from_rgba(RgbaImage::new(0, 0)).is_none());
    }

    #[test]
    fn raster_round_trips_opaque_pixels() {
        let image = RgbaImage::from_fn(4, 3, |x, y| Rgba([x as u8 * 10, y as u8 * 20, 7, 255]));
        let raster = Raster::from_rgba(image.clone()).expect("raster should be created");
        assert_eq!(raster.to_rgba_image(), image);
        assert_eq!(raster.pixel(3, 2), Some([30, 40, 7, 255]));
        assert_eq!(raster.pixel(4, 0), None);
        assert_eq!(raster.pixel(0, 3), None);
    }

    #[test]
    fn pixel_past_row_end_does_not_wrap_to_next_row() {
        let image = RgbaImage::from_fn(2, 2, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        let raster = Raster::from_rgba(image).expect("raster should be created");

        assert_eq!(raster.pixel(0, 1), Some([0, 1, 0, 255]));
        assert_eq!(raster.pixel(2, 0), None);
        assert_eq!(raster.pixel(u32::MAX, 0), None);
    }

    #[test]
    fn transparent_fill_is_a_no_op() {
        let mut surface = PixmapSurface::new(8, 8).expect("surface");
        surface.draw_image(
            &solid(8, 8, [200, 10, 10, 255]),
            Rect::new(0.0, 0.0, 8.0, 8.0),
            Rect::new(0.0, 0.0, 8.0, 8.0),
        );
        let before = surface.pixmap.data().to_vec();

        surface.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0), Color::TRANSPARENT);
        assert_eq!(surface.pixmap.data(), before.as_slice());
    }

    #[test]
    fn draw_image_leaves_out_of_bounds_source_transparent() {
        let mut surface = PixmapSurface::new(10, 10).expect("surface");
        // 源矩形上半部分位于图片之外
        surface.draw_image(
            &solid(10, 10, [0, 0, 255, 255]),
            Rect::new(0.0, -5.0, 10.0, 10.0),
            Rect::new(0.0, 0.0, 10.0, 10.0),
        );
        let raster = surface.into_raster();

        assert_eq!(raster.pixel(5, 2).map(|p| p[3]), Some(0));
        assert_eq!(raster.pixel(5, 7), Some([0, 0, 255, 255]));
    }

    #[test]
    fn empty_clip_blocks_all_drawing() {
        let mut surface = PixmapSurface::new(6, 6).expect("surface");
        surface.clip(None);
        surface.draw_image(
            &solid(6, 6, [255, 255, 255, 255]),
            Rect::new(0.0, 0.0, 6.0, 6.0),
            Rect::new(0.0, 0.0, 6.0, 6.0),
        );
        assert!(surface.into_raster().data().iter().all(|b| *b == 0));
    }

    #[test]
    fn encode_png_produces_png_signature() {
        let surface = PixmapSurface::new(3, 3).expect("surface");
        let png = surface.encode_png().expect("png bytes");
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
