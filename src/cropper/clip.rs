//! 圆角矩形裁剪路径。
//!
//! 四个角为四分之一圆（三次贝塞尔近似），路径顺时针：
//! 上边 → 右上角 → 右边 → 右下角 → 下边（右到左）→ 左下角 → 左边 → 左上角。
//! 不校验 `radius`，`2 * radius > min(width, height)` 时形状未定义，由调用方保证。

use tiny_skia::{Path, PathBuilder};

use super::surface::Surface;

/// 四分之一圆的三次贝塞尔控制点系数：4/3 * tan(π/8)
const KAPPA: f32 = 0.552_284_8;

/// 构建圆角矩形路径。宽高非有限或路径退化时返回 `None`。
pub fn rounded_rect_path(x: f64, y: f64, width: f64, height: f64, radius: f64) -> Option<Path> {
    let (x, y, w, h, r) = (x as f32, y as f32, width as f32, height as f32, radius as f32);
    let k = r * KAPPA;

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);

    pb.line_to(x + w - r, y);
    pb.cubic_to(x + w - r + k, y, x + w, y + r - k, x + w, y + r);

    pb.line_to(x + w, y + h - r);
    pb.cubic_to(x + w, y + h - r + k, x + w - r + k, y + h, x + w - r, y + h);

    pb.line_to(x + r, y + h);
    pb.cubic_to(x + r - k, y + h, x, y + h - r + k, x, y + h - r);

    pb.line_to(x, y + r);
    pb.cubic_to(x, y + r - k, x + r - k, y, x + r, y);

    pb.close();
    pb.finish()
}

/// 在 `surface` 上安装圆角矩形裁剪区域。
///
/// 之后的所有绘制仅落在路径内部；画布为一次性使用，不提供恢复裁剪的能力。
pub fn build_rounded_clip<S: Surface + ?Sized>(
    surface: &mut S,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    radius: f64,
) {
    let path = rounded_rect_path(x, y, width, height, radius);
    if path.is_none() {
        log::debug!(
            "圆角路径退化（{}x{} r={}），裁剪区域为空",
            width,
            height,
            radius
        );
    }
    surface.clip(path.as_ref());
}
