//! # 参考几何常量与比例换算
//!
//! ## 设计思路
//!
//! 裁剪区域、圆角半径全部以“参考像素”表示，即宽度为 `BASE_FRAME.width`
//! 的标准截图中的像素。任意输入图片先经过宽高比归一化，再用
//! `ratio = normalized.width / frame.width` 把所有参考量换算到自身像素空间。
//!
//! ## 实现思路
//!
//! - `CropPlan` 是纯函数结果：只依赖归一化后的尺寸与参考帧，每张图重新计算。
//! - 几何量统一用 `f64`，仅在分配画布时按 canvas 语义截断为整数。
//! - 裁剪源区域以图片**底边**为锚点，顶部 UI 高度变化不影响卡图位置。

use serde::{Deserialize, Serialize};

/// 轴对齐矩形（浮点坐标）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// 两矩形交集；无重叠或退化时返回 `None`。
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= left || bottom <= top {
            return None;
        }

        Some(Rect::new(left, top, right - left, bottom - top))
    }

    /// 所有分量乘以同一比例。
    pub fn scaled(&self, ratio: f64) -> Rect {
        Rect::new(
            self.x * ratio,
            self.y * ratio,
            self.width * ratio,
            self.height * ratio,
        )
    }
}

/// 卡图区域（参考像素）。
///
/// `bottom` 为裁剪区域顶边到图片底边的距离，而非到顶边的距离。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropArea {
    pub x: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

/// 参考帧：所有裁剪常量所依据的标准坐标系。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceFrame {
    /// 参考帧宽度（参考像素）。`ratio` 的分母。
    pub width: f64,
    /// 参考帧高度（参考像素）。
    pub height: f64,
    /// 卡图区域。
    pub crop: CropArea,
    /// 输出圆角半径（参考像素）。
    pub corner_radius: f64,
    /// 超宽截图在 16:9 切片时向下偏移的高度（参考像素），用于跳过顶部 UI 条。
    pub wide_top_offset: f64,
    /// `height / width` 低于该值视为超宽截图。
    pub min_aspect: f64,
}

/// 默认参考帧常量。
pub const BASE_FRAME: ReferenceFrame = ReferenceFrame {
    width: 1024.0,
    height: 590.0,
    crop: CropArea {
        x: 176.0,
        bottom: 1216.0,
        width: 596.0,
        height: 869.0,
    },
    corner_radius: 16.0,
    wide_top_offset: 26.0,
    min_aspect: 0.56,
};

impl Default for ReferenceFrame {
    fn default() -> Self {
        BASE_FRAME
    }
}

impl ReferenceFrame {
    /// 校验所有参考量为有限正数。
    ///
    /// 不校验裁剪区域是否落在参考帧内：区域以底边为锚点，可超出名义帧高。
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("width", self.width),
            ("height", self.height),
            ("crop.x", self.crop.x),
            ("crop.bottom", self.crop.bottom),
            ("crop.width", self.crop.width),
            ("crop.height", self.crop.height),
            ("corner_radius", self.corner_radius),
            ("wide_top_offset", self.wide_top_offset),
            ("min_aspect", self.min_aspect),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("参考帧字段 {} 必须为正数（当前：{}）", name, value));
            }
        }

        if self.crop.x + self.crop.width > self.width {
            return Err(format!(
                "裁剪区域横向越界：{} + {} > {}",
                self.crop.x, self.crop.width, self.width
            ));
        }

        Ok(())
    }

    /// 参考像素 → 目标图片像素的比例。
    pub fn ratio_for_width(&self, normalized_width: u32) -> f64 {
        normalized_width as f64 / self.width
    }
}

/// 单张图片的裁剪方案。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropPlan {
    pub ratio: f64,
    /// 输出画布尺寸（浮点，未截断）。
    pub output_width: f64,
    pub output_height: f64,
    /// 圆角半径（目标像素）。
    pub corner_radius: f64,
    /// 归一化图片中的源区域。
    pub source: Rect,
    /// 输出画布中的目标区域。
    pub destination: Rect,
}

impl CropPlan {
    /// 根据归一化后的图片尺寸计算裁剪方案。
    pub fn new(frame: &ReferenceFrame, normalized_width: u32, normalized_height: u32) -> Self {
        let ratio = frame.ratio_for_width(normalized_width);
        let crop = frame.crop;

        let source = Rect::new(
            crop.x * ratio,
            normalized_height as f64 - crop.bottom * ratio,
            crop.width * ratio,
            crop.height * ratio,
        );
        let destination = Rect::new(0.0, 0.0, crop.width, crop.height).scaled(ratio);

        Self {
            ratio,
            output_width: crop.width * ratio,
            output_height: crop.height * ratio,
            corner_radius: frame.corner_radius * ratio,
            source,
            destination,
        }
    }

    /// 画布整数尺寸（截断，与 canvas 设置宽高的行为一致）。
    pub fn canvas_size(&self) -> (u32, u32) {
        (truncate_dimension(self.output_width), truncate_dimension(self.output_height))
    }
}

/// 浮点尺寸截断为像素数；负数与 NaN 记为 0。
pub(crate) fn truncate_dimension(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.min(u32::MAX as f64) as u32
    } else {
        0
    }
}
