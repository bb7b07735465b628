//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `CardCropper` 只负责流程编排与配置管理，不关心输入从哪个界面来。
//! 处理链路固定为：
//! 1. 读取配置快照
//! 2. 按来源加载原始字节
//! 3. 解码为栅格
//! 4. 归一化 + 裁剪遮罩 + PNG 编码
//! 5. 登记到句柄表
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<CropConfig>>` 支持运行时替换；单次批处理使用同一配置快照。
//! - 批处理中每张图在 tokio 阻塞线程池上独立执行，按输入顺序汇合结果。
//! - 任一图片失败只记录日志，结果中缺席，不影响同批其他图片。
//! - 记录 `load/decode/crop/total` 阶段耗时，便于性能诊断。

use std::sync::{Arc, RwLock};
use std::time::Instant;

use bytes::Bytes;

use super::engine;
use super::geometry::ReferenceFrame;
use super::handle::{HandleStore, ImageHandle};
use super::surface::Raster;
use super::{CropConfig, CropError, ImageSource};

/// 卡图裁剪器。
pub struct CardCropper {
    pub(super) config: Arc<RwLock<CropConfig>>,
    store: HandleStore,
}

impl CardCropper {
    /// 根据初始配置创建裁剪器。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use md_card_cropper::cropper::{CardCropper, CropConfig};
    ///
    /// let cropper = CardCropper::new(CropConfig::default())?;
    /// # Ok::<(), md_card_cropper::cropper::CropError>(())
    /// ```
    pub fn new(config: CropConfig) -> Result<Self, CropError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store: HandleStore::new(),
        })
    }

    pub fn store(&self) -> &HandleStore {
        &self.store
    }

    /// 获取配置快照。
    ///
    /// 作用：保证单次请求链路使用一致参数。
    pub fn config_snapshot(&self) -> Result<CropConfig, CropError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| CropError::ResourceLimit("配置读取锁已中毒".to_string()))
    }

    /// 替换配置（先校验）。
    pub fn set_config(&self, config: CropConfig) -> Result<(), CropError> {
        config.validate()?;

        let mut current = self
            .config
            .write()
            .map_err(|_| CropError::ResourceLimit("配置写入锁已中毒".to_string()))?;
        *current = config;

        log::info!(
            "⚙️ 已更新裁剪配置（frame={}x{}, max_pixels={}）",
            current.frame.width,
            current.frame.height,
            current.max_decoded_pixels
        );

        Ok(())
    }

    /// 处理一张已解码的图片，失败时返回 `None`。
    pub fn process_image(&self, raster: &Raster) -> Option<ImageHandle> {
        let config = match self.config_snapshot() {
            Ok(config) => config,
            Err(err) => {
                log::warn!("⚠️ 读取配置失败，跳过图片：{}", err);
                return None;
            }
        };

        let crop_start = Instant::now();
        let png = engine::process_image(raster, &config.frame)?;
        log::info!(
            "✅ 卡图裁剪完成 - {}x{} crop={}ms output={}KB",
            raster.width(),
            raster.height(),
            crop_start.elapsed().as_millis(),
            png.len() / 1024
        );

        Some(self.store.register(png))
    }

    /// 处理单个来源（加载 → 解码 → 裁剪）。
    pub async fn process_source(&self, source: ImageSource) -> Option<ImageHandle> {
        self.process_batch(vec![source]).await.into_iter().next()
    }

    /// 并发处理一批来源，按输入顺序返回成功的句柄。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use md_card_cropper::cropper::{CardCropper, CropConfig, ImageSource};
    ///
    /// # async fn demo() -> Result<(), md_card_cropper::cropper::CropError> {
    /// let cropper = CardCropper::new(CropConfig::default())?;
    /// let handles = cropper
    ///     .process_batch(vec![
    ///         ImageSource::FilePath("a.png".into()),
    ///         ImageSource::FilePath("b.png".into()),
    ///     ])
    ///     .await;
    /// println!("{} 张成功", handles.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn process_batch(&self, sources: Vec<ImageSource>) -> Vec<ImageHandle> {
        let config = match self.config_snapshot() {
            Ok(config) => config,
            Err(err) => {
                log::warn!("⚠️ 读取配置失败，整批跳过：{}", err);
                return Vec::new();
            }
        };

        let total = sources.len();
        let tasks: Vec<_> = sources
            .into_iter()
            .enumerate()
            .map(|(index, source)| {
                let config = config.clone();
                tokio::task::spawn_blocking(move || Self::run_pipeline(index, &source, &config))
            })
            .collect();

        let mut handles = Vec::with_capacity(total);
        for (index, task) in tasks.into_iter().enumerate() {
            match task.await {
                Ok(Some(png)) => handles.push(self.store.register(png)),
                Ok(None) => {}
                Err(err) => log::warn!("⚠️ 第 {} 张图片处理任务异常退出：{}", index + 1, err),
            }
        }

        log::info!("📦 批处理完成：{}/{} 张成功", handles.len(), total);
        handles
    }

    /// 并发处理一批已解码的图片（例如剪贴板粘贴），按输入顺序返回成功的句柄。
    pub async fn process_rasters(&self, rasters: Vec<Raster>) -> Vec<ImageHandle> {
        let config = match self.config_snapshot() {
            Ok(config) => config,
            Err(err) => {
                log::warn!("⚠️ 读取配置失败，整批跳过：{}", err);
                return Vec::new();
            }
        };

        let total = rasters.len();
        let tasks: Vec<_> = rasters
            .into_iter()
            .enumerate()
            .map(|(index, raster)| {
                let frame = config.frame;
                tokio::task::spawn_blocking(move || Self::crop_raster(index, &raster, &frame))
            })
            .collect();

        let mut handles = Vec::with_capacity(total);
        for (index, task) in tasks.into_iter().enumerate() {
            match task.await {
                Ok(Some(png)) => handles.push(self.store.register(png)),
                Ok(None) => {}
                Err(err) => log::warn!("⚠️ 第 {} 张图片处理任务异常退出：{}", index + 1, err),
            }
        }

        log::info!("📦 粘贴批次完成：{}/{} 张成功", handles.len(), total);
        handles
    }

    /// 裁剪单张已解码图片；无结果时记录日志。
    fn crop_raster(index: usize, raster: &Raster, frame: &ReferenceFrame) -> Option<Bytes> {
        let png = engine::process_image(raster, frame);
        if png.is_none() {
            log::warn!(
                "⚠️ 第 {} 张图片裁剪无结果（{}x{}）",
                index + 1,
                raster.width(),
                raster.height()
            );
        }
        png
    }

    /// 单张图片的完整阻塞链路。错误只记录日志。
    fn run_pipeline(index: usize, source: &ImageSource, config: &CropConfig) -> Option<Bytes> {
        let total_start = Instant::now();

        let load_start = Instant::now();
        let raw = Self::load_source(source, config)
            .map_err(|err| Self::log_failure(index, source, &err))
            .ok()?;
        let load_elapsed = load_start.elapsed();

        let decode_start = Instant::now();
        let raster = Self::decode_raster(raw, config)
            .map_err(|err| Self::log_failure(index, source, &err))
            .ok()?;
        let decode_elapsed = decode_start.elapsed();

        let crop_start = Instant::now();
        let png = Self::crop_raster(index, &raster, &config.frame)?;
        let crop_elapsed = crop_start.elapsed();

        log::info!(
            "✅ 图片处理完成 - 来源: {} load={}ms decode={}ms crop={}ms total={}ms",
            source.hint(),
            load_elapsed.as_millis(),
            decode_elapsed.as_millis(),
            crop_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Some(png)
    }

    fn log_failure(index: usize, source: &ImageSource, err: &CropError) {
        log::warn!(
            "⚠️ 第 {} 张图片已跳过 - 来源: {} stage={} code={} {}",
            index + 1,
            source.hint(),
            err.stage(),
            err.code(),
            err
        );
    }
}
