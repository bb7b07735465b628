//! # 卡图裁剪工具：命令行入口
//!
//! 本文件仅负责参数解析、日志初始化与协作方的串联。
//! 裁剪逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;

use md_card_cropper::clipboard;
use md_card_cropper::cropper::{CardCropper, ImageSource};
use md_card_cropper::error::AppError;
use md_card_cropper::export;
use md_card_cropper::session::{CropSession, SessionEvent};
use md_card_cropper::settings::AppSettings;

/// 从卡牌详情截图中裁出卡图，输出带圆角透明边的 PNG。
#[derive(Debug, Parser)]
#[command(name = "md-card-cropper", version, about)]
struct Cli {
    /// 要裁剪的截图文件（可多选，按给定顺序处理）
    files: Vec<PathBuf>,

    /// 额外处理剪贴板中的图片
    #[arg(long)]
    paste: bool,

    /// 输出目录（覆盖设置文件中的 output_dir）
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// 设置文件路径（JSON）
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("❌ {}", err);
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    if cli.files.is_empty() && !cli.paste {
        return Err(AppError::Usage(
            "请至少提供一个图片文件，或使用 --paste 处理剪贴板图片".to_string(),
        ));
    }

    let settings = match &cli.settings {
        Some(path) => AppSettings::load(path)?,
        None => AppSettings::default(),
    };

    let cropper = CardCropper::new(settings.crop.clone())?;
    let mut session = CropSession::new();

    // 粘贴批次
    if cli.paste {
        match clipboard::read_clipboard_image()? {
            Some(raster) => {
                let handles = cropper.process_rasters(vec![raster]).await;
                session.apply(SessionEvent::BatchCompleted(handles));
            }
            None => log::warn!("⚠️ 剪贴板中没有图片，跳过粘贴"),
        }
    }

    // 文件批次
    if !cli.files.is_empty() {
        let sources = cli
            .files
            .iter()
            .map(|path| ImageSource::FilePath(path.to_string_lossy().to_string()))
            .collect();
        let handles = cropper.process_batch(sources).await;
        session.apply(SessionEvent::BatchCompleted(handles));
    }

    if session.is_empty() {
        log::warn!("⚠️ 没有生成任何裁剪结果");
        return Ok(());
    }

    let custom_dir = cli
        .out_dir
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .or_else(|| settings.output_dir.clone());
    let out_dir = export::resolve_output_dir(custom_dir.as_deref())?;

    let now = Local::now().naive_local();
    for handle in session.history() {
        let path = export::save_handle(cropper.store(), handle, &out_dir, &now)?;
        println!("{}", path.display());
    }

    let info = export::output_dir_info(&out_dir)?;
    log::info!(
        "📁 输出目录: {} ({} 个文件, {:.2} MB)",
        info.path,
        info.file_count,
        info.total_size as f64 / 1024.0 / 1024.0
    );

    Ok(())
}
