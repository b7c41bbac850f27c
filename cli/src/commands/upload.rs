//! Object storage commands.
use std::path::Path;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use recharge_core::api::{
    file_extension, format_file_size, is_image_file, is_video_file, AppConfig, CliError,
    ProgressCallback, UploadFile, UploadProgress,
};
use serde_json::json;

use crate::commands::cli::{DeleteObjectArgs, FileInfoArgs, UploadArgs};

pub async fn handle_upload(args: UploadArgs, cfg: &AppConfig) -> Result<(), CliError> {
    let uploader = recharge_plugins::factory::build_uploader(cfg)
        .map_err(|e| CliError::Config(e.to_string()))?;
    let file = UploadFile::from_path(Path::new(&args.path))
        .await
        .map_err(|e| CliError::Command(format!("cannot read {}: {}", args.path, e)))?;

    let show_progress = !args.no_progress && atty::is(atty::Stream::Stderr);
    let bar = progress_bar(file.size(), show_progress);
    let folder = args
        .folder
        .unwrap_or_else(|| cfg.storage.default_folder.clone());

    let result = uploader
        .upload(file, Some(&folder), Some(progress_callback(bar.clone())))
        .await;
    bar.finish_and_clear();

    let url = result?;
    eprintln!("✓ File uploaded successfully!");
    println!("{url}");
    Ok(())
}

pub async fn handle_delete_object(args: DeleteObjectArgs, cfg: &AppConfig) -> Result<(), CliError> {
    let uploader = recharge_plugins::factory::build_uploader(cfg)
        .map_err(|e| CliError::Config(e.to_string()))?;
    uploader.remove(&args.url).await?;
    eprintln!("✓ File deleted");
    Ok(())
}

pub async fn handle_file_info(args: FileInfoArgs) -> Result<(), CliError> {
    let file = UploadFile::from_path(Path::new(&args.path))
        .await
        .map_err(|e| CliError::Command(format!("cannot read {}: {}", args.path, e)))?;
    let output = file_info(&file);
    println!(
        "{}",
        serde_json::to_string_pretty(&output).map_err(|e| CliError::Command(e.to_string()))?
    );
    Ok(())
}

fn file_info(file: &UploadFile) -> serde_json::Value {
    json!({
        "name": file.file_name,
        "extension": file_extension(&file.file_name),
        "content_type": file.content_type,
        "size": format_file_size(file.size()),
        "bytes": file.size(),
        "image": is_image_file(&file.content_type),
        "video": is_video_file(&file.content_type),
    })
}

fn progress_bar(total: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{bar:40.cyan/blue} {bytes}/{total_bytes} ({percent}%) {msg}")
    {
        bar.set_style(style.progress_chars("█▓▒░  "));
    }
    bar.set_message("uploading");
    bar
}

fn progress_callback(bar: ProgressBar) -> ProgressCallback {
    Arc::new(move |progress: UploadProgress| {
        tracing::trace!(
            target: "recharge.upload",
            loaded = progress.loaded,
            total = progress.total,
            percentage = progress.percentage
        );
        bar.set_position(progress.loaded);
    })
}
