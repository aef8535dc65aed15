//! 音频降噪处理模块
//!
//! 负责路径校验、模型加载、打开输入、驱动流水线以及输出运行摘要。
//! 所有输入校验都在创建输出文件之前完成。

use super::cli::AppConfig;
use super::constants::formats::SUPPORTED_EXTENSIONS;
use super::utils;
use crate::audio::{SampleSink, SampleSource, StreamFormat, WavSink, WavSource};
use crate::engine::{EngineFactory, RnnoiseFactory};
use crate::error::{AudioError, AudioResult};
use crate::processing::{Pipeline, PipelineEvent, PipelineReport};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

/// 运行摘要（`--json` 输出）
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub timestamp: String,
    pub input: String,
    pub output: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub amplify: f32,
    pub prefeed_seconds: f32,
    pub custom_model: bool,
    pub parallel_channels: bool,
    #[serde(flatten)]
    pub report: PipelineReport,
    pub elapsed_ms: u64,
}

/// 校验输入/输出路径
///
/// 输出必须与输入使用相同的扩展名，且不能覆盖输入文件本身。
pub fn check_paths(input: &Path, output: &Path) -> AudioResult<()> {
    let input_ext = utils::extract_extension_lowercase(input);
    let output_ext = utils::extract_extension_lowercase(output);

    match input_ext.as_deref() {
        Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext) => {}
        Some(ext) => {
            return Err(AudioError::FormatError(format!(
                "不支持的文件格式 / unsupported file format: .{ext} (try using ffmpeg or sox to convert it to WAV first)"
            )));
        }
        None => {
            return Err(AudioError::FormatError(
                "输入文件缺少扩展名 / input file has no extension".to_string(),
            ));
        }
    }

    if input_ext != output_ext {
        return Err(AudioError::InvalidInput(format!(
            "OUTPUT必须与INPUT使用相同的扩展名 / OUTPUT must have the same extension as INPUT: {} vs {}",
            input.display(),
            output.display()
        )));
    }

    if utils::is_same_file(input, output) {
        return Err(AudioError::InvalidInput(
            "OUTPUT不能覆盖INPUT / OUTPUT must not overwrite INPUT".to_string(),
        ));
    }

    Ok(())
}

/// 根据配置创建引擎工厂（外部模型加载失败为致命错误）
pub fn load_engine_factory(config: &AppConfig) -> AudioResult<RnnoiseFactory> {
    match &config.model_path {
        Some(path) => RnnoiseFactory::from_model_file(path),
        None => Ok(RnnoiseFactory::new()),
    }
}

fn show_format_info(format: &StreamFormat) {
    println!("音频格式信息 / Audio format information:");
    println!("   采样率 / Sample rate:   {} Hz", format.sample_rate);
    println!("   声道数 / Channels:      {}", format.channels);
    println!("   位深度 / Bit depth:     {} bits", format.encoding.bits_per_sample());
    println!("   帧数 / Frames:          {}", format.total_frames);
    println!("   时长 / Duration:        {:.2} seconds", format.duration_seconds());
}

/// 对单个文件降噪
pub fn denoise_file(config: &AppConfig) -> AudioResult<RunSummary> {
    let started = Instant::now();
    let quiet = config.json;

    check_paths(&config.input_path, &config.output_path)?;
    let factory = load_engine_factory(config)?;

    let mut source = WavSource::open(&config.input_path)?;
    let format = source.format().clone();
    if config.verbose && !quiet {
        println!(
            "加载音频文件 / Loading audio file: {}",
            utils::extract_filename_lossy(&config.input_path)
        );
        show_format_info(&format);
        println!(
            "[INFO] 引擎帧长 / Engine frame size: {} samples",
            factory.frame_size()
        );
    }

    let mut pipeline = Pipeline::new(&factory, &format, &config.pipeline_options())?;

    let prefeed = pipeline.prefeed();
    if prefeed.is_prefeeding() && !quiet {
        println!(
            "[INFO] 预热需要 {} 帧 / Needs {} frames for prefeed",
            prefeed.requested_frames(),
            prefeed.requested_frames()
        );
        if prefeed.was_capped() {
            eprintln!(
                "[WARNING] 预热超过文件长度，截断为 {0} 帧 / Prefeed exceeds file length - capping to {0} frames",
                prefeed.budget_frames()
            );
        }
    }

    let mut sink = WavSink::create(&config.output_path, &format)?;
    let report = pipeline.run_with_events(&mut source, &mut sink, |event| match event {
        PipelineEvent::PrefeedCompleted { frames, .. } if !quiet => {
            println!("[INFO] 预热完成 / Prefeed completed ({frames} frames)");
        }
        PipelineEvent::PrefeedCompleted { .. } => {}
    })?;
    sink.finalize()?;

    Ok(RunSummary {
        timestamp: chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        input: config.input_path.display().to_string(),
        output: config.output_path.display().to_string(),
        sample_rate: format.sample_rate,
        channels: format.channels,
        amplify: config.amplify,
        prefeed_seconds: config.prefeed_seconds,
        custom_model: factory.has_custom_model(),
        parallel_channels: config.parallel_channels,
        report,
        elapsed_ms: started.elapsed().as_millis() as u64,
    })
}

/// 输出运行摘要
pub fn output_summary(summary: &RunSummary, config: &AppConfig) -> AudioResult<()> {
    if config.json {
        let json = serde_json::to_string_pretty(summary).map_err(|e| {
            AudioError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;
        println!("{json}");
        return Ok(());
    }

    println!(
        "完成，共处理 {0} 帧 / Done, processed {0} frames.",
        summary.report.frames_written
    );
    if config.verbose {
        println!(
            "   写出窗口 / Windows written: {}，耗时 / Elapsed: {} ms",
            summary.report.windows_written, summary.elapsed_ms
        );
    }
    Ok(())
}
