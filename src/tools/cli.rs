//! 命令行接口模块
//!
//! 负责命令行参数解析、配置管理和程序信息展示。

use super::constants::{PROJECT_URL, defaults};
use crate::error::{AudioError, AudioResult};
use crate::processing::PipelineOptions;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use std::path::PathBuf;

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");
const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// 应用程序配置
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// 输入音频文件
    pub input_path: PathBuf,

    /// 输出音频文件（格式与输入相同）
    pub output_path: PathBuf,

    /// 自定义RNNoise模型（可选）
    pub model_path: Option<PathBuf>,

    /// 降噪前放大系数
    pub amplify: f32,

    /// 预热秒数
    pub prefeed_seconds: f32,

    /// 单帧内按声道并行处理
    pub parallel_channels: bool,

    /// 是否显示详细信息
    pub verbose: bool,

    /// 以JSON输出运行摘要
    pub json: bool,
}

impl AppConfig {
    /// 转换为流水线参数
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            amplify: self.amplify,
            prefeed_seconds: self.prefeed_seconds,
            parallel_channels: self.parallel_channels,
        }
    }
}

/// 构建命令行定义
pub fn build_command() -> Command {
    Command::new("denoiseit")
        .version(VERSION)
        .about(DESCRIPTION)
        .long_about(
            "使用RNNoise对INPUT音频降噪并保存到OUTPUT / Denoise the INPUT audio file with RNNoise and save the result to OUTPUT.\n\
             OUTPUT必须与INPUT使用相同的扩展名/文件格式 / OUTPUT must have the same extension/file format as INPUT.",
        )
        .after_help(format!("More info: {PROJECT_URL}"))
        .arg(
            Arg::new("INPUT")
                .help("输入音频文件 / input audio file (48kHz WAV)")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("OUTPUT")
                .help("输出音频文件 / output audio file")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .index(2),
        )
        .arg(
            Arg::new("model")
                .long("model")
                .short('m')
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("自定义RNNoise模型路径 / path to the custom RNNoise model"),
        )
        .arg(
            Arg::new("amplify")
                .long("amplify")
                .short('a')
                .value_name("FACTOR")
                .value_parser(value_parser!(f32))
                .allow_negative_numbers(true)
                .default_value("1.0")
                .help("降噪前放大输入 / amplify the input before denoising"),
        )
        .arg(
            Arg::new("prefeed")
                .long("prefeed")
                .short('p')
                .value_name("SECONDS")
                .value_parser(value_parser!(f32))
                .allow_negative_numbers(true)
                .default_value("0.0")
                .help(
                    "预读秒数，让RNNoise先学习噪声特征 / number of seconds to read ahead to teach RNNoise what noise to remove (useful for noisy starts)",
                ),
        )
        .arg(
            Arg::new("parallel-channels")
                .long("parallel-channels")
                .help("单帧内按声道并行处理 / process channels of each frame in parallel")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("显示详细处理信息 / show detailed processing information")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("以JSON输出运行摘要 / print the run summary as JSON")
                .action(ArgAction::SetTrue),
        )
}

/// 从解析结果创建配置
///
/// 数值参数的取值校验由 [`PipelineOptions::validate`] 完成。
pub fn config_from_matches(matches: &ArgMatches) -> AudioResult<AppConfig> {
    let required_path = |id: &str| {
        matches
            .get_one::<PathBuf>(id)
            .cloned()
            .ok_or_else(|| AudioError::InvalidInput(format!("缺少参数 / missing argument: {id}")))
    };

    let config = AppConfig {
        input_path: required_path("INPUT")?,
        output_path: required_path("OUTPUT")?,
        model_path: matches.get_one::<PathBuf>("model").cloned(),
        amplify: matches
            .get_one::<f32>("amplify")
            .copied()
            .unwrap_or(defaults::AMPLIFY_FACTOR),
        prefeed_seconds: matches
            .get_one::<f32>("prefeed")
            .copied()
            .unwrap_or(defaults::PREFEED_SECONDS),
        parallel_channels: matches.get_flag("parallel-channels"),
        verbose: matches.get_flag("verbose"),
        json: matches.get_flag("json"),
    };

    config.pipeline_options().validate()?;
    Ok(config)
}

/// 解析命令行参数并创建配置
///
/// 参数数量错误或数值无法解析时由clap打印用法并退出。
pub fn parse_args() -> AudioResult<AppConfig> {
    let matches = build_command().get_matches();
    config_from_matches(&matches)
}

/// 显示程序启动信息
pub fn show_startup_info(config: &AppConfig) {
    if config.json {
        return;
    }
    println!("DenoiseIt v{VERSION}");
    if config.verbose {
        if let Some(model) = &config.model_path {
            println!("[INFO] 使用RNNoise模型 / Trying to use RNNoise model: {}", model.display());
        }
        println!("[INFO] 放大系数 / Using amplification factor: {}", config.amplify);
        if config.prefeed_seconds > 0.0 {
            println!(
                "[INFO] 预热 / Prefeeding RNNoise with {} seconds of audio",
                config.prefeed_seconds
            );
        }
        if config.parallel_channels {
            println!("[INFO] 声道并行处理已启用 / Parallel channel processing enabled");
        }
    }
}

/// 显示程序完成信息
pub fn show_completion_info(config: &AppConfig) {
    if config.verbose && !config.json {
        println!("[OK] 降噪完成 / Denoising finished");
    }
}
