//! DenoiseIt - 主程序入口
//!
//! 纯流程控制器，负责协调各个工具模块完成降噪任务。

use denoiseit::{
    error::{AudioError, ErrorCategory},
    tools,
};
use std::process;

/// 错误退出码定义
mod exit_codes {
    /// I/O错误（打开、写入、短写）
    pub const IO_ERROR: i32 = 1;
    /// 参数/格式/输入错误
    pub const FORMAT_ERROR: i32 = 2;
    /// 解码失败
    pub const DECODING_ERROR: i32 = 3;
    /// 资源错误（模型加载失败）
    pub const RESOURCE_ERROR: i32 = 5;
}

/// 获取错误建议文本
fn get_error_suggestion(error: &AudioError) -> &'static str {
    match error {
        AudioError::InvalidInput(_) => {
            "检查命令行参数是否正确，使用 --help 查看完整用法 / Check if command-line arguments are correct, use --help to see full usage"
        }
        AudioError::FormatError(_) => {
            "输入需为48kHz、可定位的WAV文件，可先用 ffmpeg 或 sox 转换 / Input must be a seekable 48kHz WAV file, try using ffmpeg or sox to convert it first"
        }
        AudioError::ResourceError(_) => {
            "检查模型文件路径与内容是否为有效的RNNoise模型 / Check that the model path exists and contains a valid RNNoise model"
        }
        AudioError::IoError(_) => {
            "检查文件路径是否正确、磁盘空间是否充足 / Check that file paths are correct and the disk is not full"
        }
        AudioError::DecodingError(_) => {
            "文件可能损坏或被截断 / File may be corrupted or truncated"
        }
    }
}

/// 错误处理和建议
fn handle_error(error: AudioError) -> ! {
    eprintln!("[ERROR] 错误 / Error: {error}");

    let category = ErrorCategory::from_audio_error(&error);
    eprintln!("[INFO] 类别 / Category: {}", category.display_name());
    eprintln!("[INFO] 建议 / Suggestion: {}", get_error_suggestion(&error));

    let exit_code = match category {
        ErrorCategory::Configuration => exit_codes::RESOURCE_ERROR,
        ErrorCategory::Validation => exit_codes::FORMAT_ERROR,
        ErrorCategory::Decoding => exit_codes::DECODING_ERROR,
        ErrorCategory::Io => exit_codes::IO_ERROR,
    };

    process::exit(exit_code);
}

/// 应用程序主逻辑（便于测试和复用）
fn run() -> Result<(), AudioError> {
    // 1. 解析命令行参数
    let config = tools::parse_args()?;

    // 2. 显示启动信息
    tools::show_startup_info(&config);

    // 3. 降噪并输出摘要
    let summary = tools::denoise_file(&config)?;
    tools::output_summary(&summary, &config)?;

    tools::show_completion_info(&config);
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        handle_error(error);
    }
}
