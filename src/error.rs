//! 统一错误处理框架
//!
//! 降噪流水线的错误类型定义。所有错误均为终止性错误，不存在降级模式。

use std::fmt;
use std::io;

/// 音频处理相关的统一错误类型
#[derive(Debug)]
pub enum AudioError {
    /// 输入验证错误（参数、路径、文件过短等）
    InvalidInput(String),

    /// 文件I/O错误（含输出短写）
    IoError(io::Error),

    /// 音频格式错误（采样率不符、格式不可写、不可定位）
    FormatError(String),

    /// 解码错误（读取样本失败、读取不足）
    DecodingError(String),

    /// 资源访问错误（降噪模型加载失败等）
    ResourceError(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::InvalidInput(msg) => write!(f, "输入验证失败: {msg}"),
            AudioError::IoError(err) => write!(f, "文件I/O错误: {err}"),
            AudioError::FormatError(msg) => write!(f, "音频格式错误: {msg}"),
            AudioError::DecodingError(msg) => write!(f, "音频解码失败: {msg}"),
            AudioError::ResourceError(msg) => write!(f, "资源访问错误: {msg}"),
        }
    }
}

impl std::error::Error for AudioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AudioError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for AudioError {
    fn from(err: io::Error) -> Self {
        AudioError::IoError(err)
    }
}

impl From<hound::Error> for AudioError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io_err) => AudioError::IoError(io_err),
            hound::Error::Unsupported => {
                AudioError::FormatError("WAV格式不受支持 / unsupported WAV format".to_string())
            }
            other => AudioError::DecodingError(format!("WAV解码错误: {other}")),
        }
    }
}

/// 音频处理操作的标准Result类型
pub type AudioResult<T> = Result<T, AudioError>;

// ==================== 错误转换Helper函数 ====================

/// 创建格式错误的helper函数
#[inline]
pub fn format_error<E: fmt::Display>(context: &str, err: E) -> AudioError {
    AudioError::FormatError(format!("{context}: {err}"))
}

/// 创建解码错误的helper函数
#[inline]
pub fn decoding_error<E: fmt::Display>(context: &str, err: E) -> AudioError {
    AudioError::DecodingError(format!("{context}: {err}"))
}

/// 创建资源错误的helper函数
#[inline]
pub fn resource_error<E: fmt::Display>(context: &str, err: E) -> AudioError {
    AudioError::ResourceError(format!("{context}: {err}"))
}

/// 输出端短写：写入帧数少于请求帧数
pub fn short_write(requested: usize, written: usize) -> AudioError {
    AudioError::IoError(io::Error::new(
        io::ErrorKind::WriteZero,
        format!("输出短写 / short write: requested {requested} frames, wrote {written}"),
    ))
}

// ==================== 错误分类系统 ====================

/// 错误类别枚举（用于退出码与建议文本）
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum ErrorCategory {
    /// 配置错误（命令行参数、模型文件）
    Configuration,
    /// 输入验证错误（格式、采样率、长度）
    Validation,
    /// 运行期I/O错误（打开、写入、短写）
    Io,
    /// 解码错误（读取样本失败）
    Decoding,
}

impl ErrorCategory {
    /// 从AudioError提取错误类别
    pub fn from_audio_error(e: &AudioError) -> Self {
        match e {
            AudioError::ResourceError(_) => Self::Configuration,
            AudioError::InvalidInput(_) | AudioError::FormatError(_) => Self::Validation,
            AudioError::IoError(_) => Self::Io,
            AudioError::DecodingError(_) => Self::Decoding,
        }
    }

    /// 获取错误类别的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Configuration => "配置错误 / configuration",
            Self::Validation => "输入验证错误 / validation",
            Self::Io => "I/O错误 / I/O",
            Self::Decoding => "解码错误 / decoding",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            ErrorCategory::from_audio_error(&AudioError::ResourceError("m".into())),
            ErrorCategory::Configuration
        );
        assert_eq!(
            ErrorCategory::from_audio_error(&AudioError::FormatError("f".into())),
            ErrorCategory::Validation
        );
        assert_eq!(
            ErrorCategory::from_audio_error(&short_write(480, 10)),
            ErrorCategory::Io
        );
    }

    #[test]
    fn test_short_write_carries_counts() {
        let err = short_write(480, 12);
        let text = err.to_string();
        assert!(text.contains("480"));
        assert!(text.contains("12"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_hound_io_error_maps_to_io() {
        let err: AudioError =
            hound::Error::IoError(io::Error::new(io::ErrorKind::NotFound, "gone")).into();
        assert!(matches!(err, AudioError::IoError(_)));

        let err: AudioError = hound::Error::Unsupported.into();
        assert!(matches!(err, AudioError::FormatError(_)));
    }
}
