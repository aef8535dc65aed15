//! 音频流格式信息模块
//!
//! 定义输入流描述符。打开后不可变，由帧装配器与预热控制器只读共享。

use crate::error::{self, AudioResult};

/// 样本编码方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleEncoding {
    /// 整数PCM（位深度）
    Int { bits: u16 },
    /// 32位浮点
    Float,
}

impl SampleEncoding {
    /// 位深度
    pub fn bits_per_sample(&self) -> u16 {
        match self {
            SampleEncoding::Int { bits } => *bits,
            SampleEncoding::Float => 32,
        }
    }

    /// 整数PCM归一化因子：2^(bits-1)
    ///
    /// 浮点编码返回1.0（已归一化）。
    pub fn full_scale(&self) -> f32 {
        match self {
            SampleEncoding::Int { bits } => (1u64 << (bits - 1)) as f32,
            SampleEncoding::Float => 1.0,
        }
    }
}

/// 输入流描述符
#[derive(Debug, Clone, PartialEq)]
pub struct StreamFormat {
    pub sample_rate: u32,
    pub channels: u16,
    /// 总帧数（每声道样本数，而非原始样本数）
    pub total_frames: u64,
    pub encoding: SampleEncoding,
    /// 是否支持随机定位
    pub seekable: bool,
}

impl StreamFormat {
    /// 创建新的流格式（默认可定位）
    pub fn new(sample_rate: u32, channels: u16, total_frames: u64, encoding: SampleEncoding) -> Self {
        Self {
            sample_rate,
            channels,
            total_frames,
            encoding,
            seekable: true,
        }
    }

    /// 从hound规格构造
    pub fn from_wav_spec(spec: &hound::WavSpec, total_frames: u64) -> Self {
        let encoding = match spec.sample_format {
            hound::SampleFormat::Float => SampleEncoding::Float,
            hound::SampleFormat::Int => SampleEncoding::Int {
                bits: spec.bits_per_sample,
            },
        };
        Self::new(spec.sample_rate, spec.channels, total_frames, encoding)
    }

    /// 转换为hound规格（输出文件镜像输入格式）
    pub fn to_wav_spec(&self) -> hound::WavSpec {
        let (bits_per_sample, sample_format) = match self.encoding {
            SampleEncoding::Int { bits } => (bits, hound::SampleFormat::Int),
            SampleEncoding::Float => (32, hound::SampleFormat::Float),
        };
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample,
            sample_format,
        }
    }

    /// 获取声道数（usize类型）
    pub fn channels_usize(&self) -> usize {
        self.channels as usize
    }

    /// 获取持续时长（秒）
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.total_frames as f64 / self.sample_rate as f64
    }

    /// 验证格式参数的有效性
    pub fn validate(&self) -> AudioResult<()> {
        if self.sample_rate == 0 {
            return Err(error::format_error("采样率不能为0", "sample rate is 0"));
        }
        if self.channels == 0 {
            return Err(error::format_error("声道数不能为0", "channel count is 0"));
        }
        self.check_writable()
    }

    /// 检查该编码能否同时用于读取和写入
    pub fn check_writable(&self) -> AudioResult<()> {
        match self.encoding {
            SampleEncoding::Int { bits: 8 | 16 | 24 | 32 } | SampleEncoding::Float => Ok(()),
            SampleEncoding::Int { bits } => Err(error::format_error(
                "输出格式不可写 / format cannot be written",
                format!("{bits}-bit PCM"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wav_spec_mirror() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 48_000,
            bits_per_sample: 24,
            sample_format: hound::SampleFormat::Int,
        };
        let format = StreamFormat::from_wav_spec(&spec, 960);
        assert_eq!(format.encoding, SampleEncoding::Int { bits: 24 });
        assert_eq!(format.total_frames, 960);
        assert_eq!(format.to_wav_spec(), spec);
        assert!((format.duration_seconds() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_full_scale() {
        assert_eq!(SampleEncoding::Int { bits: 16 }.full_scale(), 32768.0);
        assert_eq!(SampleEncoding::Int { bits: 8 }.full_scale(), 128.0);
        assert_eq!(SampleEncoding::Float.full_scale(), 1.0);
    }

    #[test]
    fn test_validate() {
        let ok = StreamFormat::new(48_000, 1, 1000, SampleEncoding::Float);
        assert!(ok.validate().is_ok());

        let no_channels = StreamFormat::new(48_000, 0, 1000, SampleEncoding::Float);
        assert!(no_channels.validate().is_err());

        let odd_bits = StreamFormat::new(48_000, 1, 1000, SampleEncoding::Int { bits: 12 });
        assert!(odd_bits.validate().is_err());
    }
}
