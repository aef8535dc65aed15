//! 内存样本源/样本汇
//!
//! 不经过容器文件直接驱动流水线，便于库调用方嵌入和测试。

use super::format::{SampleEncoding, StreamFormat};
use super::streaming::{SampleSink, SampleSource};
use crate::error::{AudioError, AudioResult};

/// 内存中的交错样本源
#[derive(Debug, Clone)]
pub struct MemorySource {
    format: StreamFormat,
    samples: Vec<f32>,
    position: u64,
    seeks: usize,
}

impl MemorySource {
    /// 从交错样本创建（32位浮点编码）
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<f32>) -> Self {
        let total_frames = (samples.len() / channels.max(1) as usize) as u64;
        Self {
            format: StreamFormat::new(sample_rate, channels, total_frames, SampleEncoding::Float),
            samples,
            position: 0,
            seeks: 0,
        }
    }

    /// 标记为不可定位
    pub fn unseekable(mut self) -> Self {
        self.format.seekable = false;
        self
    }

    /// 累计定位次数
    pub fn seek_count(&self) -> usize {
        self.seeks
    }
}

impl SampleSource for MemorySource {
    fn format(&self) -> &StreamFormat {
        &self.format
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn seek(&mut self, frame: u64) -> AudioResult<()> {
        if !self.format.seekable {
            return Err(AudioError::FormatError(
                "输入不可定位 / input is not seekable".to_string(),
            ));
        }
        if frame > self.format.total_frames {
            return Err(AudioError::InvalidInput(format!(
                "定位超出范围 / seek out of range: {frame}"
            )));
        }
        self.position = frame;
        self.seeks += 1;
        Ok(())
    }

    fn read_frames(&mut self, buf: &mut [f32]) -> AudioResult<usize> {
        let channels = self.format.channels_usize();
        let start = self.position as usize * channels;
        let available = self.samples.len().saturating_sub(start);
        let count = (buf.len() / channels * channels).min(available);

        buf[..count].copy_from_slice(&self.samples[start..start + count]);
        let frames = count / channels;
        self.position += frames as u64;
        Ok(frames)
    }
}

/// 内存中的样本汇，记录每次写入的帧数
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    channels: usize,
    samples: Vec<f32>,
    writes: Vec<usize>,
    /// 单次写入上限（模拟磁盘满等短写场景）
    write_limit: Option<usize>,
}

impl MemorySink {
    pub fn new(channels: u16) -> Self {
        Self {
            channels: channels as usize,
            ..Self::default()
        }
    }

    /// 每次最多写入 `frames` 帧
    pub fn with_write_limit(mut self, frames: usize) -> Self {
        self.write_limit = Some(frames);
        self
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// 每次写入的帧数序列
    pub fn writes(&self) -> &[usize] {
        &self.writes
    }

    pub fn frames_written(&self) -> usize {
        self.writes.iter().sum()
    }
}

impl SampleSink for MemorySink {
    fn write_frames(&mut self, buf: &[f32], frames: usize) -> AudioResult<usize> {
        let accepted = self.write_limit.map_or(frames, |limit| frames.min(limit));
        self.samples.extend_from_slice(&buf[..accepted * self.channels]);
        self.writes.push(accepted);
        Ok(accepted)
    }

    fn finalize(self) -> AudioResult<()> {
        Ok(())
    }
}
