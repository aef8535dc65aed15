//! 帧装配器
//!
//! 把任意长度的流切成引擎帧长 F 的窗口。最后一个窗口不足 F 帧时不补零，
//! 而是从 `total - F` 处"借用"已输出过的样本凑满一帧，只输出其尾部的新数据。

use crate::audio::{SampleSource, StreamFormat};
use crate::error::{self, AudioError, AudioResult};

/// 窗口类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    /// 完整窗口：整帧输出
    Full,
    /// 尾部窗口：前部借用、只输出尾部
    Tail,
}

/// 一次迭代的读取/输出计划
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameWindow {
    pub kind: WindowKind,
    /// 读取起点（帧）
    pub read_start: u64,
    /// 交错缓冲区中新数据的起始偏移（样本，已乘声道数）
    pub write_offset: usize,
    /// 可输出的帧数
    pub write_frames: usize,
}

/// 帧装配器
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    frame_size: usize,
    channels: usize,
    total_frames: u64,
}

impl FrameAssembler {
    /// 创建装配器
    ///
    /// # 错误
    ///
    /// * `AudioError::InvalidInput` - 流长度不足一个引擎帧
    pub fn new(frame_size: usize, format: &StreamFormat) -> AudioResult<Self> {
        if frame_size == 0 {
            return Err(AudioError::InvalidInput("引擎帧长不能为0".to_string()));
        }
        if format.total_frames < frame_size as u64 {
            return Err(AudioError::InvalidInput(format!(
                "输入文件过短，无法处理 / input file is too short to be processed: {} frames < {frame_size}",
                format.total_frames
            )));
        }

        Ok(Self {
            frame_size,
            channels: format.channels_usize(),
            total_frames: format.total_frames,
        })
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// 交错缓冲区长度（F × N）
    pub fn buffer_len(&self) -> usize {
        self.frame_size * self.channels
    }

    /// 根据游标规划当前窗口；游标到达末尾时返回 `None`
    pub fn window_at(&self, cursor: u64) -> Option<FrameWindow> {
        if cursor >= self.total_frames {
            return None;
        }

        let frame_size = self.frame_size as u64;
        if cursor + frame_size <= self.total_frames {
            return Some(FrameWindow {
                kind: WindowKind::Full,
                read_start: cursor,
                write_offset: 0,
                write_frames: self.frame_size,
            });
        }

        // 例：F = 480，剩余300帧时，从借用窗口的第180帧开始输出
        let remaining = (self.total_frames - cursor) as usize;
        Some(FrameWindow {
            kind: WindowKind::Tail,
            read_start: self.total_frames - frame_size,
            write_offset: (self.frame_size - remaining) * self.channels,
            write_frames: remaining,
        })
    }

    /// 完整遍历一次流的窗口序列（不含预热回卷）
    pub fn plan(&self) -> impl Iterator<Item = FrameWindow> + '_ {
        let mut cursor = 0u64;
        std::iter::from_fn(move || {
            let window = self.window_at(cursor)?;
            cursor += window.write_frames as u64;
            Some(window)
        })
    }

    /// 按窗口读取 F 帧到交错缓冲区
    ///
    /// 仅当源位置与读取起点不一致时才定位（尾部借用、预热回卷），
    /// 连续的完整窗口顺序读取。
    pub fn fill<S: SampleSource + ?Sized>(
        &self,
        source: &mut S,
        window: &FrameWindow,
        buf: &mut [f32],
    ) -> AudioResult<()> {
        debug_assert_eq!(buf.len(), self.buffer_len());

        if source.position() != window.read_start {
            source.seek(window.read_start)?;
        }

        let read = source.read_frames(buf)?;
        if read != self.frame_size {
            return Err(error::decoding_error(
                "读取不足一个引擎帧 / short read",
                format!("{read}/{} frames at {}", self.frame_size, window.read_start),
            ));
        }
        Ok(())
    }
}
