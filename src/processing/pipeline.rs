//! 降噪流水线驱动
//!
//! 主循环：规划窗口 → 读取交错帧 → 分离并逐声道处理 → 按阶段合并写出或丢弃 → 推进游标。
//! 所有缓冲区在构造时一次性分配，主循环内不再分配。

use super::channel_separator::ChannelSeparator;
use super::channel_state::{ChannelState, create_channel_states};
use super::frame_assembler::{FrameAssembler, WindowKind};
use super::prefeed::{Phase, PrefeedController, PrefeedStep};
use crate::audio::{SampleSink, SampleSource, StreamFormat};
use crate::engine::{EngineFactory, SuppressionEngine};
use crate::error::{self, AudioError, AudioResult};
use rayon::prelude::*;
use serde::Serialize;

#[cfg(debug_assertions)]
macro_rules! debug_pipeline {
    ($($arg:tt)*) => {
        eprintln!("[PIPELINE_DEBUG] {}", format_args!($($arg)*));
    };
}

#[cfg(not(debug_assertions))]
macro_rules! debug_pipeline {
    ($($arg:tt)*) => {};
}

/// 流水线参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOptions {
    /// 送入引擎前的放大系数
    pub amplify: f32,
    /// 预热秒数（0 表示不预热）
    pub prefeed_seconds: f32,
    /// 单帧内按声道并行处理
    pub parallel_channels: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            amplify: 1.0,
            prefeed_seconds: 0.0,
            parallel_channels: false,
        }
    }
}

impl PipelineOptions {
    /// 校验数值参数
    ///
    /// 非有限值为致命错误；预热秒数不大于0时视为关闭预热。
    pub fn validate(&self) -> AudioResult<()> {
        if !self.amplify.is_finite() {
            return Err(AudioError::InvalidInput(format!(
                "放大系数不是有效的浮点数 / amplification factor is not a valid floating point value: {}",
                self.amplify
            )));
        }
        if !self.prefeed_seconds.is_finite() {
            return Err(AudioError::InvalidInput(format!(
                "预热秒数无效 / prefeed seconds value is not valid: {}",
                self.prefeed_seconds
            )));
        }
        Ok(())
    }
}

/// 运行统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub total_frames: u64,
    pub frames_written: u64,
    pub windows_written: usize,
    pub prefeed_frames: u64,
    pub prefeed_windows: usize,
    pub prefeed_capped: bool,
    /// 每声道引擎调用次数
    pub engine_frames_per_channel: u64,
    /// 尾部借用窗口输出的帧数（流长度为帧长整数倍时为 `None`）
    pub tail_frames: Option<usize>,
}

/// 运行中的阶段事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineEvent {
    /// 预热预算耗尽，即将回卷到流开头
    PrefeedCompleted { frames: u64, windows: usize },
}

/// 校验输入流能否被引擎处理
///
/// 全部检查在创建输出文件之前完成。
pub fn validate_stream(format: &StreamFormat, required_rate: u32) -> AudioResult<()> {
    if !format.seekable {
        return Err(AudioError::FormatError(
            "输入文件不可定位，无法处理 / input file is not seekable and cannot be processed"
                .to_string(),
        ));
    }
    if format.sample_rate != required_rate {
        return Err(AudioError::FormatError(format!(
            "输入采样率为 {}Hz，RNNoise 只能处理 {required_rate}Hz / input sample rate is {}Hz, RNNoise can process only {required_rate}Hz (try using ffmpeg or sox to convert it first)",
            format.sample_rate, format.sample_rate
        )));
    }
    format.validate()
}

/// 降噪流水线
pub struct Pipeline<E> {
    states: Vec<ChannelState<E>>,
    separator: ChannelSeparator,
    assembler: FrameAssembler,
    prefeed: PrefeedController,
    /// 交错帧缓冲区（F × N），每次迭代复用
    frame: Vec<f32>,
    parallel_channels: bool,
}

impl<E: SuppressionEngine> Pipeline<E> {
    /// 校验输入并为每个声道创建引擎状态
    pub fn new<F>(factory: &F, format: &StreamFormat, options: &PipelineOptions) -> AudioResult<Self>
    where
        F: EngineFactory<Engine = E>,
    {
        options.validate()?;
        validate_stream(format, factory.sample_rate())?;

        let assembler = FrameAssembler::new(factory.frame_size(), format)?;
        let channels = format.channels_usize();
        let states = create_channel_states(factory, channels)?;
        let prefeed = PrefeedController::new(
            options.prefeed_seconds,
            format.sample_rate,
            format.total_frames,
        );

        debug_pipeline!(
            "创建流水线: F={}, N={}, total={}, prefeed={}",
            assembler.frame_size(),
            channels,
            assembler.total_frames(),
            prefeed.budget_frames()
        );

        Ok(Self {
            frame: vec![0.0; assembler.buffer_len()],
            states,
            separator: ChannelSeparator::new(channels, options.amplify),
            assembler,
            prefeed,
            parallel_channels: options.parallel_channels,
        })
    }

    pub fn prefeed(&self) -> &PrefeedController {
        &self.prefeed
    }

    /// 执行完整处理
    ///
    /// 输出短写（写入帧数少于请求）为致命I/O错误，不做重试。
    pub fn run<S, W>(&mut self, source: &mut S, sink: &mut W) -> AudioResult<PipelineReport>
    where
        S: SampleSource + ?Sized,
        W: SampleSink + ?Sized,
    {
        self.run_with_events(source, sink, |_| {})
    }

    /// 执行完整处理，并在阶段切换时回调 `on_event`
    pub fn run_with_events<S, W, F>(
        &mut self,
        source: &mut S,
        sink: &mut W,
        mut on_event: F,
    ) -> AudioResult<PipelineReport>
    where
        S: SampleSource + ?Sized,
        W: SampleSink + ?Sized,
        F: FnMut(PipelineEvent),
    {
        let channels = self.separator.channels();
        let mut report = PipelineReport {
            total_frames: self.assembler.total_frames(),
            prefeed_capped: self.prefeed.was_capped(),
            ..PipelineReport::default()
        };

        let mut cursor = 0u64;
        while let Some(window) = self.assembler.window_at(cursor) {
            self.assembler.fill(source, &window, &mut self.frame)?;
            self.process_channels();

            match self.prefeed.phase() {
                Phase::Normal => {
                    self.merge_channels();

                    let start = window.write_offset;
                    let end = start + window.write_frames * channels;
                    let written = sink.write_frames(&self.frame[start..end], window.write_frames)?;
                    if written != window.write_frames {
                        return Err(error::short_write(window.write_frames, written));
                    }

                    report.frames_written += written as u64;
                    report.windows_written += 1;
                    if window.kind == WindowKind::Tail {
                        report.tail_frames = Some(written);
                    }
                }
                Phase::Prefeeding { .. } => {
                    // 预热阶段丢弃输出，交错缓冲区保持原始音频
                    report.prefeed_frames += window.write_frames as u64;
                    report.prefeed_windows += 1;

                    if self.prefeed.consume(window.write_frames) == PrefeedStep::Completed {
                        debug_pipeline!("预热完成，回卷到开头 / prefeed completed, rewinding");
                        on_event(PipelineEvent::PrefeedCompleted {
                            frames: report.prefeed_frames,
                            windows: report.prefeed_windows,
                        });
                        cursor = 0;
                        continue;
                    }
                }
            }

            cursor += window.write_frames as u64;
        }

        report.engine_frames_per_channel = self
            .states
            .first()
            .map_or(0, ChannelState::frames_processed);

        debug_pipeline!(
            "处理完成: 写出 {} 帧 / {} 窗口",
            report.frames_written,
            report.windows_written
        );
        Ok(report)
    }

    /// 分离并处理所有声道
    fn process_channels(&mut self) {
        let frame = &self.frame;
        let separator = &self.separator;

        if self.parallel_channels {
            self.states
                .par_iter_mut()
                .enumerate()
                .for_each(|(ch, state)| {
                    separator.split(frame, ch, state.input_mut());
                    state.process();
                });
        } else {
            for (ch, state) in self.states.iter_mut().enumerate() {
                separator.split(frame, ch, state.input_mut());
                state.process();
            }
        }
    }

    /// 把所有声道的引擎输出写回交错帧
    fn merge_channels(&mut self) {
        for (ch, state) in self.states.iter().enumerate() {
            self.separator.merge(state.output(), ch, &mut self.frame);
        }
    }
}
