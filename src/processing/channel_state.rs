//! 声道降噪状态
//!
//! 每声道独占一个引擎实例和两块帧长暂存缓冲区。实例按声道索引保存在Vec中，
//! 从不克隆或共享，运行中途也不重置。

use crate::engine::{EngineFactory, SuppressionEngine};
use crate::error::AudioResult;

/// 单声道引擎状态
pub struct ChannelState<E> {
    engine: E,
    /// 输入暂存（已放大到引擎量程）
    input: Vec<f32>,
    /// 输出暂存（引擎量程）
    output: Vec<f32>,
    frames_processed: u64,
}

impl<E: SuppressionEngine> ChannelState<E> {
    pub fn new(engine: E, frame_size: usize) -> Self {
        Self {
            engine,
            input: vec![0.0; frame_size],
            output: vec![0.0; frame_size],
            frames_processed: 0,
        }
    }

    /// 输入暂存缓冲区（由分离器填充）
    #[inline]
    pub fn input_mut(&mut self) -> &mut [f32] {
        &mut self.input
    }

    /// 最近一帧的引擎输出
    #[inline]
    pub fn output(&self) -> &[f32] {
        &self.output
    }

    /// 处理一帧
    ///
    /// 输入暂存在消费后清零，避免上一帧的残留样本混入下一帧。
    #[inline]
    pub fn process(&mut self) {
        self.engine.process_frame(&mut self.output, &self.input);
        self.input.fill(0.0);
        self.frames_processed += 1;
    }

    /// 已处理的引擎帧数
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }
}

/// 为每个声道创建独立的引擎状态
pub fn create_channel_states<F: EngineFactory>(
    factory: &F,
    channels: usize,
) -> AudioResult<Vec<ChannelState<F::Engine>>> {
    let frame_size = factory.frame_size();
    (0..channels)
        .map(|_| {
            factory
                .create()
                .map(|engine| ChannelState::new(engine, frame_size))
        })
        .collect()
}
