//! 声道分离/合并
//!
//! 把交错帧拆成每声道的单声道缓冲区送入引擎，再把引擎输出写回交错帧。
//!
//! 输入方向乘以 `amplify × ENGINE_INPUT_SCALE`，输出方向只除以 `ENGINE_INPUT_SCALE`。
//! 放大系数是送入引擎前的增益，降噪后的输出不会被反向衰减。

use crate::engine::ENGINE_INPUT_SCALE;

/// 交错帧 ⇄ 单声道帧 转换器
#[derive(Debug, Clone, Copy)]
pub struct ChannelSeparator {
    channels: usize,
    amplify: f32,
}

impl ChannelSeparator {
    pub fn new(channels: usize, amplify: f32) -> Self {
        debug_assert!(channels > 0, "声道数必须大于0");
        Self { channels, amplify }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// 提取声道 `channel_idx` 到 `mono`，并放大到引擎量程
    ///
    /// `mono[s] = interleaved[channel_idx + s × N] × amplify × 32768`
    #[inline]
    pub fn split(&self, interleaved: &[f32], channel_idx: usize, mono: &mut [f32]) {
        let source = interleaved[channel_idx..].iter().step_by(self.channels);
        for (dst, &sample) in mono.iter_mut().zip(source) {
            *dst = sample * ENGINE_INPUT_SCALE * self.amplify;
        }
    }

    /// 把单声道引擎输出写回交错帧的声道 `channel_idx`
    ///
    /// `interleaved[channel_idx + s × N] = mono[s] / 32768`（放大系数不还原）
    #[inline]
    pub fn merge(&self, mono: &[f32], channel_idx: usize, interleaved: &mut [f32]) {
        let target = interleaved[channel_idx..].iter_mut().step_by(self.channels);
        for (dst, &sample) in target.zip(mono) {
            *dst = sample / ENGINE_INPUT_SCALE;
        }
    }
}
