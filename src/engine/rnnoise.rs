//! RNNoise 引擎实现
//!
//! 基于 `nnnoiseless`（RNNoise 的纯Rust实现），480样本帧 @ 48kHz。

use super::{EngineFactory, RNNOISE_SAMPLE_RATE, SuppressionEngine};
use crate::error::{self, AudioError, AudioResult};
use nnnoiseless::{DenoiseState, RnnModel};
use std::fmt;
use std::path::Path;

/// 单声道 RNNoise 实例
pub struct RnnoiseEngine {
    state: Box<DenoiseState<'static>>,
}

impl SuppressionEngine for RnnoiseEngine {
    #[inline]
    fn process_frame(&mut self, output: &mut [f32], input: &[f32]) {
        // 返回值为VAD概率，流水线不使用
        let _ = self.state.process_frame(output, input);
    }
}

/// RNNoise 实例工厂
///
/// 持有可选的已解析外部模型；未提供时使用内置默认模型。
#[derive(Clone, Default)]
pub struct RnnoiseFactory {
    model: Option<RnnModel>,
}

impl fmt::Debug for RnnoiseFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RnnoiseFactory")
            .field("custom_model", &self.has_custom_model())
            .finish()
    }
}

impl RnnoiseFactory {
    /// 使用内置默认模型
    pub fn new() -> Self {
        Self::default()
    }

    /// 从文件加载外部模型
    ///
    /// 读取失败或无法解析均为致命错误，绝不静默回退到默认模型。
    pub fn from_model_file<P: AsRef<Path>>(path: P) -> AudioResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            error::resource_error(
                &format!(
                    "无法读取RNNoise模型 / could not read the provided RNNoise model {}",
                    path.display()
                ),
                e,
            )
        })?;
        Self::from_model_bytes(&bytes)
    }

    /// 从内存字节加载外部模型
    pub fn from_model_bytes(bytes: &[u8]) -> AudioResult<Self> {
        let model = RnnModel::from_bytes(bytes).ok_or_else(|| {
            AudioError::ResourceError(
                "RNNoise无法将该文件解析为有效模型 / RNNoise could not load the provided file as a valid model"
                    .to_string(),
            )
        })?;
        Ok(Self::from_model(model))
    }

    /// 使用已解析的模型
    pub fn from_model(model: RnnModel) -> Self {
        Self { model: Some(model) }
    }

    /// 是否使用外部模型
    pub fn has_custom_model(&self) -> bool {
        self.model.is_some()
    }
}

impl EngineFactory for RnnoiseFactory {
    type Engine = RnnoiseEngine;

    fn frame_size(&self) -> usize {
        DenoiseState::FRAME_SIZE
    }

    fn sample_rate(&self) -> u32 {
        RNNOISE_SAMPLE_RATE
    }

    fn create(&self) -> AudioResult<RnnoiseEngine> {
        // 每声道持有一份模型副本，实例之间不共享
        let state = match &self.model {
            None => DenoiseState::new(),
            Some(model) => DenoiseState::from_model(model.clone()),
        };
        Ok(RnnoiseEngine { state })
    }
}
