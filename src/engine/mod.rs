//! 降噪引擎接口模块
//!
//! 流水线只依赖这里的两个trait：每声道一个有状态的引擎实例，以及创建实例的工厂。
//! 引擎内部算法对流水线不透明。

mod rnnoise;

pub use rnnoise::{RnnoiseEngine, RnnoiseFactory};

use crate::error::AudioResult;

/// RNNoise 要求的采样率（Hz）
pub const RNNOISE_SAMPLE_RATE: u32 = 48_000;

/// 引擎输入量程：归一化样本乘以此常量后才是引擎期望的16位幅度范围
pub const ENGINE_INPUT_SCALE: f32 = 32768.0;

/// 有状态的单声道降噪引擎
///
/// 每次调用消费恰好 `frame_size` 个样本并产出同样数量的样本，
/// 内部状态跨帧保留。同一实例禁止并发调用，也禁止在声道间共享。
pub trait SuppressionEngine: Send {
    /// 处理一帧：`input` 与 `output` 长度均为引擎帧长
    fn process_frame(&mut self, output: &mut [f32], input: &[f32]);
}

/// 降噪引擎工厂
///
/// 帧长和采样率在启动时查询一次，整个运行期间不变。
pub trait EngineFactory {
    type Engine: SuppressionEngine;

    /// 引擎帧长 F
    fn frame_size(&self) -> usize;

    /// 引擎要求的输入采样率
    fn sample_rate(&self) -> u32;

    /// 创建一个新的引擎实例（每声道一个）
    fn create(&self) -> AudioResult<Self::Engine>;
}
