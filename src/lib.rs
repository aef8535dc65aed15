//! DenoiseIt 多声道音频降噪工具
//!
//! 以固定帧长的 RNNoise 引擎逐声道处理整段录音，并以相同容器格式写回。
//!
//! ## 核心特性
//! - 交错帧 ⇄ 单声道帧的分离/合并，每声道独立的有状态引擎
//! - 尾部借用：最后不足一帧时复用已读样本凑满整帧，不补零
//! - 预热：先在开头片段上训练引擎状态（不输出），再回卷完整处理
//! - 可选的单帧内声道并行处理

pub mod audio;
pub mod engine;
pub mod error;
pub mod processing;
pub mod tools;

// 重新导出核心类型
pub use audio::{MemorySink, MemorySource, SampleSink, SampleSource, StreamFormat};
pub use engine::{EngineFactory, RnnoiseFactory, SuppressionEngine};
pub use error::{AudioError, AudioResult};
pub use processing::{Pipeline, PipelineOptions, PipelineReport};
