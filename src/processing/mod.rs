//! 帧处理流水线模块
//!
//! 按引擎帧长切分多声道音频，逐声道驱动降噪引擎，并处理尾部借用与预热回卷。

pub mod channel_separator;
pub mod channel_state;
pub mod frame_assembler;
pub mod pipeline;
pub mod prefeed;

// 重新导出公共接口
pub use channel_separator::ChannelSeparator;
pub use channel_state::{ChannelState, create_channel_states};
pub use frame_assembler::{FrameAssembler, FrameWindow, WindowKind};
pub use pipeline::{Pipeline, PipelineEvent, PipelineOptions, PipelineReport, validate_stream};
pub use prefeed::{Phase, PrefeedController, PrefeedStep};
