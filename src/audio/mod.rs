//! 音频容器I/O模块
//!
//! 提供可定位的样本源与样本汇。WAV由hound实现，内存版本供嵌入与测试使用。

mod format;
mod memory;
mod streaming;
mod wav_decoder;
mod wav_writer;

pub use format::{SampleEncoding, StreamFormat};
pub use memory::{MemorySink, MemorySource};
pub use streaming::{SampleSink, SampleSource};
pub use wav_decoder::WavSource;
pub use wav_writer::WavSink;
