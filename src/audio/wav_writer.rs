//! WAV样本汇
//!
//! 输出文件镜像输入的hound规格，归一化f32样本按编码反量化后写入。

use super::format::{SampleEncoding, StreamFormat};
use super::streaming::SampleSink;
use crate::error::AudioResult;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// WAV文件样本汇
pub struct WavSink {
    writer: hound::WavWriter<BufWriter<File>>,
    encoding: SampleEncoding,
    channels: usize,
}

impl WavSink {
    /// 按输入格式创建输出文件
    pub fn create<P: AsRef<Path>>(path: P, format: &StreamFormat) -> AudioResult<Self> {
        format.check_writable()?;
        let writer = hound::WavWriter::create(path.as_ref(), format.to_wav_spec())?;
        Ok(Self {
            writer,
            encoding: format.encoding,
            channels: format.channels_usize(),
        })
    }
}

/// 归一化样本反量化为整数PCM（四舍五入并钳位）
#[inline]
fn quantize(sample: f32, full_scale: f32) -> i32 {
    let max = full_scale - 1.0;
    (sample * full_scale).round().clamp(-full_scale, max) as i32
}

impl SampleSink for WavSink {
    fn write_frames(&mut self, buf: &[f32], frames: usize) -> AudioResult<usize> {
        let samples = &buf[..frames * self.channels];

        match self.encoding {
            SampleEncoding::Float => {
                for &sample in samples {
                    self.writer.write_sample(sample)?;
                }
            }
            encoding @ SampleEncoding::Int { .. } => {
                let full_scale = encoding.full_scale();
                for &sample in samples {
                    self.writer.write_sample(quantize(sample, full_scale))?;
                }
            }
        }

        Ok(frames)
    }

    fn finalize(self) -> AudioResult<()> {
        self.writer.finalize()?;
        Ok(())
    }
}
