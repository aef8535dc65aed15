//! WAV样本源
//!
//! 基于hound库实现可随机定位的WAV读取，输出归一化的交错f32样本。

use super::format::{SampleEncoding, StreamFormat};
use super::streaming::SampleSource;
use crate::error::{AudioError, AudioResult};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// WAV文件样本源
///
/// 支持8/16/24/32位整数PCM与32位浮点，整数样本按 2^(bits-1) 归一化。
pub struct WavSource {
    reader: hound::WavReader<BufReader<File>>,
    format: StreamFormat,
    position: u64,
}

impl WavSource {
    /// 打开WAV文件
    ///
    /// # 错误
    ///
    /// * `AudioError::IoError` - 文件不存在或读取失败
    /// * `AudioError::FormatError` - 不支持的WAV编码
    /// * `AudioError::DecodingError` - 文件头损坏
    pub fn open<P: AsRef<Path>>(path: P) -> AudioResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(AudioError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("文件不存在 / file not found: {}", path.display()),
            )));
        }

        let reader = hound::WavReader::open(path)?;
        let format = StreamFormat::from_wav_spec(&reader.spec(), reader.duration() as u64);

        Ok(Self {
            reader,
            format,
            position: 0,
        })
    }
}

impl SampleSource for WavSource {
    fn format(&self) -> &StreamFormat {
        &self.format
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn seek(&mut self, frame: u64) -> AudioResult<()> {
        if frame > self.format.total_frames {
            return Err(AudioError::InvalidInput(format!(
                "定位超出范围 / seek out of range: {frame} > {}",
                self.format.total_frames
            )));
        }
        // hound以u32计帧；total_frames本身来自u32，不会截断
        self.reader.seek(frame as u32)?;
        self.position = frame;
        Ok(())
    }

    fn read_frames(&mut self, buf: &mut [f32]) -> AudioResult<usize> {
        let channels = self.format.channels_usize();
        let wanted = buf.len() / channels * channels;
        let mut read = 0usize;

        match self.format.encoding {
            SampleEncoding::Float => {
                for (slot, sample) in buf[..wanted].iter_mut().zip(self.reader.samples::<f32>()) {
                    *slot = sample?;
                    read += 1;
                }
            }
            encoding @ SampleEncoding::Int { .. } => {
                let scale = 1.0 / encoding.full_scale();
                for (slot, sample) in buf[..wanted].iter_mut().zip(self.reader.samples::<i32>()) {
                    *slot = sample? as f32 * scale;
                    read += 1;
                }
            }
        }

        let frames = read / channels;
        self.position += frames as u64;
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_ramp(path: &Path, channels: u16, frames: usize) {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 48_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..frames {
            for ch in 0..channels {
                writer.write_sample((i as i16) * 4 + ch as i16).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_open_nonexistent_file() {
        let result = WavSource::open("/nonexistent/denoiseit/input.wav");
        assert!(matches!(result, Err(AudioError::IoError(_))));
    }

    #[test]
    fn test_read_and_seek() {
        let path = std::env::temp_dir().join("denoiseit_wav_source_seek.wav");
        write_ramp(&path, 2, 100);

        let mut source = WavSource::open(&path).unwrap();
        assert_eq!(source.format().total_frames, 100);
        assert_eq!(source.format().channels, 2);

        let mut buf = vec![0.0f32; 8];
        assert_eq!(source.read_frames(&mut buf).unwrap(), 4);
        assert_eq!(source.position(), 4);
        assert_eq!(buf[2], 4.0 / 32768.0);
        assert_eq!(buf[3], 5.0 / 32768.0);

        source.seek(96).unwrap();
        assert_eq!(source.read_frames(&mut buf).unwrap(), 4);
        assert_eq!(buf[0], (96.0 * 4.0) / 32768.0);
        assert_eq!(source.position(), 100);

        // 末尾读取不足
        assert_eq!(source.read_frames(&mut buf).unwrap(), 0);
        assert!(source.seek(101).is_err());

        let _ = std::fs::remove_file(&path);
    }
}
