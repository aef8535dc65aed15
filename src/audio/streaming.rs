//! 流式读写接口模块
//!
//! 定义样本源与样本汇两个trait，降噪流水线只通过它们访问容器I/O。

use super::format::StreamFormat;
use crate::error::AudioResult;

/// 可随机定位的样本源
///
/// # 数据格式约定
///
/// - **交错样本**：所有数据均为交错格式 `[L0, R0, L1, R1, ...]`
/// - **归一化**：样本为 [-1.0, 1.0) 范围内的 f32
/// - **位置单位**：帧（每声道一个样本），而非原始样本
///
/// # 线程安全性
///
/// trait 不要求 `Send`/`Sync`，按约定在单线程中顺序消费。
pub trait SampleSource {
    /// 流格式描述符（打开后不变）
    fn format(&self) -> &StreamFormat;

    /// 当前读取位置（帧）
    fn position(&self) -> u64;

    /// 定位到指定帧
    fn seek(&mut self, frame: u64) -> AudioResult<()>;

    /// 读取交错样本填满 `buf`
    ///
    /// 返回实际读取的帧数；到达流末尾时可能少于 `buf.len() / channels`。
    fn read_frames(&mut self, buf: &mut [f32]) -> AudioResult<usize>;
}

/// 样本汇（输出流）
pub trait SampleSink {
    /// 写入 `buf` 中的前 `frames` 帧交错样本
    ///
    /// 返回实际写入的帧数。调用方必须把少于 `frames` 的返回值视为致命短写。
    fn write_frames(&mut self, buf: &[f32], frames: usize) -> AudioResult<usize>;

    /// 刷新并关闭输出
    fn finalize(self) -> AudioResult<()>
    where
        Self: Sized;
}
