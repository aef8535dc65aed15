//! 预热控制器
//!
//! 两阶段状态机：`Prefeeding` 阶段引擎照常处理但不输出，预算耗尽后回卷到流开头，
//! 进入 `Normal` 阶段重新完整处理。引擎状态在回卷时保留。

/// 流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// 预热中：剩余预算（帧）
    Prefeeding { remaining: u64 },
    /// 正常输出（终态）
    Normal,
}

/// 预热消费结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefeedStep {
    /// 继续预热
    Continue,
    /// 预算耗尽，需回卷游标
    Completed,
}

/// 预热控制器
#[derive(Debug, Clone)]
pub struct PrefeedController {
    phase: Phase,
    requested_frames: u64,
    budget_frames: u64,
}

impl PrefeedController {
    /// 不预热，直接进入 `Normal`
    pub fn disabled() -> Self {
        Self {
            phase: Phase::Normal,
            requested_frames: 0,
            budget_frames: 0,
        }
    }

    /// 按预热秒数创建
    ///
    /// 预算为 `seconds × sample_rate` 取整，超过流长度时截断为流长度。
    /// 只要 `seconds > 0` 就进入预热阶段，即使预算取整为0也至少预热一个窗口。
    pub fn new(seconds: f32, sample_rate: u32, total_frames: u64) -> Self {
        if seconds.is_nan() || seconds <= 0.0 {
            return Self::disabled();
        }

        // 与f32运算保持一致：0.01s × 48000 恰为480帧
        let requested_frames = (seconds * sample_rate as f32) as u64;
        let budget_frames = requested_frames.min(total_frames);

        Self {
            phase: Phase::Prefeeding {
                remaining: budget_frames,
            },
            requested_frames,
            budget_frames,
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_prefeeding(&self) -> bool {
        matches!(self.phase, Phase::Prefeeding { .. })
    }

    /// 请求的预热帧数（截断前）
    pub fn requested_frames(&self) -> u64 {
        self.requested_frames
    }

    /// 实际预热预算（截断后）
    pub fn budget_frames(&self) -> u64 {
        self.budget_frames
    }

    /// 预热请求是否超过流长度而被截断
    pub fn was_capped(&self) -> bool {
        self.requested_frames > self.budget_frames
    }

    /// 记录本次迭代消费的帧数
    ///
    /// 预算降到0（含以下）时切换到 `Normal` 并返回 `Completed`。
    /// `Normal` 阶段调用无副作用。
    pub fn consume(&mut self, frames: usize) -> PrefeedStep {
        match self.phase {
            Phase::Normal => PrefeedStep::Continue,
            Phase::Prefeeding { remaining } => {
                let remaining = remaining.saturating_sub(frames as u64);
                if remaining == 0 {
                    self.phase = Phase::Normal;
                    PrefeedStep::Completed
                } else {
                    self.phase = Phase::Prefeeding { remaining };
                    PrefeedStep::Continue
                }
            }
        }
    }
}
