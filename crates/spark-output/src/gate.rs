//! 输出闸门：在任意 [`FrameSink`] 之前处理暂停/恢复与关键帧对齐。
//!
//! # 教案级注释
//!
//! ## 意图（Why）
//! - 直播输出可以被运维随时暂停与恢复；恢复时若从非关键帧开始写出，下游解码器会花屏，
//!   因此恢复后必须等待下一个关键帧。
//! - 暂停期间时间戳仍在增长，直接透传会在下游留下“时间空洞”；闸门负责把恢复后的时间戳
//!   平移到与暂停前衔接。
//!
//! ## 逻辑（How）
//! - 每次提交先依据 `enabled` 推进 [`GateState`]，再决定转发或丢弃；
//! - 进入 `Running` 的那一帧被追加 [`FrameFlags::RESTART`]，并重新计算时间偏移。
//!
//! ## 契约（What）
//! - 被丢弃的帧返回 `Ok(())`，不触达内层 Sink；
//! - 首个转发帧的时间戳为 0，此后转发的时间戳在输入单调时保持单调不减。

use crate::{FrameFlags, FrameSink, Result};
use tracing::debug;

/// 闸门所处的阶段。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    /// 输出被关闭，所有帧被丢弃。
    Disabled,
    /// 输出已开启，等待关键帧。
    WaitingKeyframe,
    /// 正在向内层 Sink 转发。
    Running,
}

/// 包装任意 [`FrameSink`] 的输出闸门。
#[derive(Debug)]
pub struct OutputGate<S> {
    inner: S,
    enabled: bool,
    state: GateState,
    last_timestamp_us: i64,
    time_offset_us: i64,
}

impl<S> OutputGate<S> {
    /// 以开启状态包装 `inner`，首帧需为关键帧。
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            enabled: true,
            state: GateState::WaitingKeyframe,
            last_timestamp_us: 0,
            time_offset_us: 0,
        }
    }

    /// 以暂停状态包装 `inner`。
    pub fn paused(inner: S) -> Self {
        Self {
            enabled: false,
            state: GateState::Disabled,
            ..Self::new(inner)
        }
    }

    /// 开启或关闭输出；状态在下一次提交时生效。
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// 翻转开关，返回翻转后的值。
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn advance(&mut self, keyframe: bool) -> bool {
        if !self.enabled {
            if self.state != GateState::Disabled {
                debug!(from = ?self.state, "output gate disabled");
            }
            self.state = GateState::Disabled;
        } else if self.state == GateState::Disabled {
            debug!("output gate enabled, waiting for keyframe");
            self.state = GateState::WaitingKeyframe;
        }

        if self.state == GateState::WaitingKeyframe && keyframe {
            debug!("output gate running");
            self.state = GateState::Running;
            return true;
        }
        false
    }
}

impl<S: FrameSink> FrameSink for OutputGate<S> {
    type Error = S::Error;

    fn submit(
        &mut self,
        buffer: &[u8],
        timestamp_us: i64,
        flags: FrameFlags,
    ) -> Result<(), Self::Error> {
        let restarted = self.advance(flags.is_keyframe());
        if self.state != GateState::Running {
            return Ok(());
        }

        let mut flags = flags;
        if restarted {
            flags |= FrameFlags::RESTART;
            self.time_offset_us = timestamp_us.saturating_sub(self.last_timestamp_us);
        }
        self.last_timestamp_us = timestamp_us.saturating_sub(self.time_offset_us);
        self.inner.submit(buffer, self.last_timestamp_us, flags)
    }
}
