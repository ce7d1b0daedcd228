use crate::{FrameFlags, Result};

/// 输出阶段的统一帧接收契约。
///
/// # 教案级注释
///
/// ## 意图（Why）
/// - 管线的编码阶段以“交出一块缓冲、一个时间戳与一组标志”的方式驱动输出，本 trait
///   把这一交互收敛为单个同步方法，使网络、文件等实现可以热插拔替换。
///
/// ## 契约（What）
/// - `buffer`：编码后的不透明字节，实现方不得在返回后继续持有其引用；
/// - `timestamp_us`：微秒时间戳，实现方可以忽略；
/// - `flags`：见 [`FrameFlags`]，实现方可以忽略；
/// - 返回 `Ok(())` 表示该帧已被处理（包括按实现约定被主动丢弃）；`Err` 表示实现无法继续。
/// - **前置条件**：调用方串行化对同一实例的访问，`&mut self` 由类型系统保证这一点。
///
/// ## 注意事项（Trade-offs）
/// - 调用是阻塞的：实现方可以在调用线程上完成全部 I/O，没有超时与取消语义。
pub trait FrameSink {
    /// 实现方的错误类型。
    type Error;

    /// 提交一帧。
    fn submit(
        &mut self,
        buffer: &[u8],
        timestamp_us: i64,
        flags: FrameFlags,
    ) -> Result<(), Self::Error>;
}

impl<S> FrameSink for &mut S
where
    S: FrameSink + ?Sized,
{
    type Error = S::Error;

    fn submit(
        &mut self,
        buffer: &[u8],
        timestamp_us: i64,
        flags: FrameFlags,
    ) -> Result<(), Self::Error> {
        (**self).submit(buffer, timestamp_us, flags)
    }
}

impl<S> FrameSink for Box<S>
where
    S: FrameSink + ?Sized,
{
    type Error = S::Error;

    fn submit(
        &mut self,
        buffer: &[u8],
        timestamp_us: i64,
        flags: FrameFlags,
    ) -> Result<(), Self::Error> {
        (**self).submit(buffer, timestamp_us, flags)
    }
}
