#![deny(unsafe_code)]
#![doc = "spark-output: 媒体管线输出阶段的帧接收契约。"]
#![doc = ""]
#![doc = "== 使命概述 =="]
#![doc = "- **Why**：编码阶段只关心“交出一帧”，不应感知帧最终写入网络、文件还是内存；本 crate 为这些落地实现提供共同语言。"]
#![doc = "- **What**：定义 [`FrameSink`] 契约、[`FrameFlags`] 帧标志位，以及位于任意 Sink 之前的 [`OutputGate`] 输出闸门。"]
#![doc = "- **How**：契约层不做任何 I/O，具体实现（如 `spark-output-net`）只需依赖本 crate 即可接入管线。"]

/// `Result` 是输出契约内部使用的统一返回别名。
///
/// # 使用方式（How）
/// - 与 `core::result::Result` 完全等价，不指定默认错误类型，实现方在签名中显式声明错误枚举。
pub type Result<T, E> = core::result::Result<T, E>;

pub mod flags;
pub mod gate;
pub mod sink;

pub use flags::FrameFlags;
pub use gate::{GateState, OutputGate};
pub use sink::FrameSink;
