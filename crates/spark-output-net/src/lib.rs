#![doc = r#"
# spark-output-net

## 设计动机（Why）
- **定位**：媒体管线的网络输出阶段，把编码器交出的帧原样送到 UDP 对端、主动连接的 TCP
  服务端，或者接入本机监听端口的单个 TCP 客户端。
- **架构角色**：实现 `spark-output` 的 [`FrameSink`](spark_output::FrameSink) 契约，可与
  [`OutputGate`](spark_output::OutputGate) 等装饰器自由组合。
- **设计理念**：同步、阻塞、单线程；除服务端的接受探测外不引入任何非阻塞或后台机制。

## 核心契约（What）
- **输入条件**：形如 `udp://a.b.c.d:port` 或 `tcp://a.b.c.d:port` 的地址串，外加只对 `tcp`
  生效的“作为服务端”开关，也可以从 TOML 片段加载（见 [`NetOutputConfig`]）。
- **输出保障**：构造期的每一种失败都映射为可区分的 [`NetOutputError`] 变体并携带稳定错误码；
  运行期只有 UDP 与 TCP 客户端的发送失败会被上抛。
- **前置约束**：调用方串行化对同一实例的访问。

## 实现策略（How）
- 套接字选项通过 `socket2` 在转换为标准库类型前设置；
- 服务端的连接状态以显式枚举表达，断连后回到等待状态，监听套接字贯穿整个生命周期；
- 生命周期事件通过 `tracing` 输出，库本身不安装任何 Subscriber。

## 风险与考量（Trade-offs）
- 发送与连接没有超时：对端卡住时调用线程会一直阻塞；
- 服务端无客户端期间的帧被直接丢弃，不排队、不补发。
"#]
#![deny(unsafe_code)]

mod address;
mod config;
mod error;
mod link;
mod sink;
mod socket;
mod stats;

pub use address::{OutputAddress, Scheme, TransportMode};
pub use config::NetOutputConfig;
pub use error::{AddressError, NetOutputError, SocketOp};
pub use sink::{MAX_UDP_PAYLOAD, NetworkFrameSink, datagram_chunks};
pub use stats::SinkStats;
