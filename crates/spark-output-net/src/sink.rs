use crate::address::{OutputAddress, TransportMode};
use crate::config::NetOutputConfig;
use crate::error::NetOutputError;
use crate::link::{Link, ServerState};
use crate::socket;
use crate::stats::SinkStats;
use spark_output::{FrameFlags, FrameSink};
use std::io::{self, Write};
use std::net::{SocketAddr, SocketAddrV4, UdpSocket};
use tracing::{debug, info, trace};

/// 单个 UDP 数据报可承载的最大负载（65535 − 8 字节 UDP 头 − 20 字节 IPv4 头）。
pub const MAX_UDP_PAYLOAD: usize = 65_507;

/// 把编码帧送到网络对端的输出。
///
/// # 教案式注释
///
/// ## 意图 (Why)
/// - 作为媒体管线的最后一站，把不透明的帧字节原样放到 UDP 或 TCP 上，帧的分界由上游编码器
///   自行定义；
/// - 三种模式共享同一个 [`FrameSink`] 入口，调用方无需感知底层是数据报还是字节流。
///
/// ## 逻辑 (How)
/// - 构造：解析配置 → 按 [`TransportMode`] 准备套接字；UDP 与 TCP 客户端在构造后立即可用，
///   TCP 服务端只建立监听；
/// - 提交：TCP 服务端先做一次非阻塞接受；随后 UDP 按 [`MAX_UDP_PAYLOAD`] 分片逐个发往端点，
///   TCP 整块 `write_all`；
/// - 析构：所有句柄随 `Link` 一起释放。
///
/// ## 契约 (What)
/// - 构造失败时不会留下任何打开的句柄；
/// - TCP 服务端：无客户端时帧被静默丢弃，客户端断开时回到等待状态，二者都返回 `Ok(())`；
/// - UDP 与 TCP 客户端：发送失败返回 [`NetOutputError::Transmission`]，此后该实例不再保证可用。
///
/// ## 注意事项 (Trade-offs)
/// - 除服务端的接受探测外，所有系统调用都阻塞调用线程，没有超时；慢对端会直接拖住管线。
/// - 不缓存任何帧，断连期间的帧不会补发。
#[derive(Debug)]
pub struct NetworkFrameSink {
    endpoint: SocketAddrV4,
    link: Link,
    stats: SinkStats,
}

impl NetworkFrameSink {
    /// 按配置打开网络输出。
    pub fn open(config: &NetOutputConfig) -> Result<Self, NetOutputError> {
        let address = config.address();
        let endpoint = address.endpoint();
        let link = match config.mode() {
            TransportMode::UdpPeer => Link::Udp {
                socket: socket::open_udp()?,
            },
            TransportMode::TcpClient => {
                info!(%endpoint, "connecting to server");
                let stream = socket::connect_tcp(endpoint)?;
                info!(%endpoint, "connected to server");
                Link::TcpClient { stream }
            }
            TransportMode::TcpServer => {
                let listener = socket::listen_tcp(endpoint.port())?;
                info!(port = endpoint.port(), "waiting for client to connect");
                Link::TcpServer {
                    listener,
                    client: ServerState::Listening,
                }
            }
        };
        debug!(mode = %link.mode(), %address, "network output opened");

        Ok(Self {
            endpoint,
            link,
            stats: SinkStats::default(),
        })
    }

    /// 解析地址串并打开网络输出。
    pub fn connect(address: &str, listen: bool) -> Result<Self, NetOutputError> {
        Self::open(&NetOutputConfig::new(address, listen)?)
    }

    /// 以已解析地址打开网络输出。
    pub fn with_address(address: OutputAddress, listen: bool) -> Result<Self, NetOutputError> {
        Self::open(&NetOutputConfig::from_address(address, listen))
    }

    pub fn mode(&self) -> TransportMode {
        self.link.mode()
    }

    /// 配置中的端点；服务端模式只使用其端口。
    pub fn endpoint(&self) -> SocketAddrV4 {
        self.endpoint
    }

    /// 套接字实际绑定的本地地址；服务端模式下即监听地址。
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.link.local_addr()
    }

    /// 当前的发送对端。服务端模式下无客户端时为 `None`。
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        match &self.link {
            Link::Udp { .. } => Some(SocketAddr::V4(self.endpoint)),
            Link::TcpClient { stream } => stream.peer_addr().ok(),
            Link::TcpServer { client, .. } => client.peer(),
        }
    }

    /// 服务端模式下是否已接入客户端；其他模式恒为 `false`。
    pub fn is_client_connected(&self) -> bool {
        matches!(
            self.link,
            Link::TcpServer {
                client: ServerState::Connected { .. },
                ..
            }
        )
    }

    pub fn stats(&self) -> SinkStats {
        self.stats
    }
}

impl FrameSink for NetworkFrameSink {
    type Error = NetOutputError;

    fn submit(
        &mut self,
        buffer: &[u8],
        timestamp_us: i64,
        _flags: FrameFlags,
    ) -> Result<(), NetOutputError> {
        self.stats.frames_submitted = self.stats.frames_submitted.saturating_add(1);
        trace!(size = buffer.len(), timestamp_us, "output buffer");

        match &mut self.link {
            Link::Udp { socket } => {
                let datagrams = send_datagrams(socket, self.endpoint, buffer).map_err(|source| {
                    NetOutputError::Transmission {
                        mode: TransportMode::UdpPeer,
                        source,
                    }
                })?;
                self.stats.datagrams_sent = self.stats.datagrams_sent.saturating_add(datagrams);
                self.stats.record_sent(buffer.len());
            }
            Link::TcpClient { stream } => {
                stream
                    .write_all(buffer)
                    .map_err(|source| NetOutputError::Transmission {
                        mode: TransportMode::TcpClient,
                        source,
                    })?;
                self.stats.record_sent(buffer.len());
            }
            Link::TcpServer { listener, client } => {
                if client.poll_accept(listener).is_some() {
                    self.stats.clients_accepted = self.stats.clients_accepted.saturating_add(1);
                }
                let ServerState::Connected { stream, .. } = &mut *client else {
                    trace!(size = buffer.len(), "no client connected, dropping frame");
                    self.stats.record_dropped();
                    return Ok(());
                };
                match stream.write_all(buffer) {
                    Ok(()) => self.stats.record_sent(buffer.len()),
                    Err(err) => {
                        client.disconnect(&err);
                        self.stats.client_disconnects =
                            self.stats.client_disconnects.saturating_add(1);
                        self.stats.record_dropped();
                    }
                }
            }
        }
        Ok(())
    }
}

impl Drop for NetworkFrameSink {
    fn drop(&mut self) {
        debug!(mode = %self.link.mode(), endpoint = %self.endpoint, "network output closed");
    }
}

/// 把 `buffer` 切成不超过 [`MAX_UDP_PAYLOAD`] 的分片，空缓冲不产生分片。
pub fn datagram_chunks(buffer: &[u8]) -> std::slice::Chunks<'_, u8> {
    buffer.chunks(MAX_UDP_PAYLOAD)
}

fn send_datagrams(socket: &UdpSocket, endpoint: SocketAddrV4, buffer: &[u8]) -> io::Result<u64> {
    let mut sent = 0u64;
    for chunk in datagram_chunks(buffer) {
        socket.send_to(chunk, endpoint)?;
        sent += 1;
    }
    Ok(sent)
}
