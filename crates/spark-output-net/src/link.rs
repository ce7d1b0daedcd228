//! 每种传输模式持有的句柄，以及 TCP 服务端的连接状态机。
//!
//! # 教案级注释
//!
//! ## 意图（Why）
//! - “是否已有客户端”以显式枚举表达：`Listening` 不携带任何数据句柄，`Connected` 携带流与
//!   对端地址，非法组合无法被构造。
//! - 服务端不设专门的接受线程：每次提交前做一次非阻塞 `accept`，代价是无客户端期间的帧被
//!   直接丢弃。
//!
//! ## 逻辑（How）
//! - [`ServerState::poll_accept`]：仅在 `Listening` 时尝试接受，成功后恢复阻塞写并开启
//!   `TCP_NODELAY`，转入 `Connected`；
//! - [`ServerState::disconnect`]：丢弃数据句柄，回到 `Listening`，监听套接字保持不变。
//!
//! ## 契约（What）
//! - 所有句柄由 [`Link`] 独占持有，随 `Link` 析构恰好关闭一次。

use crate::address::TransportMode;
use crate::socket::prepare_client;
use std::io::{self, ErrorKind};
use std::net::{SocketAddr, TcpListener, TcpStream, UdpSocket};
use tracing::{debug, info, warn};

/// 已就绪的传输句柄，按模式区分。
#[derive(Debug)]
pub(crate) enum Link {
    Udp { socket: UdpSocket },
    TcpClient { stream: TcpStream },
    TcpServer {
        listener: TcpListener,
        client: ServerState,
    },
}

impl Link {
    pub(crate) fn mode(&self) -> TransportMode {
        match self {
            Link::Udp { .. } => TransportMode::UdpPeer,
            Link::TcpClient { .. } => TransportMode::TcpClient,
            Link::TcpServer { .. } => TransportMode::TcpServer,
        }
    }

    pub(crate) fn local_addr(&self) -> io::Result<SocketAddr> {
        match self {
            Link::Udp { socket } => socket.local_addr(),
            Link::TcpClient { stream } => stream.local_addr(),
            Link::TcpServer { listener, .. } => listener.local_addr(),
        }
    }
}

/// TCP 服务端的客户端连接状态。
#[derive(Debug)]
pub(crate) enum ServerState {
    Listening,
    Connected { stream: TcpStream, peer: SocketAddr },
}

impl ServerState {
    pub(crate) fn peer(&self) -> Option<SocketAddr> {
        match self {
            ServerState::Listening => None,
            ServerState::Connected { peer, .. } => Some(*peer),
        }
    }

    /// 在 `Listening` 时做一次非阻塞接受，返回新接入的对端地址。
    ///
    /// 没有待接受的连接、`accept` 出错或新连接无法配置时都留在 `Listening`。
    pub(crate) fn poll_accept(&mut self, listener: &TcpListener) -> Option<SocketAddr> {
        if let ServerState::Connected { .. } = self {
            return None;
        }

        let (stream, peer) = match listener.accept() {
            Ok(accepted) => accepted,
            Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                return None;
            }
            Err(err) => {
                warn!(error = %err, "accept on listen socket failed");
                return None;
            }
        };

        if let Err(err) = prepare_client(&stream) {
            warn!(%peer, error = %err, "failed to configure client socket, dropping client");
            return None;
        }

        info!(%peer, "client connection accepted");
        *self = ServerState::Connected { stream, peer };
        Some(peer)
    }

    /// 丢弃当前客户端并回到等待状态。
    pub(crate) fn disconnect(&mut self, cause: &io::Error) {
        if let ServerState::Connected { peer, .. } = self {
            debug!(%peer, error = %cause, "client disconnected");
        }
        *self = ServerState::Listening;
        info!("waiting for client to connect");
    }
}
