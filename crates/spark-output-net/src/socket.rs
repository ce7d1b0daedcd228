//! 三种传输模式的套接字准备步骤。
//!
//! 所有选项都在转换为标准库类型之前通过 `socket2` 设置，失败时映射为带稳定错误码的
//! [`NetOutputError::SocketSetup`]；转换之后套接字的所有权完全交给调用方。

use crate::error::{self, NetOutputError};
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io;
use std::net::{Ipv4Addr, SocketAddrV4, TcpListener, TcpStream, UdpSocket};

/// 服务端只接受单个客户端。
const LISTEN_BACKLOG: i32 = 1;

/// 打开未绑定的 IPv4 数据报套接字；内核在首次发送时隐式绑定本地端口。
pub(crate) fn open_udp() -> Result<UdpSocket, NetOutputError> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
        .map_err(NetOutputError::setup(error::OPEN_UDP))?;
    Ok(UdpSocket::from(socket))
}

/// 阻塞连接到 `endpoint`，不设超时，不重试。
pub(crate) fn connect_tcp(endpoint: SocketAddrV4) -> Result<TcpStream, NetOutputError> {
    let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))
        .map_err(NetOutputError::setup(error::OPEN_CLIENT))?;
    socket
        .connect(&SockAddr::from(endpoint))
        .map_err(|source| NetOutputError::Connect { endpoint, source })?;
    Ok(TcpStream::from(socket))
}

/// 在 `0.0.0.0:port` 上建立非阻塞、可复用地址、积压队列为 1 的监听套接字。
pub(crate) fn listen_tcp(port: u16) -> Result<TcpListener, NetOutputError> {
    let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))
        .map_err(NetOutputError::setup(error::OPEN_LISTENER))?;
    socket
        .set_reuse_address(true)
        .map_err(NetOutputError::setup(error::REUSE_ADDRESS))?;
    socket
        .set_nonblocking(true)
        .map_err(NetOutputError::setup(error::NONBLOCKING))?;
    let wildcard = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port);
    socket
        .bind(&SockAddr::from(wildcard))
        .map_err(NetOutputError::setup(error::BIND))?;
    socket
        .listen(LISTEN_BACKLOG)
        .map_err(NetOutputError::setup(error::LISTEN))?;
    Ok(TcpListener::from(socket))
}

/// 为刚接受的客户端连接恢复阻塞写并关闭 Nagle。
///
/// 部分平台上被接受的套接字会继承监听套接字的非阻塞标志，这里显式复位。
pub(crate) fn prepare_client(stream: &TcpStream) -> io::Result<()> {
    stream.set_nonblocking(false)?;
    stream.set_nodelay(true)
}
