use crate::address::TransportMode;
use std::fmt;
use std::io;
use std::net::SocketAddrV4;
use thiserror::Error;

/// 描述一次套接字准备步骤对应的稳定错误码与默认文案。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SocketOp {
    code: &'static str,
    message: &'static str,
}

impl SocketOp {
    /// 稳定错误码，适合作为告警与指标标签。
    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl fmt::Display for SocketOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

pub(crate) const OPEN_UDP: SocketOp = SocketOp {
    code: "spark.output.net.udp_open_failed",
    message: "unable to open udp socket",
};
pub(crate) const OPEN_CLIENT: SocketOp = SocketOp {
    code: "spark.output.net.client_open_failed",
    message: "unable to open client socket",
};
pub(crate) const OPEN_LISTENER: SocketOp = SocketOp {
    code: "spark.output.net.listen_open_failed",
    message: "unable to open listen socket",
};
pub(crate) const REUSE_ADDRESS: SocketOp = SocketOp {
    code: "spark.output.net.reuse_address_failed",
    message: "failed to enable address reuse on listen socket",
};
pub(crate) const NONBLOCKING: SocketOp = SocketOp {
    code: "spark.output.net.nonblocking_failed",
    message: "failed to make listen socket non-blocking",
};
pub(crate) const BIND: SocketOp = SocketOp {
    code: "spark.output.net.bind_failed",
    message: "failed to bind listen socket",
};
pub(crate) const LISTEN: SocketOp = SocketOp {
    code: "spark.output.net.listen_failed",
    message: "failed to listen on socket",
};

const CONFIG_CODE: &str = "spark.output.net.invalid_config";
const CONNECT_CODE: &str = "spark.output.net.connect_failed";
const SEND_CODE: &str = "spark.output.net.send_failed";

/// 地址串或配置文档无法解析。
///
/// 每个变体都携带原始地址串，便于在启动日志中直接定位写错的配置项。
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("bad network address `{address}`: missing `<scheme>://` prefix")]
    MissingScheme { address: String },

    #[error("bad network address `{address}`: expected 4 dotted octets, found {found}")]
    WrongOctetCount { address: String, found: usize },

    #[error("bad network address `{address}`: octet `{octet}` is not a number in 0..=255")]
    InvalidOctet { address: String, octet: String },

    #[error("bad network address `{address}`: missing `:<port>` suffix")]
    MissingPort { address: String },

    #[error("bad network address `{address}`: port `{port}` is not a number in 0..=65535")]
    InvalidPort { address: String, port: String },

    #[error("unrecognised network protocol `{scheme}` in `{address}`")]
    UnsupportedProtocol { address: String, scheme: String },

    #[error("invalid network output configuration: {message}")]
    Toml { message: String },
}

/// 网络输出的错误域。
///
/// # 教案式说明
/// - **意图 (Why)**：构造期的每一种致命失败都需要能被调用方区分（配置错、套接字准备失败、
///   连接失败），运行期仅保留无法恢复的发送失败。
/// - **契约 (What)**：
///   - `Config`/`SocketSetup`/`Connect` 只会由构造函数返回，出现时不会留下任何打开的句柄；
///   - `Transmission` 只会由 UDP 与 TCP 客户端模式的 `submit` 返回；
///   - TCP 服务端的对端断开不是错误，不会出现在这里。
/// - **执行逻辑 (How)**：[`NetOutputError::code`] 为每个变体给出稳定错误码，`Display` 给出可读文案。
#[derive(Debug, Error)]
pub enum NetOutputError {
    #[error(transparent)]
    Config(#[from] AddressError),

    #[error("{op}: {source}")]
    SocketSetup {
        op: SocketOp,
        #[source]
        source: io::Error,
    },

    #[error("connect to server {endpoint} failed: {source}")]
    Connect {
        endpoint: SocketAddrV4,
        #[source]
        source: io::Error,
    },

    #[error("failed to send data on {mode} socket: {source}")]
    Transmission {
        mode: TransportMode,
        #[source]
        source: io::Error,
    },
}

impl NetOutputError {
    /// 稳定错误码。
    pub fn code(&self) -> &'static str {
        match self {
            NetOutputError::Config(_) => CONFIG_CODE,
            NetOutputError::SocketSetup { op, .. } => op.code(),
            NetOutputError::Connect { .. } => CONNECT_CODE,
            NetOutputError::Transmission { .. } => SEND_CODE,
        }
    }

    pub(crate) fn setup(op: SocketOp) -> impl FnOnce(io::Error) -> Self {
        move |source| NetOutputError::SocketSetup { op, source }
    }
}
