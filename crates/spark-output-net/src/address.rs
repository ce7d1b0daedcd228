//! 输出地址 `scheme://a.b.c.d:port` 的解析与传输模式选择。
//!
//! # 教案级注释
//!
//! ## 意图（Why）
//! - 选项层只交给输出阶段一个字符串；地址解析必须一次完成，任何一段写错都整体拒绝，
//!   避免“协议对了、端口错了”的半配置状态流入套接字准备阶段。
//!
//! ## 逻辑（How）
//! 1. 以 `://` 切出协议名；
//! 2. 以首个 `:` 切出主机与端口；
//! 3. 主机按 `.` 切成恰好 4 段十进制数，端口为十进制 `u16`；
//! 4. 语法全部通过后才校验协议名，只接受小写 `udp` 与 `tcp`。
//!
//! ## 契约（What）
//! - 成功时 [`OutputAddress`] 的 `Display` 输出规范形式，可再次解析得到同值；
//! - 失败时返回单个 [`AddressError`]，文案包含原始输入。

use crate::error::AddressError;
use serde::Deserialize;
use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::str::FromStr;

/// 地址串中的协议名。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scheme {
    Udp,
    Tcp,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Udp => "udp",
            Scheme::Tcp => "tcp",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 网络输出在整个生命周期内固定的传输模式。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransportMode {
    /// 无连接地向端点发送数据报。
    UdpPeer,
    /// 构造时主动连接端点。
    TcpClient,
    /// 在端点端口上监听，按需接受单个客户端。
    TcpServer,
}

impl TransportMode {
    /// 由协议名与“作为服务端”开关选出模式；`listen` 只对 `tcp` 生效。
    pub fn select(scheme: Scheme, listen: bool) -> Self {
        match (scheme, listen) {
            (Scheme::Udp, _) => TransportMode::UdpPeer,
            (Scheme::Tcp, true) => TransportMode::TcpServer,
            (Scheme::Tcp, false) => TransportMode::TcpClient,
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransportMode::UdpPeer => "udp",
            TransportMode::TcpClient => "tcp client",
            TransportMode::TcpServer => "tcp server",
        })
    }
}

/// 解析完成的输出地址。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct OutputAddress {
    scheme: Scheme,
    endpoint: SocketAddrV4,
}

impl OutputAddress {
    pub fn new(scheme: Scheme, endpoint: SocketAddrV4) -> Self {
        Self { scheme, endpoint }
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn endpoint(&self) -> SocketAddrV4 {
        self.endpoint
    }

    pub fn octets(&self) -> [u8; 4] {
        self.endpoint.ip().octets()
    }

    pub fn port(&self) -> u16 {
        self.endpoint.port()
    }
}

impl fmt::Display for OutputAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.endpoint)
    }
}

impl FromStr for OutputAddress {
    type Err = AddressError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (scheme, rest) = match input.split_once("://") {
            Some((scheme, rest)) if !scheme.is_empty() => (scheme, rest),
            _ => {
                return Err(AddressError::MissingScheme {
                    address: input.to_owned(),
                });
            }
        };

        let Some((host, port)) = rest.split_once(':') else {
            return Err(AddressError::MissingPort {
                address: input.to_owned(),
            });
        };

        let octets: Vec<&str> = host.split('.').collect();
        if octets.len() != 4 {
            return Err(AddressError::WrongOctetCount {
                address: input.to_owned(),
                found: octets.len(),
            });
        }
        let mut ip = [0u8; 4];
        for (slot, text) in ip.iter_mut().zip(&octets) {
            *slot = parse_decimal(text).ok_or_else(|| AddressError::InvalidOctet {
                address: input.to_owned(),
                octet: (*text).to_owned(),
            })?;
        }

        let port = parse_decimal(port).ok_or_else(|| AddressError::InvalidPort {
            address: input.to_owned(),
            port: port.to_owned(),
        })?;

        let scheme = match scheme {
            "udp" => Scheme::Udp,
            "tcp" => Scheme::Tcp,
            other => {
                return Err(AddressError::UnsupportedProtocol {
                    address: input.to_owned(),
                    scheme: other.to_owned(),
                });
            }
        };

        Ok(Self {
            scheme,
            endpoint: SocketAddrV4::new(Ipv4Addr::from(ip), port),
        })
    }
}

impl TryFrom<String> for OutputAddress {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// 只接受纯十进制数字，拒绝符号、空白与空串。
fn parse_decimal<T: FromStr>(text: &str) -> Option<T> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse(input: &str) -> Result<OutputAddress, AddressError> {
        input.parse()
    }

    #[test]
    fn parses_udp_and_tcp_addresses() {
        let udp = parse("udp://127.0.0.1:5000").unwrap();
        assert_eq!(udp.scheme(), Scheme::Udp);
        assert_eq!(udp.octets(), [127, 0, 0, 1]);
        assert_eq!(udp.port(), 5000);

        let tcp = parse("tcp://10.1.2.254:65535").unwrap();
        assert_eq!(tcp.scheme(), Scheme::Tcp);
        assert_eq!(tcp.endpoint(), "10.1.2.254:65535".parse().unwrap());
        assert_eq!(tcp.to_string(), "tcp://10.1.2.254:65535");
    }

    #[test]
    fn rejects_missing_scheme_separator() {
        for input in ["127.0.0.1:5000", "udp:/127.0.0.1:5000", "://127.0.0.1:5000", ""] {
            assert!(
                matches!(parse(input), Err(AddressError::MissingScheme { .. })),
                "{input}"
            );
        }
    }

    #[test]
    fn rejects_wrong_octet_count() {
        assert_eq!(
            parse("udp://127.0.1:5000"),
            Err(AddressError::WrongOctetCount {
                address: "udp://127.0.1:5000".into(),
                found: 3,
            })
        );
        assert!(matches!(
            parse("udp://1.2.3.4.5:5000"),
            Err(AddressError::WrongOctetCount { found: 5, .. })
        ));
    }

    #[test]
    fn rejects_bad_octets_and_ports() {
        assert!(matches!(
            parse("udp://1.2.x.4:5000"),
            Err(AddressError::InvalidOctet { ref octet, .. }) if octet == "x"
        ));
        assert!(matches!(
            parse("udp://1.2.256.4:5000"),
            Err(AddressError::InvalidOctet { .. })
        ));
        assert!(matches!(
            parse("udp://1.2.-3.4:5000"),
            Err(AddressError::InvalidOctet { .. })
        ));
        assert!(matches!(
            parse("tcp://1.2.3.4"),
            Err(AddressError::MissingPort { .. })
        ));
        assert!(matches!(
            parse("tcp://1.2.3.4:http"),
            Err(AddressError::InvalidPort { ref port, .. }) if port == "http"
        ));
        assert!(matches!(
            parse("tcp://1.2.3.4:70000"),
            Err(AddressError::InvalidPort { .. })
        ));
        assert!(matches!(
            parse("tcp://1.2.3.4:80/path"),
            Err(AddressError::InvalidPort { .. })
        ));
    }

    #[test]
    fn rejects_unknown_scheme_after_grammar() {
        assert!(matches!(
            parse("http://1.2.3.4:80"),
            Err(AddressError::UnsupportedProtocol { ref scheme, .. }) if scheme == "http"
        ));
        assert!(matches!(
            parse("UDP://1.2.3.4:80"),
            Err(AddressError::UnsupportedProtocol { .. })
        ));
        // 语法错误优先于协议名错误。
        assert!(matches!(
            parse("http://nowhere:80"),
            Err(AddressError::WrongOctetCount { .. })
        ));
    }

    #[test]
    fn listen_only_applies_to_tcp() {
        assert_eq!(TransportMode::select(Scheme::Udp, true), TransportMode::UdpPeer);
        assert_eq!(TransportMode::select(Scheme::Tcp, true), TransportMode::TcpServer);
        assert_eq!(TransportMode::select(Scheme::Tcp, false), TransportMode::TcpClient);
    }

    proptest! {
        #[test]
        fn well_formed_addresses_parse_positionally(
            tcp in any::<bool>(),
            octets in any::<[u8; 4]>(),
            port in any::<u16>(),
        ) {
            let scheme = if tcp { "tcp" } else { "udp" };
            let input = format!(
                "{scheme}://{}.{}.{}.{}:{port}",
                octets[0], octets[1], octets[2], octets[3]
            );
            let parsed = parse(&input).unwrap();
            prop_assert_eq!(parsed.scheme().as_str(), scheme);
            prop_assert_eq!(parsed.octets(), octets);
            prop_assert_eq!(parsed.port(), port);
            prop_assert_eq!(parsed.to_string(), input);
        }

        #[test]
        fn inputs_without_separator_never_parse(input in "[a-z0-9.:/]{0,24}") {
            prop_assume!(!input.contains("://"));
            prop_assert!(
                matches!(parse(&input), Err(AddressError::MissingScheme { .. })),
                "unexpected result for {:?}",
                input
            );
        }

        #[test]
        fn three_octet_hosts_never_parse(
            octets in any::<[u8; 3]>(),
            port in any::<u16>(),
        ) {
            let input = format!("udp://{}.{}.{}:{port}", octets[0], octets[1], octets[2]);
            prop_assert!(
                matches!(parse(&input), Err(AddressError::WrongOctetCount { found: 3, .. })),
                "unexpected result for {:?}",
                input
            );
        }
    }
}
