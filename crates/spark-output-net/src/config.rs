use crate::address::{OutputAddress, TransportMode};
use crate::error::AddressError;
use serde::Deserialize;

/// 网络输出的完整配置：一个地址串加一个“作为服务端”开关。
///
/// # 教案级注释
///
/// ## 意图（Why）
/// - 让选项层既可以在代码中直接给出地址串，也可以从 TOML 片段加载，两条路径共享同一套
///   地址校验，避免出现只在某一入口生效的规则。
///
/// ## 契约（What）
/// - TOML 形如 `address = "tcp://0.0.0.0:5000"`，可选 `listen = true`；
/// - 未知字段会被拒绝，地址错误的文案会原样出现在返回的 [`AddressError::Toml`] 中；
/// - `listen` 只对 `tcp` 生效，对 `udp` 静默忽略。
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetOutputConfig {
    address: OutputAddress,
    #[serde(default)]
    listen: bool,
}

impl NetOutputConfig {
    /// 由地址串与服务端开关构造配置。
    pub fn new(address: &str, listen: bool) -> Result<Self, AddressError> {
        Ok(Self {
            address: address.parse()?,
            listen,
        })
    }

    /// 由已解析的地址构造配置。
    pub fn from_address(address: OutputAddress, listen: bool) -> Self {
        Self { address, listen }
    }

    /// 从 TOML 文本加载配置。
    pub fn from_toml_str(text: &str) -> Result<Self, AddressError> {
        toml::from_str(text).map_err(|err| AddressError::Toml {
            message: err.message().to_owned(),
        })
    }

    pub fn address(&self) -> OutputAddress {
        self.address
    }

    pub fn listen(&self) -> bool {
        self.listen
    }

    /// 本配置最终选用的传输模式。
    pub fn mode(&self) -> TransportMode {
        TransportMode::select(self.address.scheme(), self.listen)
    }
}
