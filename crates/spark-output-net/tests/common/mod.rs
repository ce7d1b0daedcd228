//! 集成测试共享的辅助函数。
#![allow(dead_code)]

use spark_output::{FrameFlags, FrameSink};
use spark_output_net::NetworkFrameSink;
use std::net::{Ipv4Addr, SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const POLL_INTERVAL: Duration = Duration::from_millis(5);
const POLL_ATTEMPTS: usize = 400;

/// 通过 `RUST_LOG` 打开日志，便于排查失败用例；重复调用无副作用。
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// 服务端模式下监听的端口。
pub fn server_port(sink: &NetworkFrameSink) -> u16 {
    sink.local_addr().expect("listen address").port()
}

/// 连接到本机上服务端模式的输出。
pub fn connect_client(port: u16) -> TcpStream {
    let stream = TcpStream::connect((Ipv4Addr::LOCALHOST, port)).expect("connect to sink");
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .expect("read timeout");
    stream
}

/// 反复提交 `frame` 直到服务端接入客户端，接入的那一次提交会把 `frame` 发给客户端。
pub fn submit_until_connected(sink: &mut NetworkFrameSink, frame: &[u8]) {
    for _ in 0..POLL_ATTEMPTS {
        sink.submit(frame, 0, FrameFlags::NONE)
            .expect("server submit never fails");
        if sink.is_client_connected() {
            return;
        }
        thread::sleep(POLL_INTERVAL);
    }
    panic!("client was never accepted");
}

/// 反复提交直到服务端察觉客户端断开，返回所用的提交次数。
pub fn submit_until_disconnected(sink: &mut NetworkFrameSink, frame: &[u8]) -> usize {
    for attempt in 1..=POLL_ATTEMPTS {
        sink.submit(frame, 0, FrameFlags::NONE)
            .expect("disconnect is not an error");
        if !sink.is_client_connected() {
            return attempt;
        }
        thread::sleep(POLL_INTERVAL);
    }
    panic!("client disconnect was never observed");
}

/// 取一个当前无人监听的本机端口。
pub fn unused_port() -> u16 {
    let probe = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).expect("bind probe");
    probe.local_addr().expect("probe address").port()
}

pub fn localhost(port: u16) -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, port))
}
