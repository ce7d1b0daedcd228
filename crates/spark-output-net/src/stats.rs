/// 网络输出的计数快照。
///
/// # 契约（What）
/// - `frames_submitted`：`submit` 调用次数，含被丢弃与失败的帧；
/// - `frames_sent`：完整交给内核的帧数；
/// - `frames_dropped`：服务端无客户端时丢弃的帧，以及因客户端断开而未送达的帧；
/// - `bytes_sent`：完整送出的字节数；
/// - `datagrams_sent`：UDP 模式下发出的数据报数；
/// - `clients_accepted` / `client_disconnects`：服务端模式下接受与失去客户端的次数。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SinkStats {
    pub frames_submitted: u64,
    pub frames_sent: u64,
    pub frames_dropped: u64,
    pub bytes_sent: u64,
    pub datagrams_sent: u64,
    pub clients_accepted: u64,
    pub client_disconnects: u64,
}

impl SinkStats {
    pub(crate) fn record_sent(&mut self, bytes: usize) {
        self.frames_sent = self.frames_sent.saturating_add(1);
        self.bytes_sent = self.bytes_sent.saturating_add(bytes as u64);
    }

    pub(crate) fn record_dropped(&mut self) {
        self.frames_dropped = self.frames_dropped.saturating_add(1);
    }
}
