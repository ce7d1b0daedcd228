use core::fmt;
use core::ops::{BitAnd, BitOr, BitOrAssign};

/// 随帧传递的标志位集合。
///
/// # 教案级注释
///
/// ## 意图（Why）
/// - 编码器需要告知下游“这是关键帧”“这是暂停后的首帧”等信息，但这些信息对纯字节搬运的
///   网络 Sink 没有意义；以位掩码透传，让需要的实现自行解读，其余实现直接忽略。
///
/// ## 合同（What）
/// - [`FrameFlags::KEYFRAME`]：该帧可独立解码；
/// - [`FrameFlags::RESTART`]：输出在暂停后重新开始，时间戳已重新对齐；
/// - 未定义的位通过 [`FrameFlags::from_bits_retain`] 原样保留，不做校验。
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FrameFlags(u32);

impl FrameFlags {
    /// 无任何标志。
    pub const NONE: Self = Self(0);
    /// 关键帧。
    pub const KEYFRAME: Self = Self(1 << 0);
    /// 暂停后的重新开始。
    pub const RESTART: Self = Self(1 << 1);

    /// 保留全部位构造标志集合。
    pub const fn from_bits_retain(bits: u32) -> Self {
        Self(bits)
    }

    /// 返回原始位值。
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// 是否包含 `other` 中的全部位。
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn is_keyframe(self) -> bool {
        self.contains(Self::KEYFRAME)
    }

    /// 置位 `other` 中的全部位。
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// 由布尔值快速构造关键帧标志，便于编码器回调直接转换。
    pub const fn keyframe(is_keyframe: bool) -> Self {
        if is_keyframe {
            Self::KEYFRAME
        } else {
            Self::NONE
        }
    }
}

impl BitOr for FrameFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FrameFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

impl BitAnd for FrameFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for FrameFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("FrameFlags(NONE)");
        }
        let mut names = Vec::new();
        if self.contains(Self::KEYFRAME) {
            names.push("KEYFRAME".to_owned());
        }
        if self.contains(Self::RESTART) {
            names.push("RESTART".to_owned());
        }
        let unknown = self.0 & !(Self::KEYFRAME.0 | Self::RESTART.0);
        if unknown != 0 {
            names.push(format!("{unknown:#x}"));
        }
        write!(f, "FrameFlags({})", names.join(" | "))
    }
}
