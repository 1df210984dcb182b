//! # DS Protocol
//!
//! DS 深度相机协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `formats`: 流格式（fourcc）分类与帧大小计算
//! - `hid`: HID 运动报文布局与时间戳解码
//! - `models`: 硬件型号（USB PID）表
//! - `hwmon`: 固件命令通道（hardware monitor）编解码
//!
//! ## 字节序
//!
//! 固件命令通道使用小端字节序（LSB first）；
//! fourcc 代码按原始 32 位值比较，不做字节序转换。

pub mod formats;
pub mod hid;
pub mod hwmon;
pub mod models;

// 重新导出常用类型
pub use formats::*;
pub use hid::*;
pub use hwmon::*;
pub use models::*;

use thiserror::Error;

/// 协议层统一错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Unknown stream format: fourcc 0x{fourcc:08X}")]
    UnknownFormat { fourcc: u32 },

    #[error("Unknown hardware model: pid 0x{pid:04X}")]
    UnknownPid { pid: u16 },

    #[error("Response too short: expected at least {expected}, got {actual}")]
    ResponseTooShort { expected: usize, actual: usize },

    #[error("Opcode mismatch in response: expected 0x{expected:08X}, got 0x{actual:08X}")]
    OpcodeMismatch { expected: u32, actual: u32 },

    #[error("Calibration table payload is empty")]
    EmptyTable,

    #[error("Command packet too large: {size} bytes (max {max})", max = hwmon::HWMON_MAX_PACKET)]
    PacketTooLarge { size: usize },
}
