//! 驱动层错误类型定义

use crate::backend::CommandError;
use ds_protocol::{CalibrationTableId, ProtocolError};
use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 协议解析错误
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 命令通道传输错误
    #[error("Command channel error: {0}")]
    Command(#[from] CommandError),

    /// 未知 SKU（枚举阶段致命，绝不猜测默认值）
    #[error("Unsupported hardware model: pid 0x{pid:04X}")]
    UnsupportedHardwareModel { pid: u16 },

    /// 写入 vendor 控制的值不在枚举范围内（拒绝写入，设备状态不变）
    #[error("Invalid control value: {value}")]
    InvalidControlValue { value: u8 },

    /// 标定表不可用（通道失败或应答格式错误，缓存保持为空以便重试）
    #[error("Calibration table {table:?} unavailable: {reason}")]
    CalibrationUnavailable {
        table: CalibrationTableId,
        reason: String,
    },

    /// 构造设备时缺少必需的端点
    #[error("Missing required endpoint: {0}")]
    MissingEndpoint(&'static str),
}
