//! 固件命令通道（hardware monitor）编解码
//!
//! 请求包格式（小端）：
//!
//! ```text
//! [u16 len][u16 magic=0xCDAB][u32 opcode][u32 p1][u32 p2][u32 p3][u32 p4][payload...]
//! ```
//!
//! `len` 为包总长减 2（不含自身），头部固定 24 字节，整包不超过 1024 字节。
//! 应答的前 4 字节回显 opcode，其余为数据载荷。

use crate::ProtocolError;
use num_enum::TryFromPrimitive;

/// 命令包头部长度（字节）
pub const HWMON_HEADER_SIZE: usize = 24;

/// 命令包最大长度（字节）
pub const HWMON_MAX_PACKET: usize = 1024;

/// 包头魔数
pub const HWMON_MAGIC: u16 = 0xCDAB;

/// 固件命令操作码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Opcode {
    /// 读取片上标定表
    GetCalibrationTable = 0x15,
}

/// 片上标定表标识
///
/// 封闭集合：每个表对应固件持久存储中的一条不可变记录。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u8)]
pub enum CalibrationTableId {
    /// 深度模组畸变系数表
    Coefficients = 25,
    /// 深度标定表
    DepthCalibration = 31,
    /// RGB 标定表
    RgbCalibration = 32,
    /// IMU 标定表
    ImuCalibration = 34,
}

impl CalibrationTableId {
    /// 封闭集合中的全部表
    pub const ALL: [CalibrationTableId; 4] = [
        CalibrationTableId::Coefficients,
        CalibrationTableId::DepthCalibration,
        CalibrationTableId::RgbCalibration,
        CalibrationTableId::ImuCalibration,
    ];

    /// 缓存槽位的稠密索引（0..ALL.len()）
    pub fn slot(self) -> usize {
        match self {
            CalibrationTableId::Coefficients => 0,
            CalibrationTableId::DepthCalibration => 1,
            CalibrationTableId::RgbCalibration => 2,
            CalibrationTableId::ImuCalibration => 3,
        }
    }
}

/// 构建固件命令包
///
/// `payload` 为空时包长即头部 24 字节。超长包返回 [`ProtocolError::PacketTooLarge`]。
pub fn encode_command(
    opcode: Opcode,
    params: [u32; 4],
    payload: &[u8],
) -> Result<Vec<u8>, ProtocolError> {
    let total = HWMON_HEADER_SIZE + payload.len();
    if total > HWMON_MAX_PACKET {
        return Err(ProtocolError::PacketTooLarge { size: total });
    }

    let mut packet = Vec::with_capacity(total);
    packet.extend_from_slice(&((total - 2) as u16).to_le_bytes());
    packet.extend_from_slice(&HWMON_MAGIC.to_le_bytes());
    packet.extend_from_slice(&(opcode as u32).to_le_bytes());
    for p in params {
        packet.extend_from_slice(&p.to_le_bytes());
    }
    packet.extend_from_slice(payload);
    Ok(packet)
}

/// 构建「读取标定表」命令
pub fn encode_read_table(table_id: CalibrationTableId) -> Result<Vec<u8>, ProtocolError> {
    encode_command(
        Opcode::GetCalibrationTable,
        [table_id as u8 as u32, 0, 0, 0],
        &[],
    )
}

/// 解析固件应答，校验 opcode 回显并返回数据载荷
///
/// 载荷为空视为格式错误（固件绝不返回空表），
/// 调用方绝不能把部分填充或零填充的数据当作有效标定。
pub fn parse_read_table_response(
    opcode: Opcode,
    response: &[u8],
) -> Result<&[u8], ProtocolError> {
    if response.len() < 4 {
        return Err(ProtocolError::ResponseTooShort {
            expected: 4,
            actual: response.len(),
        });
    }

    let echoed = u32::from_le_bytes([response[0], response[1], response[2], response[3]]);
    if echoed != opcode as u32 {
        return Err(ProtocolError::OpcodeMismatch {
            expected: opcode as u32,
            actual: echoed,
        });
    }

    let payload = &response[4..];
    if payload.is_empty() {
        return Err(ProtocolError::EmptyTable);
    }
    Ok(payload)
}
