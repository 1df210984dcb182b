//! 硬件型号表（USB PID）
//!
//! 型号集合是封闭的：未知 PID 必须报错，绝不静默回退到默认型号。

use crate::ProtocolError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// RS4xx 系列已知 SKU 的 PID 列表，设备枚举时用于过滤候选端点
pub const RS4XX_SKU_PIDS: [u16; 5] = [0x0AD1, 0x0AD2, 0x0AD3, 0x0AD4, 0x0AD5];

/// 硬件型号标识（按 USB PID 区分 SKU）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u16)]
pub enum HardwareModelId {
    /// RS400 被动双目
    Rs400p = 0x0AD1,
    /// RS410 主动红外
    Rs410a = 0x0AD2,
    /// RS420 卷帘快门
    Rs420r = 0x0AD3,
    /// RS430 宽视场
    Rs430c = 0x0AD4,
    /// RS450 三传感器（深度 + RGB + IMU）
    Rs450t = 0x0AD5,
}

impl HardwareModelId {
    pub fn pid(self) -> u16 {
        self as u16
    }

    /// 该 SKU 暴露的逻辑子设备数量
    ///
    /// 在封闭枚举上是全函数：单传感器 SKU 为 1，Rs450t 为 3。
    pub fn subdevice_count(self) -> u8 {
        match self {
            HardwareModelId::Rs400p
            | HardwareModelId::Rs410a
            | HardwareModelId::Rs420r
            | HardwareModelId::Rs430c => 1,
            HardwareModelId::Rs450t => 3,
        }
    }
}

impl TryFrom<u16> for HardwareModelId {
    type Error = ProtocolError;

    fn try_from(pid: u16) -> Result<Self, Self::Error> {
        match pid {
            0x0AD1 => Ok(HardwareModelId::Rs400p),
            0x0AD2 => Ok(HardwareModelId::Rs410a),
            0x0AD3 => Ok(HardwareModelId::Rs420r),
            0x0AD4 => Ok(HardwareModelId::Rs430c),
            0x0AD5 => Ok(HardwareModelId::Rs450t),
            _ => Err(ProtocolError::UnknownPid { pid }),
        }
    }
}
