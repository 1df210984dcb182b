//! 流格式定义与 pin 分类
//!
//! 每个原始帧由传输层携带一个 fourcc 流格式描述符。
//! 同一个物理端点上复用多条逻辑子流（pin）：
//! 深度端点复用 {infrared, depth}，HID 端点复用 {accel, gyro}。
//! 分类函数为纯函数，未知格式返回 `None`，由驱动层决定回退策略。

use crate::ProtocolError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 每个物理端点上复用的逻辑子流数量
pub const PINS_PER_ENDPOINT: usize = 2;

/// 逻辑子流索引（0..PINS_PER_ENDPOINT）
pub type PinIndex = usize;

/// 不透明的 fourcc 流格式码
///
/// 由传输层随帧提供，仅按原始 32 位值比较。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StreamFormat(pub u32);

impl StreamFormat {
    /// 16 位深度（'Z''1''6'' '）
    pub const Z16: StreamFormat = StreamFormat(0x5a31_3620);
    /// 16 位红外（'Y''1''6'' '）
    pub const Y16: StreamFormat = StreamFormat(0x5931_3620);
    /// 8 位红外（'G''R''E''Y'）
    pub const Y8: StreamFormat = StreamFormat(0x4752_4559);
    /// YUYV 4:2:2
    pub const YUYV: StreamFormat = StreamFormat(0x5955_5956);
    /// HID 加速度计报文（'A''C''C''L'）
    pub const ACCL: StreamFormat = StreamFormat(0x4143_434c);
    /// HID 陀螺仪报文（'G''Y''R''O'）
    pub const GYRO: StreamFormat = StreamFormat(0x4759_524f);

    pub fn fourcc(self) -> u32 {
        self.0
    }

    /// 每像素字节数
    ///
    /// HID 运动报文按字节流处理（1 字节/单位）。
    /// 未知格式返回 `None`。
    pub fn bytes_per_pixel(self) -> Option<u32> {
        match self {
            StreamFormat::Z16 | StreamFormat::Y16 | StreamFormat::YUYV => Some(2),
            StreamFormat::Y8 => Some(1),
            StreamFormat::ACCL | StreamFormat::GYRO => Some(1),
            _ => None,
        }
    }
}

/// 流配置描述符（格式 + 帧尺寸）
///
/// 传输层随每个原始帧一起提供，是帧大小计算的唯一可信来源：
/// 扫描边界只能由 `frame_size()` 推导，绝不信任缓冲区内携带的长度字段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StreamProfile {
    pub format: StreamFormat,
    pub width: u32,
    pub height: u32,
}

impl StreamProfile {
    pub fn new(format: StreamFormat, width: u32, height: u32) -> Self {
        Self {
            format,
            width,
            height,
        }
    }

    /// 期望的帧字节数（width * height * bytes_per_pixel）
    pub fn frame_size(&self) -> Result<usize, ProtocolError> {
        let bpp = self
            .format
            .bytes_per_pixel()
            .ok_or(ProtocolError::UnknownFormat {
                fourcc: self.format.0,
            })?;
        Ok(self.width as usize * self.height as usize * bpp as usize)
    }
}

/// 图像端点 pin 分类：深度（Z16）→ pin 1，其余已知图像格式 → pin 0
///
/// 未知格式返回 `None`，由调用方记录并回退到默认 pin。
pub fn image_pin(format: StreamFormat) -> Option<PinIndex> {
    match format {
        StreamFormat::Z16 => Some(1),
        StreamFormat::Y8 | StreamFormat::Y16 | StreamFormat::YUYV => Some(0),
        _ => None,
    }
}

/// HID 端点 sensor 分类：陀螺仪 → 1，加速度计 → 0
///
/// 未知格式返回 `None`，由调用方记录并回退到默认 sensor。
pub fn motion_sensor(format: StreamFormat) -> Option<PinIndex> {
    match format {
        StreamFormat::GYRO => Some(1),
        StreamFormat::ACCL => Some(0),
        _ => None,
    }
}
