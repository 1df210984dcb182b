//! # DS Driver
//!
//! DS 深度相机的帧元数据派生与标定读取驱动层，包括：
//! - 传输后端窄接口（命令通道、XU 控制、端点描述符）
//! - 每 pin 时间戳/序号状态机（图像与 HID 两种策略）
//! - 记忆化标定表缓存（compute-once，失败可重试）
//! - 投射器 vendor 控制
//! - 设备描述符与装配工厂
//!
//! USB/UVC/HID 枚举与传输本身由外部后端提供，本层不做任何
//! 图像处理，也不决定流配置策略。

pub mod backend;
pub mod calibration;
pub mod controls;
pub mod device;
mod error;
pub mod timestamp;

pub use backend::{
    CommandChannel, CommandError, HidEndpointInfo, UsbEndpointInfo, VideoEndpointInfo, XuControl,
};
pub use calibration::CalibrationCache;
pub use controls::{DS_DEPTH_EMITTER_ENABLED, EmitterControl, EmitterMode};
pub use device::{DsDevice, DsDeviceInfo, subdevice_count};
pub use error::DriverError;
pub use timestamp::{FrameTimestampReader, TimestampStrategy};

// 重新导出协议层常用类型
pub use ds_protocol::{
    CalibrationTableId, HardwareModelId, PinIndex, StreamFormat, StreamProfile,
};
