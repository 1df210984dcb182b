//! 传输后端抽象
//!
//! USB/UVC/HID 枚举与传输由外部后端实现，本层只通过窄接口消费：
//! - [`CommandChannel`]：到固件的命令/应答通道（标定读取、raw 透传）
//! - [`XuControl`]：UVC 扩展单元上的 vendor 控制读写
//! - 端点描述符：构造设备对象时由枚举层提供

use thiserror::Error;

/// 命令通道传输错误
///
/// 无响应的通道应以 [`CommandError::Timeout`] 上报，而不是无限阻塞。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Command timeout")]
    Timeout,

    #[error("Channel closed")]
    Closed,
}

/// 到设备固件的命令/应答通道
///
/// 一次 `send_receive` 对应一次阻塞的命令往返。
/// 除首次标定拉取外，本核心不在帧交付路径上做任何通道 IO。
pub trait CommandChannel: Send + Sync {
    fn send_receive(&self, input: &[u8]) -> Result<Vec<u8>, CommandError>;
}

/// UVC 扩展单元（vendor 控制面）的字节级读写
pub trait XuControl: Send + Sync {
    fn read_u8(&self, control: u8) -> Result<u8, CommandError>;
    fn write_u8(&self, control: u8, value: u8) -> Result<(), CommandError>;
}

/// 视频端点描述符（枚举层提供）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEndpointInfo {
    pub vid: u16,
    pub pid: u16,
    /// USB 接口号（multi-interface index）
    pub mi: u8,
    pub unique_id: String,
}

/// 控制（hardware monitor）端点描述符
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbEndpointInfo {
    pub vid: u16,
    pub pid: u16,
    pub unique_id: String,
}

/// HID 端点描述符
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HidEndpointInfo {
    pub vid: u16,
    pub pid: u16,
    pub sensor_id: String,
}
