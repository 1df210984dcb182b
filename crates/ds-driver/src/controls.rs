//! Vendor 控制面（UVC 扩展单元）
//!
//! 目前只暴露投射器（emitter）电源控制。取值是封闭枚举
//! {Off, On, Auto}，范围外的写入在触碰设备之前即被拒绝。

use crate::backend::XuControl;
use crate::error::DriverError;
use num_enum::TryFromPrimitive;
use std::sync::Arc;
use tracing::debug;

/// 深度模组 XU 上的 emitter 使能控制选择子
pub const DS_DEPTH_EMITTER_ENABLED: u8 = 1;

/// 投射器电源模式
///
/// 0 = 关闭，1 = 开启，2 = 由固件自动控制。
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum EmitterMode {
    Off = 0,
    On = 1,
    Auto = 2,
}

impl EmitterMode {
    /// 人类可读的取值描述
    pub fn description(self) -> &'static str {
        match self {
            EmitterMode::Off => "Off",
            EmitterMode::On => "On",
            EmitterMode::Auto => "Auto",
        }
    }
}

/// 投射器电源控制
///
/// 写入先在主机侧校验枚举范围，非法值返回
/// [`DriverError::InvalidControlValue`] 且设备状态保持不变。
pub struct EmitterControl {
    xu: Arc<dyn XuControl>,
}

impl EmitterControl {
    pub fn new(xu: Arc<dyn XuControl>) -> Self {
        Self { xu }
    }

    /// 写入原始控制值（必须落在 {0, 1, 2} 内）
    pub fn set(&self, value: u8) -> Result<(), DriverError> {
        let mode =
            EmitterMode::try_from(value).map_err(|_| DriverError::InvalidControlValue { value })?;
        self.xu.write_u8(DS_DEPTH_EMITTER_ENABLED, value)?;
        debug!(mode = mode.description(), "emitter mode set");
        Ok(())
    }

    /// 写入枚举模式
    pub fn set_mode(&self, mode: EmitterMode) -> Result<(), DriverError> {
        self.set(mode as u8)
    }

    /// 读回当前模式
    ///
    /// 设备返回枚举外的值同样按 [`DriverError::InvalidControlValue`] 上报。
    pub fn get(&self) -> Result<EmitterMode, DriverError> {
        let value = self.xu.read_u8(DS_DEPTH_EMITTER_ENABLED)?;
        EmitterMode::try_from(value).map_err(|_| DriverError::InvalidControlValue { value })
    }
}
