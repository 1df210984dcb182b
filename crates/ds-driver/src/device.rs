//! 设备描述符与设备对象
//!
//! [`DsDeviceInfo`] 在完整构造之前即可回答「该物理单元暴露几个逻辑
//! 子设备」；[`DsDeviceInfo::create`] 把时间戳读取器、标定缓存与
//! vendor 控制面装配到具体传输端点上，产出 [`DsDevice`]。

use crate::backend::{
    CommandChannel, HidEndpointInfo, UsbEndpointInfo, VideoEndpointInfo, XuControl,
};
use crate::calibration::CalibrationCache;
use crate::controls::EmitterControl;
use crate::error::DriverError;
use crate::timestamp::{FrameTimestampReader, TimestampStrategy};
use bytes::Bytes;
use ds_protocol::{CalibrationTableId, HardwareModelId, RS4XX_SKU_PIDS};
use std::sync::Arc;
use tracing::info;

/// 按 PID 解析逻辑子设备数量（枚举阶段，先于完整构造）
///
/// 未知 PID 是致命错误，绝不猜测默认值。
pub fn subdevice_count(pid: u16) -> Result<u8, DriverError> {
    let model = HardwareModelId::try_from(pid)
        .map_err(|_| DriverError::UnsupportedHardwareModel { pid })?;
    Ok(model.subdevice_count())
}

/// 一台物理设备的端点描述符集合
#[derive(Debug, Clone)]
pub struct DsDeviceInfo {
    pub depth: Vec<VideoEndpointInfo>,
    pub hwm: UsbEndpointInfo,
    pub hid: Vec<HidEndpointInfo>,
}

impl DsDeviceInfo {
    pub fn new(
        depth: Vec<VideoEndpointInfo>,
        hwm: UsbEndpointInfo,
        hid: Vec<HidEndpointInfo>,
    ) -> Self {
        Self { depth, hwm, hid }
    }

    /// 该物理单元暴露的逻辑子设备数量（由首个深度端点的 PID 决定）
    pub fn subdevice_count(&self) -> Result<u8, DriverError> {
        let first = self
            .depth
            .first()
            .ok_or(DriverError::MissingEndpoint("depth video endpoint"))?;
        subdevice_count(first.pid)
    }

    /// 从枚举结果中挑出属于 DS 系列的设备，按 PID 配对端点
    ///
    /// 每个 PID 属于 [`RS4XX_SKU_PIDS`] 的 monitor 端点产出一台设备，
    /// 并吸纳同 PID 的视频与 HID 端点。
    pub fn pick_ds_devices(
        uvc: &[VideoEndpointInfo],
        usb: &[UsbEndpointInfo],
        hid: &[HidEndpointInfo],
    ) -> Vec<DsDeviceInfo> {
        usb.iter()
            .filter(|hwm| RS4XX_SKU_PIDS.contains(&hwm.pid))
            .map(|hwm| {
                let depth: Vec<_> = uvc.iter().filter(|e| e.pid == hwm.pid).cloned().collect();
                let hid: Vec<_> = hid.iter().filter(|e| e.pid == hwm.pid).cloned().collect();
                DsDeviceInfo::new(depth, hwm.clone(), hid)
            })
            .collect()
    }

    /// 装配设备对象
    ///
    /// 深度端点缺失是构造期错误；HID 读取器仅在存在 HID 端点时装配。
    pub fn create(
        self,
        channel: Arc<dyn CommandChannel>,
        xu: Arc<dyn XuControl>,
    ) -> Result<DsDevice, DriverError> {
        if self.depth.is_empty() {
            return Err(DriverError::MissingEndpoint("depth video endpoint"));
        }
        let subdevices = self.subdevice_count()?;

        let motion_reader = (!self.hid.is_empty())
            .then(|| FrameTimestampReader::new(TimestampStrategy::HidSensor));

        info!(
            pid = %format_args!("0x{:04X}", self.depth[0].pid),
            subdevices,
            hid_endpoints = self.hid.len(),
            "creating DS device"
        );

        Ok(DsDevice {
            info: self,
            depth_reader: FrameTimestampReader::new(TimestampStrategy::ImagePin),
            motion_reader,
            calibration: CalibrationCache::new(),
            emitter: EmitterControl::new(xu),
            channel,
        })
    }
}

/// DS 深度相机设备对象
///
/// 独占持有自己的时间戳状态与标定缓存，二者绝不跨设备共享。
pub struct DsDevice {
    info: DsDeviceInfo,
    depth_reader: FrameTimestampReader,
    motion_reader: Option<FrameTimestampReader>,
    calibration: CalibrationCache,
    emitter: EmitterControl,
    channel: Arc<dyn CommandChannel>,
}

impl DsDevice {
    /// 深度端点（图像 pin）的帧元数据读取器
    pub fn depth_timestamp_reader(&self) -> &FrameTimestampReader {
        &self.depth_reader
    }

    /// HID 端点（运动 sensor）的帧元数据读取器，设备无 IMU 时为 `None`
    pub fn motion_timestamp_reader(&self) -> Option<&FrameTimestampReader> {
        self.motion_reader.as_ref()
    }

    /// 读取片上标定表原始字节块（首次访问时经命令通道拉取并缓存）
    pub fn get_raw_calibration_table(
        &self,
        table_id: CalibrationTableId,
    ) -> Result<Bytes, DriverError> {
        self.calibration.get_or_fetch(table_id, self.channel.as_ref())
    }

    /// 原始 vendor 命令透传：字节进、字节出，本层不做任何解释
    pub fn send_receive_raw_data(&self, input: &[u8]) -> Result<Vec<u8>, DriverError> {
        Ok(self.channel.send_receive(input)?)
    }

    /// 投射器电源控制
    pub fn emitter(&self) -> &EmitterControl {
        &self.emitter
    }

    pub fn info(&self) -> &DsDeviceInfo {
        &self.info
    }
}
