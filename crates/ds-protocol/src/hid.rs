//! HID 运动报文布局
//!
//! 固件的 IMU 报文为固定 14 字节，偏移 6 处嵌入一个
//! 小端 64 位设备时间戳。尺寸不符的缓冲区一律视为无时间戳。

/// HID 运动报文固定长度（字节）
pub const HID_REPORT_SIZE: usize = 14;

/// 设备时间戳在报文内的字节偏移
pub const HID_TIMESTAMP_OFFSET: usize = 6;

/// 解码 HID 报文内嵌的设备时间戳
///
/// 仅当缓冲区长度恰好为 [`HID_REPORT_SIZE`] 时返回 `Some`；
/// 其余情况返回 `None`，调用方回退到占位时间戳。
pub fn decode_hid_timestamp(report: &[u8]) -> Option<u64> {
    if report.len() != HID_REPORT_SIZE {
        return None;
    }
    let bytes: [u8; 8] = report[HID_TIMESTAMP_OFFSET..HID_TIMESTAMP_OFFSET + 8]
        .try_into()
        .ok()?;
    Some(u64::from_le_bytes(bytes))
}
