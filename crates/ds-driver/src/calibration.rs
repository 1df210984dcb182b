//! 片上标定表缓存
//!
//! 标定数据在设备会话期间物理不变，因此每个表只在首次访问时
//! 经命令通道拉取一次，之后终生返回缓存的字节块。
//!
//! # 并发语义
//!
//! 每个表一个互斥槽位，拉取期间持有槽位锁：同一表最多一个在途请求，
//! 并发调用方阻塞等待后直接观察到已存储的结果（compute-once，
//! broadcast-result）。拉取失败时槽位保持为空，重试会发起新请求，
//! 失败绝不污染缓存。

use crate::backend::CommandChannel;
use crate::error::DriverError;
use bytes::Bytes;
use ds_protocol::{CalibrationTableId, Opcode, encode_read_table, parse_read_table_response};
use parking_lot::Mutex;
use tracing::debug;

/// 按 [`CalibrationTableId`] 记忆化的标定字节块缓存
#[derive(Default)]
pub struct CalibrationCache {
    slots: [Mutex<Option<Bytes>>; CalibrationTableId::ALL.len()],
}

impl CalibrationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 返回指定表的原始标定字节块，首次访问时经命令通道拉取
    ///
    /// 通道失败或应答格式错误（短应答、opcode 不符、空载荷）返回
    /// [`DriverError::CalibrationUnavailable`]，缓存保持为空。
    pub fn get_or_fetch(
        &self,
        table_id: CalibrationTableId,
        channel: &dyn CommandChannel,
    ) -> Result<Bytes, DriverError> {
        let mut slot = self.slots[table_id.slot()].lock();

        if let Some(blob) = slot.as_ref() {
            return Ok(blob.clone());
        }

        debug!(table = ?table_id, "fetching calibration table from device");
        let blob = Self::fetch(table_id, channel)?;
        debug!(table = ?table_id, size = blob.len(), "calibration table cached");

        *slot = Some(blob.clone());
        Ok(blob)
    }

    fn fetch(
        table_id: CalibrationTableId,
        channel: &dyn CommandChannel,
    ) -> Result<Bytes, DriverError> {
        let unavailable = |reason: String| DriverError::CalibrationUnavailable {
            table: table_id,
            reason,
        };

        let command = encode_read_table(table_id).map_err(|e| unavailable(e.to_string()))?;
        let response = channel
            .send_receive(&command)
            .map_err(|e| unavailable(e.to_string()))?;
        let payload = parse_read_table_response(Opcode::GetCalibrationTable, &response)
            .map_err(|e| unavailable(e.to_string()))?;

        Ok(Bytes::copy_from_slice(payload))
    }
}
