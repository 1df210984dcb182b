//! 帧时间戳 / 序号状态机
//!
//! 每个物理端点复用 [`PINS_PER_ENDPOINT`] 条逻辑子流，每条子流持有
//! 独立的单调序号计数器。图像端点与 HID 端点共用同一个状态机，
//! 仅时间戳解码策略和 pin 分类方式不同（[`TimestampStrategy`]）。
//!
//! # 线程安全
//!
//! 帧交付回调可能并发到达，且校验可能嵌套在计数路径内发生，
//! 因此全部 per-pin 字段由一把可重入锁（`ReentrantMutex`）串行化；
//! 调用方绝不会观察到部分更新的字段组合。

use ds_protocol::{
    PINS_PER_ENDPOINT, PinIndex, StreamProfile, decode_hid_timestamp, image_pin, motion_sensor,
};
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use tracing::{trace, warn};

/// 时间戳解码策略（图像 pin / HID sensor 两种变体的唯一差异点）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampStrategy {
    /// 图像端点：深度/红外 pin 分类；该流类型没有可解析的设备时钟，
    /// 时间戳恒为 0.0 占位值
    ImagePin,
    /// HID 端点：加速度计/陀螺仪分类；时间戳取自 14 字节报文
    /// 偏移 6 处的小端 u64，尺寸不符时回退 0.0
    HidSensor,
}

/// 单条子流的全部可变状态，reset 时作为整体清零
#[derive(Debug, Default, Clone, Copy)]
struct PinState {
    started: bool,
    /// 累计时间跨度（设备时钟单位）
    total: i64,
    last_timestamp: i32,
    /// 单调递增帧序号，仅随显式 reset 归零
    counter: u64,
}

/// 按流格式派生帧元数据（时间戳 + 序号）的读取器
///
/// 每个设备流读取器实例化一次，随设备销毁。
pub struct FrameTimestampReader {
    strategy: TimestampStrategy,
    state: ReentrantMutex<RefCell<[PinState; PINS_PER_ENDPOINT]>>,
}

impl FrameTimestampReader {
    pub fn new(strategy: TimestampStrategy) -> Self {
        Self {
            strategy,
            state: ReentrantMutex::new(RefCell::new(Default::default())),
        }
    }

    pub fn strategy(&self) -> TimestampStrategy {
        self.strategy
    }

    /// 流启动时清零所有 pin 的状态，作为单个原子单元执行
    pub fn reset(&self) {
        let guard = self.state.lock();
        let mut pins = guard.borrow_mut();
        *pins = Default::default();
    }

    /// 按策略把流格式归类到 pin 索引
    ///
    /// 未知格式回退到默认 pin 0（有日志的回退，不是静默错算）。
    fn classify(&self, profile: &StreamProfile) -> PinIndex {
        let pin = match self.strategy {
            TimestampStrategy::ImagePin => image_pin(profile.format),
            TimestampStrategy::HidSensor => motion_sensor(profile.format),
        };
        pin.unwrap_or_else(|| {
            warn!(
                fourcc = %format_args!("0x{:08X}", profile.format.fourcc()),
                "unknown stream format, falling back to default pin 0"
            );
            0
        })
    }

    /// 校验帧非退化：按 格式+尺寸 推导的精确长度逐字节扫描，
    /// 至少一个非零字节才算有效
    ///
    /// 缓冲区短于期望长度（或格式未知）按坏帧处理返回 `false`，
    /// 由交付管线丢弃该帧；扫描绝不越过推导出的边界。
    pub fn validate_frame(&self, profile: &StreamProfile, frame: &[u8]) -> bool {
        let _guard = self.state.lock();

        let expected = match profile.frame_size() {
            Ok(size) => size,
            Err(err) => {
                trace!(%err, "cannot compute frame size, dropping frame");
                return false;
            }
        };
        if frame.len() < expected {
            trace!(
                expected,
                actual = frame.len(),
                "malformed frame: buffer shorter than declared format"
            );
            return false;
        }

        frame[..expected].iter().any(|byte| *byte != 0)
    }

    /// 派生帧时间戳
    ///
    /// 图像 pin 变体返回 0.0 占位值（统一满足元数据契约，调用方
    /// 不得赋予其墙钟含义）；HID 变体解码报文内嵌的设备时间戳。
    pub fn get_frame_timestamp(&self, profile: &StreamProfile, frame: &[u8]) -> f64 {
        let guard = self.state.lock();

        let timestamp = match self.strategy {
            // TODO: 图像流改用主机侧单调时钟生成时间戳（保持本调用契约不变）
            TimestampStrategy::ImagePin => 0.0,
            TimestampStrategy::HidSensor => decode_hid_timestamp(frame)
                .map(|ticks| ticks as f64)
                .unwrap_or(0.0),
        };

        let pin = self.classify(profile);
        let mut pins = guard.borrow_mut();
        let state = &mut pins[pin];
        let ticks = timestamp as i64 as i32;
        if state.started {
            state.total += i64::from(ticks) - i64::from(state.last_timestamp);
        } else {
            state.started = true;
        }
        state.last_timestamp = ticks;

        timestamp
    }

    /// 派生帧序号：分类到 pin 后前置自增并返回该 pin 的计数器
    ///
    /// 同一 pin 上严格单调递增（`1, 2, 3, ...`），各 pin 相互独立，
    /// 仅随 [`reset`](Self::reset) 归零。
    pub fn get_frame_counter(&self, profile: &StreamProfile, _frame: &[u8]) -> u64 {
        let guard = self.state.lock();
        let pin = self.classify(profile);
        let mut pins = guard.borrow_mut();
        pins[pin].counter += 1;
        pins[pin].counter
    }
}
