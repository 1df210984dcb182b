//! 设备级集成测试
//!
//! 用 mock 命令通道 / mock XU 装配完整设备对象，验证标定缓存的
//! 单飞语义、emitter 控制与帧元数据派生的端到端行为。

use ds_driver::{
    CalibrationTableId, CommandChannel, CommandError, DriverError, DsDevice, DsDeviceInfo,
    EmitterMode, HidEndpointInfo, StreamFormat, StreamProfile, UsbEndpointInfo, VideoEndpointInfo,
    XuControl,
};
use ds_protocol::Opcode;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// Mock 命令通道：每次请求延迟固定时长后返回同一张标定表
struct MockChannel {
    requests: AtomicUsize,
    delay: Duration,
    fail_first: AtomicUsize,
}

impl MockChannel {
    fn new(delay: Duration) -> Self {
        Self {
            requests: AtomicUsize::new(0),
            delay,
            fail_first: AtomicUsize::new(0),
        }
    }

    fn failing_first(n: usize) -> Self {
        let channel = Self::new(Duration::ZERO);
        channel.fail_first.store(n, Ordering::SeqCst);
        channel
    }

    fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl CommandChannel for MockChannel {
    fn send_receive(&self, input: &[u8]) -> Result<Vec<u8>, CommandError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        if self
            .fail_first
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(CommandError::Timeout);
        }

        // 应答：回显 opcode + 以请求的 p1（table id）为内容的载荷
        let table_id = input[8];
        let mut response = (Opcode::GetCalibrationTable as u32).to_le_bytes().to_vec();
        response.extend_from_slice(&[table_id; 16]);
        Ok(response)
    }
}

/// Mock XU：单字节寄存器
struct MockXu {
    register: parking_lot::Mutex<u8>,
}

impl MockXu {
    fn new() -> Self {
        Self {
            register: parking_lot::Mutex::new(0),
        }
    }
}

impl XuControl for MockXu {
    fn read_u8(&self, _control: u8) -> Result<u8, CommandError> {
        Ok(*self.register.lock())
    }

    fn write_u8(&self, _control: u8, value: u8) -> Result<(), CommandError> {
        *self.register.lock() = value;
        Ok(())
    }
}

fn tri_sensor_info() -> DsDeviceInfo {
    DsDeviceInfo::new(
        vec![VideoEndpointInfo {
            vid: 0x8086,
            pid: 0x0AD5,
            mi: 0,
            unique_id: "usb-0001".to_string(),
        }],
        UsbEndpointInfo {
            vid: 0x8086,
            pid: 0x0AD5,
            unique_id: "usb-0001-hwm".to_string(),
        },
        vec![HidEndpointInfo {
            vid: 0x8086,
            pid: 0x0AD5,
            sensor_id: "imu".to_string(),
        }],
    )
}

fn make_device(channel: Arc<MockChannel>) -> DsDevice {
    tri_sensor_info()
        .create(channel, Arc::new(MockXu::new()))
        .unwrap()
}

/// N 个线程并发请求同一张表：恰好一次通道请求，结果一致
#[test]
fn test_calibration_single_flight_across_threads() {
    init_tracing();
    let channel = Arc::new(MockChannel::new(Duration::from_millis(50)));
    let device = Arc::new(make_device(Arc::clone(&channel)));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let device = Arc::clone(&device);
        handles.push(std::thread::spawn(move || {
            device
                .get_raw_calibration_table(CalibrationTableId::Coefficients)
                .unwrap()
        }));
    }

    let blobs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(channel.request_count(), 1);
    for blob in &blobs {
        assert_eq!(blob.as_ref(), &[25u8; 16]);
    }
}

/// 首次拉取失败返回 CalibrationUnavailable，重试发出新请求
#[test]
fn test_calibration_failure_then_retry() {
    init_tracing();
    let channel = Arc::new(MockChannel::failing_first(1));
    let device = make_device(Arc::clone(&channel));

    let err = device
        .get_raw_calibration_table(CalibrationTableId::ImuCalibration)
        .unwrap_err();
    assert!(matches!(err, DriverError::CalibrationUnavailable { .. }));

    let blob = device
        .get_raw_calibration_table(CalibrationTableId::ImuCalibration)
        .unwrap();
    assert_eq!(blob.as_ref(), &[34u8; 16]);
    assert_eq!(channel.request_count(), 2);
}

/// 不同表独立缓存，各自恰好一次请求
#[test]
fn test_calibration_tables_independent() {
    init_tracing();
    let channel = Arc::new(MockChannel::new(Duration::ZERO));
    let device = make_device(Arc::clone(&channel));

    for _ in 0..3 {
        device
            .get_raw_calibration_table(CalibrationTableId::Coefficients)
            .unwrap();
        device
            .get_raw_calibration_table(CalibrationTableId::DepthCalibration)
            .unwrap();
    }
    assert_eq!(channel.request_count(), 2);
}

/// emitter 控制写入/读回与范围校验
#[test]
fn test_emitter_control_round_trip() {
    init_tracing();
    let device = make_device(Arc::new(MockChannel::new(Duration::ZERO)));

    device.emitter().set(2).unwrap();
    assert_eq!(device.emitter().get().unwrap(), EmitterMode::Auto);

    let err = device.emitter().set(3).unwrap_err();
    assert!(matches!(err, DriverError::InvalidControlValue { value: 3 }));
    assert_eq!(device.emitter().get().unwrap(), EmitterMode::Auto);
}

/// raw 透传不做任何解释
#[test]
fn test_send_receive_raw_data_passthrough() {
    init_tracing();
    let channel = Arc::new(MockChannel::new(Duration::ZERO));
    let device = make_device(Arc::clone(&channel));

    let mut input = vec![0u8; 9];
    input[8] = 0x42;
    let response = device.send_receive_raw_data(&input).unwrap();
    assert_eq!(&response[4..], &[0x42; 16]);
    assert_eq!(channel.request_count(), 1);
}

/// 深度与运动读取器并发打帧，序号各自独立单调
#[test]
fn test_frame_counters_under_concurrent_delivery() {
    init_tracing();
    let device = Arc::new(make_device(Arc::new(MockChannel::new(Duration::ZERO))));
    let depth_profile = StreamProfile::new(StreamFormat::Z16, 4, 2);
    let gyro_profile = StreamProfile::new(StreamFormat::GYRO, 14, 1);

    let mut handles = Vec::new();
    for _ in 0..4 {
        let device = Arc::clone(&device);
        handles.push(std::thread::spawn(move || {
            for _ in 0..100 {
                device
                    .depth_timestamp_reader()
                    .get_frame_counter(&depth_profile, &[]);
                device
                    .motion_timestamp_reader()
                    .unwrap()
                    .get_frame_counter(&gyro_profile, &[]);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    // 4 线程 x 100 帧后，下一个序号是 401
    assert_eq!(
        device
            .depth_timestamp_reader()
            .get_frame_counter(&depth_profile, &[]),
        401
    );
    assert_eq!(
        device
            .motion_timestamp_reader()
            .unwrap()
            .get_frame_counter(&gyro_profile, &[]),
        401
    );
}

/// 枚举阶段：未知 SKU 在构造前即失败
#[test]
fn test_unsupported_model_rejected_before_create() {
    init_tracing();
    assert!(matches!(
        ds_driver::subdevice_count(0x0BAD),
        Err(DriverError::UnsupportedHardwareModel { pid: 0x0BAD })
    ));
}
