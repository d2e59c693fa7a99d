use std::time::Duration;

pub const BAUDRATE: u32 = 115_200;
pub const READ_TIMEOUT: Duration = Duration::from_secs(2);

/// USB product id reported by the TeraRanger Evo backboard.
pub const SENSOR_USB_PID: u16 = 0x5740;

/// Switches the sensor output to 4-byte binary frames.
pub const BINARY_MODE_COMMAND: [u8; 4] = [0x00, 0x11, 0x02, 0x4C];

pub const FRAME_HEADER: u8 = b'T';
pub const FRAME_LENGTH: usize = 4;
/// 8N1 framing: start bit + 8 data bits + stop bit.
pub const WIRE_BITS_PER_BYTE: u32 = 10;

pub const RAW_BELOW_RANGE: u16 = 0;
pub const RAW_NO_TARGET: u16 = 1;
pub const RAW_ABOVE_RANGE: u16 = u16::MAX;
pub const MILLIMETERS_PER_METER: f64 = 1000.0;

pub const DEFAULT_WINDOW: usize = 1500;
