use bilge::prelude::*;

use crate::{Encode, payload::{Payload, PayloadError}};

/// Frame start
pub const START: u8 = b'{';
/// Frame end
pub const END: u8 = b'}';
/// Between the type tag and payload of a single packet, and between the
/// sub-fields of an aggregated packet.
pub const SEPARATOR: u8 = b',';
/// Between the type tag and payload of an aggregated sub-field
pub const SUBFIELD_SEPARATOR: u8 = b':';
/// Every outbound frame ends its line with CR LF
pub const LINE_END: [u8; 2] = *b"\r\n";

pub const PROTOCOL_VERSION: &str = "0.0.1";

/// Single-character type tag carried by every packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PacketType {
    Gpio = b'G',
    Led = b'L',
    Button = b'P',
    Temperature = b'T',
    Accel = b'A',
    AccelX = b'X',
    AccelY = b'Y',
    AccelZ = b'Z',
    Serial = b'S',
    Error = b'R',
    ProtocolVersion = b'V',
    UiConfig = b'U',
}

impl PacketType {
    pub const fn tag(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownTag(pub u8);

impl TryFrom<u8> for PacketType {
    type Error = UnknownTag;

    fn try_from(value: u8) -> Result<Self, UnknownTag> {
        Ok(match value {
            b'G' => PacketType::Gpio,
            b'L' => PacketType::Led,
            b'P' => PacketType::Button,
            b'T' => PacketType::Temperature,
            b'A' => PacketType::Accel,
            b'X' => PacketType::AccelX,
            b'Y' => PacketType::AccelY,
            b'Z' => PacketType::AccelZ,
            b'S' => PacketType::Serial,
            b'R' => PacketType::Error,
            b'V' => PacketType::ProtocolVersion,
            b'U' => PacketType::UiConfig,
            other => return Err(UnknownTag(other)),
        })
    }
}

/// LED report byte.
///
/// `data_led` is set while the data LED is lit, `error_led` mirrors the
/// error LED flag, and `connected` is only filled in for aggregated reports.
#[bitsize(8)]
#[derive(DebugBits, Clone, Copy, FromBits)]
pub struct LedReport {
    pub data_led: bool,
    pub error_led: bool,
    pub connected: bool,
    _reserved: u5,
}

/// GPIO report byte, one bit per input.
#[bitsize(8)]
#[derive(DebugBits, Clone, Copy, FromBits)]
pub struct GpioReport {
    pub gpio1: bool,
    pub gpio2: bool,
    _reserved: u6,
}

#[bitsize(1)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBits)]
pub enum LedTarget {
    Data = 0,
    Error = 1,
}

/// Value byte of an inbound LED packet. Bit 4 picks the LED, bit 0 is on/off.
#[bitsize(8)]
#[derive(DebugBits, Clone, Copy, FromBits)]
pub struct LedCommand {
    pub on: bool,
    _reserved: u3,
    pub target: LedTarget,
    _padding: u3,
}

impl LedReport {
    pub fn bits(&self) -> u8 {
        self.value
    }
}

impl GpioReport {
    pub fn bits(&self) -> u8 {
        self.value
    }
}

impl Encode for LedReport {
    type Error = PayloadError;

    fn encode<const N: usize>(&self, payload: &mut Payload<N>) -> Result<(), Self::Error> {
        self.bits().encode(payload)
    }
}

impl Encode for GpioReport {
    type Error = PayloadError;

    fn encode<const N: usize>(&self, payload: &mut Payload<N>) -> Result<(), Self::Error> {
        self.bits().encode(payload)
    }
}
