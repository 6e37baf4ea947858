use crate::{
    Decode, Encode,
    board::Acceleration,
    hex::{decode_hex_digit, encode_byte},
};

/// Largest outbound payload: three accelerometer words, four hex chars each.
pub const MAX_PAYLOAD_SIZE: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadError {
    Full {
        capacity: usize,
    },
    Truncated {
        expected: usize,
        found: usize,
    },
}

/// Append-only hex-ASCII payload accumulator.
#[derive(Debug, Clone, Default)]
pub struct Payload<const N: usize = MAX_PAYLOAD_SIZE> {
    buf: heapless::Vec<u8, N>,
}

impl<const N: usize> Payload<N> {
    pub fn new() -> Payload<N> {
        Payload {
            buf: heapless::Vec::new(),
        }
    }

    /// High nibble then low nibble.
    pub fn push_byte(&mut self, value: i8) -> Result<(), PayloadError> {
        self.buf
            .extend_from_slice(&encode_byte(value as u8))
            .map_err(|_| PayloadError::Full { capacity: N })
    }

    /// Low byte first, then high byte.
    pub fn push_word(&mut self, value: i16) -> Result<(), PayloadError> {
        let [low, high] = value.to_le_bytes();
        self.push_byte(low as i8)?;
        self.push_byte(high as i8)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

impl Encode for i8 {
    type Error = PayloadError;

    fn encode<const N: usize>(&self, payload: &mut Payload<N>) -> Result<(), Self::Error> {
        payload.push_byte(*self)
    }
}

impl Encode for u8 {
    type Error = PayloadError;

    fn encode<const N: usize>(&self, payload: &mut Payload<N>) -> Result<(), Self::Error> {
        payload.push_byte(*self as i8)
    }
}

impl Encode for i16 {
    type Error = PayloadError;

    fn encode<const N: usize>(&self, payload: &mut Payload<N>) -> Result<(), Self::Error> {
        payload.push_word(*self)
    }
}

impl Encode for Acceleration {
    type Error = PayloadError;

    /// Each axis is masked to 12 bits first; the app rejects a set top nibble.
    fn encode<const N: usize>(&self, payload: &mut Payload<N>) -> Result<(), Self::Error> {
        let masked = self.masked();
        payload.push_word(masked.x)?;
        payload.push_word(masked.y)?;
        payload.push_word(masked.z)
    }
}

fn check_len(data: &[u8], expected: usize) -> Result<(), PayloadError> {
    if data.len() < expected {
        return Err(PayloadError::Truncated {
            expected,
            found: data.len(),
        });
    }
    Ok(())
}

impl<'a> Decode<'a> for i8 {
    type Error = PayloadError;

    fn decode(data: &'a [u8]) -> Result<Self, Self::Error> {
        check_len(data, 2)?;
        let value = (decode_hex_digit(data[0]) << 4).wrapping_add(decode_hex_digit(data[1]));
        Ok(value as i8)
    }
}

impl<'a> Decode<'a> for i16 {
    type Error = PayloadError;

    fn decode(data: &'a [u8]) -> Result<Self, Self::Error> {
        check_len(data, 4)?;
        let low = i8::decode(&data[0..2])? as u8;
        let high = i8::decode(&data[2..4])? as u8;
        Ok(i16::from_le_bytes([low, high]))
    }
}

impl<'a> Decode<'a> for Acceleration {
    type Error = PayloadError;

    fn decode(data: &'a [u8]) -> Result<Self, Self::Error> {
        check_len(data, MAX_PAYLOAD_SIZE)?;
        Ok(Acceleration {
            x: i16::decode(&data[0..4])?,
            y: i16::decode(&data[4..8])?,
            z: i16::decode(&data[8..12])?,
        })
    }
}
