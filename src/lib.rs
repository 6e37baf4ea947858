#![no_std]

#[cfg(test)]
extern crate std;

pub mod board;
pub mod bridge;
pub mod dispatch;
pub mod framer;
pub mod hex;
pub mod packet;
pub mod parser;
pub mod payload;
pub mod serial;
pub mod session;

#[cfg(test)]
mod mock;

use payload::Payload;

/// Appends the hex-ASCII wire form of a value to a payload.
pub trait Encode {
    type Error;

    fn encode<const N: usize>(&self, payload: &mut Payload<N>) -> Result<(), Self::Error>;
}

/// Reads a value back out of its hex-ASCII wire form.
pub trait Decode<'a>
where
    Self: Sized,
{
    type Error;

    fn decode(data: &'a [u8]) -> Result<Self, Self::Error>;
}

pub use board::{Acceleration, Board, GpioPin};
pub use bridge::{Bridge, BridgeConfig, BridgeError, Timers};
pub use packet::PacketType;
pub use parser::{Command, Parser, ParserState};
pub use payload::PayloadError;
pub use serial::{Link, QueuedRx, SerialTransport, Transport};
pub use session::{ConsoleCommand, ConsoleSession};
