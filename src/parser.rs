//! Inbound packet state machine.
//!
//! Inbound frames look like `{` seq tag `LL` `nn`..., where `LL` is a
//! two-digit hex count of payload *nibbles* and each nibble pair forms one
//! value byte. Every completed pair is handed out as a [`Command`].
//!
//! There is no end delimiter and no resync: once past `{` the parser counts
//! its way through the declared length, treating every byte (a stray `{`
//! included) as data. An odd count leaves a lone trailing nibble that is
//! consumed but never dispatched.

use crate::{hex::decode_hex_digit, packet::{PacketType, START}};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserState {
    #[default]
    Idle,
    SequenceNumber,
    PacketId,
    PayloadSizeHigh,
    PayloadSizeLow,
    PayloadNibbleEven,
    PayloadNibbleOdd,
}

/// One decoded (type tag, value) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub tag: u8,
    pub value: u8,
}

impl Command {
    pub fn kind(&self) -> Option<PacketType> {
        PacketType::try_from(self.tag).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Parser {
    state: ParserState,
    tag: u8,
    length: u8,
    data: u8,
}

impl Parser {
    pub const fn new() -> Parser {
        Parser {
            state: ParserState::Idle,
            tag: 0,
            length: 0,
            data: 0,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Consume one byte, returning the parser it leaves behind and any
    /// completed command. Pure; [`Parser::feed`] is the in-place form.
    pub fn transition(self, byte: u8) -> (Parser, Option<Command>) {
        use ParserState::*;

        let mut next = self;
        let mut command = None;
        match self.state {
            Idle => {
                if byte == START {
                    next.state = SequenceNumber;
                }
            }
            SequenceNumber => {
                next.state = PacketId;
            }
            PacketId => {
                next.tag = byte;
                next.state = PayloadSizeHigh;
            }
            PayloadSizeHigh => {
                next.length = decode_hex_digit(byte);
                next.state = PayloadSizeLow;
            }
            PayloadSizeLow => {
                next.length = (self.length << 4).wrapping_add(decode_hex_digit(byte));
                next.state = PayloadNibbleEven;
            }
            PayloadNibbleEven => {
                next.data = decode_hex_digit(byte);
                next.length = self.length.wrapping_sub(1);
                next.state = if next.length == 0 {
                    log::trace!("dropping trailing nibble of '{}' packet", self.tag as char);
                    Idle
                } else {
                    PayloadNibbleOdd
                };
            }
            PayloadNibbleOdd => {
                next.data = (self.data << 4).wrapping_add(decode_hex_digit(byte));
                command = Some(Command {
                    tag: self.tag,
                    value: next.data,
                });
                next.length = self.length.wrapping_sub(1);
                next.state = if next.length == 0 {
                    Idle
                } else {
                    PayloadNibbleEven
                };
            }
        }
        (next, command)
    }

    pub fn feed(&mut self, byte: u8) -> Option<Command> {
        let (next, command) = self.transition(byte);
        *self = next;
        command
    }
}
