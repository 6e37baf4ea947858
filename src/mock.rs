//! In-memory transports and board for tests.

use core::convert::Infallible;
use std::{collections::VecDeque, vec::Vec};

use crate::{
    board::{Acceleration, Board, GpioPin},
    serial::{Link, Transport},
};

#[derive(Debug, Default)]
pub struct MockTransport {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    pub connected: bool,
}

impl MockTransport {
    pub fn with_input(data: &[u8]) -> MockTransport {
        MockTransport {
            rx: data.iter().copied().collect(),
            ..Default::default()
        }
    }

    pub fn take_tx(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.tx)
    }
}

impl Transport for MockTransport {
    type Error = Infallible;

    fn send(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.tx.push(byte);
        Ok(())
    }

    fn try_receive(&mut self) -> nb::Result<u8, Self::Error> {
        self.rx.pop_front().ok_or(nb::Error::WouldBlock)
    }
}

impl Link for MockTransport {
    fn is_connected(&mut self) -> bool {
        self.connected
    }
}

/// Pins start idle: button released, data LED dark, error LED off.
#[derive(Debug)]
pub struct MockBoard {
    pub button_level: bool,
    pub gpio1: bool,
    pub gpio2: bool,
    pub temperature: i16,
    pub acceleration: Acceleration,
    pub data_led_level: bool,
    pub error_led: bool,
}

impl Default for MockBoard {
    fn default() -> Self {
        MockBoard {
            button_level: true,
            gpio1: false,
            gpio2: false,
            temperature: 0,
            acceleration: Acceleration::default(),
            data_led_level: true,
            error_led: false,
        }
    }
}

impl MockBoard {
    pub fn data_led_lit(&self) -> bool {
        !self.data_led_level
    }
}

impl Board for MockBoard {
    fn read_button(&mut self) -> bool {
        self.button_level
    }

    fn read_gpio(&mut self, pin: GpioPin) -> bool {
        match pin {
            GpioPin::Gpio1 => self.gpio1,
            GpioPin::Gpio2 => self.gpio2,
        }
    }

    fn read_temperature(&mut self) -> i16 {
        self.temperature
    }

    fn read_acceleration(&mut self) -> Acceleration {
        self.acceleration
    }

    fn data_led_output(&mut self) -> bool {
        self.data_led_level
    }

    fn set_data_led_output(&mut self, high: bool) {
        self.data_led_level = high;
    }

    fn error_led(&mut self) -> bool {
        self.error_led
    }

    fn set_error_led(&mut self, on: bool) {
        self.error_led = on;
    }
}
