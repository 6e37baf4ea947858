use std::{collections::VecDeque, convert::Infallible};

use embedded_hal_nb::serial::{ErrorType, Read, Write};
use lightblue_bridge::{
    Acceleration, Board, Bridge, BridgeConfig, BridgeError, GpioPin, Link, SerialTransport,
    Timers, Transport,
};

/// Walks the bridge through a short scripted session against in-memory
/// peripherals and prints what goes out over the link.
fn main() -> Result<(), BridgeError<Infallible, Infallible>> {
    let link = BleLink {
        uart: SerialTransport::new(SimUart::new()),
        connected: false,
    };
    let console = SerialTransport::new(SimUart::new());
    let mut bridge = Bridge::new(link, console, SimBoard::default(), BridgeConfig::default());
    let mut timers = SimTimers::default();

    // Nothing attached yet: console bytes go to the module untouched
    bridge.console().inner().rx.extend(b"$$$");
    bridge.poll(&mut timers)?;
    show("raw relay", &mut bridge);

    bridge.link().connected = true;
    bridge.link().uart.inner().rx.extend(b"{0L0201{1S06486921");
    bridge.poll(&mut timers)?;
    show("app commands", &mut bridge);

    bridge.console().inner().rx.extend(b"Hello\r");
    bridge.poll(&mut timers)?;
    show("console line", &mut bridge);

    timers.sensor = true;
    bridge.poll(&mut timers)?;
    show("sensor reports", &mut bridge);

    for _ in 0..=BridgeConfig::default().connected_status_ticks {
        timers.status = true;
        bridge.poll(&mut timers)?;
    }
    show("status report", &mut bridge);

    Ok(())
}

type SimBridge = Bridge<BleLink, SerialTransport<SimUart>, SimBoard>;

fn show(step: &str, bridge: &mut SimBridge) {
    let sent: Vec<u8> = bridge.link().uart.inner().tx.drain(..).collect();
    println!("-- {step}");
    print!("{}", String::from_utf8_lossy(&sent));
    println!();
}

#[derive(Debug)]
struct SimUart {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
}

impl SimUart {
    fn new() -> SimUart {
        SimUart {
            rx: VecDeque::new(),
            tx: Vec::new(),
        }
    }
}

impl ErrorType for SimUart {
    type Error = Infallible;
}

impl Read for SimUart {
    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        self.rx.pop_front().ok_or(nb::Error::WouldBlock)
    }
}

impl Write for SimUart {
    fn write(&mut self, c: u8) -> nb::Result<(), Self::Error> {
        self.tx.push(c);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        Ok(())
    }
}

#[derive(Debug)]
struct BleLink {
    uart: SerialTransport<SimUart>,
    connected: bool,
}

impl Transport for BleLink {
    type Error = Infallible;

    fn send(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.uart.send(byte)
    }

    fn try_receive(&mut self) -> nb::Result<u8, Self::Error> {
        self.uart.try_receive()
    }
}

impl Link for BleLink {
    fn is_connected(&mut self) -> bool {
        self.connected
    }
}

#[derive(Debug)]
struct SimBoard {
    data_led_level: bool,
    error_led: bool,
    samples: u16,
}

impl Default for SimBoard {
    fn default() -> Self {
        SimBoard {
            data_led_level: true,
            error_led: false,
            samples: 0,
        }
    }
}

impl Board for SimBoard {
    fn read_button(&mut self) -> bool {
        true
    }

    fn read_gpio(&mut self, pin: GpioPin) -> bool {
        matches!(pin, GpioPin::Gpio1)
    }

    fn read_temperature(&mut self) -> i16 {
        // 23.5 C in 1/16 degree steps
        376
    }

    fn read_acceleration(&mut self) -> Acceleration {
        self.samples = self.samples.wrapping_add(1);
        let wobble = (self.samples % 8) as i16;
        Acceleration {
            x: wobble,
            y: -wobble,
            z: 0x0400,
        }
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

#[derive(Debug, Default)]
struct SimTimers {
    sensor: bool,
    status: bool,
}

impl Timers for SimTimers {
    fn sensor_elapsed(&mut self) -> bool {
        std::mem::take(&mut self.sensor)
    }

    fn status_elapsed(&mut self) -> bool {
        std::mem::take(&mut self.status)
    }
}
