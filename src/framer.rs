//! Outbound, app-bound packets.
//!
//! Single packets are `{` tag `,` payload `}` CR LF. The aggregated status
//! report packs several `tag:payload` sub-fields, separated by `,`, into one
//! frame. Payloads are uppercase hex ASCII.

use crate::{
    Encode,
    board::{Acceleration, Board, GpioPin},
    hex::encode_byte,
    packet::{
        END, GpioReport, LINE_END, LedReport, PROTOCOL_VERSION, PacketType, SEPARATOR, START,
        SUBFIELD_SEPARATOR,
    },
    payload::{Payload, PayloadError},
    serial::Transport,
    session::ConsoleCommand,
};

/// Raw button level while released.
const NOT_PRESSED_STATE: u8 = 1;

/// Bytes recorded by an open [`SerialEcho`], terminator slot included.
pub const ECHO_CAPACITY: usize = 32;

#[derive(Debug)]
pub enum SendError<E> {
    Payload(PayloadError),
    Transport(E),
}

impl<E> From<PayloadError> for SendError<E> {
    fn from(value: PayloadError) -> Self {
        SendError::Payload(value)
    }
}

/// `0` while released, `1` while held.
pub fn button_value<B: Board>(board: &mut B) -> u8 {
    NOT_PRESSED_STATE - board.read_button() as u8
}

/// Bit0 is set while the (active low) data LED is lit and bit1 follows the
/// error LED flag. The app expects exactly this polarity.
pub fn led_report<B: Board>(board: &mut B, connected: bool) -> LedReport {
    let data_led = !board.data_led_output();
    LedReport::new(data_led, board.error_led(), connected)
}

pub fn gpio_report<B: Board>(board: &mut B) -> GpioReport {
    GpioReport::new(board.read_gpio(GpioPin::Gpio1), board.read_gpio(GpioPin::Gpio2))
}

/// Frame an already hex-encoded payload.
pub fn send_packet<T: Transport>(
    tx: &mut T,
    kind: PacketType,
    payload: &[u8],
) -> Result<(), T::Error> {
    tx.send_all(&[START, kind.tag(), SEPARATOR])?;
    tx.send_all(payload)?;
    tx.send(END)?;
    tx.send_all(&LINE_END)
}

/// Serialize `value` and frame it as a single packet.
pub fn send_value<T, V>(tx: &mut T, kind: PacketType, value: &V) -> Result<(), SendError<T::Error>>
where
    T: Transport,
    V: Encode<Error = PayloadError>,
{
    let mut payload: Payload = Payload::new();
    value.encode(&mut payload)?;
    send_packet(tx, kind, payload.as_bytes()).map_err(SendError::Transport)
}

/// Hex-encode `data` straight onto the wire, no payload buffer involved.
pub fn send_string<T: Transport>(tx: &mut T, kind: PacketType, data: &[u8]) -> Result<(), T::Error> {
    tx.send_all(&[START, kind.tag(), SEPARATOR])?;
    for b in data {
        tx.send_all(&encode_byte(*b))?;
    }
    tx.send(END)?;
    tx.send_all(&LINE_END)
}

pub fn send_serial_data<T: Transport>(tx: &mut T, data: &[u8]) -> Result<(), T::Error> {
    send_string(tx, PacketType::Serial, data)
}

pub fn send_protocol_version<T: Transport>(tx: &mut T) -> Result<(), T::Error> {
    send_string(tx, PacketType::ProtocolVersion, PROTOCOL_VERSION.as_bytes())
}

pub fn send_temperature<T: Transport, B: Board>(
    tx: &mut T,
    board: &mut B,
) -> Result<(), SendError<T::Error>> {
    send_value(tx, PacketType::Temperature, &board.read_temperature())
}

pub fn send_acceleration<T: Transport, B: Board>(
    tx: &mut T,
    board: &mut B,
) -> Result<(), SendError<T::Error>> {
    send_value(tx, PacketType::Accel, &board.read_acceleration())
}

pub fn send_button<T: Transport, B: Board>(
    tx: &mut T,
    board: &mut B,
) -> Result<(), SendError<T::Error>> {
    send_value(tx, PacketType::Button, &button_value(board))
}

/// Standalone LED packet. Carries no connection bit.
pub fn send_led_state<T: Transport, B: Board>(
    tx: &mut T,
    board: &mut B,
) -> Result<(), SendError<T::Error>> {
    send_value(tx, PacketType::Led, &led_report(board, false))
}

pub fn send_gpio_state<T: Transport, B: Board>(
    tx: &mut T,
    board: &mut B,
) -> Result<(), SendError<T::Error>> {
    send_value(tx, PacketType::Gpio, &gpio_report(board))
}

/// Snapshot behind one aggregated packet.
#[derive(Debug, Clone, Copy)]
pub struct StatusReport {
    pub button: u8,
    pub led: LedReport,
    pub gpio: GpioReport,
    pub temperature: i16,
    pub acceleration: Acceleration,
}

impl StatusReport {
    pub fn read<B: Board>(board: &mut B, connected: bool) -> StatusReport {
        StatusReport {
            button: button_value(board),
            led: led_report(board, connected),
            gpio: gpio_report(board),
            temperature: board.read_temperature(),
            acceleration: board.read_acceleration(),
        }
    }

    /// `{P:bb,L:bb,G:bb,T:wwww,A:xxxxyyyyzzzz}` CR LF
    pub fn send<T: Transport>(&self, tx: &mut T) -> Result<(), SendError<T::Error>> {
        let mut button = Payload::<2>::new();
        let mut led = Payload::<2>::new();
        let mut gpio = Payload::<2>::new();
        let mut temperature = Payload::<4>::new();
        let mut acceleration: Payload = Payload::new();
        self.button.encode(&mut button)?;
        self.led.encode(&mut led)?;
        self.gpio.encode(&mut gpio)?;
        self.temperature.encode(&mut temperature)?;
        self.acceleration.encode(&mut acceleration)?;

        let fields = [
            (PacketType::Button, button.as_bytes()),
            (PacketType::Led, led.as_bytes()),
            (PacketType::Gpio, gpio.as_bytes()),
            (PacketType::Temperature, temperature.as_bytes()),
            (PacketType::Accel, acceleration.as_bytes()),
        ];
        send_fields(tx, &fields).map_err(SendError::Transport)
    }
}

fn send_fields<T: Transport>(tx: &mut T, fields: &[(PacketType, &[u8])]) -> Result<(), T::Error> {
    tx.send(START)?;
    for (i, (kind, payload)) in fields.iter().enumerate() {
        if i > 0 {
            tx.send(SEPARATOR)?;
        }
        tx.send_all(&[kind.tag(), SUBFIELD_SEPARATOR])?;
        tx.send_all(payload)?;
    }
    tx.send(END)?;
    tx.send_all(&LINE_END)
}

/// Streams raw characters inside a `{S:` ... `}` frame.
///
/// The first `ECHO_CAPACITY - 1` characters are also recorded; closing the
/// frame runs them through the console vocabulary.
#[derive(Debug, Default)]
pub struct SerialEcho {
    text: heapless::Vec<u8, ECHO_CAPACITY>,
}

impl SerialEcho {
    pub fn new() -> SerialEcho {
        SerialEcho {
            text: heapless::Vec::new(),
        }
    }

    pub fn open<T: Transport>(&mut self, tx: &mut T) -> Result<(), T::Error> {
        self.text.clear();
        tx.send_all(&[START, PacketType::Serial.tag(), SUBFIELD_SEPARATOR])
    }

    pub fn send_character<T: Transport>(&mut self, tx: &mut T, byte: u8) -> Result<(), T::Error> {
        if self.text.len() + 1 < ECHO_CAPACITY {
            let _ = self.text.push(byte);
        }
        tx.send(byte)
    }

    pub fn close<T: Transport, B: Board>(
        &mut self,
        tx: &mut T,
        board: &mut B,
    ) -> Result<Option<ConsoleCommand>, T::Error> {
        tx.send(END)?;
        tx.send_all(&LINE_END)?;
        let text = core::mem::take(&mut self.text);
        ConsoleCommand::run_line(&text, board, tx)
    }
}
