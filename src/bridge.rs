//! The cooperative main loop.
//!
//! Each [`Bridge::poll`] checks the connection, the two elapsed-tick flags
//! and both inbound pipes without ever waiting. While the app is attached,
//! link bytes feed the packet parser and console bytes feed the line
//! session. While it isn't, the two pipes are spliced together raw.

use crate::{
    board::Board,
    dispatch::perform,
    framer::{self, SendError, StatusReport},
    parser::Parser,
    payload::PayloadError,
    serial::{Link, Transport},
    session::{ConsoleCommand, ConsoleSession},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Status ticks to exceed between aggregated reports while connected
    pub connected_status_ticks: u8,
    /// Same, while disconnected
    pub disconnected_status_ticks: u8,
    /// Act on single-key `0`/`1`/`3`/`4` console presses
    pub console_shortcuts: bool,
    /// Pass finished console lines to the app as serial-data packets
    pub forward_console_lines: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            connected_status_ticks: 5,
            disconnected_status_ticks: 2,
            console_shortcuts: true,
            forward_console_lines: true,
        }
    }
}

/// Poll-and-clear elapsed flags of the two periodic timers.
pub trait Timers {
    /// Individual sensor reports are due.
    fn sensor_elapsed(&mut self) -> bool;

    /// One status tick has passed.
    fn status_elapsed(&mut self) -> bool;
}

#[derive(Debug)]
pub enum BridgeError<LinkError, ConsoleError> {
    Payload(PayloadError),
    Link(LinkError),
    Console(ConsoleError),
}

impl<L, C> From<SendError<L>> for BridgeError<L, C> {
    fn from(value: SendError<L>) -> Self {
        match value {
            SendError::Payload(e) => BridgeError::Payload(e),
            SendError::Transport(e) => BridgeError::Link(e),
        }
    }
}

pub type BridgeResult<L, C> =
    Result<(), BridgeError<<L as Transport>::Error, <C as Transport>::Error>>;

pub struct Bridge<L: Link, C: Transport, B: Board> {
    link: L,
    console: C,
    board: B,
    parser: Parser,
    session: ConsoleSession,
    config: BridgeConfig,
    status_ticks: u8,
    connected: bool,
}

impl<L: Link, C: Transport, B: Board> Bridge<L, C, B> {
    pub fn new(link: L, console: C, board: B, config: BridgeConfig) -> Bridge<L, C, B> {
        Bridge {
            link,
            console,
            board,
            parser: Parser::new(),
            session: ConsoleSession::new(),
            config,
            status_ticks: 0,
            connected: false,
        }
    }

    pub fn link(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn console(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn board(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    pub fn release(self) -> (L, C, B) {
        (self.link, self.console, self.board)
    }

    pub fn poll<T: Timers>(&mut self, timers: &mut T) -> BridgeResult<L, C> {
        let connected = self.link.is_connected();
        if connected != self.connected {
            log::info!("link {}", if connected { "connected" } else { "disconnected" });
            self.connected = connected;
        }

        if connected {
            if timers.sensor_elapsed() {
                self.send_sensor_reports()?;
            } else {
                self.service_link()?;
                self.service_console()?;
            }
        } else {
            self.relay()?;
        }

        if timers.status_elapsed() {
            self.status_ticks = self.status_ticks.saturating_add(1);
            let threshold = if connected {
                self.config.connected_status_ticks
            } else {
                self.config.disconnected_status_ticks
            };
            if self.status_ticks > threshold {
                StatusReport::read(&mut self.board, connected).send(&mut self.link)?;
                self.status_ticks = 0;
            }
        }
        Ok(())
    }

    pub fn send_sensor_reports(&mut self) -> BridgeResult<L, C> {
        framer::send_temperature(&mut self.link, &mut self.board)?;
        framer::send_acceleration(&mut self.link, &mut self.board)?;
        framer::send_button(&mut self.link, &mut self.board)?;
        framer::send_led_state(&mut self.link, &mut self.board)?;
        framer::send_protocol_version(&mut self.link).map_err(BridgeError::Link)
    }

    /// Run every waiting link byte through the parser.
    fn service_link(&mut self) -> BridgeResult<L, C> {
        while let Some(byte) = self.link.receive().map_err(BridgeError::Link)? {
            if let Some(command) = self.parser.feed(byte) {
                perform(command, &mut self.board, &mut self.link).map_err(BridgeError::Link)?;
            }
        }
        Ok(())
    }

    fn service_console(&mut self) -> BridgeResult<L, C> {
        while let Some(byte) = self.console.receive().map_err(BridgeError::Console)? {
            if let Some(line) = self.session.feed(byte) {
                if self.config.forward_console_lines {
                    framer::send_serial_data(&mut self.link, &line).map_err(BridgeError::Link)?;
                }
                ConsoleCommand::run_line(&line, &mut self.board, &mut self.link)
                    .map_err(BridgeError::Link)?;
            }
            if self.config.console_shortcuts {
                if let Some(command) = ConsoleCommand::from_shortcut(byte) {
                    command
                        .apply(&mut self.board, &mut self.link)
                        .map_err(BridgeError::Link)?;
                }
            }
        }
        Ok(())
    }

    /// No app attached: splice link and console together, unframed.
    fn relay(&mut self) -> BridgeResult<L, C> {
        while let Some(byte) = self.link.receive().map_err(BridgeError::Link)? {
            self.console.send(byte).map_err(BridgeError::Console)?;
        }
        while let Some(byte) = self.console.receive().map_err(BridgeError::Console)? {
            self.link.send(byte).map_err(BridgeError::Link)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::vec::Vec;

    use super::*;
    use crate::{
        board::Acceleration,
        mock::{MockBoard, MockTransport},
        parser::ParserState,
    };

    #[derive(Debug, Default)]
    struct ScriptedTimers {
        sensor: bool,
        status: bool,
    }

    impl Timers for ScriptedTimers {
        fn sensor_elapsed(&mut self) -> bool {
            core::mem::take(&mut self.sensor)
        }

        fn status_elapsed(&mut self) -> bool {
            core::mem::take(&mut self.status)
        }
    }

    type TestBridge = Bridge<MockTransport, MockTransport, MockBoard>;

    fn bridge(connected: bool) -> TestBridge {
        let link = MockTransport {
            connected,
            ..Default::default()
        };
        Bridge::new(link, MockTransport::default(), MockBoard::default(), BridgeConfig::default())
    }

    fn idle() -> ScriptedTimers {
        ScriptedTimers::default()
    }

    #[test]
    fn link_command_lights_led() {
        let mut b = bridge(true);
        b.link().rx.extend(b"{0L0201{0L0211");
        b.poll(&mut idle()).unwrap();
        assert!(b.board().data_led_lit());
        assert!(b.board().error_led);
        assert!(b.link().tx.is_empty());
        assert_eq!(b.parser().state(), ParserState::Idle);
    }

    #[test]
    fn partial_packet_waits_across_polls() {
        let mut b = bridge(true);
        b.link().rx.extend(b"{0S0");
        b.poll(&mut idle()).unwrap();
        assert_eq!(b.parser().state(), ParserState::PayloadSizeLow);
        b.link().rx.extend(b"24");
        b.poll(&mut idle()).unwrap();
        assert!(b.link().tx.is_empty());
        b.link().rx.extend(b"1");
        b.poll(&mut idle()).unwrap();
        assert_eq!(b.link().tx, b"A");
    }

    #[test]
    fn console_line_is_forwarded_and_applied() {
        let mut b = bridge(true);
        b.console().rx.extend(b"led data on\n");
        b.poll(&mut idle()).unwrap();
        assert!(b.board().data_led_lit());
        assert_eq!(b.link().tx, b"{S,6C65642064617461206F6E}\r\n");
        assert!(b.console().tx.is_empty());
    }

    #[test]
    fn console_shortcut_keys() {
        let mut b = bridge(true);
        b.console().rx.extend(b"14");
        b.poll(&mut idle()).unwrap();
        assert!(b.board().data_led_lit());
        assert!(b.board().error_led);
        b.console().rx.extend(b"03");
        b.poll(&mut idle()).unwrap();
        assert!(!b.board().data_led_lit());
        assert!(!b.board().error_led);
    }

    #[test]
    fn shortcuts_and_forwarding_can_be_disabled() {
        let config = BridgeConfig {
            console_shortcuts: false,
            forward_console_lines: false,
            ..Default::default()
        };
        let link = MockTransport {
            connected: true,
            ..Default::default()
        };
        let console = MockTransport::with_input(b"1\nHello\n");
        let mut b = Bridge::new(link, console, MockBoard::default(), config);
        b.poll(&mut idle()).unwrap();
        assert!(!b.board().data_led_lit());
        assert_eq!(b.link().tx, b"hi");
    }

    #[test]
    fn sensor_tick_sends_individual_reports_and_skips_input() {
        let mut b = bridge(true);
        b.board().temperature = 0x0102;
        b.board().acceleration = Acceleration { x: 1, y: 2, z: 3 };
        b.link().rx.extend(b"{0L0201");
        let mut timers = ScriptedTimers {
            sensor: true,
            status: false,
        };
        b.poll(&mut timers).unwrap();
        let expected: &[u8] = b"{T,0201}\r\n{A,010002000300}\r\n{P,00}\r\n{L,00}\r\n{V,302E302E31}\r\n";
        assert_eq!(b.link().take_tx(), expected);
        assert!(!b.board().data_led_lit());
        // queued input is handled on the next pass
        b.poll(&mut idle()).unwrap();
        assert!(b.board().data_led_lit());
    }

    #[test]
    fn status_report_after_threshold_ticks() {
        let mut b = bridge(true);
        for _ in 0..5 {
            b.poll(&mut ScriptedTimers { sensor: false, status: true }).unwrap();
        }
        assert!(b.link().tx.is_empty());
        b.poll(&mut ScriptedTimers { sensor: false, status: true }).unwrap();
        assert_eq!(b.link().take_tx(), b"{P:00,L:04,G:00,T:0000,A:000000000000}\r\n");
        // counter starts over
        b.poll(&mut ScriptedTimers { sensor: false, status: true }).unwrap();
        assert!(b.link().tx.is_empty());
    }

    #[test]
    fn disconnected_status_uses_shorter_period() {
        let mut b = bridge(false);
        let mut sent = Vec::new();
        for _ in 0..3 {
            b.poll(&mut ScriptedTimers { sensor: false, status: true }).unwrap();
            sent.push(!b.link().take_tx().is_empty());
        }
        assert_eq!(sent, [false, false, true]);
    }

    #[test]
    fn disconnected_relays_raw_bytes() {
        let mut b = bridge(false);
        b.link().rx.extend(b"%REBOOT%");
        b.console().rx.extend(b"$$$");
        b.poll(&mut ScriptedTimers { sensor: true, status: false }).unwrap();
        assert_eq!(b.console().tx, b"%REBOOT%");
        assert_eq!(b.link().tx, b"$$$");
        assert_eq!(b.parser().state(), ParserState::Idle);
        assert!(!b.board().data_led_lit());
    }
}
