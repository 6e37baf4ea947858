use crate::{board::Board, serial::Transport};

/// Console line buffer size, terminator slot included.
pub const LINE_CAPACITY: usize = 80;

pub type Line<const N: usize = LINE_CAPACITY> = heapless::Vec<u8, N>;

/// The fixed console vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Hello,
    DataLedOff,
    DataLedOn,
    ErrorLedOff,
    ErrorLedOn,
}

impl ConsoleCommand {
    /// Exact match only. Text after an embedded NUL is ignored.
    pub fn parse(line: &[u8]) -> Option<ConsoleCommand> {
        let text = match line.iter().position(|b| *b == 0) {
            Some(end) => &line[..end],
            None => line,
        };
        match text {
            b"Hello" => Some(ConsoleCommand::Hello),
            b"led data off" => Some(ConsoleCommand::DataLedOff),
            b"led data on" => Some(ConsoleCommand::DataLedOn),
            b"led err off" => Some(ConsoleCommand::ErrorLedOff),
            b"led err on" => Some(ConsoleCommand::ErrorLedOn),
            _ => None,
        }
    }

    /// `Hello` answers "hi" over `link`; the rest only touch LEDs.
    pub fn apply<B: Board, T: Transport>(
        self,
        board: &mut B,
        link: &mut T,
    ) -> Result<(), T::Error> {
        log::debug!("console command {:?}", self);
        match self {
            ConsoleCommand::Hello => link.send_all(b"hi")?,
            ConsoleCommand::DataLedOff => board.set_data_led(false),
            ConsoleCommand::DataLedOn => board.set_data_led(true),
            ConsoleCommand::ErrorLedOff => board.set_error_led(false),
            ConsoleCommand::ErrorLedOn => board.set_error_led(true),
        }
        Ok(())
    }

    /// Act on a finished console line. Unmatched lines are dropped.
    pub fn run_line<B: Board, T: Transport>(
        line: &[u8],
        board: &mut B,
        link: &mut T,
    ) -> Result<Option<ConsoleCommand>, T::Error> {
        let command = ConsoleCommand::parse(line);
        match command {
            Some(command) => command.apply(board, link)?,
            None => log::trace!("unmatched console line ({} bytes)", line.len()),
        }
        Ok(command)
    }

    /// Single keypress LED controls: `0`/`1` data LED, `3`/`4` error LED.
    pub fn from_shortcut(byte: u8) -> Option<ConsoleCommand> {
        match byte {
            b'0' => Some(ConsoleCommand::DataLedOff),
            b'1' => Some(ConsoleCommand::DataLedOn),
            b'3' => Some(ConsoleCommand::ErrorLedOff),
            b'4' => Some(ConsoleCommand::ErrorLedOn),
            _ => None,
        }
    }
}

/// Collects console bytes into lines.
///
/// A line ends on CR, LF, or when the byte that would land in the last slot
/// arrives. That byte takes the terminator's place and is lost, so a line
/// holds at most `N - 1` bytes.
#[derive(Debug, Default)]
pub struct ConsoleSession<const N: usize = LINE_CAPACITY> {
    line: Line<N>,
}

impl<const N: usize> ConsoleSession<N> {
    pub fn new() -> ConsoleSession<N> {
        ConsoleSession {
            line: heapless::Vec::new(),
        }
    }

    /// Returns the finished line, leaving the buffer empty for the next one.
    pub fn feed(&mut self, byte: u8) -> Option<Line<N>> {
        if byte == b'\r' || byte == b'\n' {
            return Some(core::mem::take(&mut self.line));
        }
        if self.line.len() + 1 >= N {
            log::warn!("console line overflow, forcing end of line");
            return Some(core::mem::take(&mut self.line));
        }
        // room was checked above
        let _ = self.line.push(byte);
        None
    }

    /// Feed a byte and act on any completed line.
    pub fn process<B: Board, T: Transport>(
        &mut self,
        byte: u8,
        board: &mut B,
        link: &mut T,
    ) -> Result<Option<Line<N>>, T::Error> {
        let Some(line) = self.feed(byte) else {
            return Ok(None);
        };
        ConsoleCommand::run_line(&line, board, link)?;
        Ok(Some(line))
    }

    pub fn pending(&self) -> &[u8] {
        &self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockBoard, MockTransport};

    fn run(session: &mut ConsoleSession, input: &[u8], board: &mut MockBoard, link: &mut MockTransport) {
        for b in input {
            session.process(*b, board, link).unwrap();
        }
    }

    #[test]
    fn led_data_on_is_silent() {
        let mut session: ConsoleSession = ConsoleSession::new();
        let mut board = MockBoard::default();
        let mut link = MockTransport::default();
        run(&mut session, b"led data on\n", &mut board, &mut link);
        assert!(board.data_led_lit());
        assert!(link.tx.is_empty());
        assert!(session.pending().is_empty());
    }

    #[test]
    fn hello_answers_hi() {
        let mut session: ConsoleSession = ConsoleSession::new();
        let mut board = MockBoard::default();
        let mut link = MockTransport::default();
        run(&mut session, b"Hello\r", &mut board, &mut link);
        assert_eq!(link.tx, b"hi");
    }

    #[test]
    fn every_command_in_vocabulary() {
        let mut session: ConsoleSession = ConsoleSession::new();
        let mut board = MockBoard::default();
        let mut link = MockTransport::default();
        run(&mut session, b"led err on\r\n", &mut board, &mut link);
        assert!(board.error_led);
        run(&mut session, b"led data on\n", &mut board, &mut link);
        assert!(board.data_led_lit());
        run(&mut session, b"led err off\n", &mut board, &mut link);
        assert!(!board.error_led);
        run(&mut session, b"led data off\n", &mut board, &mut link);
        assert!(!board.data_led_lit());
        assert!(link.tx.is_empty());
    }

    #[test]
    fn unmatched_line_has_no_effect() {
        let mut session: ConsoleSession = ConsoleSession::new();
        let mut board = MockBoard::default();
        let mut link = MockTransport::default();
        run(&mut session, b"LED DATA ON\nhello\nled data on \n", &mut board, &mut link);
        assert!(!board.data_led_lit());
        assert!(link.tx.is_empty());
    }

    #[test]
    fn text_after_nul_is_ignored() {
        assert_eq!(ConsoleCommand::parse(b"Hello\0world"), Some(ConsoleCommand::Hello));
        assert_eq!(ConsoleCommand::parse(b""), None);
    }

    #[test]
    fn run_line_reports_what_it_did() {
        let mut board = MockBoard::default();
        let mut link = MockTransport::default();
        let done = ConsoleCommand::run_line(b"led err on", &mut board, &mut link).unwrap();
        assert_eq!(done, Some(ConsoleCommand::ErrorLedOn));
        assert!(board.error_led);
        let done = ConsoleCommand::run_line(b"led err", &mut board, &mut link).unwrap();
        assert_eq!(done, None);
        assert!(board.error_led);
        assert!(link.tx.is_empty());
    }

    #[test]
    fn full_buffer_forces_line_end() {
        let mut session = ConsoleSession::<4>::new();
        assert_eq!(session.feed(b'a'), None);
        assert_eq!(session.feed(b'b'), None);
        assert_eq!(session.feed(b'c'), None);
        let line = session.feed(b'd').unwrap();
        assert_eq!(line.as_slice(), b"abc");
        assert!(session.pending().is_empty());
        assert_eq!(session.feed(b'e'), None);
        assert_eq!(session.pending(), b"e");
    }

    #[test]
    fn default_capacity_keeps_79_bytes() {
        let mut session: ConsoleSession = ConsoleSession::new();
        let mut last = None;
        for _ in 0..LINE_CAPACITY {
            last = session.feed(b'x');
        }
        assert_eq!(last.map(|l| l.len()), Some(LINE_CAPACITY - 1));
    }

    #[test]
    fn shortcuts() {
        assert_eq!(ConsoleCommand::from_shortcut(b'1'), Some(ConsoleCommand::DataLedOn));
        assert_eq!(ConsoleCommand::from_shortcut(b'4'), Some(ConsoleCommand::ErrorLedOn));
        assert_eq!(ConsoleCommand::from_shortcut(b'2'), None);
    }
}
