use embedded_hal_nb::serial::{ErrorType, Read, Write};

/// A point-to-point byte pipe.
///
/// `send` may block until the byte is accepted; `try_receive` never does and
/// reports an empty pipe as `WouldBlock`.
pub trait Transport {
    type Error: core::fmt::Debug;

    fn send(&mut self, byte: u8) -> Result<(), Self::Error>;

    fn try_receive(&mut self) -> nb::Result<u8, Self::Error>;

    fn send_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        for b in bytes {
            self.send(*b)?;
        }
        Ok(())
    }

    /// `Ok(None)` when nothing is waiting.
    fn receive(&mut self) -> Result<Option<u8>, Self::Error> {
        match self.try_receive() {
            Ok(b) => Ok(Some(b)),
            Err(nb::Error::WouldBlock) => Ok(None),
            Err(nb::Error::Other(e)) => Err(e),
        }
    }
}

/// The wireless side. Only the radio knows whether a peer is attached.
pub trait Link: Transport {
    fn is_connected(&mut self) -> bool;
}

/// Adapts any `embedded-hal-nb` UART into a [`Transport`].
#[derive(Debug)]
pub struct SerialTransport<S> {
    serial: S,
}

impl<S: Read + Write> SerialTransport<S> {
    pub fn new(serial: S) -> SerialTransport<S> {
        SerialTransport { serial }
    }

    pub fn release(self) -> S {
        self.serial
    }

    pub fn inner(&mut self) -> &mut S {
        &mut self.serial
    }
}

impl<S: Read + Write> Transport for SerialTransport<S> {
    type Error = <S as ErrorType>::Error;

    fn send(&mut self, byte: u8) -> Result<(), Self::Error> {
        nb::block!(self.serial.write(byte))
    }

    fn try_receive(&mut self) -> nb::Result<u8, Self::Error> {
        self.serial.read()
    }

    fn send_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        for b in bytes {
            nb::block!(self.serial.write(*b))?;
        }
        nb::block!(self.serial.flush())
    }
}

/// Receive side fed from a queue filled elsewhere, typically a UART
/// interrupt pushing into a `heapless::spsc::Queue`. `next` pops one byte,
/// usually `move || consumer.dequeue()`. Sends go straight to `tx`.
#[derive(Debug)]
pub struct QueuedRx<F, Tx> {
    next: F,
    tx: Tx,
}

impl<F, Tx> QueuedRx<F, Tx>
where
    F: FnMut() -> Option<u8>,
    Tx: Transport,
{
    pub fn new(next: F, tx: Tx) -> QueuedRx<F, Tx> {
        QueuedRx { next, tx }
    }

    pub fn release(self) -> (F, Tx) {
        (self.next, self.tx)
    }

    pub fn tx(&mut self) -> &mut Tx {
        &mut self.tx
    }
}

impl<F, Tx> Transport for QueuedRx<F, Tx>
where
    F: FnMut() -> Option<u8>,
    Tx: Transport,
{
    type Error = Tx::Error;

    fn send(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.tx.send(byte)
    }

    fn try_receive(&mut self) -> nb::Result<u8, Self::Error> {
        (self.next)().ok_or(nb::Error::WouldBlock)
    }

    fn send_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.tx.send_all(bytes)
    }
}

impl<F, Tx> Link for QueuedRx<F, Tx>
where
    F: FnMut() -> Option<u8>,
    Tx: Link,
{
    fn is_connected(&mut self) -> bool {
        self.tx.is_connected()
    }
}
