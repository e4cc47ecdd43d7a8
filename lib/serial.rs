use embedded_hal::serial::Write;
use nb::block;

/// Blocking byte transmitter.
///
/// Holds at most one byte in flight. `transmit` spins until the peripheral
/// accepts the byte, with no timeout: a transmitter that never becomes ready
/// stalls the caller, interrupt context included, for good.
pub struct Transmitter<W> {
    tx: W,
}

impl<W> Transmitter<W>
where
    W: Write<u8>,
{
    pub fn new(tx: W) -> Self {
        Transmitter { tx }
    }

    #[inline]
    pub fn transmit(&mut self, byte: u8) -> Result<(), W::Error> {
        block!(self.tx.write(byte))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowTx {
        busy_polls: usize,
        polls: usize,
        sent: Vec<u8>,
    }

    impl Write<u8> for SlowTx {
        type Error = ();

        fn write(&mut self, word: u8) -> nb::Result<(), ()> {
            self.polls += 1;
            if self.polls <= self.busy_polls {
                return Err(nb::Error::WouldBlock);
            }
            self.polls = 0;
            self.sent.push(word);
            Ok(())
        }

        fn flush(&mut self) -> nb::Result<(), ()> {
            Ok(())
        }
    }

    #[test]
    fn waits_until_ready() {
        let mut tx = Transmitter::new(SlowTx {
            busy_polls: 3,
            polls: 0,
            sent: Vec::new(),
        });
        tx.transmit(0x42).unwrap();
        tx.transmit(b'\n').unwrap();
        assert_eq!(tx.tx.sent, [0x42, b'\n']);
    }

    #[test]
    fn hardware_error_is_returned() {
        struct BrokenTx;

        impl Write<u8> for BrokenTx {
            type Error = &'static str;

            fn write(&mut self, _: u8) -> nb::Result<(), Self::Error> {
                Err(nb::Error::Other("framing"))
            }

            fn flush(&mut self) -> nb::Result<(), Self::Error> {
                Ok(())
            }
        }

        assert_eq!(Transmitter::new(BrokenTx).transmit(0), Err("framing"));
    }
}
