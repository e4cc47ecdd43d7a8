use crate::error::ConfigError;

/// Counts samples since the last terminator and decides when the next one is due.
///
/// Framing is strictly by count: `frame_len` samples, then the terminator.
/// The position is always within `[0, frame_len)` between calls.
pub struct Framer {
    count: u8,
    frame_len: u8,
    terminator: u8,
}

impl Framer {
    pub fn new(frame_len: u8, terminator: u8) -> Result<Self, ConfigError> {
        if frame_len == 0 {
            return Err(ConfigError::FrameLength);
        }
        Ok(Framer {
            count: 0,
            frame_len,
            terminator,
        })
    }

    /// Accounts for one transmitted sample.
    ///
    /// When the frame is full `emit` is called with the terminator and the
    /// count starts over, also when `emit` fails. Returns whether the frame
    /// was closed.
    pub fn advance<E, F>(&mut self, emit: F) -> Result<bool, E>
    where
        F: FnOnce(u8) -> Result<(), E>,
    {
        self.count += 1;
        if self.count < self.frame_len {
            return Ok(false);
        }
        let emitted = emit(self.terminator);
        self.count = 0;
        emitted.map(|_| true)
    }

    pub fn position(&self) -> u8 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit_into(out: &mut Vec<u8>) -> impl FnMut(u8) -> Result<(), ()> + '_ {
        move |byte| {
            out.push(byte);
            Ok(())
        }
    }

    #[test]
    fn zero_length_rejected() {
        assert!(matches!(Framer::new(0, b'\n'), Err(ConfigError::FrameLength)));
    }

    #[test]
    fn terminator_after_full_frame() {
        let mut framer = Framer::new(4, 0xAA).unwrap();
        let mut out = Vec::new();
        for _ in 0..3 {
            assert_eq!(framer.advance(emit_into(&mut out)), Ok(false));
        }
        assert!(out.is_empty());
        assert_eq!(framer.position(), 3);

        assert_eq!(framer.advance(emit_into(&mut out)), Ok(true));
        assert_eq!(out, [0xAA]);
        assert_eq!(framer.position(), 0);
    }

    #[test]
    fn single_sample_frames() {
        let mut framer = Framer::new(1, b'\n').unwrap();
        let mut out = Vec::new();
        for _ in 0..5 {
            assert_eq!(framer.advance(emit_into(&mut out)), Ok(true));
            assert_eq!(framer.position(), 0);
        }
        assert_eq!(out, [b'\n'; 5]);
    }

    #[test]
    fn longest_frame_does_not_overflow() {
        let mut framer = Framer::new(u8::MAX, b'\n').unwrap();
        let mut closed = 0;
        for _ in 0..(u8::MAX as usize * 3) {
            if framer.advance(|_| Ok::<(), ()>(())).unwrap() {
                closed += 1;
            }
            assert!(framer.position() < u8::MAX);
        }
        assert_eq!(closed, 3);
    }

    #[test]
    fn failed_terminator_still_resets() {
        let mut framer = Framer::new(2, b'\n').unwrap();
        framer.advance(|_| Ok::<(), ()>(())).unwrap();
        assert_eq!(framer.advance(|_| Err("line fault")), Err("line fault"));
        assert_eq!(framer.position(), 0);
    }
}
