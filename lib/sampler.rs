use core::convert::Infallible;

use embedded_hal::digital::v2::OutputPin;
use embedded_hal::serial::Write;

use crate::config::{SamplerConfig, Trigger};
use crate::error::{ConfigError, Error, Result};
use crate::framer::Framer;
use crate::serial::Transmitter;
use crate::Sample;

/// Analog-to-digital converter as seen by the sampler.
pub trait Converter {
    /// Issues a begin-conversion command.
    fn start(&mut self);
    /// Returns the result of a freshly completed conversion and acknowledges
    /// it, `None` when no conversion completed since the last call.
    fn take_sample(&mut self) -> Option<Sample>;
}

/// Placeholder for an unconnected tracing pin.
pub struct NoPin;

impl OutputPin for NoPin {
    type Error = Infallible;

    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }
}

/// Sample acquisition and framing controller.
///
/// Owns the converter, the transmitter and the frame counter. The frame counter is only
/// ever modified by [`Sampler::on_conversion_complete`].
///
/// Two optional pins expose timing to an oscilloscope:
/// * `trigger_pin` is high while the trigger handler runs (timer-gated) or
///   around the transmission (free-running),
/// * `conversion_pin` goes high with the trigger and low once the conversion
///   was handled (timer-gated only).
pub struct Sampler<C, W, T = NoPin, P = NoPin> {
    converter: C,
    tx: Transmitter<W>,
    framer: Framer,
    trigger: Trigger,
    trigger_pin: T,
    conversion_pin: P,
}

impl<C, W, T, P> Sampler<C, W, T, P>
where
    C: Converter,
    W: Write<u8>,
    T: OutputPin<Error = Infallible>,
    P: OutputPin<Error = Infallible>,
{
    pub fn new(
        config: &SamplerConfig,
        converter: C,
        tx: W,
        trigger_pin: T,
        conversion_pin: P,
    ) -> core::result::Result<Self, ConfigError> {
        config.validate()?;
        let mut sampler = Sampler {
            converter,
            tx: Transmitter::new(tx),
            framer: Framer::new(config.frame_len, config.terminator)?,
            trigger: config.trigger,
            trigger_pin,
            conversion_pin,
        };
        set(&mut sampler.trigger_pin, false);
        set(&mut sampler.conversion_pin, false);
        Ok(sampler)
    }

    /// Kicks off the first conversion of a free-running converter.
    ///
    /// Timer-gated conversions are only ever started by [`Sampler::on_trigger`].
    pub fn arm(&mut self) {
        if self.trigger == Trigger::FreeRunning {
            self.converter.start();
        }
    }

    /// Timer event. Starts exactly one conversion, returns whether it did.
    pub fn on_trigger(&mut self) -> bool {
        if self.trigger == Trigger::FreeRunning {
            return false;
        }
        set(&mut self.trigger_pin, true);
        set(&mut self.conversion_pin, true);
        self.converter.start();
        set(&mut self.trigger_pin, false);
        true
    }

    /// Conversion finished event.
    ///
    /// Forwards the sample if the converter holds a fresh one, then applies
    /// the framing policy. Blocks on the transmitter.
    pub fn on_conversion_complete(&mut self) -> Result<Option<Sample>, W::Error> {
        let free_running = self.trigger == Trigger::FreeRunning;
        if free_running {
            set(&mut self.trigger_pin, true);
        }

        let forwarded = self.forward();

        if free_running {
            set(&mut self.trigger_pin, false);
        } else {
            set(&mut self.conversion_pin, false);
        }
        forwarded
    }

    /// Samples sent since the last terminator.
    pub fn frame_position(&self) -> u8 {
        self.framer.position()
    }

    fn forward(&mut self) -> Result<Option<Sample>, W::Error> {
        let sample = match self.converter.take_sample() {
            Some(sample) => sample,
            None => return Ok(None),
        };
        self.tx.transmit(sample).map_err(Error::Serial)?;

        let tx = &mut self.tx;
        self.framer
            .advance(|terminator| tx.transmit(terminator))
            .map_err(Error::Serial)?;
        Ok(Some(sample))
    }
}

fn set<P: OutputPin<Error = Infallible>>(pin: &mut P, high: bool) {
    let result = if high { pin.set_high() } else { pin.set_low() };
    result.unwrap_or_else(|never| match never {})
}
