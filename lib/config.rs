//! Compile-time configuration of the sampler.
//!
//! Everything the controller needs is gathered into a [`SamplerConfig`] that
//! is built once at startup and handed to [`crate::sampler::Sampler::new`].

use crate::error::ConfigError;

/// Target sample rate of the timer-gated controller.
pub const SAMPLE_RATE_HZ: u32 = 44_100;
/// Samples per frame, the terminator follows the last one.
pub const FRAME_LEN: u8 = 128;
/// Frame terminator. Sample values are not escaped, a sample equal to it is
/// indistinguishable from a real terminator for a receiver parsing by content.
pub const TERMINATOR: u8 = b'\n';
/// Serial link rate, 8N1.
pub const BAUD_RATE: u32 = 1_000_000;
/// Analog input channel (PA0).
pub const ADC_CHANNEL: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Trigger {
    /// Every completed conversion starts the next one.
    FreeRunning,
    /// A periodic timer starts each conversion.
    Timer { rate_hz: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct SamplerConfig {
    pub trigger: Trigger,
    pub channel: u8,
    pub frame_len: u8,
    pub terminator: u8,
}

impl SamplerConfig {
    pub const fn free_running() -> Self {
        SamplerConfig {
            trigger: Trigger::FreeRunning,
            channel: ADC_CHANNEL,
            frame_len: FRAME_LEN,
            terminator: TERMINATOR,
        }
    }

    pub const fn timer_gated(rate_hz: u32) -> Self {
        SamplerConfig {
            trigger: Trigger::Timer { rate_hz },
            channel: ADC_CHANNEL,
            frame_len: FRAME_LEN,
            terminator: TERMINATOR,
        }
    }

    pub const fn with_frame(self, frame_len: u8, terminator: u8) -> Self {
        SamplerConfig {
            frame_len,
            terminator,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_len == 0 {
            return Err(ConfigError::FrameLength);
        }
        if let Trigger::Timer { rate_hz: 0 } = self.trigger {
            return Err(ConfigError::SampleRate);
        }
        Ok(())
    }

    /// Checks the configured channel against the one the input pin is wired to.
    pub fn check_channel(&self, pin_channel: u8) -> Result<(), ConfigError> {
        if self.channel != pin_channel {
            return Err(ConfigError::Channel);
        }
        Ok(())
    }
}

/// Prescaler and reload pair of a 16-bit timer producing one update event per
/// sample.
///
/// The achieved rate is `clock / (prescaler * reload)`, which is generally not
/// the requested one. The deviation is reported by [`TimerDivider::error_ppm`]
/// and left uncompensated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerDivider {
    clock_hz: u32,
    rate_hz: u32,
    prescaler: u32,
    reload: u32,
}

impl TimerDivider {
    const MAX_COUNT: u64 = 1 << 16;

    pub fn new(clock_hz: u32, rate_hz: u32) -> Result<Self, ConfigError> {
        // ARR = 0 stops the counter, so at least two ticks per period
        if rate_hz == 0 || rate_hz > clock_hz / 2 {
            return Err(ConfigError::SampleRate);
        }
        let clock = clock_hz as u64;
        let rate = rate_hz as u64;

        // Smallest prescaler keeps the finest reload resolution, the rounded
        // reload then always fits in 16 bits
        let span = rate * Self::MAX_COUNT;
        let prescaler = ((clock + span - 1) / span).max(1);
        let step = prescaler * rate;
        let reload = (clock + step / 2) / step;
        Ok(TimerDivider {
            clock_hz,
            rate_hz,
            prescaler: prescaler as u32,
            reload: reload as u32,
        })
    }

    pub fn prescaler(&self) -> u32 {
        self.prescaler
    }

    pub fn reload(&self) -> u32 {
        self.reload
    }

    /// Value for the PSC register.
    pub fn psc_bits(&self) -> u16 {
        (self.prescaler - 1) as u16
    }

    /// Value for the ARR register.
    pub fn arr_bits(&self) -> u16 {
        (self.reload - 1) as u16
    }

    pub fn actual_millihertz(&self) -> u64 {
        self.clock_hz as u64 * 1000 / self.period_ticks()
    }

    /// Deviation of the achieved rate from the requested one, in parts per million.
    pub fn error_ppm(&self) -> i32 {
        let ratio = self.clock_hz as u64 * 1_000_000 / (self.period_ticks() * self.rate_hz as u64);
        (ratio as i64 - 1_000_000) as i32
    }

    fn period_ticks(&self) -> u64 {
        self.prescaler as u64 * self.reload as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_rate_from_64mhz() {
        let divider = TimerDivider::new(64_000_000, SAMPLE_RATE_HZ).unwrap();
        assert_eq!(divider.prescaler(), 1);
        assert_eq!(divider.reload(), 1451);
        assert_eq!(divider.psc_bits(), 0);
        assert_eq!(divider.arr_bits(), 1450);
        assert_eq!(divider.actual_millihertz(), 44_107_512);
        assert_eq!(divider.error_ppm(), 170);
    }

    #[test]
    fn slow_rate_needs_prescaler() {
        let divider = TimerDivider::new(64_000_000, 1).unwrap();
        assert_eq!(divider.prescaler(), 977);
        assert_eq!(divider.reload(), 65_507);
        assert!(divider.error_ppm().abs() < 20);
    }

    #[test]
    fn slower_than_requested_is_negative() {
        let divider = TimerDivider::new(16_000_000, SAMPLE_RATE_HZ).unwrap();
        assert_eq!(divider.reload(), 363);
        assert_eq!(divider.error_ppm(), -519);
    }

    #[test]
    fn unreachable_rates() {
        assert_eq!(TimerDivider::new(64_000_000, 0), Err(ConfigError::SampleRate));
        assert_eq!(
            TimerDivider::new(64_000_000, 32_000_001),
            Err(ConfigError::SampleRate)
        );
        assert!(TimerDivider::new(64_000_000, 32_000_000).is_ok());
    }

    #[test]
    fn every_rate_fits_sixteen_bits() {
        for &clock in &[16_000_000, 64_000_000, u32::MAX] {
            for &rate in &[1, 7, 977, 44_100, 65_537, clock / 3, clock / 2] {
                let divider = TimerDivider::new(clock, rate).unwrap();
                assert!(divider.prescaler() >= 1 && divider.prescaler() <= 1 << 16);
                assert!(divider.reload() >= 2 && divider.reload() <= 1 << 16);
            }
        }
    }

    #[test]
    fn channel_must_match_pin() {
        let config = SamplerConfig::free_running();
        assert_eq!(config.check_channel(ADC_CHANNEL), Ok(()));
        assert_eq!(config.check_channel(ADC_CHANNEL + 1), Err(ConfigError::Channel));
    }

    #[test]
    fn validate() {
        assert_eq!(SamplerConfig::free_running().validate(), Ok(()));
        assert_eq!(SamplerConfig::timer_gated(SAMPLE_RATE_HZ).validate(), Ok(()));
        assert_eq!(
            SamplerConfig::timer_gated(0).validate(),
            Err(ConfigError::SampleRate)
        );
        assert_eq!(
            SamplerConfig::free_running().with_frame(0, TERMINATOR).validate(),
            Err(ConfigError::FrameLength)
        );
    }
}
