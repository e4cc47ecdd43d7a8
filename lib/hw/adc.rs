use stm32g0xx_hal::analog::adc::Adc as HalAdc;
use stm32g0xx_hal::hal::adc::Channel as AdcChannel;
use stm32g0xx_hal::hal::blocking::delay::DelayUs;
use stm32g0xx_hal::rcc::Rcc;
use stm32g0xx_hal::stm32g0::stm32g070::{ADC, RCC};

use crate::config::{SamplerConfig, Trigger};
use crate::error::ConfigError;
use crate::sampler::Converter;
use crate::Sample;

/// Single channel ADC, 12-bit left aligned so the data register's upper byte
/// is the sample.
///
/// Free-running configuration converts continuously, timer-gated one converts
/// once per `start`. Either way end of conversion raises the ADC interrupt.
pub struct Adc<I> {
    adc: ADC,
    _input: I,
}

impl<I> Adc<I>
where
    I: AdcChannel<HalAdc, ID = u8>,
{
    pub fn new<D: DelayUs<u8>>(
        pac_adc: ADC,
        input: I,
        config: &SamplerConfig,
        rcc: &mut Rcc,
        delay: &mut D,
    ) -> Result<Self, ConfigError> {
        config.check_channel(I::channel())?;
        Adc::<I>::enable_clock_and_reset(rcc);
        let mut adc = Adc {
            adc: pac_adc,
            _input: input,
        };
        adc.disable();
        adc.select_clock();
        adc.enable_vreg(delay);
        adc.calibrate();
        adc.enable();
        adc.configure(config);
        Ok(adc)
    }

    pub fn listen(&mut self) {
        self.adc.isr.write(|w| {
            w.eoc().set_bit();
            w.ovr().set_bit()
        });
        self.adc.ier.write(|w| w.eocie().set_bit());
    }

    fn configure(&mut self, config: &SamplerConfig) {
        let continuous = config.trigger == Trigger::FreeRunning;
        self.adc.cfgr1.write(|w| unsafe {
            // Software trigger only
            w.exten().bits(0b00);
            // Left alignment, upper byte of DR holds the sample
            w.align().set_bit();
            // 12-bit resolution
            w.res().bits(0b00);
            // Keep the latest conversion on overrun
            w.ovrmod().set_bit();
            w.cont().bit(continuous)
        });
        // 160.5 cycles, ~92.5 kSa/s at 16 MHz which the link keeps up with
        self.adc.smpr.write(|w| unsafe { w.smp1().bits(0b111) });
        self.adc
            .chselr()
            .write(|w| unsafe { w.chsel().bits(1 << I::channel()) });
    }

    fn enable_clock_and_reset(_: &mut Rcc) {
        let rcc = unsafe { &(*RCC::ptr()) };
        rcc.apbenr2.modify(|_, w| w.adcen().set_bit());
        rcc.apbrstr2.modify(|_, w| w.adcrst().set_bit());
        rcc.apbrstr2.modify(|_, w| w.adcrst().clear_bit());
    }

    fn select_clock(&mut self) {
        // PCLK / 4 = 16 MHz, synchronous to the timer clock
        self.adc.cfgr2.write(|w| unsafe { w.ckmode().bits(0b10) });
    }

    fn enable_vreg<D: DelayUs<u8>>(&mut self, delay: &mut D) {
        self.adc.cr.modify(|_, w| w.advregen().set_bit());
        // Max starting time declared by stm32g070 datasheet is 20 us
        delay.delay_us(20);
    }

    fn enable(&mut self) {
        self.adc.isr.write(|w| w.adrdy().set_bit());
        self.adc.cr.modify(|_, w| w.aden().set_bit());
        while self.adc.isr.read().adrdy().bit_is_clear() {}
    }

    fn disable(&mut self) {
        let cr = self.adc.cr.read();
        if cr.aden().bit_is_clear() {
            return;
        }
        if cr.adstart().bit_is_set() {
            self.adc.cr.modify(|_, w| w.adstp().set_bit());
        }
        self.adc.cr.modify(|_, w| w.addis().set_bit());
        while self.adc.cr.read().aden().bit_is_set() {}
        self.adc.isr.write(|w| w.adrdy().set_bit());
    }

    fn calibrate(&mut self) {
        self.adc.cr.modify(|_, w| w.adcal().set_bit());
        while self.adc.isr.read().eocal().bit_is_clear() {}
        self.adc.isr.write(|w| w.eocal().set_bit());
    }
}

impl<I> Converter for Adc<I> {
    fn start(&mut self) {
        self.adc.cr.modify(|_, w| w.adstart().set_bit());
    }

    fn take_sample(&mut self) -> Option<Sample> {
        let isr = self.adc.isr.read();
        if isr.ovr().bit_is_set() {
            self.adc.isr.write(|w| w.ovr().set_bit());
        }
        if isr.eoc().bit_is_clear() {
            return None;
        }
        // Reading DR clears EOC
        Some((self.adc.dr.read().bits() >> 8) as u8)
    }
}
