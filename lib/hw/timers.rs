use stm32g0xx_hal::rcc::Rcc;
use stm32g0xx_hal::stm32g0::stm32g070::{RCC, TIM6};

use crate::config::TimerDivider;

/// Basic timer raising one update interrupt per sample period.
pub struct SampleTimer {
    timer: TIM6,
}

impl SampleTimer {
    pub fn new(pac_timer: TIM6, divider: &TimerDivider, rcc: &mut Rcc) -> Self {
        SampleTimer::enable_clock_and_reset(rcc);
        let mut timer = SampleTimer { timer: pac_timer };
        timer.configure(divider);
        timer
    }

    pub fn start(&mut self) {
        self.unpend();
        self.timer.dier.write(|w| w.uie().set_bit());
        self.timer.cr1.modify(|_, w| w.cen().set_bit());
    }

    pub fn unpend(&mut self) {
        self.timer.sr.write(|w| w.uif().clear_bit());
    }

    fn configure(&mut self, divider: &TimerDivider) {
        self.timer.cr1.write(|w| w.arpe().set_bit());
        self.timer
            .psc
            .write(|w| unsafe { w.psc().bits(divider.psc_bits()) });
        self.timer
            .arr
            .write(|w| unsafe { w.arr().bits(divider.arr_bits()) });

        // Trigger update event to load the registers
        self.timer.cr1.modify(|_, w| w.urs().set_bit());
        self.timer.egr.write(|w| w.ug().set_bit());
        self.timer.cr1.modify(|_, w| w.urs().clear_bit());
    }

    fn enable_clock_and_reset(_: &mut Rcc) {
        let rcc = unsafe { &(*RCC::ptr()) };
        rcc.apbenr1.modify(|_, w| w.tim6en().set_bit());
        rcc.apbrstr1.modify(|_, w| w.tim6rst().set_bit());
        rcc.apbrstr1.modify(|_, w| w.tim6rst().clear_bit());
    }
}
