use stm32g0xx_hal::gpio::gpioa::{PA0, PA2, PA3};
use stm32g0xx_hal::gpio::gpiob::{PB4, PB5};
use stm32g0xx_hal::gpio::{Analog, DefaultMode, Output, PushPull};
use stm32g0xx_hal::rcc::{Config, PllConfig, Rcc, RccExt};
use stm32g0xx_hal::serial::{FullConfig, InvalidConfig, SerialExt, Tx};
use stm32g0xx_hal::stm32g0::stm32g070::{RCC, USART2};
use stm32g0xx_hal::time::U32Ext;

use crate::config::BAUD_RATE;
use crate::hw::adc::Adc as HwAdc;
use crate::sampler::Sampler;

pub fn init_clock(pac_rcc: RCC) -> Rcc {
    // ((16 MHz / 4) * 32) / 2 = 64 MHz
    let pll_config = PllConfig::with_hsi(4, 32, 2);
    pac_rcc.freeze(Config::pll().pll_cfg(pll_config))
}

/// Input clock of TIM6 after the APB prescaler.
pub fn timer_clock(rcc: &Rcc) -> u32 {
    rcc.clocks.apb_tim_clk.0
}

// PA0 - ADC sample input channel
type InputChannel = PA0<Analog>;
// PA2 - USART2_TX, sample stream
type SerialTxPin = PA2<DefaultMode>;
// PA3 - USART2_RX, unused but claimed by the peripheral
type SerialRxPin = PA3<DefaultMode>;

// PB4 - Trigger handler trace
pub type TriggerPin = PB4<Output<PushPull>>;
// PB5 - Conversion trace
pub type ConversionPin = PB5<Output<PushPull>>;

pub type Adc = HwAdc<InputChannel>;
pub type SerialTx = Tx<USART2, FullConfig>;
pub type HwSampler = Sampler<Adc, SerialTx, TriggerPin, ConversionPin>;

pub fn init_serial(
    pac_usart: USART2,
    tx: SerialTxPin,
    rx: SerialRxPin,
    rcc: &mut Rcc,
) -> Result<SerialTx, InvalidConfig> {
    // 8 data bits, no parity, 1 stop bit
    let config = FullConfig::default().baudrate(BAUD_RATE.bps());
    let (tx, _rx) = pac_usart.usart(tx, rx, config, rcc)?.split();
    Ok(tx)
}
