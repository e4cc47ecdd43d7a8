#![cfg_attr(target_os = "none", no_main)]
#![cfg_attr(target_os = "none", no_std)]

#[cfg(target_os = "none")]
use lib::config::{SamplerConfig, FRAME_LEN, TERMINATOR};
#[cfg(all(target_os = "none", not(feature = "free-running")))]
use lib::config::{TimerDivider, SAMPLE_RATE_HZ};
#[cfg(all(target_os = "none", not(feature = "free-running")))]
use lib::hw::{timer_clock, SampleTimer};
#[cfg(target_os = "none")]
use lib::hw::{init_clock, init_serial, Adc, HwSampler};
#[cfg(target_os = "none")]
use rtic::app;
#[cfg(target_os = "none")]
use stm32g0xx_hal::delay::DelayExt;
#[cfg(target_os = "none")]
use stm32g0xx_hal::gpio::{GpioExt, Speed};

#[cfg(all(target_os = "none", not(feature = "free-running")))]
const CONFIG: SamplerConfig = SamplerConfig::timer_gated(SAMPLE_RATE_HZ);
#[cfg(all(target_os = "none", feature = "free-running"))]
const CONFIG: SamplerConfig = SamplerConfig::free_running();

#[cfg(target_os = "none")]
#[app(device = stm32g0xx_hal::stm32, peripherals = true)]
const APP: () = {
    struct Resources {
        sampler: HwSampler,
        #[cfg(not(feature = "free-running"))]
        timer: SampleTimer,
    }

    // Runs with interrupts disabled, they are enabled once it returns
    #[init]
    fn init(cx: init::Context) -> init::LateResources {
        let core: rtic::export::Peripherals = cx.core;
        let device: stm32g0xx_hal::stm32::Peripherals = cx.device;

        defmt::info!("config: {:?}", CONFIG);

        // Clock
        let mut rcc = init_clock(device.RCC);
        let mut delay = core.SYST.delay(&mut rcc);

        // GPIO
        let gpioa = device.GPIOA.split(&mut rcc);
        let gpiob = device.GPIOB.split(&mut rcc);

        // Serial
        let tx = init_serial(device.USART2, gpioa.pa2, gpioa.pa3, &mut rcc).unwrap();

        // ADC
        let mut adc = Adc::new(device.ADC, gpioa.pa0, &CONFIG, &mut rcc, &mut delay).unwrap();
        adc.listen();

        // Sample timer
        #[cfg(not(feature = "free-running"))]
        let mut timer = {
            let divider = TimerDivider::new(timer_clock(&rcc), SAMPLE_RATE_HZ).unwrap();
            defmt::info!(
                "timer-gated: {=u32} Hz requested, {=u64} mHz achieved ({=i32} ppm)",
                SAMPLE_RATE_HZ,
                divider.actual_millihertz(),
                divider.error_ppm()
            );
            SampleTimer::new(device.TIM6, &divider, &mut rcc)
        };
        #[cfg(feature = "free-running")]
        defmt::info!("free-running");

        // Tracing
        let trigger_pin = gpiob.pb4.into_push_pull_output().set_speed(Speed::VeryHigh);
        let conversion_pin = gpiob.pb5.into_push_pull_output().set_speed(Speed::VeryHigh);

        let mut sampler =
            HwSampler::new(&CONFIG, adc, tx, trigger_pin, conversion_pin).unwrap();
        sampler.arm();
        #[cfg(not(feature = "free-running"))]
        timer.start();

        defmt::info!(
            "streaming {=u8} samples per frame, terminator {=u8}",
            FRAME_LEN,
            TERMINATOR
        );

        init::LateResources {
            sampler,
            #[cfg(not(feature = "free-running"))]
            timer,
        }
    }

    #[idle]
    fn idle(_: idle::Context) -> ! {
        loop {
            cortex_m::asm::nop();
        }
    }

    // Same priority as the conversion task, the two never preempt each other
    #[cfg(not(feature = "free-running"))]
    #[task(binds = TIM6, priority = 1, resources = [sampler, timer])]
    fn sample_trigger(cx: sample_trigger::Context) {
        let timer: &mut SampleTimer = cx.resources.timer;
        let sampler: &mut HwSampler = cx.resources.sampler;

        timer.unpend();
        sampler.on_trigger();
    }

    #[task(binds = ADC, priority = 1, resources = [sampler])]
    fn conversion_complete(cx: conversion_complete::Context) {
        let sampler: &mut HwSampler = cx.resources.sampler;

        if sampler.on_conversion_complete().is_err() {
            defmt::warn!("serial write failed at frame position {=u8}", sampler.frame_position());
        }
    }
};

#[cfg(not(target_os = "none"))]
fn main() {
    eprintln!("firmware image, build it for thumbv6m-none-eabi");
}
