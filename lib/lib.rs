#![cfg_attr(not(test), no_std)]

#[cfg(target_os = "none")]
use core::sync::atomic::{AtomicUsize, Ordering};

#[cfg(target_os = "none")]
use defmt_rtt as _; // global logger
#[cfg(target_os = "none")]
use panic_probe as _;

pub mod config;
pub mod error;
pub mod framer;
#[cfg(target_os = "none")]
pub mod hw;
pub mod sampler;
pub mod serial;

/// Most significant byte of a left-aligned conversion result.
pub type Sample = u8;

#[cfg(target_os = "none")]
static COUNT: AtomicUsize = AtomicUsize::new(0);
#[cfg(target_os = "none")]
defmt::timestamp!("{=usize}", {
    let n = COUNT.load(Ordering::Relaxed);
    COUNT.store(n + 1, Ordering::Relaxed);
    n
});
