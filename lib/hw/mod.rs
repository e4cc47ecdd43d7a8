mod adc;
mod helper;
mod timers;

pub use helper::*;
pub use timers::SampleTimer;
