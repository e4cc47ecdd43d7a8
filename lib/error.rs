pub type Result<T, SER> = core::result::Result<T, Error<SER>>;

#[derive(Debug, PartialEq)]
pub enum Error<SER> {
    // Serial peripheral error
    Serial(SER),
    // Rejected configuration
    Config(ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum ConfigError {
    // Frame without any sample
    FrameLength,
    // Rate is zero or not reachable from the timer clock
    SampleRate,
    // Configured channel is not the input pin's
    Channel,
}

impl<SER> From<ConfigError> for Error<SER> {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}
