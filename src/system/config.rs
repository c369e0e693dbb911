//! General system configuration

use embassy_nrf::{
    config::{Config, Debug, HfclkSource, LfclkSource},
    interrupt::Priority,
};

/// HAL configuration for running next to the S113 softdevice.
pub fn hal_config() -> Config {
    // Config is `non_exhaustive`, start from the default
    let mut config = Config::default();

    // Set high-frequency and low-frequency clock sources to external
    config.hfclk_source = HfclkSource::ExternalXtal;
    config.lfclk_source = LfclkSource::ExternalXtal;

    // Enable DC/DC regulator to massively reduce runtime current consumption
    config.dcdc.reg1 = true;

    // Priorities 0, 1 and 4 are reserved for the softdevice
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;

    // Allow debugging
    config.debug = Debug::Allowed;

    config
}

/// Priority for the peripherals' interrupts (SPIM, TWIM).
pub const PERIPHERAL_PRIORITY: Priority = Priority::P3;
