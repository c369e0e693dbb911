#![no_std]
#![no_main]

mod peripherals;
mod system;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use core::cell::RefCell;

use embassy_embedded_hal::shared_bus::blocking::i2c::I2cDevice;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input as InputPin, Level, Output, OutputDrive, Pull},
    interrupt::{self, InterruptExt},
    peripherals::{SPI2, TWISPI1},
    spim, twim,
};
use embassy_sync::{
    blocking_mutex::{
        raw::{NoopRawMutex, ThreadModeRawMutex},
        Mutex,
    },
    signal::Signal,
};
use embassy_time::{with_timeout, Duration, Instant, Timer};
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    SPIM1_SPIS1_TWIM1_TWIS1_SPI1_TWI1 => twim::InterruptHandler<TWISPI1>;
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use peripherals::{
    backlight::{Backlight, MAX_BRIGHTNESS},
    button::Button,
    display::Display,
    touch::{to_tap, TouchController},
};
use sunshine_watchface::{
    offer, submit,
    ui::{BadgeIcon, DefaultWatchface},
    Engine, FaceConfig, Input, InputQueue, LifecycleEvent, TimerCommand,
};
use system::{
    bluetooth::{self, Server},
    config::{hal_config, PERIPHERAL_PRIORITY},
    time::WallClock,
};

/// Inputs for the engine, from every other task
pub static INPUTS: InputQueue<ThreadModeRawMutex, 16> = InputQueue::new();

// Communication channels
static BUTTON_PRESSED: Signal<ThreadModeRawMutex, ()> = Signal::new();
static ACTIVITY: Signal<ThreadModeRawMutex, ()> = Signal::new();

const CONFIG: FaceConfig = FaceConfig::DEFAULT;
static I2C_BUS: StaticCell<Mutex<NoopRawMutex, RefCell<twim::Twim<'static, TWISPI1>>>> =
    StaticCell::new();

/// Without interaction the face goes ambient after this long
const AMBIENT_AFTER: Duration = Duration::from_secs(15);
const AMBIENT_BRIGHTNESS: u8 = 1;

/// Owns the engine and the display; the only place watch face state changes.
#[embassy_executor::task]
async fn render(mut display: Display<'static, SPI2>, clock: WallClock) {
    let mut engine = Engine::new(&CONFIG, clock, clock.now_ms());
    let mut face = DefaultWatchface::new(&CONFIG, BadgeIcon::default());

    loop {
        let input = match engine.next_deadline() {
            Some((handle, deadline_ms)) => {
                let at = clock.reference().instant_at(deadline_ms);
                match select(INPUTS.receive(), Timer::at(at)).await {
                    Either::First(input) => input,
                    Either::Second(()) => Input::Timer(handle),
                }
            }
            None => INPUTS.receive().await,
        };

        match engine.dispatch(input, clock.now_ms()) {
            TimerCommand::Keep => {}
            command => defmt::trace!("timer: {}", command),
        }

        if engine.take_redraw() {
            let drawn = engine.with_snapshot(|snapshot| display.render(&mut face, snapshot));
            if let Err(err) = drawn {
                defmt::warn!("frame skipped: {}", err);
            }
        }
    }
}

/// Screen power states driven by the button and user activity.
#[derive(Clone, Copy, PartialEq, Eq, defmt::Format)]
enum Screen {
    Off,
    Interactive,
    Ambient,
}

/// Queue a lifecycle change, waiting for room so it is never lost.
async fn lifecycle(event: LifecycleEvent) {
    submit(&INPUTS, Input::Lifecycle(event)).await;
}

/// Map button presses and inactivity to visibility and ambient changes.
#[embassy_executor::task]
async fn screen_power(mut backlight: Backlight<'static>) {
    let awake_brightness = backlight.brightness().max(1);
    let mut screen = Screen::Interactive;
    lifecycle(LifecycleEvent::VisibilityChanged(true)).await;

    loop {
        let next = match screen {
            Screen::Interactive => {
                match select(BUTTON_PRESSED.wait(), with_timeout(AMBIENT_AFTER, ACTIVITY.wait()))
                    .await
                {
                    Either::First(()) => Screen::Off,
                    Either::Second(Ok(())) => Screen::Interactive,
                    Either::Second(Err(_)) => Screen::Ambient,
                }
            }
            Screen::Ambient => match select(BUTTON_PRESSED.wait(), ACTIVITY.wait()).await {
                Either::First(()) => Screen::Off,
                Either::Second(()) => Screen::Interactive,
            },
            Screen::Off => {
                BUTTON_PRESSED.wait().await;
                Screen::Interactive
            }
        };
        if next == screen {
            continue;
        }
        defmt::info!("screen {} -> {}", screen, next);

        match next {
            Screen::Off => {
                backlight.off();
                lifecycle(LifecycleEvent::VisibilityChanged(false)).await;
                lifecycle(LifecycleEvent::AmbientModeChanged(false)).await;
            }
            Screen::Ambient => {
                backlight.set(AMBIENT_BRIGHTNESS);
                lifecycle(LifecycleEvent::AmbientModeChanged(true)).await;
            }
            Screen::Interactive => {
                backlight.set(awake_brightness);
                lifecycle(LifecycleEvent::AmbientModeChanged(false)).await;
                lifecycle(LifecycleEvent::VisibilityChanged(true)).await;
            }
        }
        screen = next;
    }
}

/// Once a minute, on the minute, for the ambient face.
#[embassy_executor::task]
async fn minute_tick(clock: WallClock) {
    const MINUTE_MS: i64 = 60_000;
    let mut fired = i64::MIN;
    loop {
        // A fire may read back just short of its minute; never wait for that minute again
        let from = clock.now_ms().max(fired);
        let next = from + (MINUTE_MS - from.rem_euclid(MINUTE_MS));
        Timer::at(clock.reference().instant_at(next)).await;
        fired = next;
        offer(&INPUTS, Input::Lifecycle(LifecycleEvent::TimeTick));
    }
}

/// Polls the button state every 10ms
#[embassy_executor::task]
async fn poll_button(mut button: Button<'static>) {
    loop {
        if button.pressed().await {
            BUTTON_PRESSED.signal(());
        }

        // Re-schedule the timer interrupt in 10ms
        Timer::after(Duration::from_millis(10)).await;
    }
}

/// Polls the touch interrupt pin every 2ms
#[embassy_executor::task]
async fn poll_touch(mut touch: TouchController<'static, TWISPI1>) {
    loop {
        if let Some(event) = touch.try_event_detected() {
            ACTIVITY.signal(());
            if let Some(tap) = to_tap(&event, Instant::now().as_millis()) {
                offer(&INPUTS, Input::Lifecycle(LifecycleEvent::Tap(tap)));
            }
        }

        // Re-schedule the timer interrupt in 2ms
        Timer::after(Duration::from_millis(2)).await;
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(hal_config());
    defmt::info!("Initializing");

    interrupt::SPIM1_SPIS1_TWIM1_TWIS1_SPI1_TWI1.set_priority(PERIPHERAL_PRIORITY);
    interrupt::SPIM2_SPIS2_SPI2.set_priority(PERIPHERAL_PRIORITY);

    let clock = WallClock;

    // Initialize Bluetooth
    let sd = Softdevice::enable(&bluetooth::softdevice_config());
    let server = unwrap!(Server::new(sd));
    let sd: &'static Softdevice = sd;

    // Initialize Backlight
    let backlight = Backlight::init(
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        Output::new(p.P0_23, Level::High, OutputDrive::Standard),
        MAX_BRIGHTNESS / 2,
    );

    // Initialize Button
    let button = Button::init(
        InputPin::new(p.P0_13, Pull::None),
        Output::new(p.P0_15, Level::Low, OutputDrive::Standard),
    );

    // Initialize I2C
    let mut i2c_config = twim::Config::default();
    // Use I2C at 400KHz (the fastest clock available on the nRF52832),
    i2c_config.frequency = twim::Frequency::K400;
    let i2c = twim::Twim::new(p.TWISPI1, Irqs, p.P0_06, p.P0_07, i2c_config);
    // Touch, accelerometer and heart rate sensor share this bus
    let i2c_bus = I2C_BUS.init(Mutex::new(RefCell::new(i2c)));

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;
    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
    ));

    // Initialize touch controller
    let touch = TouchController::init(
        I2cDevice::new(i2c_bus),
        InputPin::new(p.P0_28, Pull::Up), // Touchpad external interrupt pin: P0.28/AIN4 (TP_INT)
        Output::new(p.P0_10, Level::High, OutputDrive::Standard), // Touchpad reset pin: P0.10/NFC2 (TP_RESET)
    );

    defmt::info!("Initialization finished");

    // The ST7789 panel is square and renders full colour in ambient too
    lifecycle(LifecycleEvent::WindowInsetsApplied { is_round: false }).await;
    lifecycle(LifecycleEvent::PropertiesChanged {
        low_bit_ambient: false,
    })
    .await;

    // Schedule tasks
    unwrap!(spawner.spawn(bluetooth::softdevice_task(sd)));
    unwrap!(spawner.spawn(render(display, clock)));
    unwrap!(spawner.spawn(screen_power(backlight)));
    unwrap!(spawner.spawn(minute_tick(clock)));
    unwrap!(spawner.spawn(poll_button(button)));
    unwrap!(spawner.spawn(poll_touch(touch)));
    unwrap!(spawner.spawn(bluetooth::companion_task(sd, server, clock)));
}
