#![no_std]
#![no_main]

mod peripherals;
mod system;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use embassy_executor::Spawner;
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pull},
    interrupt::{self, InterruptExt, Priority},
    peripherals::SPI2,
    saadc::{self, ChannelConfig, Resolution, Saadc},
    spim,
};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, channel::Channel, signal::Signal};
use embassy_time::{Delay, Duration, Ticker, Timer};

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Bluetooth
use heapless::Vec;
use nrf_softdevice::{
    ble::{gatt_server, peripheral},
    Softdevice,
};
use static_cell::StaticCell;

// Crate
use peripherals::{
    backlight::Backlight,
    battery::BatteryStatus,
    display::Display,
};
use system::{
    bluetooth::{self, Inbound, Server, ADV_DATA, SCAN_DATA},
    config::{SystemConfig, BACKLIGHT_LEVEL, WATCHFACE},
    time::{TimeManager, TimeReference},
};

// Others
use chrono::NaiveDateTime;
use quoteface::{
    dictionary::{Dictionary, MAX_INBOX_LEN},
    time::MinuteClock,
    BatteryInfo, FieldSet, SystemStatus, Watchface,
};

// Include current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));

// Communication channels
static BATTERY_STATUS: Signal<ThreadModeRawMutex, BatteryInfo> = Signal::new();
static BLUETOOTH: Signal<ThreadModeRawMutex, bool> = Signal::new();
static INBOX: Channel<ThreadModeRawMutex, Vec<u8, MAX_INBOX_LEN>, 4> = Channel::new();
static TICK: Signal<ThreadModeRawMutex, NaiveDateTime> = Signal::new();
static TIME_SYNC: Signal<ThreadModeRawMutex, TimeReference> = Signal::new();

static SERVER: StaticCell<Server> = StaticCell::new();

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

/// Advertise, serve the companion app and report the connection state.
#[embassy_executor::task(pool_size = 1)]
async fn ble_peripheral(sd: &'static Softdevice, server: &'static Server) {
    let config = peripheral::Config::default();
    loop {
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &ADV_DATA,
            scan_data: &SCAN_DATA,
        };
        let conn = match peripheral::advertise_connectable(sd, adv, &config).await {
            Ok(conn) => conn,
            Err(err) => {
                defmt::warn!("Advertising failed: {:?}", err);
                Timer::after(Duration::from_secs(1)).await;
                continue;
            }
        };

        defmt::info!("Companion connected");
        BLUETOOTH.signal(true);

        let reason = gatt_server::run(&conn, server, |event| match Server::inbound(event) {
            Some(Inbound::Inbox(bytes)) => {
                if INBOX.try_send(bytes).is_err() {
                    defmt::warn!("Inbox full, message dropped");
                }
            }
            Some(Inbound::Time(bytes)) => match TimeReference::from_cts_bytes(&bytes) {
                Ok(reference) => TIME_SYNC.signal(reference),
                Err(err) => defmt::warn!("Invalid time record: {}", err),
            },
            None => {}
        })
        .await;

        defmt::info!("Companion disconnected: {:?}", reason);
        BLUETOOTH.signal(false);
    }
}

/// Fetch the battery status from the hardware.
#[embassy_executor::task(pool_size = 1)]
async fn update_battery_status(mut battery: BatteryStatus<'static>, server: &'static Server) {
    loop {
        match battery.update().await {
            Ok(true) => {
                // Battery status changed
                let info = battery.info();
                defmt::info!("Battery status updated");
                if let Err(err) = server.set_battery_level(info.percent) {
                    defmt::warn!("Battery level not published: {:?}", err);
                }
                BATTERY_STATUS.signal(info);
            }
            Ok(false) => {}
            Err(err) => defmt::warn!("Battery measurement failed: {}", err),
        }

        // Re-schedule the timer interrupt in 1s
        Timer::after(Duration::from_secs(1)).await;
    }
}

/// Keep the clock and signal every new minute.
#[embassy_executor::task(pool_size = 1)]
async fn update_time(mut time: TimeManager) {
    let mut tick = Ticker::every(Duration::from_secs(1));
    let mut minutes = MinuteClock::new();
    loop {
        if TIME_SYNC.signaled() {
            time.set_time(TIME_SYNC.wait().await);
            minutes.reset();
            defmt::info!("Time synchronized");
        }

        // Send time to channel once per minute
        let utc = time.get_time();
        if minutes.tick(&utc) {
            TICK.signal(utc);
        }

        // Re-schedule the timer interrupt
        tick.next().await;
    }
}

/// Apply system events to the watchface and redraw what changed.
#[embassy_executor::task(pool_size = 1)]
async fn update_lcd(mut display: Display<'static, SPI2>, mut face: Watchface, mut status: SystemStatus) {
    let mut tick = Ticker::every(Duration::from_millis(100));
    loop {
        let mut changed = FieldSet::empty();

        if BATTERY_STATUS.signaled() {
            status.battery = BATTERY_STATUS.wait().await;
            defmt::info!(
                "Battery status: {} ({})",
                status.battery.percent,
                if status.battery.charging {
                    "charging"
                } else {
                    "discharging"
                }
            );
            changed.extend_from(face.on_battery(status.battery));
        }

        if BLUETOOTH.signaled() {
            status.bluetooth_connected = BLUETOOTH.wait().await;
            changed.extend_from(face.on_bluetooth(status.bluetooth_connected));
        }

        if TICK.signaled() {
            let utc = TICK.wait().await;
            changed.extend_from(face.on_tick(utc, &status));
        }

        while let Ok(bytes) = INBOX.try_receive() {
            match Dictionary::parse(&bytes) {
                Ok(dict) => changed.extend_from(face.on_inbox(&dict, &status)),
                Err(err) => defmt::warn!("Empty inbox message: {}", err),
            }
        }

        if !changed.is_empty() {
            if let Err(err) = display.draw(face.state(), changed) {
                defmt::warn!("Display update failed: {}", err);
            }
        }

        // Re-schedule the timer interrupt in 100ms
        tick.next().await;
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(SystemConfig::new());
    defmt::info!("Initializing");

    // Keep peripheral interrupts clear of the priorities reserved for the SoftDevice
    interrupt::SAADC.set_priority(Priority::P3);
    interrupt::SPIM2_SPIS2_SPI2.set_priority(Priority::P3);

    // Initialize Bluetooth
    let sd = Softdevice::enable(&bluetooth::generate_config());
    let server: &'static Server = SERVER.init(unwrap!(Server::new(sd)));
    let sd: &'static Softdevice = sd;
    unwrap!(spawner.spawn(softdevice_task(sd)));

    // Initialize SAADC
    let mut saadc_config = saadc::Config::default();
    // Set resolution to 12bit, necessary for correct battery status calculation
    saadc_config.resolution = Resolution::_12BIT;
    // Pin P0.31: Voltage level
    let channel_config = ChannelConfig::single_ended(p.P0_31);
    let saadc = Saadc::new(p.SAADC, Irqs, saadc_config, [channel_config]);
    saadc.calibrate().await;

    // Initialize Backlight
    let backlight = Backlight::init(
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        Output::new(p.P0_23, Level::High, OutputDrive::Standard),
    );

    // Initialize Battery
    let battery = unwrap!(BatteryStatus::init(Input::new(p.P0_12, Pull::None), saadc).await);

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let mut display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
        backlight,
        &mut Delay,
    ));

    // Initialize time keeping from the build time
    let time = TimeManager::init(TimeReference::from_datetime(unwrap!(
        quoteface::time::from_epoch(UTC_EPOCH)
    )));

    // Draw the first frame
    let status = SystemStatus {
        bluetooth_connected: false,
        battery: battery.info(),
    };
    let mut face = Watchface::new(WATCHFACE);
    let fields = face.load(time.get_time(), &status);
    unwrap!(display.draw(face.state(), fields));
    unwrap!(display.set_brightness(BACKLIGHT_LEVEL));

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(ble_peripheral(sd, server)));
    unwrap!(spawner.spawn(update_battery_status(battery, server)));
    unwrap!(spawner.spawn(update_time(time)));
    unwrap!(spawner.spawn(update_lcd(display, face, status)));
}
