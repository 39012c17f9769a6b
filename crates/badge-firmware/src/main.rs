mod board;
mod cli;
mod flash_vfs;
mod panel;
mod runtime_diagnostics;

use badge_core::{Runtime, Value};
use esp_idf_svc::hal::{
    delay::FreeRtos,
    gpio::{AnyIOPin, InputPin, OutputPin, PinDriver},
    peripherals::Peripherals,
    spi::{config::Config, SpiDeviceDriver, SpiDriver, SpiDriverConfig},
};
use gde029::{Builder, Dimensions, Display, Interface};

use board::{EspBoard, EspLeds, EspPower};
use cli::SerialCli;
use panel::EinkPanel;
use runtime_diagnostics::log_memory;

/// Console commands run before the prompt opens
const BOOT_SCRIPT: &[&str] = &["badge.init()", "badge.ugfx_init()"];

const POLL_INTERVAL_MS: u32 = 20;

fn main() {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log_memory("startup");

    log::info!(
        "Starting badge firmware with {} bytes stack",
        esp_idf_svc::sys::CONFIG_ESP_MAIN_TASK_STACK_SIZE
    );

    let peripherals = Peripherals::take().unwrap();
    let pins = peripherals.pins;

    // E-ink on SPI2: CLK 18, MOSI 5, CS 19, DC 21, RST 23, BUSY 22
    let spi = SpiDriver::new(
        peripherals.spi2,
        pins.gpio18,
        pins.gpio5,
        None::<AnyIOPin>,
        &SpiDriverConfig::default(),
    )
    .unwrap();
    let spi_config = Config::default()
        .baudrate(esp_idf_svc::hal::units::Hertz(10_000_000))
        .data_mode(embedded_hal::spi::Mode {
            polarity: embedded_hal::spi::Polarity::IdleLow,
            phase: embedded_hal::spi::Phase::CaptureOnFirstTransition,
        });
    let spi_device = SpiDeviceDriver::new(spi, Some(pins.gpio19), &spi_config).unwrap();

    let dc = PinDriver::output(pins.gpio21.downgrade_output()).unwrap();
    let rst = PinDriver::output(pins.gpio23.downgrade_output()).unwrap();
    let busy = PinDriver::input(pins.gpio22.downgrade_input()).unwrap();

    let interface = Interface::new(spi_device, dc, rst, busy);
    let config = Builder::new()
        .dimensions(Dimensions::GDEH029A1)
        .build()
        .unwrap();
    let panel = EinkPanel::new(Display::new(interface, config));

    let charge_status = PinDriver::input(pins.gpio38.downgrade_input()).unwrap();
    let led_enable = PinDriver::output(pins.gpio32.downgrade_output()).unwrap();

    let board = EspBoard::new(panel, EspPower::new(charge_status), EspLeds::new(led_enable));
    let mut runtime = Runtime::new(board);

    for line in BOOT_SCRIPT {
        if let Err(err) = runtime.run_line(line) {
            log::warn!("boot: {} -> {}", line, err);
        }
    }
    log_memory("after_boot");

    let mut cli = SerialCli::new();
    log::info!("Console ready: type e.g. badge.battery_volt_sense()");

    loop {
        if let Some(line) = cli.poll_line() {
            log::debug!("console: {}", line);
            match runtime.run_line(&line) {
                Ok(Value::None) => {}
                Ok(value) => cli.write_line(&value.to_string()),
                Err(err) => cli.write_line(&err.to_string()),
            }
        }
        FreeRtos::delay_ms(POLL_INTERVAL_MS);
    }
}
