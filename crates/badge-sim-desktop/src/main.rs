//! Desktop SDL simulator for the SHA2017 badge.
//!
//! Reads call expressions (`badge.string(0, 0, 'hi', 'Roboto_Regular18', 0)`)
//! from a script file or stdin, runs them against a simulated board, and shows
//! every frame pushed to the panel.

use std::io::BufRead;
use std::sync::mpsc;
use std::time::Duration;

use badge_core::framebuffer::{FRAME_SIZE, ROW_BYTES};
use badge_core::hal::{Board, DisplayFlags, Entropy, FlashVfs, Leds, Panel, Power};
use badge_core::mock::MockBoard;
use badge_core::{HalError, Runtime, Value, PANEL_HEIGHT, PANEL_WIDTH};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    BinaryColorTheme, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};

/// Panel that keeps the last pushed frame for the window to pick up.
#[derive(Default)]
struct SimPanel {
    pending: Option<(Vec<u8>, DisplayFlags)>,
}

impl Panel for SimPanel {
    fn init(&mut self) -> Result<(), HalError> {
        log::info!("panel init");
        Ok(())
    }

    fn display(&mut self, image: &[u8], flags: DisplayFlags) -> Result<(), HalError> {
        if image.len() < FRAME_SIZE {
            return Err(HalError::new(-1, "short frame"));
        }
        self.pending = Some((image.to_vec(), flags));
        Ok(())
    }
}

/// Simulated panel plus in-memory power, LEDs, entropy and flash.
#[derive(Default)]
struct SimBoard {
    panel: SimPanel,
    rest: MockBoard,
}

impl Board for SimBoard {
    fn panel(&mut self) -> &mut dyn Panel {
        &mut self.panel
    }

    fn power(&mut self) -> &mut dyn Power {
        &mut self.rest.power
    }

    fn leds(&mut self) -> &mut dyn Leds {
        &mut self.rest.leds
    }

    fn entropy(&mut self) -> &mut dyn Entropy {
        &mut self.rest.entropy
    }

    fn vfs(&mut self) -> &mut dyn FlashVfs {
        &mut self.rest.vfs
    }
}

fn blit(display: &mut SimulatorDisplay<BinaryColor>, image: &[u8]) {
    let pixels = (0..PANEL_HEIGHT as i32).flat_map(|y| {
        (0..PANEL_WIDTH as i32).map(move |x| {
            let byte = image[y as usize * ROW_BYTES + x as usize / 8];
            let white = byte & (0x80 >> (x % 8)) != 0;
            let color = if white { BinaryColor::Off } else { BinaryColor::On };
            Pixel(Point::new(x, y), color)
        })
    });
    let _ = display.draw_iter(pixels);
}

/// Feed script lines from a file argument or stdin.
fn spawn_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    let path = std::env::args().nth(1);
    std::thread::spawn(move || {
        let reader: Box<dyn BufRead> = match path {
            Some(path) => match std::fs::File::open(&path) {
                Ok(file) => Box::new(std::io::BufReader::new(file)),
                Err(err) => {
                    log::error!("cannot open {}: {}", path, err);
                    return;
                }
            },
            None => Box::new(std::io::stdin().lock()),
        };
        for line in reader.lines().map_while(Result::ok) {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let output_settings = OutputSettingsBuilder::new()
        .scale(2)
        .theme(BinaryColorTheme::LcdWhite)
        .build();
    let mut display: SimulatorDisplay<BinaryColor> =
        SimulatorDisplay::new(Size::new(PANEL_WIDTH, PANEL_HEIGHT));
    let mut window = Window::new("SHA2017 Badge", &output_settings);
    window.update(&display);

    let mut runtime = Runtime::new(SimBoard::default());
    for line in ["badge.init()", "badge.ugfx_init()"] {
        if let Err(err) = runtime.run_line(line) {
            log::warn!("boot line {:?} failed: {}", line, err);
        }
    }
    let lines = spawn_reader();

    println!("SHA2017 Badge Simulator");
    println!("Type calls such as: badge.ugfx_demo('HACKING')");

    loop {
        for event in window.events() {
            if let SimulatorEvent::Quit = event {
                return Ok(());
            }
        }

        while let Ok(line) = lines.try_recv() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match runtime.run_line(line) {
                Ok(Value::None) => {}
                Ok(value) => println!("{}", value),
                Err(err) => println!("{}", err),
            }
        }

        if let Some((image, flags)) = runtime.board_mut().panel.pending.take() {
            log::debug!("frame pushed, lut field {}", flags.lut_field());
            blit(&mut display, &image);
        }
        window.update(&display);
        std::thread::sleep(Duration::from_millis(16));
    }
}
