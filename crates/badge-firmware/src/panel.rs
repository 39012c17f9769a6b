//! `Panel` backed by the GDEH029A1 driver

use badge_core::framebuffer::FRAME_SIZE;
use badge_core::hal::{DisplayFlags, Panel};
use badge_core::HalError;
use esp_idf_svc::hal::delay::FreeRtos;
use gde029::{Display, DisplayInterface, Lut};

pub struct EinkPanel<I: DisplayInterface> {
    display: Display<I>,
    scratch: Vec<u8>,
    delay: FreeRtos,
}

impl<I: DisplayInterface> EinkPanel<I> {
    pub fn new(display: Display<I>) -> Self {
        let scratch = vec![0xFF; display.dimensions().buffer_size()];
        Self {
            display,
            scratch,
            delay: FreeRtos,
        }
    }
}

fn hal_error(err: impl core::fmt::Display) -> HalError {
    HalError::new(-1, format!("e-ink: {}", err))
}

impl<I: DisplayInterface> Panel for EinkPanel<I> {
    fn init(&mut self) -> Result<(), HalError> {
        log::info!("resetting e-ink panel");
        self.display.reset(&mut self.delay).map_err(hal_error)
    }

    fn display(&mut self, image: &[u8], flags: DisplayFlags) -> Result<(), HalError> {
        if image.len() < FRAME_SIZE {
            return Err(hal_error(format_args!("short frame of {} bytes", image.len())));
        }
        let lut = Lut::from_flag_field(flags.lut_field());
        log::debug!("e-ink update, lut {:?}", lut);
        self.display
            .update_landscape(image, &mut self.scratch, lut, &mut self.delay)
            .map_err(hal_error)
    }
}
