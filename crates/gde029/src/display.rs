//! Panel operations: reset, LUT loading, frame upload and refresh

use embedded_hal::delay::DelayNs;

use crate::command::*;
use crate::config::{Config, Dimensions};
use crate::error::Error;
use crate::interface::DisplayInterface;
use crate::layout::{landscape_size, landscape_to_native};
use crate::lut::Lut;

/// X increment, Y increment, address counter advances along X
const DATA_ENTRY_X_INC_Y_INC: u8 = 0x03;
/// Deep sleep mode 1: RAM retained
const DEEP_SLEEP_MODE_1: u8 = 0x01;

pub struct Display<I>
where
    I: DisplayInterface,
{
    interface: I,
    config: Config,
    /// Cleared by reset and deep sleep, the controller forgets its LUT then
    loaded_lut: Option<Lut>,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    pub fn new(interface: I, config: Config) -> Self {
        Self {
            interface,
            config,
            loaded_lut: None,
        }
    }

    /// Pulse RST, soft reset, then program the panel registers and the default LUT.
    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<I>> {
        self.loaded_lut = None;
        self.interface.reset(delay).map_err(Error::Interface)?;
        self.register(SOFT_RESET, &[])?;
        self.wait(delay)?;

        let Config {
            dimensions,
            default_lut,
            analog,
        } = self.config;
        let last_gate = (dimensions.rows - 1).to_le_bytes();
        self.register(
            DRIVER_OUTPUT_CONTROL,
            &[last_gate[0], last_gate[1], analog.gate_scanning],
        )?;
        self.register(BOOSTER_SOFT_START, &analog.booster_soft_start)?;
        self.register(WRITE_VCOM, &[analog.vcom])?;
        self.register(DUMMY_LINE_PERIOD, &[analog.dummy_line_period])?;
        self.register(GATE_LINE_WIDTH, &[analog.gate_line_width])?;
        self.register(DATA_ENTRY_MODE, &[DATA_ENTRY_X_INC_Y_INC])?;
        self.register(BORDER_WAVEFORM, &[analog.border_waveform])?;
        self.load_lut(default_lut)
    }

    /// Upload `lut` unless the controller already holds it.
    pub fn load_lut(&mut self, lut: Lut) -> Result<(), Error<I>> {
        if self.loaded_lut == Some(lut) {
            return Ok(());
        }
        self.register(WRITE_LUT, lut.bytes())?;
        self.loaded_lut = Some(lut);
        log::debug!("gde029: {:?} waveform loaded", lut);
        Ok(())
    }

    /// Upload a frame in controller order and refresh with `lut`
    /// (`None` = configured default).
    pub fn update<D: DelayNs>(
        &mut self,
        buffer: &[u8],
        lut: Option<Lut>,
        delay: &mut D,
    ) -> Result<(), Error<I>> {
        let frame_len = self.config.dimensions.buffer_size();
        Self::check_len(buffer, frame_len)?;

        self.load_lut(lut.unwrap_or(self.config.default_lut))?;
        self.address_full_frame()?;
        self.register(WRITE_RAM, &buffer[..frame_len])?;

        self.register(DISPLAY_UPDATE_CTRL2, &[CTRL2_CLOCK_ANALOG_PATTERN])?;
        self.register(MASTER_ACTIVATION, &[])?;
        self.register(TERMINATE_FRAME, &[])?;
        self.wait(delay)
    }

    /// Like [`Display::update`] for a landscape image (see [`crate::layout`]).
    /// `scratch` holds the rotated frame.
    pub fn update_landscape<D: DelayNs>(
        &mut self,
        image: &[u8],
        scratch: &mut [u8],
        lut: Option<Lut>,
        delay: &mut D,
    ) -> Result<(), Error<I>> {
        let dims = self.config.dimensions;
        let image_len = landscape_size(&dims);
        Self::check_len(image, image_len)?;
        Self::check_len(scratch, dims.buffer_size())?;

        let native = &mut scratch[..dims.buffer_size()];
        landscape_to_native(&dims, &image[..image_len], native);
        self.update(native, lut, delay)
    }

    /// Enter deep sleep; [`Display::reset`] wakes the panel.
    pub fn deep_sleep(&mut self) -> Result<(), Error<I>> {
        self.register(DEEP_SLEEP, &[DEEP_SLEEP_MODE_1])?;
        self.loaded_lut = None;
        Ok(())
    }

    fn address_full_frame(&mut self) -> Result<(), Error<I>> {
        let last_byte = (self.config.dimensions.row_bytes() - 1) as u8;
        let last_gate = (self.config.dimensions.rows - 1).to_le_bytes();

        self.register(SET_RAM_X_RANGE, &[0x00, last_byte])?;
        self.register(SET_RAM_Y_RANGE, &[0x00, 0x00, last_gate[0], last_gate[1]])?;
        self.register(SET_RAM_X_COUNTER, &[0x00])?;
        self.register(SET_RAM_Y_COUNTER, &[0x00, 0x00])
    }

    fn register(&mut self, command: u8, params: &[u8]) -> Result<(), Error<I>> {
        self.interface
            .write_register(command, params)
            .map_err(Error::Interface)
    }

    fn check_len(buf: &[u8], required: usize) -> Result<(), Error<I>> {
        if buf.len() < required {
            return Err(Error::BufferTooSmall {
                required,
                provided: buf.len(),
            });
        }
        Ok(())
    }

    fn wait<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<I>> {
        self.interface.busy_wait(delay).map_err(Error::Interface)
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.config.dimensions
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn loaded_lut(&self) -> Option<Lut> {
        self.loaded_lut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Builder;
    use std::vec::Vec;

    #[derive(Debug, PartialEq)]
    enum Event {
        Command(u8),
        Data(Vec<u8>),
        Reset,
        BusyWait,
    }

    #[derive(Debug, Default)]
    struct RecordingInterface {
        events: Vec<Event>,
    }

    impl DisplayInterface for RecordingInterface {
        type Error = core::convert::Infallible;

        fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
            self.events.push(Event::Command(command));
            Ok(())
        }

        fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            self.events.push(Event::Data(data.to_vec()));
            Ok(())
        }

        fn reset<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
            self.events.push(Event::Reset);
            Ok(())
        }

        fn busy_wait<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
            self.events.push(Event::BusyWait);
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn display() -> Display<RecordingInterface> {
        let config = Builder::new()
            .dimensions(Dimensions::GDEH029A1)
            .build()
            .unwrap();
        Display::new(RecordingInterface::default(), config)
    }

    fn lut_writes(display: &Display<RecordingInterface>) -> usize {
        display
            .interface
            .events
            .iter()
            .filter(|e| **e == Event::Command(WRITE_LUT))
            .count()
    }

    #[test]
    fn reset_runs_soft_reset_then_loads_default_lut() {
        let mut display = display();
        display.reset(&mut NoDelay).unwrap();

        let events = &display.interface.events;
        assert_eq!(events[0], Event::Reset);
        assert_eq!(events[1], Event::Command(SOFT_RESET));
        assert_eq!(events[2], Event::BusyWait);
        assert_eq!(events[3], Event::Command(DRIVER_OUTPUT_CONTROL));
        assert_eq!(events[4], Event::Data(vec![0x27, 0x01, 0x00]));
        assert_eq!(display.loaded_lut(), Some(Lut::Full));
    }

    #[test]
    fn update_rejects_short_buffer() {
        let mut display = display();
        let result = display.update(&[0xFF; 10], None, &mut NoDelay);
        assert!(matches!(
            result,
            Err(Error::BufferTooSmall {
                required: 4736,
                provided: 10
            })
        ));
    }

    #[test]
    fn same_lut_is_not_reloaded() {
        let mut display = display();
        display.reset(&mut NoDelay).unwrap();
        let frame = [0xFF; 4736];

        display.update(&frame, Some(Lut::Full), &mut NoDelay).unwrap();
        assert_eq!(lut_writes(&display), 1);

        display.update(&frame, Some(Lut::Faster), &mut NoDelay).unwrap();
        assert_eq!(lut_writes(&display), 2);
        assert_eq!(display.loaded_lut(), Some(Lut::Faster));
    }

    #[test]
    fn update_ends_with_activation_and_busy_wait() {
        let mut display = display();
        display.update(&[0xFF; 4736], None, &mut NoDelay).unwrap();

        let events = &display.interface.events;
        let n = events.len();
        assert_eq!(events[n - 4], Event::Data(vec![CTRL2_CLOCK_ANALOG_PATTERN]));
        assert_eq!(events[n - 3], Event::Command(MASTER_ACTIVATION));
        assert_eq!(events[n - 2], Event::Command(TERMINATE_FRAME));
        assert_eq!(events[n - 1], Event::BusyWait);
    }

    #[test]
    fn landscape_update_checks_scratch_size() {
        let mut display = display();
        let image = [0xFF; 37 * 128];
        let mut scratch = [0u8; 100];
        let result = display.update_landscape(&image, &mut scratch, None, &mut NoDelay);
        assert!(matches!(result, Err(Error::BufferTooSmall { .. })));
    }

    #[test]
    fn deep_sleep_forgets_lut() {
        let mut display = display();
        display.reset(&mut NoDelay).unwrap();
        display.deep_sleep().unwrap();
        assert_eq!(display.loaded_lut(), None);
    }
}
