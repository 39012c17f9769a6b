//! SPI + GPIO transport
//!
//! The controller sits on a write-only SPI bus. DC selects command (low) or
//! data (high), RST is active low and BUSY reads high while a refresh or a
//! soft reset is running.

use core::fmt::{self, Debug};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

/// Poll period while BUSY is high
const BUSY_POLL_MS: u32 = 5;
/// Give up on BUSY after this long. A full-LUT refresh takes about 2s.
const BUSY_TIMEOUT_MS: u32 = 10_000;
/// RST low pulse and settle time
const RESET_PULSE_MS: u32 = 10;

/// Transport to the controller
///
/// Implemented by [`Interface`] for real wiring; tests implement it on a
/// recorder.
pub trait DisplayInterface {
    type Error: Debug;

    fn send_command(&mut self, command: u8) -> Result<(), Self::Error>;

    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Pulse RST
    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error>;

    /// Block until BUSY goes low
    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error>;

    /// A command byte followed by its parameters, if any.
    fn write_register(&mut self, command: u8, params: &[u8]) -> Result<(), Self::Error> {
        self.send_command(command)?;
        if params.is_empty() {
            return Ok(());
        }
        self.send_data(params)
    }
}

#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    Spi(SpiErr),
    Pin(PinErr),
    /// BUSY was still high after `waited_ms`
    BusyTimeout { waited_ms: u32 },
}

impl<SpiErr: Debug, PinErr: Debug> fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceError::Spi(e) => write!(f, "spi write failed: {e:?}"),
            InterfaceError::Pin(e) => write!(f, "gpio access failed: {e:?}"),
            InterfaceError::BusyTimeout { waited_ms } => {
                write!(f, "panel still busy after {waited_ms}ms")
            }
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// The usual wiring: one SPI device and three pins sharing an error type.
pub struct Interface<SPI, DC, RST, BUSY> {
    spi: SPI,
    dc: DC,
    rst: RST,
    busy: BUSY,
}

impl<SPI, DC, RST, BUSY> Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
{
    pub fn new(spi: SPI, dc: DC, rst: RST, busy: BUSY) -> Self {
        Self { spi, dc, rst, busy }
    }

    /// Give the bus and pins back.
    pub fn release(self) -> (SPI, DC, RST, BUSY) {
        (self.spi, self.dc, self.rst, self.busy)
    }
}

impl<SPI, DC, RST, BUSY, PinErr> DisplayInterface for Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    BUSY: InputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.dc.set_low().map_err(InterfaceError::Pin)?;
        self.spi.write(&[command]).map_err(InterfaceError::Spi)
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.dc.set_high().map_err(InterfaceError::Pin)?;
        self.spi.write(data).map_err(InterfaceError::Spi)
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        self.rst.set_low().map_err(InterfaceError::Pin)?;
        delay.delay_ms(RESET_PULSE_MS);
        self.rst.set_high().map_err(InterfaceError::Pin)?;
        delay.delay_ms(RESET_PULSE_MS);
        Ok(())
    }

    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        let mut waited_ms = 0;
        while self.busy.is_high().map_err(InterfaceError::Pin)? {
            if waited_ms >= BUSY_TIMEOUT_MS {
                return Err(InterfaceError::BusyTimeout { waited_ms });
            }
            delay.delay_ms(BUSY_POLL_MS);
            waited_ms += BUSY_POLL_MS;
        }
        Ok(())
    }
}
