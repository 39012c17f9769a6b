//! SHA2017 badge hardware behind the `badge_core::hal` traits

use badge_core::hal::{Board, Entropy, FlashVfs, Leds, Panel, Power};
use badge_core::HalError;
use esp_idf_svc::hal::gpio::{AnyInputPin, AnyOutputPin, Input, Output, PinDriver};
use esp_idf_svc::sys;
use gde029::DisplayInterface;

use crate::flash_vfs::EspFlashVfs;
use crate::panel::EinkPanel;

const ADC_WIDTH_BIT_12: u32 = 3;
const ADC_ATTEN_DB_11: u32 = 3;
const ADC_FULL_SCALE_MV: i32 = 3900;
const ADC_MAX_RAW: i32 = 4095;

/// Battery sense sits behind a 1:2 divider
const VBAT_CHANNEL: sys::adc1_channel_t = sys::adc1_channel_t_ADC1_CHANNEL_7;
const VBAT_DIVIDER: i32 = 2;
/// USB sense sits behind a 1:2 divider
const VUSB_CHANNEL: sys::adc1_channel_t = sys::adc1_channel_t_ADC1_CHANNEL_5;
const VUSB_DIVIDER: i32 = 2;

fn esp_check(res: sys::esp_err_t, what: &str) -> Result<(), HalError> {
    if res == sys::ESP_OK {
        Ok(())
    } else {
        Err(HalError::new(res, format!("{} failed", what)))
    }
}

pub struct EspPower {
    /// Charger status output, low while charging
    charge_status: PinDriver<'static, AnyInputPin, Input>,
}

impl EspPower {
    pub fn new(charge_status: PinDriver<'static, AnyInputPin, Input>) -> Self {
        Self { charge_status }
    }

    fn read_millivolts(channel: sys::adc1_channel_t, divider: i32) -> Result<i32, HalError> {
        let raw = unsafe { sys::adc1_get_raw(channel) };
        if raw < 0 {
            return Err(HalError::new(raw, "adc read failed"));
        }
        Ok(raw * ADC_FULL_SCALE_MV * divider / ADC_MAX_RAW)
    }
}

impl Power for EspPower {
    fn init(&mut self) -> Result<(), HalError> {
        unsafe {
            esp_check(sys::adc1_config_width(ADC_WIDTH_BIT_12), "adc width")?;
            esp_check(sys::adc1_config_channel_atten(VBAT_CHANNEL, ADC_ATTEN_DB_11), "vbat atten")?;
            esp_check(sys::adc1_config_channel_atten(VUSB_CHANNEL, ADC_ATTEN_DB_11), "vusb atten")?;
        }
        log::info!("power sensing ready");
        Ok(())
    }

    fn battery_charging(&mut self) -> Result<bool, HalError> {
        Ok(self.charge_status.is_low())
    }

    fn battery_millivolts(&mut self) -> Result<i32, HalError> {
        Self::read_millivolts(VBAT_CHANNEL, VBAT_DIVIDER)
    }

    fn usb_millivolts(&mut self) -> Result<i32, HalError> {
        Self::read_millivolts(VUSB_CHANNEL, VUSB_DIVIDER)
    }
}

pub struct EspLeds {
    /// Switches the LED strip supply
    enable: PinDriver<'static, AnyOutputPin, Output>,
}

impl EspLeds {
    pub fn new(enable: PinDriver<'static, AnyOutputPin, Output>) -> Self {
        Self { enable }
    }
}

impl Leds for EspLeds {
    fn init(&mut self) -> Result<(), HalError> {
        self.enable
            .set_high()
            .map_err(|err| HalError::new(err.code(), "led supply enable failed"))?;
        log::info!("LED supply on");
        Ok(())
    }
}

pub struct EspEntropy;

impl Entropy for EspEntropy {
    fn next_u32(&mut self) -> u32 {
        unsafe { sys::esp_random() }
    }
}

pub struct EspBoard<I: DisplayInterface> {
    panel: EinkPanel<I>,
    power: EspPower,
    leds: EspLeds,
    entropy: EspEntropy,
    vfs: EspFlashVfs,
}

impl<I: DisplayInterface> EspBoard<I> {
    pub fn new(panel: EinkPanel<I>, power: EspPower, leds: EspLeds) -> Self {
        Self {
            panel,
            power,
            leds,
            entropy: EspEntropy,
            vfs: EspFlashVfs::new(),
        }
    }
}

impl<I: DisplayInterface> Board for EspBoard<I> {
    fn panel(&mut self) -> &mut dyn Panel {
        &mut self.panel
    }

    fn power(&mut self) -> &mut dyn Power {
        &mut self.power
    }

    fn leds(&mut self) -> &mut dyn Leds {
        &mut self.leds
    }

    fn entropy(&mut self) -> &mut dyn Entropy {
        &mut self.entropy
    }

    fn vfs(&mut self) -> &mut dyn FlashVfs {
        &mut self.vfs
    }
}
