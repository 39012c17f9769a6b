//! In-memory board for host tests and simulators.

extern crate alloc;

use alloc::collections::{BTreeMap, VecDeque};
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::HalError;
use crate::hal::{Board, DisplayFlags, Entropy, FlashVfs, Leds, MountConfig, MountHandle, Panel, Power};

/// One image pushed to the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub image: Vec<u8>,
    pub flags: DisplayFlags,
}

#[derive(Debug, Default)]
pub struct MockPanel {
    pub initialized: bool,
    pub frames: Vec<Frame>,
    pub fail: bool,
}

impl MockPanel {
    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl Panel for MockPanel {
    fn init(&mut self) -> Result<(), HalError> {
        if self.fail {
            return Err(HalError::new(-1, "panel not responding"));
        }
        self.initialized = true;
        Ok(())
    }

    fn display(&mut self, image: &[u8], flags: DisplayFlags) -> Result<(), HalError> {
        if self.fail {
            return Err(HalError::new(-1, "panel not responding"));
        }
        self.frames.push(Frame {
            image: image.to_vec(),
            flags,
        });
        Ok(())
    }
}

#[derive(Debug)]
pub struct MockPower {
    pub initialized: bool,
    pub charging: bool,
    pub battery_mv: i32,
    pub usb_mv: i32,
}

impl Default for MockPower {
    fn default() -> Self {
        Self {
            initialized: false,
            charging: false,
            battery_mv: 4100,
            usb_mv: 0,
        }
    }
}

impl Power for MockPower {
    fn init(&mut self) -> Result<(), HalError> {
        self.initialized = true;
        Ok(())
    }

    fn battery_charging(&mut self) -> Result<bool, HalError> {
        Ok(self.charging)
    }

    fn battery_millivolts(&mut self) -> Result<i32, HalError> {
        Ok(self.battery_mv)
    }

    fn usb_millivolts(&mut self) -> Result<i32, HalError> {
        Ok(self.usb_mv)
    }
}

#[derive(Debug, Default)]
pub struct MockLeds {
    pub initialized: bool,
}

impl Leds for MockLeds {
    fn init(&mut self) -> Result<(), HalError> {
        self.initialized = true;
        Ok(())
    }
}

/// Scripted words first, then a fixed xorshift sequence.
#[derive(Debug)]
pub struct MockEntropy {
    scripted: VecDeque<u32>,
    state: u32,
    draws: usize,
}

impl Default for MockEntropy {
    fn default() -> Self {
        Self {
            scripted: VecDeque::new(),
            state: 0x2017_5A17,
            draws: 0,
        }
    }
}

impl MockEntropy {
    pub fn push_words(&mut self, words: &[u32]) {
        self.scripted.extend(words.iter().copied());
    }

    /// Words handed out so far.
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl Entropy for MockEntropy {
    fn next_u32(&mut self) -> u32 {
        self.draws += 1;
        if let Some(word) = self.scripted.pop_front() {
            return word;
        }
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

/// Flash VFS that tracks mount points in memory.
///
/// Mounting an occupied path fails, as the IDF VFS registry does.
#[derive(Debug, Default)]
pub struct MockVfs {
    mounted: BTreeMap<String, String>,
    next_raw: i32,
    pub last_config: Option<MountConfig>,
    pub fail_mount: bool,
    pub fail_unmount: bool,
}

impl MockVfs {
    /// Mount point → partition label.
    pub fn mounted(&self) -> &BTreeMap<String, String> {
        &self.mounted
    }
}

impl FlashVfs for MockVfs {
    fn mount(
        &mut self,
        partition: &str,
        path: &str,
        config: &MountConfig,
    ) -> Result<MountHandle, HalError> {
        self.last_config = Some(*config);
        if self.fail_mount {
            return Err(HalError::new(0x105, "partition not found"));
        }
        if self.mounted.contains_key(path) {
            return Err(HalError::new(0x103, "mount point busy"));
        }
        self.mounted.insert(String::from(path), String::from(partition));
        let raw = self.next_raw;
        self.next_raw += 1;
        Ok(MountHandle::new(raw, path))
    }

    fn unmount(&mut self, handle: MountHandle) -> Result<(), HalError> {
        if self.fail_unmount {
            return Err(HalError::new(0x103, "unmount refused"));
        }
        match self.mounted.remove(handle.path()) {
            Some(_) => Ok(()),
            None => Err(HalError::new(0x103, "not mounted")),
        }
    }
}

#[derive(Debug, Default)]
pub struct MockBoard {
    pub panel: MockPanel,
    pub power: MockPower,
    pub leds: MockLeds,
    pub entropy: MockEntropy,
    pub vfs: MockVfs,
}

impl MockBoard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Board for MockBoard {
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
