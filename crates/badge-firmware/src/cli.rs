//! Line console on UART0, which the badge routes through its USB-serial bridge

use std::collections::VecDeque;

use esp_idf_svc::sys;

const CONSOLE_UART: sys::uart_port_t = 0;
const RX_RING_BYTES: i32 = 1024;
const MAX_LINE_BYTES: usize = 512;
const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;

pub struct SerialCli {
    partial: Vec<u8>,
    ready: VecDeque<String>,
    overflowed: bool,
}

impl SerialCli {
    pub fn new() -> Self {
        let err = unsafe {
            sys::uart_driver_install(
                CONSOLE_UART,
                RX_RING_BYTES,
                0,
                0,
                core::ptr::null_mut(),
                0,
            )
        };
        if err != sys::ESP_OK {
            log::error!("console: uart_driver_install failed ({})", err);
        } else {
            unsafe { sys::esp_vfs_dev_uart_use_driver(CONSOLE_UART) };
        }
        Self {
            partial: Vec::with_capacity(MAX_LINE_BYTES),
            ready: VecDeque::new(),
            overflowed: false,
        }
    }

    /// Next complete line, if any. Never blocks.
    pub fn poll_line(&mut self) -> Option<String> {
        if self.ready.is_empty() {
            self.drain_uart();
        }
        self.ready.pop_front()
    }

    fn drain_uart(&mut self) {
        let mut chunk = [0u8; 64];
        loop {
            let read = unsafe {
                sys::uart_read_bytes(
                    CONSOLE_UART,
                    chunk.as_mut_ptr().cast(),
                    chunk.len() as u32,
                    0,
                )
            };
            let Ok(read) = usize::try_from(read) else {
                return;
            };
            if read == 0 {
                return;
            }
            for &byte in &chunk[..read] {
                self.push_byte(byte);
            }
        }
    }

    fn push_byte(&mut self, byte: u8) {
        match byte {
            b'\r' => {}
            b'\n' => {
                self.write_str("\r\n");
                let line = String::from_utf8_lossy(&self.partial).trim().to_string();
                self.partial.clear();
                if std::mem::take(&mut self.overflowed) {
                    log::warn!("console: line over {} bytes dropped", MAX_LINE_BYTES);
                } else if !line.is_empty() {
                    self.ready.push_back(line);
                }
            }
            BACKSPACE | DELETE => {
                if self.partial.pop().is_some() {
                    self.write_str("\x08 \x08");
                }
            }
            _ if self.overflowed => {}
            _ => {
                if self.partial.len() == MAX_LINE_BYTES {
                    self.overflowed = true;
                    self.partial.clear();
                    return;
                }
                self.partial.push(byte);
                self.write_bytes(&[byte]);
            }
        }
    }

    fn write_bytes(&self, bytes: &[u8]) {
        unsafe {
            sys::uart_write_bytes(CONSOLE_UART, bytes.as_ptr().cast(), bytes.len());
        }
    }

    pub fn write_str(&self, text: &str) {
        self.write_bytes(text.as_bytes());
    }

    pub fn write_line(&self, text: &str) {
        self.write_str(text);
        self.write_str("\r\n");
    }
}
