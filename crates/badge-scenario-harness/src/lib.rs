//! Host-side scenario test harness for scripted call sequences.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use badge_core::framebuffer::{Framebuffer, FRAME_SIZE};
use badge_core::mock::{Frame, MockBoard};
use badge_core::{BadgeError, Runtime, Value, PANEL_HEIGHT, PANEL_WIDTH};
use embedded_graphics::pixelcolor::BinaryColor;
use png::{BitDepth, ColorType, Encoder};

/// Couples the runtime with a mock board for scenario tests.
pub struct ScenarioHarness {
    runtime: Runtime<MockBoard>,
}

impl ScenarioHarness {
    pub fn new() -> Self {
        Self::with_board(MockBoard::new())
    }

    /// Construct a harness around caller-prepared board state.
    pub fn with_board(board: MockBoard) -> Self {
        Self {
            runtime: Runtime::new(board),
        }
    }

    /// Run one console line.
    pub fn run(&mut self, line: &str) -> Result<Value, BadgeError> {
        self.runtime.run_line(line)
    }

    /// Run one console line that must succeed.
    pub fn run_ok(&mut self, line: &str) -> Value {
        match self.run(line) {
            Ok(value) => value,
            Err(err) => panic!("`{}` failed: {}", line, err),
        }
    }

    /// Run every non-blank, non-comment line; stops at the first failure.
    pub fn run_script(&mut self, script: &str) -> Result<Vec<Value>, (usize, BadgeError)> {
        let mut results = Vec::new();
        for (idx, line) in script.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            results.push(self.run(line).map_err(|err| (idx + 1, err))?);
        }
        Ok(results)
    }

    pub fn board(&self) -> &MockBoard {
        self.runtime.board()
    }

    /// Access the mock board for scenario setup.
    pub fn board_mut(&mut self) -> &mut MockBoard {
        self.runtime.board_mut()
    }

    pub fn runtime(&self) -> &Runtime<MockBoard> {
        &self.runtime
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        self.runtime.framebuffer()
    }

    pub fn is_black(&self, x: i32, y: i32) -> bool {
        self.framebuffer().pixel(x, y) == Some(BinaryColor::On)
    }

    /// Black pixels inside `[x0, x1) x [y0, y1)`.
    pub fn black_in(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> usize {
        (y0..y1)
            .flat_map(|y| (x0..x1).map(move |x| (x, y)))
            .filter(|&(x, y)| self.is_black(x, y))
            .count()
    }

    /// Last image pushed to the panel.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.board().panel.last_frame()
    }

    /// Save the current framebuffer to a PNG (white = Off, black = On).
    pub fn save_screenshot_png(&self, path: impl AsRef<Path>) -> Result<(), String> {
        save_frame_png(self.framebuffer().buffer(), path)
    }
}

impl Default for ScenarioHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Save a landscape 1bpp frame as an 8-bit grayscale PNG.
pub fn save_frame_png(frame: &[u8], path: impl AsRef<Path>) -> Result<(), String> {
    if frame.len() < FRAME_SIZE {
        return Err(format!("frame holds {} bytes, need {}", frame.len(), FRAME_SIZE));
    }
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }

    let mut fb = Framebuffer::new();
    fb.buffer_mut().copy_from_slice(&frame[..FRAME_SIZE]);
    let mut data = Vec::with_capacity((PANEL_WIDTH * PANEL_HEIGHT) as usize);
    for y in 0..PANEL_HEIGHT as i32 {
        for x in 0..PANEL_WIDTH as i32 {
            let value = match fb.pixel(x, y) {
                Some(BinaryColor::On) => 0u8,
                _ => 255u8,
            };
            data.push(value);
        }
    }

    let file = File::create(path).map_err(|e| e.to_string())?;
    let writer = BufWriter::new(file);
    let mut encoder = Encoder::new(writer, PANEL_WIDTH, PANEL_HEIGHT);
    encoder.set_color(ColorType::Grayscale);
    encoder.set_depth(BitDepth::Eight);
    let mut png_writer = encoder.write_header().map_err(|e| e.to_string())?;
    png_writer
        .write_image_data(&data)
        .map_err(|e| e.to_string())
}
