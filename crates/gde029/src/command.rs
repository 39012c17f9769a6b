// GDEH029A1 / SSD1608 command definitions

// Initialization and reset
pub const DRIVER_OUTPUT_CONTROL: u8 = 0x01; // Gate count and scan direction
pub const BOOSTER_SOFT_START: u8 = 0x0C; // Booster soft-start control
pub const DEEP_SLEEP: u8 = 0x10; // Deep sleep mode
pub const DATA_ENTRY_MODE: u8 = 0x11; // Address counter increment direction
pub const SOFT_RESET: u8 = 0x12; // Soft reset

// Display update
pub const MASTER_ACTIVATION: u8 = 0x20; // Run the update sequence
pub const DISPLAY_UPDATE_CTRL2: u8 = 0x22; // Update sequence options
pub const CTRL2_CLOCK_ANALOG_PATTERN: u8 = 0xC4; // Clock on, analog on, display pattern
pub const TERMINATE_FRAME: u8 = 0xFF; // NOP, terminates a frame read/write

// RAM
pub const WRITE_RAM: u8 = 0x24; // Write to BW RAM
pub const SET_RAM_X_RANGE: u8 = 0x44; // RAM X start/end, in bytes
pub const SET_RAM_Y_RANGE: u8 = 0x45; // RAM Y start/end, in gates
pub const SET_RAM_X_COUNTER: u8 = 0x4E; // RAM X address counter
pub const SET_RAM_Y_COUNTER: u8 = 0x4F; // RAM Y address counter

// Waveform and timing
pub const WRITE_VCOM: u8 = 0x2C; // VCOM register
pub const WRITE_LUT: u8 = 0x32; // Waveform LUT (30 bytes)
pub const DUMMY_LINE_PERIOD: u8 = 0x3A; // Dummy line period
pub const GATE_LINE_WIDTH: u8 = 0x3B; // Gate line width
pub const BORDER_WAVEFORM: u8 = 0x3C; // Border waveform control
