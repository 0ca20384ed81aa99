//! GPIO / peripheral pin assignments for the rig controller board.
//!
//! `esp-idf-hal` hands out pins as distinct `Peripherals::pins.gpioN`
//! fields, so `main` names those fields directly and checks them against
//! the numbers here at compile time.  On the host the numbers are only
//! informational.

// ---------------------------------------------------------------------------
// Relay bank (74HC595 shift-register chain)
// ---------------------------------------------------------------------------

/// Number of daisy-chained 74HC595 registers (8 relays each).
pub const SHIFT_REGISTER_COUNT: usize = 4;

pub const SHIFT_REGISTER_DATA_GPIO: i32 = 6;
pub const SHIFT_REGISTER_CLOCK_GPIO: i32 = 7;
pub const SHIFT_REGISTER_LATCH_GPIO: i32 = 8;

// ---------------------------------------------------------------------------
// Load cell (HX711 amplifier)
// ---------------------------------------------------------------------------

/// HX711 DOUT: LOW signals a conversion is ready.
pub const SCALE_DATA_GPIO: i32 = 2;
pub const SCALE_CLOCK_GPIO: i32 = 3;

// ---------------------------------------------------------------------------
// LED strip (WS2812B, GRB order, RMT channel 0)
// ---------------------------------------------------------------------------

pub const LED_DATA_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Temperature (NTC thermistor divider, ADC1 channel 8)
// ---------------------------------------------------------------------------

pub const TEMP_ADC_GPIO: i32 = 9;

// ---------------------------------------------------------------------------
// Serial CLI (UART1; the log console stays on UART0 / USB-CDC)
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;

/// Every GPIO assignment, for overlap checks.
pub const ALL_GPIOS: [i32; 9] = [
    SHIFT_REGISTER_DATA_GPIO,
    SHIFT_REGISTER_CLOCK_GPIO,
    SHIFT_REGISTER_LATCH_GPIO,
    SCALE_DATA_GPIO,
    SCALE_CLOCK_GPIO,
    LED_DATA_GPIO,
    TEMP_ADC_GPIO,
    UART_TX_GPIO,
    UART_RX_GPIO,
];
