//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements    | Connects to                    |
//! |-------------|---------------|--------------------------------|
//! | `eeprom`    | EepromPort    | NVS blob / in-memory image     |
//! | `led_strip` | PixelPort     | smart-leds writer (RMT WS2812) |
//! | `serial`    | Transport     | ESP-IDF UART1                  |
//! | `adc`       | AdcPort       | ESP-IDF oneshot ADC            |
//! | `time`      | -             | ESP32 system timer             |

pub mod eeprom;
pub mod led_strip;
pub mod time;

#[cfg(target_os = "espidf")]
pub mod adc;
#[cfg(target_os = "espidf")]
pub mod serial;
