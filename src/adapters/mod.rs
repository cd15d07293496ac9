//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to                         |
//! |------------|---------------|-------------------------------------|
//! | `hal`      | DigitalInput  | embedded-hal `InputPin` (buttons)   |
//! |            | DigitalOutput | embedded-hal `OutputPin` (LEDs, INx)|
//! |            | PwmOutput     | embedded-hal `SetDutyCycle` (LEDC)  |
//! | `log_sink` | EventSink     | Serial log output                   |

pub mod hal;
pub mod log_sink;
