//! Prelude

pub use crate::hal::prelude::*;
pub use crate::port::HardwarePort as _timer16_pwm_port_HardwarePort;
pub use crate::time::U32Ext as _timer16_pwm_time_U32Ext;
