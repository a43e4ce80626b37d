//! Flow switch sampling and boot-time wake classification.
//!
//! The node has exactly one sensor: a reed/paddle flow switch on a digital
//! input line.  [`flow_switch::FlowSwitch`] turns a line read into a
//! [`Sample`]; [`wake`] consumes the first few samples after boot to
//! decide whether the switch or the power-management timer woke us.

pub mod flow_switch;
pub mod wake;

use crate::error::SampleFault;

/// One reading of the flow switch line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sample {
    /// Line high: water is flowing.
    Active,
    /// Line low: no flow.
    Inactive,
    /// The driver returned an error instead of a level.  Never a valid
    /// sensor reading.
    Fault,
}

impl Sample {
    /// Map a line level (high = flow) to a sample.
    pub const fn from_level(high: bool) -> Self {
        if high { Self::Active } else { Self::Inactive }
    }

    /// Reject [`Sample::Fault`] so callers can `?` it.
    pub const fn checked(self) -> Result<Self, SampleFault> {
        match self {
            Self::Fault => Err(SampleFault),
            other => Ok(other),
        }
    }

    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}
