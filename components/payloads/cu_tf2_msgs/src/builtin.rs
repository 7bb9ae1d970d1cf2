use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::layout::{Scanner, WireLayout};
use crate::message::WireCheck;

const NANOS_PER_SEC: u32 = 1_000_000_000;

// std_msgs time primitive
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Time {
    pub secs: u32,
    pub nsecs: u32,
}

impl Time {
    pub const fn new(secs: u32, nsecs: u32) -> Self {
        Self { secs, nsecs }
    }

    /// Saturates at `u32::MAX` seconds.
    pub fn from_nanos(nanos: u64) -> Self {
        let secs = nanos / NANOS_PER_SEC as u64;
        Self {
            secs: secs.min(u32::MAX as u64) as u32,
            nsecs: (nanos % NANOS_PER_SEC as u64) as u32,
        }
    }

    pub fn as_nanos(&self) -> u64 {
        self.secs as u64 * NANOS_PER_SEC as u64 + self.nsecs as u64
    }
}

impl WireLayout for Time {
    fn scan(scanner: &mut Scanner<'_>) -> Result<(), String> {
        scanner.u32()?;
        scanner.u32()
    }
}

impl WireCheck for Time {
    fn check(&self) -> Result<(), String> {
        if self.nsecs >= NANOS_PER_SEC {
            return Err(format!("time nsecs {} is not below one second", self.nsecs));
        }
        Ok(())
    }
}

// std_msgs duration primitive, kept normalized: 0 <= nsecs < 1s, sign carried by secs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Duration {
    pub secs: i32,
    pub nsecs: i32,
}

impl Duration {
    pub const fn new(secs: i32, nsecs: i32) -> Self {
        Self { secs, nsecs }
    }

    pub fn from_secs_f64(secs: f64) -> Self {
        let whole = secs.floor();
        let nsecs = ((secs - whole) * NANOS_PER_SEC as f64).round() as i32;
        // rounding can push the fractional part to a full second
        if nsecs >= NANOS_PER_SEC as i32 {
            Self::new(whole as i32 + 1, 0)
        } else {
            Self::new(whole as i32, nsecs)
        }
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.secs as f64 + self.nsecs as f64 / NANOS_PER_SEC as f64
    }
}

impl From<std::time::Duration> for Duration {
    fn from(value: std::time::Duration) -> Self {
        Self {
            secs: value.as_secs().min(i32::MAX as u64) as i32,
            nsecs: value.subsec_nanos() as i32,
        }
    }
}

impl WireLayout for Duration {
    fn scan(scanner: &mut Scanner<'_>) -> Result<(), String> {
        scanner.i32()?;
        scanner.i32()
    }
}

impl WireCheck for Duration {
    fn check(&self) -> Result<(), String> {
        if !(0..NANOS_PER_SEC as i32).contains(&self.nsecs) {
            return Err(format!("duration nsecs {} is not normalized", self.nsecs));
        }
        Ok(())
    }
}

// std_msgs/Header
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Header {
    pub seq: u32,
    pub stamp: Time,
    pub frame_id: String,
}

impl Header {
    pub fn new(frame_id: impl Into<String>, stamp: Time) -> Self {
        Self {
            seq: 0,
            stamp,
            frame_id: frame_id.into(),
        }
    }
}

impl WireLayout for Header {
    fn scan(scanner: &mut Scanner<'_>) -> Result<(), String> {
        scanner.u32()?;
        Time::scan(scanner)?;
        scanner.string()
    }
}

impl WireCheck for Header {
    fn check(&self) -> Result<(), String> {
        self.stamp.check()?;
        check_string("header.frame_id", &self.frame_id)
    }
}

/// Strings travel NUL-terminated on ROS transports, so an embedded NUL cannot round-trip.
pub(crate) fn check_string(field: &str, value: &str) -> Result<(), String> {
    if value.contains('\0') {
        return Err(format!("{field} contains a NUL character"));
    }
    Ok(())
}
