use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::builtin::{check_string, Header, Time};
use crate::layout::{Scanner, WireLayout};
use crate::message::WireCheck;

// geometry_msgs/Vector3
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl WireLayout for Vector3 {
    fn scan(scanner: &mut Scanner<'_>) -> Result<(), String> {
        scanner.f64()?;
        scanner.f64()?;
        scanner.f64()
    }
}

impl WireCheck for Vector3 {
    fn check(&self) -> Result<(), String> {
        check_finite("vector3", &[self.x, self.y, self.z])
    }
}

// geometry_msgs/Quaternion
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }
}

impl WireLayout for Quaternion {
    fn scan(scanner: &mut Scanner<'_>) -> Result<(), String> {
        scanner.f64()?;
        scanner.f64()?;
        scanner.f64()?;
        scanner.f64()
    }
}

impl WireCheck for Quaternion {
    fn check(&self) -> Result<(), String> {
        check_finite("quaternion", &[self.x, self.y, self.z, self.w])
    }
}

/// NaN never compares equal to itself, so it could not survive a round trip.
fn check_finite(field: &str, values: &[f64]) -> Result<(), String> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(v) => Err(format!("{field} has a non finite component {v}")),
        None => Ok(()),
    }
}

// geometry_msgs/Transform
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Transform {
    pub translation: Vector3,
    pub rotation: Quaternion,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vector3::new(0.0, 0.0, 0.0),
        rotation: Quaternion::IDENTITY,
    };
}

impl WireLayout for Transform {
    fn scan(scanner: &mut Scanner<'_>) -> Result<(), String> {
        Vector3::scan(scanner)?;
        Quaternion::scan(scanner)
    }
}

impl WireCheck for Transform {
    fn check(&self) -> Result<(), String> {
        self.translation.check()?;
        self.rotation.check()
    }
}

/// geometry_msgs/TransformStamped
///
/// The parent frame and the timestamp live in the header, the child frame
/// next to it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct TransformStamped {
    pub header: Header,
    pub child_frame_id: String,
    pub transform: Transform,
}

impl TransformStamped {
    pub fn new(
        parent_frame: impl Into<String>,
        child_frame: impl Into<String>,
        stamp: Time,
        transform: Transform,
    ) -> Self {
        Self {
            header: Header::new(parent_frame, stamp),
            child_frame_id: child_frame.into(),
            transform,
        }
    }

    pub fn parent_frame(&self) -> &str {
        &self.header.frame_id
    }

    pub fn stamp(&self) -> Time {
        self.header.stamp
    }
}

impl WireLayout for TransformStamped {
    fn scan(scanner: &mut Scanner<'_>) -> Result<(), String> {
        Header::scan(scanner)?;
        scanner.string()?;
        Transform::scan(scanner)
    }
}

impl WireCheck for TransformStamped {
    fn check(&self) -> Result<(), String> {
        self.header.check()?;
        check_string("child_frame_id", &self.child_frame_id)?;
        self.transform.check()
    }
}
