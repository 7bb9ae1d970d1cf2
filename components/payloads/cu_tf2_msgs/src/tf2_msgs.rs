//! The tf2_msgs message set: the transform broadcast message, the tf2 error
//! report and the `LookupTransform` action with its envelopes.

use bincode::{Decode, Encode};
use core::fmt::{Display, Formatter};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::actionlib_msgs::{GoalID, GoalStatus};
use crate::builtin::{check_string, Duration, Header, Time};
use crate::geometry_msgs::TransformStamped;
use crate::layout::{Scanner, WireLayout};
use crate::message::WireCheck;

// tf2_msgs/TFMessage
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct TFMessage {
    pub transforms: Vec<TransformStamped>,
}

impl TFMessage {
    pub fn new(transforms: Vec<TransformStamped>) -> Self {
        Self { transforms }
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransformStamped> {
        self.transforms.iter()
    }
}

impl FromIterator<TransformStamped> for TFMessage {
    fn from_iter<I: IntoIterator<Item = TransformStamped>>(iter: I) -> Self {
        Self {
            transforms: iter.into_iter().collect(),
        }
    }
}

impl WireLayout for TFMessage {
    fn scan(scanner: &mut Scanner<'_>) -> Result<(), String> {
        scanner.sequence(TransformStamped::scan)
    }
}

impl WireCheck for TFMessage {
    fn check(&self) -> Result<(), String> {
        self.transforms.iter().try_for_each(WireCheck::check)
    }
}

/// Error constants of tf2_msgs/TF2Error, carried as a `uint8` on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Encode, Decode)]
#[repr(u8)]
pub enum Tf2ErrorCode {
    #[default]
    NoError,
    LookupError,
    ConnectivityError,
    ExtrapolationError,
    InvalidArgumentError,
    TimeoutError,
    /// Upstream `TRANSFORM_ERROR`, raised for malformed frame ids.
    InvalidFrameId,
}

impl TryFrom<u8> for Tf2ErrorCode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::NoError,
            1 => Self::LookupError,
            2 => Self::ConnectivityError,
            3 => Self::ExtrapolationError,
            4 => Self::InvalidArgumentError,
            5 => Self::TimeoutError,
            6 => Self::InvalidFrameId,
            other => return Err(format!("unknown tf2 error code {other}")),
        })
    }
}

impl Serialize for Tf2ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for Tf2ErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u8::deserialize(deserializer)?;
        Tf2ErrorCode::try_from(raw).map_err(D::Error::custom)
    }
}

// tf2_msgs/TF2Error
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct TF2Error {
    pub error: Tf2ErrorCode,
    pub error_string: String,
}

impl TF2Error {
    pub fn new(error: Tf2ErrorCode, error_string: impl Into<String>) -> Self {
        Self {
            error,
            error_string: error_string.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error == Tf2ErrorCode::NoError
    }
}

impl Display for TF2Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        if self.error_string.is_empty() {
            write!(f, "{:?}", self.error)
        } else {
            write!(f, "{:?}: {}", self.error, self.error_string)
        }
    }
}

impl WireLayout for TF2Error {
    fn scan(scanner: &mut Scanner<'_>) -> Result<(), String> {
        scanner.code()?;
        scanner.string()
    }
}

impl WireCheck for TF2Error {
    fn check(&self) -> Result<(), String> {
        check_string("error_string", &self.error_string)
    }
}

/// tf2_msgs/LookupTransformGoal
///
/// In the simple mode only `source_time` is used as the lookup time. The
/// advanced mode looks `source_frame` up at `source_time`, and `target_frame`
/// at `target_time`, both through `fixed_frame`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct LookupTransformGoal {
    pub target_frame: String,
    pub source_frame: String,
    pub source_time: Time,
    pub timeout: Duration,
    pub target_time: Time,
    pub fixed_frame: String,
    pub advanced: bool,
}

impl LookupTransformGoal {
    pub fn new(
        target_frame: impl Into<String>,
        source_frame: impl Into<String>,
        time: Time,
        timeout: Duration,
    ) -> Self {
        Self {
            target_frame: target_frame.into(),
            source_frame: source_frame.into(),
            source_time: time,
            timeout,
            ..Default::default()
        }
    }

    pub fn with_advanced(mut self, target_time: Time, fixed_frame: impl Into<String>) -> Self {
        self.advanced = true;
        self.target_time = target_time;
        self.fixed_frame = fixed_frame.into();
        self
    }
}

impl WireLayout for LookupTransformGoal {
    fn scan(scanner: &mut Scanner<'_>) -> Result<(), String> {
        scanner.string()?;
        scanner.string()?;
        Time::scan(scanner)?;
        Duration::scan(scanner)?;
        Time::scan(scanner)?;
        scanner.string()?;
        scanner.bool()
    }
}

impl WireCheck for LookupTransformGoal {
    fn check(&self) -> Result<(), String> {
        check_string("target_frame", &self.target_frame)?;
        check_string("source_frame", &self.source_frame)?;
        check_string("fixed_frame", &self.fixed_frame)?;
        self.source_time.check()?;
        self.target_time.check()?;
        self.timeout.check()
    }
}

// tf2_msgs/LookupTransformFeedback, empty but required by the action protocol
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct LookupTransformFeedback {}

impl WireLayout for LookupTransformFeedback {
    fn scan(_scanner: &mut Scanner<'_>) -> Result<(), String> {
        Ok(())
    }
}

impl WireCheck for LookupTransformFeedback {
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

// tf2_msgs/LookupTransformResult
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct LookupTransformResult {
    pub transform: TransformStamped,
    pub error: TF2Error,
}

impl LookupTransformResult {
    pub fn found(transform: TransformStamped) -> Self {
        Self {
            transform,
            error: TF2Error::default(),
        }
    }

    pub fn failed(error: TF2Error) -> Self {
        Self {
            transform: TransformStamped::default(),
            error,
        }
    }

    /// The transform when the lookup succeeded, the error otherwise.
    pub fn into_result(self) -> Result<TransformStamped, TF2Error> {
        if self.error.is_ok() {
            Ok(self.transform)
        } else {
            Err(self.error)
        }
    }
}

impl WireLayout for LookupTransformResult {
    fn scan(scanner: &mut Scanner<'_>) -> Result<(), String> {
        TransformStamped::scan(scanner)?;
        TF2Error::scan(scanner)
    }
}

impl WireCheck for LookupTransformResult {
    fn check(&self) -> Result<(), String> {
        self.transform.check()?;
        self.error.check()
    }
}

// tf2_msgs/LookupTransformActionGoal
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct LookupTransformActionGoal {
    pub header: Header,
    pub goal_id: GoalID,
    pub goal: LookupTransformGoal,
}

impl WireLayout for LookupTransformActionGoal {
    fn scan(scanner: &mut Scanner<'_>) -> Result<(), String> {
        Header::scan(scanner)?;
        GoalID::scan(scanner)?;
        LookupTransformGoal::scan(scanner)
    }
}

impl WireCheck for LookupTransformActionGoal {
    fn check(&self) -> Result<(), String> {
        self.header.check()?;
        self.goal_id.check()?;
        self.goal.check()
    }
}

// tf2_msgs/LookupTransformActionResult
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct LookupTransformActionResult {
    pub header: Header,
    pub status: GoalStatus,
    pub result: LookupTransformResult,
}

impl WireLayout for LookupTransformActionResult {
    fn scan(scanner: &mut Scanner<'_>) -> Result<(), String> {
        Header::scan(scanner)?;
        GoalStatus::scan(scanner)?;
        LookupTransformResult::scan(scanner)
    }
}

impl WireCheck for LookupTransformActionResult {
    fn check(&self) -> Result<(), String> {
        self.header.check()?;
        self.status.check()?;
        self.result.check()
    }
}

// tf2_msgs/LookupTransformActionFeedback
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct LookupTransformActionFeedback {
    pub header: Header,
    pub status: GoalStatus,
    pub feedback: LookupTransformFeedback,
}

impl WireLayout for LookupTransformActionFeedback {
    fn scan(scanner: &mut Scanner<'_>) -> Result<(), String> {
        Header::scan(scanner)?;
        GoalStatus::scan(scanner)?;
        LookupTransformFeedback::scan(scanner)
    }
}

impl WireCheck for LookupTransformActionFeedback {
    fn check(&self) -> Result<(), String> {
        self.header.check()?;
        self.status.check()
    }
}

/// tf2_msgs/LookupTransformAction, the three envelopes of one request/response cycle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct LookupTransformAction {
    pub action_goal: LookupTransformActionGoal,
    pub action_result: LookupTransformActionResult,
    pub action_feedback: LookupTransformActionFeedback,
}

impl WireLayout for LookupTransformAction {
    fn scan(scanner: &mut Scanner<'_>) -> Result<(), String> {
        LookupTransformActionGoal::scan(scanner)?;
        LookupTransformActionResult::scan(scanner)?;
        LookupTransformActionFeedback::scan(scanner)
    }
}

impl WireCheck for LookupTransformAction {
    fn check(&self) -> Result<(), String> {
        self.action_goal.check()?;
        self.action_result.check()?;
        self.action_feedback.check()
    }
}
