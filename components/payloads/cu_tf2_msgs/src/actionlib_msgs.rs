//! Envelope types of the action protocol: every goal, feedback and result
//! travels wrapped with a goal id and, on the way back, a goal status.

use bincode::{Decode, Encode};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::builtin::{check_string, Time};
use crate::layout::{Scanner, WireLayout};
use crate::message::WireCheck;

// actionlib_msgs/GoalID
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct GoalID {
    pub stamp: Time,
    pub id: String,
}

impl GoalID {
    pub fn new(id: impl Into<String>, stamp: Time) -> Self {
        Self {
            stamp,
            id: id.into(),
        }
    }
}

impl WireLayout for GoalID {
    fn scan(scanner: &mut Scanner<'_>) -> Result<(), String> {
        Time::scan(scanner)?;
        scanner.string()
    }
}

impl WireCheck for GoalID {
    fn check(&self) -> Result<(), String> {
        self.stamp.check()?;
        check_string("goal_id.id", &self.id)
    }
}

/// Status constants of actionlib_msgs/GoalStatus, carried as a `uint8` on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Encode, Decode)]
#[repr(u8)]
pub enum GoalStatusCode {
    #[default]
    Pending,
    Active,
    Preempted,
    Succeeded,
    Aborted,
    Rejected,
    Preempting,
    Recalling,
    Recalled,
    Lost,
}

impl GoalStatusCode {
    /// Terminal states: the action server will not send anything else for the goal.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Preempted
                | Self::Succeeded
                | Self::Aborted
                | Self::Rejected
                | Self::Recalled
                | Self::Lost
        )
    }
}

impl TryFrom<u8> for GoalStatusCode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Pending,
            1 => Self::Active,
            2 => Self::Preempted,
            3 => Self::Succeeded,
            4 => Self::Aborted,
            5 => Self::Rejected,
            6 => Self::Preempting,
            7 => Self::Recalling,
            8 => Self::Recalled,
            9 => Self::Lost,
            other => return Err(format!("unknown goal status {other}")),
        })
    }
}

impl Serialize for GoalStatusCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for GoalStatusCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u8::deserialize(deserializer)?;
        GoalStatusCode::try_from(raw).map_err(D::Error::custom)
    }
}

// actionlib_msgs/GoalStatus
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct GoalStatus {
    pub goal_id: GoalID,
    pub status: GoalStatusCode,
    pub text: String,
}

impl WireLayout for GoalStatus {
    fn scan(scanner: &mut Scanner<'_>) -> Result<(), String> {
        GoalID::scan(scanner)?;
        scanner.code()?;
        scanner.string()
    }
}

impl WireCheck for GoalStatus {
    fn check(&self) -> Result<(), String> {
        self.goal_id.check()?;
        check_string("status.text", &self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_match_wire_values() {
        for raw in 0u8..=9 {
            let code = GoalStatusCode::try_from(raw).unwrap();
            assert_eq!(code as u8, raw);
        }
        assert!(GoalStatusCode::try_from(10).is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(GoalStatusCode::Succeeded.is_terminal());
        assert!(GoalStatusCode::Lost.is_terminal());
        assert!(!GoalStatusCode::Active.is_terminal());
        assert!(!GoalStatusCode::Recalling.is_terminal());
    }
}
