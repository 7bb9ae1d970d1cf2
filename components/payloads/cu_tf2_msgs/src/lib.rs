//! The ROS `tf2_msgs` message set for Copper: transform broadcasts, the tf2
//! error report and the `LookupTransform` action, with a name keyed registry
//! that encodes and decodes them for a transport.
//!
//! ```
//! use cu_tf2_msgs::{Duration, LookupTransformGoal, MessageRegistry, Tf2Message, Time, WireConfig};
//!
//! let registry = MessageRegistry::tf2_msgs(WireConfig::cdr()).unwrap();
//! let timeout = Duration::from_secs_f64(5.0);
//! let goal = LookupTransformGoal::new("base_link", "map", Time::default(), timeout);
//! let bytes = registry.encode(&goal).unwrap();
//! let decoded = registry.deserialize("LookupTransformGoal", &bytes).unwrap();
//! assert_eq!(decoded, Tf2Message::from(goal));
//! ```

pub mod actionlib_msgs;
pub mod builtin;
pub mod error;
pub mod geometry_msgs;
pub mod layout;
pub mod message;
pub mod registry;
pub mod tf2_msgs;
pub mod wire;

pub use actionlib_msgs::{GoalID, GoalStatus, GoalStatusCode};
pub use builtin::{Duration, Header, Time};
pub use error::{RegistryError, RegistryResult};
pub use geometry_msgs::{Quaternion, Transform, TransformStamped, Vector3};
pub use layout::{Scanner, WireLayout};
pub use message::{RosMessage, Tf2Message, WireCheck, TF2_MSGS_TYPE_NAMES};
pub use registry::{MessageCodec, MessageRegistry, RegistryBuilder};
pub use tf2_msgs::{
    LookupTransformAction, LookupTransformActionFeedback, LookupTransformActionGoal,
    LookupTransformActionResult, LookupTransformFeedback, LookupTransformGoal,
    LookupTransformResult, TF2Error, TFMessage, Tf2ErrorCode,
};
pub use wire::{read_wire_config, read_wire_config_str, ByteOrder, WireConfig, WireFormat};

/// The registered message types under their ROS package name.
pub mod msg {
    pub use crate::tf2_msgs::*;
}
