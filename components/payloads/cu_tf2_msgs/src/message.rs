use bincode::{Decode, Encode};
use core::fmt::Debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::layout::WireLayout;
use crate::tf2_msgs::{
    LookupTransformAction, LookupTransformActionFeedback, LookupTransformActionGoal,
    LookupTransformActionResult, LookupTransformFeedback, LookupTransformGoal,
    LookupTransformResult, TF2Error, TFMessage,
};

// By default use Rust type as ROS type
#[macro_export]
macro_rules! ros_type_name {
    ($t:ty) => {{
        std::any::type_name::<$t>().rsplit("::").next().unwrap_or_default()
    }};
}

/// Value constraints the Rust types cannot express on their own
/// (normalized times, NUL-free strings).
/// Checked before encoding and after decoding.
pub trait WireCheck {
    fn check(&self) -> Result<(), String>;
}

/// A message type that can live in the registry.
/// The Rust type name is the ROS type name, the namespace is the ROS package.
pub trait RosMessage:
    WireCheck
    + WireLayout
    + Serialize
    + DeserializeOwned
    + Encode
    + Decode<()>
    + Clone
    + Debug
    + Default
    + PartialEq
    + Into<Tf2Message>
    + 'static
{
    /// The namespace of the ROS message, such as "tf2_msgs".
    fn namespace() -> &'static str;

    /// The type name of the ROS message, such as "TFMessage".
    /// This is the wire-level type tag.
    fn type_name() -> &'static str {
        ros_type_name!(Self)
    }

    /// Fully qualified ROS datatype, such as "tf2_msgs/TFMessage".
    fn datatype() -> String {
        format!("{}/{}", Self::namespace(), Self::type_name())
    }

    /// MD5 of the ROS message definition, exchanged in the ROS 1 connection
    /// header so both ends agree on the layout.
    fn md5sum() -> &'static str;

    fn from_message(msg: Tf2Message) -> Option<Self>;

    fn from_message_ref(msg: &Tf2Message) -> Option<&Self>;
}

macro_rules! tf2_message_set {
    ($($ty:ident => $md5:literal),+ $(,)?) => {
        /// Any of the registered tf2_msgs values.
        #[derive(Clone, Debug, PartialEq)]
        pub enum Tf2Message {
            $($ty($ty),)+
        }

        impl Tf2Message {
            /// Wire-level type tag of the carried value.
            pub fn type_name(&self) -> &'static str {
                match self {
                    $(Tf2Message::$ty(_) => <$ty as RosMessage>::type_name(),)+
                }
            }

            pub fn md5sum(&self) -> &'static str {
                match self {
                    $(Tf2Message::$ty(_) => <$ty as RosMessage>::md5sum(),)+
                }
            }
        }

        impl WireCheck for Tf2Message {
            fn check(&self) -> Result<(), String> {
                match self {
                    $(Tf2Message::$ty(inner) => inner.check(),)+
                }
            }
        }

        $(
            impl From<$ty> for Tf2Message {
                fn from(value: $ty) -> Self {
                    Tf2Message::$ty(value)
                }
            }

            impl RosMessage for $ty {
                fn namespace() -> &'static str {
                    "tf2_msgs"
                }

                fn md5sum() -> &'static str {
                    $md5
                }

                fn from_message(msg: Tf2Message) -> Option<Self> {
                    match msg {
                        Tf2Message::$ty(inner) => Some(inner),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn from_message_ref(msg: &Tf2Message) -> Option<&Self> {
                    match msg {
                        Tf2Message::$ty(inner) => Some(inner),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }
        )+

        /// Wire names of every tf2_msgs type. Renaming one is a breaking change.
        pub const TF2_MSGS_TYPE_NAMES: &[&str] = &[$(stringify!($ty)),+];
    };
}

tf2_message_set!(
    TFMessage => "94810edda583a504dfda3829e70d7eec",
    TF2Error => "bc6848fd6fd750c92e38575618a4917d",
    LookupTransformGoal => "35e3720468131d675a18bb6f3e5f22f8",
    LookupTransformFeedback => "d41d8cd98f00b204e9800998ecf8427e",
    LookupTransformResult => "3fe5db6a19ca9cfb675418c5ad875c36",
    LookupTransformActionGoal => "f2e7bcdb75c847978d0351a13e699da5",
    LookupTransformActionFeedback => "aae20e09065c3809e8a8e87c4c8953fd",
    LookupTransformActionResult => "ac26ce75a41384fa8bb4dc10f491ab90",
    LookupTransformAction => "7ee01ba91a56c2245c610992dbaa3c37",
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_match_rust_names() {
        assert_eq!(<TFMessage as RosMessage>::type_name(), "TFMessage");
        assert_eq!(<TF2Error as RosMessage>::type_name(), "TF2Error");
        assert_eq!(
            <LookupTransformActionFeedback as RosMessage>::datatype(),
            "tf2_msgs/LookupTransformActionFeedback"
        );
        assert_eq!(TF2_MSGS_TYPE_NAMES.len(), 9);
    }

    #[test]
    fn test_md5sums() {
        assert_eq!(
            <TFMessage as RosMessage>::md5sum(),
            "94810edda583a504dfda3829e70d7eec"
        );
        // empty definition
        assert_eq!(
            <LookupTransformFeedback as RosMessage>::md5sum(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        let msg: Tf2Message = TF2Error::default().into();
        assert_eq!(msg.md5sum(), <TF2Error as RosMessage>::md5sum());
    }

    #[test]
    fn test_enum_dispatch() {
        let msg: Tf2Message = LookupTransformFeedback::default().into();
        assert_eq!(msg.type_name(), "LookupTransformFeedback");
        assert!(LookupTransformFeedback::from_message_ref(&msg).is_some());
        assert!(TFMessage::from_message(msg).is_none());
    }
}
