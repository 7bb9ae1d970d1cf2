use core::fmt::{Debug, Formatter};
use log::{debug, warn};
use std::collections::HashMap;

use crate::error::{RegistryError, RegistryResult};
use crate::message::{RosMessage, Tf2Message};
use crate::tf2_msgs::{
    LookupTransformAction, LookupTransformActionFeedback, LookupTransformActionGoal,
    LookupTransformActionResult, LookupTransformFeedback, LookupTransformGoal,
    LookupTransformResult, TF2Error, TFMessage,
};
use crate::wire::WireConfig;

pub type ConstructFn = fn() -> Tf2Message;
pub type EncodeFn = fn(&Tf2Message, &WireConfig) -> RegistryResult<Vec<u8>>;
pub type DecodeFn = fn(&[u8], &WireConfig) -> RegistryResult<Tf2Message>;

/// Constructor, serializer and deserializer of one message type.
#[derive(Clone, Copy)]
pub struct MessageCodec {
    type_name: &'static str,
    construct: ConstructFn,
    encode: EncodeFn,
    decode: DecodeFn,
}

impl MessageCodec {
    pub fn new(
        type_name: &'static str,
        construct: ConstructFn,
        encode: EncodeFn,
        decode: DecodeFn,
    ) -> Self {
        Self {
            type_name,
            construct,
            encode,
            decode,
        }
    }

    /// Codec of a message type, registered under its ROS type name.
    pub fn of<M: RosMessage>() -> Self {
        Self::new(
            M::type_name(),
            construct_with::<M>,
            encode_with::<M>,
            decode_with::<M>,
        )
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn construct(&self) -> Tf2Message {
        (self.construct)()
    }

    pub fn encode(&self, msg: &Tf2Message, wire: &WireConfig) -> RegistryResult<Vec<u8>> {
        (self.encode)(msg, wire)
    }

    pub fn decode(&self, bytes: &[u8], wire: &WireConfig) -> RegistryResult<Tf2Message> {
        (self.decode)(bytes, wire)
    }
}

impl Debug for MessageCodec {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MessageCodec")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

fn construct_with<M: RosMessage>() -> Tf2Message {
    M::default().into()
}

fn encode_with<M: RosMessage>(msg: &Tf2Message, wire: &WireConfig) -> RegistryResult<Vec<u8>> {
    let payload = M::from_message_ref(msg).ok_or_else(|| {
        RegistryError::encoding(
            M::type_name(),
            format!("codec mismatch, got a {} value", msg.type_name()),
        )
    })?;
    wire.encode(payload)
}

fn decode_with<M: RosMessage>(bytes: &[u8], wire: &WireConfig) -> RegistryResult<Tf2Message> {
    wire.decode::<M>(bytes).map(Into::into)
}

/// Collects codecs during startup. Once built, the registry cannot change.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    wire: WireConfig,
    codecs: HashMap<&'static str, MessageCodec>,
}

impl RegistryBuilder {
    pub fn new(wire: WireConfig) -> Self {
        Self {
            wire,
            codecs: HashMap::new(),
        }
    }

    /// Fails if the name is taken, leaving the builder untouched.
    pub fn register(&mut self, codec: MessageCodec) -> RegistryResult<()> {
        let name = codec.type_name();
        if self.codecs.contains_key(name) {
            warn!("Message type {name} registered twice");
            return Err(RegistryError::DuplicateName(name.to_string()));
        }
        debug!("Registering message type {name}");
        self.codecs.insert(name, codec);
        Ok(())
    }

    pub fn register_message<M: RosMessage>(&mut self) -> RegistryResult<()> {
        self.register(MessageCodec::of::<M>())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.codecs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    pub fn build(self) -> MessageRegistry {
        debug!(
            "Message registry ready with {} types, {:?}",
            self.codecs.len(),
            self.wire
        );
        MessageRegistry {
            wire: self.wire,
            codecs: self.codecs,
        }
    }
}

/// Read-only name to codec table.
/// Share it by reference or behind an `Arc`, no call mutates it.
#[derive(Debug)]
pub struct MessageRegistry {
    wire: WireConfig,
    codecs: HashMap<&'static str, MessageCodec>,
}

impl MessageRegistry {
    /// Registry holding the whole tf2_msgs set.
    pub fn tf2_msgs(wire: WireConfig) -> RegistryResult<Self> {
        let mut builder = RegistryBuilder::new(wire);
        builder.register_message::<TFMessage>()?;
        builder.register_message::<TF2Error>()?;
        builder.register_message::<LookupTransformGoal>()?;
        builder.register_message::<LookupTransformFeedback>()?;
        builder.register_message::<LookupTransformResult>()?;
        builder.register_message::<LookupTransformActionGoal>()?;
        builder.register_message::<LookupTransformActionFeedback>()?;
        builder.register_message::<LookupTransformActionResult>()?;
        builder.register_message::<LookupTransformAction>()?;
        Ok(builder.build())
    }

    pub fn wire(&self) -> &WireConfig {
        &self.wire
    }

    pub fn get(&self, name: &str) -> RegistryResult<&MessageCodec> {
        self.codecs
            .get(name)
            .ok_or_else(|| RegistryError::UnknownType(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.codecs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.codecs.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn construct(&self, name: &str) -> RegistryResult<Tf2Message> {
        Ok(self.get(name)?.construct())
    }

    pub fn serialize(&self, value: &Tf2Message) -> RegistryResult<Vec<u8>> {
        self.get(value.type_name())?.encode(value, &self.wire)
    }

    pub fn deserialize(&self, name: &str, bytes: &[u8]) -> RegistryResult<Tf2Message> {
        let codec = self.get(name)?;
        codec.decode(bytes, &self.wire).inspect_err(|e| {
            debug!("Rejected {} bytes tagged {name}: {e}", bytes.len());
        })
    }

    pub fn encode<M: RosMessage>(&self, msg: &M) -> RegistryResult<Vec<u8>> {
        self.serialize(&msg.clone().into())
    }

    pub fn decode<M: RosMessage>(&self, bytes: &[u8]) -> RegistryResult<M> {
        let msg = self.deserialize(M::type_name(), bytes)?;
        let found = msg.type_name();
        M::from_message(msg).ok_or_else(|| {
            RegistryError::decoding(M::type_name(), format!("codec mismatch, got a {found} value"))
        })
    }
}
