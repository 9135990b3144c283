// ── Value identity ──
//
// A `ValueId` is the controller-owned handle for one value on one
// node. It is `Copy` so notifications, registries and scenes can all
// hold it without sharing ownership.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The data type carried by a value.
///
/// Tags the controller reports that this crate does not know are kept
/// as [`ValueType::Unknown`] so they can be logged and skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ValueType {
    Bool,
    Byte,
    Decimal,
    Int,
    List,
    Schedule,
    Short,
    String,
    Button,
    Raw,
    Unknown(u8),
}

impl ValueType {
    /// Map a raw controller type tag.
    pub fn from_raw(tag: u8) -> Self {
        match tag {
            0 => Self::Bool,
            1 => Self::Byte,
            2 => Self::Decimal,
            3 => Self::Int,
            4 => Self::List,
            5 => Self::Schedule,
            6 => Self::Short,
            7 => Self::String,
            8 => Self::Button,
            9 => Self::Raw,
            other => Self::Unknown(other),
        }
    }

    pub fn raw(self) -> u8 {
        match self {
            Self::Bool => 0,
            Self::Byte => 1,
            Self::Decimal => 2,
            Self::Int => 3,
            Self::List => 4,
            Self::Schedule => 5,
            Self::Short => 6,
            Self::String => 7,
            Self::Button => 8,
            Self::Raw => 9,
            Self::Unknown(tag) => tag,
        }
    }

    /// Lowercase name used in normalized value records.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::Decimal => "decimal",
            Self::Int => "int",
            Self::List => "list",
            Self::Schedule => "schedule",
            Self::Short => "short",
            Self::String => "string",
            Self::Button => "button",
            Self::Raw => "raw",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Wire name. Unrecognized tags keep their number as `unknown:<tag>`
/// so they parse back to the same variant.
impl From<ValueType> for String {
    fn from(value: ValueType) -> Self {
        match value {
            ValueType::Unknown(tag) => format!("unknown:{tag}"),
            known => known.name().to_owned(),
        }
    }
}

/// Error returned when a value type name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value type: {0}")]
pub struct UnknownValueType(String);

impl FromStr for ValueType {
    type Err = UnknownValueType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "bool" => Self::Bool,
            "byte" => Self::Byte,
            "decimal" => Self::Decimal,
            "int" => Self::Int,
            "list" => Self::List,
            "schedule" => Self::Schedule,
            "short" => Self::Short,
            "string" => Self::String,
            "button" => Self::Button,
            "raw" => Self::Raw,
            other => match other.strip_prefix("unknown:").map(str::parse::<u8>) {
                Some(Ok(tag)) => Self::Unknown(tag),
                _ => return Err(UnknownValueType(other.to_owned())),
            },
        })
    }
}

impl TryFrom<String> for ValueType {
    type Error = UnknownValueType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Classification of a value: who is expected to look at it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ValueGenre {
    Basic,
    User,
    Config,
    System,
}

impl ValueGenre {
    pub fn raw(self) -> u8 {
        match self {
            Self::Basic => 0,
            Self::User => 1,
            Self::Config => 2,
            Self::System => 3,
        }
    }
}

/// Handle for a value owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueId {
    pub home_id: u32,
    pub node_id: u8,
    pub genre: ValueGenre,
    pub command_class: u8,
    pub instance: u8,
    pub index: u8,
    pub value_type: ValueType,
}

impl ValueId {
    /// Packed 64-bit identity, matching the controller's own encoding.
    ///
    /// Low word: `node << 24 | genre << 22 | class << 14 | instance << 4 | type`.
    /// High word: `index << 16`.
    pub fn id(&self) -> u64 {
        let low = (u32::from(self.node_id) << 24)
            | (u32::from(self.genre.raw()) << 22)
            | (u32::from(self.command_class) << 14)
            | (u32::from(self.instance) << 4)
            | u32::from(self.value_type.raw() & 0x0f);
        let high = u32::from(self.index) << 16;
        (u64::from(high) << 32) | u64::from(low)
    }

    /// Host-facing compound key: `"{node}-{class}-{instance}-{index}"`.
    pub fn compound_id(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.node_id, self.command_class, self.instance, self.index
        )
    }

    /// Whether this value sits at the given command-class address.
    pub fn matches(&self, command_class: u8, instance: u8, index: u8) -> bool {
        self.command_class == command_class && self.instance == instance && self.index == index
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}:{}", self.home_id, self.compound_id())
    }
}
