//! Records and enumerations returned by the LXNS maimai API.

use serde::{Serialize, Serializer};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};

use crate::de::{parse_enum, DecodeError, FromJson};

pub mod collection;
pub mod player;
pub mod song;

#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    EnumString,
    Display,
    Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SongType {
    Standard,
    Dx,
    Utage,
}

/// Difficulty of a chart.  Sent as an integer from 0 (basic) to 4 (re:master).
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum LevelIndex {
    Basic,
    Advanced,
    Expert,
    Master,
    ReMaster,
}

impl TryFrom<u64> for LevelIndex {
    type Error = u64;
    fn try_from(value: u64) -> Result<Self, Self::Error> {
        use LevelIndex::*;
        Ok(match value {
            0 => Basic,
            1 => Advanced,
            2 => Expert,
            3 => Master,
            4 => ReMaster,
            _ => return Err(value),
        })
    }
}

impl From<LevelIndex> for u8 {
    fn from(value: LevelIndex) -> u8 {
        use LevelIndex::*;
        match value {
            Basic => 0,
            Advanced => 1,
            Expert => 2,
            Master => 3,
            ReMaster => 4,
        }
    }
}

impl Serialize for LevelIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8((*self).into())
    }
}

impl FromJson for LevelIndex {
    fn from_json(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| Self::try_from(n).ok())
                .ok_or_else(|| DecodeError::InvalidEnumValue {
                    kind: "LevelIndex",
                    value: n.to_string(),
                }),
            _ => parse_enum("LevelIndex", value),
        }
    }
}

/// Full combo kind.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, EnumString, Display, Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FcType {
    /// AP+
    App,
    Ap,
    /// FC+
    Fcp,
    Fc,
}

/// Full sync kind.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, EnumString, Display, Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FsType {
    /// FDX+
    Fsdp,
    /// FDX
    Fsd,
    Fsp,
    Fs,
    Sync,
}

/// Achievement rank, from SSS+ down to D.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, EnumString, Display, Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RateType {
    Sssp,
    Sss,
    Ssp,
    Ss,
    Sp,
    S,
    Aaa,
    Aa,
    A,
    Bbb,
    Bb,
    B,
    C,
    D,
}

json_enum!(SongType, FcType, FsType, RateType);
