use std::fmt::{Display, Formatter};
use std::str::FromStr;

const ENCODED_GROUP_PREFIX: &str = "__textsecure_group__!";
const ENCODED_MMS_GROUP_PREFIX: &str = "__signal_mms_group__!";

const V1_BYTE_LENGTH: usize = 16;
const V2_BYTE_LENGTH: usize = 32;
const MMS_BYTE_LENGTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum InvalidGroupIdError {
    #[error("group id is empty")]
    Empty,
    #[error("group id has an unknown prefix")]
    UnknownPrefix,
    #[error("group id is not valid hex: {reason}")]
    InvalidHex { reason: String },
    #[error("group id has unexpected length {len}")]
    InvalidLength { len: u32 },
    #[error("group id is a {kind} group, expected a v2 group")]
    NotV2 { kind: String },
}

/// Parsed group identifier. The serialized form is a type prefix followed by
/// the lowercase hex of the raw id bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupId {
    V1(Vec<u8>),
    V2(GroupIdV2),
    Mms(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupIdV2([u8; V2_BYTE_LENGTH]);

impl GroupId {
    pub fn parse(encoded: &str) -> Result<Self, InvalidGroupIdError> {
        if encoded.is_empty() {
            return Err(InvalidGroupIdError::Empty);
        }

        if let Some(rest) = encoded.strip_prefix(ENCODED_GROUP_PREFIX) {
            let bytes = decode_hex(rest)?;
            return match bytes.len() {
                V1_BYTE_LENGTH => Ok(Self::V1(bytes)),
                V2_BYTE_LENGTH => {
                    let mut raw = [0u8; V2_BYTE_LENGTH];
                    raw.copy_from_slice(&bytes);
                    Ok(Self::V2(GroupIdV2(raw)))
                }
                len => Err(invalid_length(len)),
            };
        }

        if let Some(rest) = encoded.strip_prefix(ENCODED_MMS_GROUP_PREFIX) {
            let bytes = decode_hex(rest)?;
            if bytes.len() != MMS_BYTE_LENGTH {
                return Err(invalid_length(bytes.len()));
            }
            return Ok(Self::Mms(bytes));
        }

        Err(InvalidGroupIdError::UnknownPrefix)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::V1(_) => "v1",
            Self::V2(_) => "v2",
            Self::Mms(_) => "mms",
        }
    }

    /// Only v2 groups carry a shareable invite link.
    pub fn require_v2(self) -> Result<GroupIdV2, InvalidGroupIdError> {
        match self {
            Self::V2(id) => Ok(id),
            other => Err(InvalidGroupIdError::NotV2 {
                kind: other.kind().to_string(),
            }),
        }
    }
}

impl GroupIdV2 {
    pub fn from_bytes(raw: [u8; V2_BYTE_LENGTH]) -> Self {
        Self(raw)
    }

    pub fn as_bytes(&self) -> &[u8; V2_BYTE_LENGTH] {
        &self.0
    }

    pub fn parse(encoded: &str) -> Result<Self, InvalidGroupIdError> {
        GroupId::parse(encoded)?.require_v2()
    }
}

impl FromStr for GroupId {
    type Err = InvalidGroupIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for GroupId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V1(bytes) => write!(f, "{ENCODED_GROUP_PREFIX}{}", hex::encode(bytes)),
            Self::V2(id) => id.fmt(f),
            Self::Mms(bytes) => write!(f, "{ENCODED_MMS_GROUP_PREFIX}{}", hex::encode(bytes)),
        }
    }
}

impl Display for GroupIdV2 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{ENCODED_GROUP_PREFIX}{}", hex::encode(self.0))
    }
}

fn decode_hex(s: &str) -> Result<Vec<u8>, InvalidGroupIdError> {
    hex::decode(s).map_err(|e| InvalidGroupIdError::InvalidHex {
        reason: e.to_string(),
    })
}

fn invalid_length(len: usize) -> InvalidGroupIdError {
    InvalidGroupIdError::InvalidLength {
        len: u32::try_from(len).unwrap_or(u32::MAX),
    }
}
