use crate::common::current_time_secs_or_zero;
use crate::errors::{ErrorKind, OdmError, OdmResult};
use crate::ID_GENERATOR;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt::{Debug, Display};
use std::sync::atomic::{AtomicU32, Ordering};

const COUNTER_MASK: u32 = 0x00FF_FFFF;

/// The backend-native document identifier.
///
/// An `ObjectId` is 12 bytes: a 4-byte big-endian timestamp (seconds since
/// the Unix epoch), a 5-byte value unique to the process and a 3-byte
/// counter seeded randomly. Ids generated by one process therefore sort
/// roughly by creation time.
///
/// # Examples
///
/// ```rust
/// use docmap::common::ObjectId;
///
/// let id = ObjectId::new();
/// let parsed = ObjectId::parse_str(&id.to_hex()).unwrap();
/// assert_eq!(id, parsed);
/// ```
#[derive(PartialEq, Eq, Ord, PartialOrd, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId {
    bytes: [u8; 12],
}

impl ObjectId {
    /// Generates a new unique `ObjectId`.
    pub fn new() -> Self {
        ID_GENERATOR.next_id()
    }

    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        ObjectId { bytes }
    }

    /// Parses a 24 character hexadecimal string.
    pub fn parse_str(hex: &str) -> OdmResult<Self> {
        if hex.len() != 24 || !hex.is_ascii() {
            log::error!("Invalid ObjectId string {:?}", hex);
            return Err(OdmError::new(
                &format!("ObjectId must be 24 hex characters, got {:?}", hex),
                ErrorKind::ObjectMappingError,
            ));
        }

        let mut bytes = [0u8; 12];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|err| {
                log::error!("Invalid ObjectId string {:?}: {}", hex, err);
                OdmError::new(
                    &format!("ObjectId must be 24 hex characters, got {:?}", hex),
                    ErrorKind::ObjectMappingError,
                )
            })?;
        }
        Ok(ObjectId { bytes })
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.bytes
    }

    /// Seconds since the Unix epoch at which this id was generated.
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.bytes[0], self.bytes[1], self.bytes[2], self.bytes[3]])
    }

    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        ObjectId::new()
    }
}

impl Debug for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectId(\"{}\")", self.to_hex())
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Process-wide source of [ObjectId] values.
pub(crate) struct ObjectIdGenerator {
    process_unique: [u8; 5],
    counter: AtomicU32,
}

impl ObjectIdGenerator {
    pub(crate) fn new() -> Self {
        let mut process_unique = [0u8; 5];
        OsRng.fill_bytes(&mut process_unique);
        let seed = OsRng.next_u32() & COUNTER_MASK;
        log::debug!("Initialized ObjectId generator with counter seed {}", seed);

        ObjectIdGenerator {
            process_unique,
            counter: AtomicU32::new(seed),
        }
    }

    pub(crate) fn next_id(&self) -> ObjectId {
        let timestamp = current_time_secs_or_zero().to_be_bytes();
        let counter = (self.counter.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK).to_be_bytes();

        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&timestamp);
        bytes[4..9].copy_from_slice(&self.process_unique);
        bytes[9..12].copy_from_slice(&counter[1..4]);
        ObjectId { bytes }
    }
}
