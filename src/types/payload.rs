use serde::{Deserialize, Serialize};

use crate::types::Address;

/// A payload submitted by a single participant and fed into the period state machine.
///
/// The replication layer is responsible for ordering and delivering these; the core
/// only ever inspects `sender` and `content`.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Payload {
    pub sender: Address,
    pub content: PayloadContent,
}

impl Payload {
    pub fn new(sender: impl Into<Address>, content: PayloadContent) -> Self {
        Self {
            sender: sender.into(),
            content,
        }
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(tag = "kind")]
pub enum PayloadContent {
    Registration,
    Randomness { value: String },
    SelectKeeper { keeper: Address },
    DeploySafe { safe_address: Address },
    Observation { observation: f64 },
    Estimate { estimate: f64 },
    TransactionHash { tx_hash: String },
    Signature {
        #[serde(with = "hex_bytes")]
        signature: Vec<u8>,
    },
    FinalizationTx { tx_hash: String },
    Validate { vote: bool },
}

/// Serializes opaque signature bytes as a hex string on the wire instead of a JSON
/// array of numbers.
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        hex::decode(encoded.trim_start_matches("0x")).map_err(serde::de::Error::custom)
    }
}

impl PayloadContent {
    /// Short tag used only for log lines; not the wire `kind` discriminant.
    pub fn label(&self) -> &'static str {
        match self {
            PayloadContent::Registration => "registration",
            PayloadContent::Randomness { .. } => "randomness",
            PayloadContent::SelectKeeper { .. } => "select_keeper",
            PayloadContent::DeploySafe { .. } => "deploy_safe",
            PayloadContent::Observation { .. } => "observation",
            PayloadContent::Estimate { .. } => "estimate",
            PayloadContent::TransactionHash { .. } => "tx_hash",
            PayloadContent::Signature { .. } => "signature",
            PayloadContent::FinalizationTx { .. } => "finalization_tx",
            PayloadContent::Validate { .. } => "validate",
        }
    }
}
