//! Transaction envelopes and signing.
//!
//! A [`Transaction`] is the unsigned envelope: sender, authorizing public
//! key, receiver, nonce, actions, and a recent-block reference that lets the
//! network bound replay. Construction is pure; the caller supplies the nonce
//! (the selected access key's reported nonce plus one) and the block hash
//! (fetched from the provider).
//!
//! The wire form is deterministic CBOR; the base64 encoding of those bytes
//! is what travels in wallet-broker redirect URLs.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::action::Action;
use crate::crypto::{KeyPair, PublicKey, Signature};
use crate::error::CoreError;

/// An opaque 32-byte reference to a recent block.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockHash(pub [u8; 32]);

impl BlockHash {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", &self.to_hex()[..16])
    }
}

impl Serialize for BlockHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        if bytes.len() != 32 {
            return Err(serde::de::Error::custom("block hash must be 32 bytes"));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

/// The unsigned transaction envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The account authorizing the transaction.
    pub signer_id: String,

    /// The public key whose access key authorizes the transaction.
    pub public_key: PublicKey,

    /// The account the actions are addressed to.
    pub receiver_id: String,

    /// Must be strictly greater than the access key's last-known nonce;
    /// callers use last-known + 1.
    pub nonce: u64,

    /// The actions to perform, in order.
    pub actions: Vec<Action>,

    /// Recent-block reference bounding replay.
    pub block_hash: BlockHash,
}

impl Transaction {
    /// Assemble an envelope. Pure construction, no I/O.
    pub fn new(
        signer_id: impl Into<String>,
        public_key: PublicKey,
        receiver_id: impl Into<String>,
        nonce: u64,
        actions: Vec<Action>,
        block_hash: BlockHash,
    ) -> Self {
        Self {
            signer_id: signer_id.into(),
            public_key,
            receiver_id: receiver_id.into(),
            nonce,
            actions,
            block_hash,
        }
    }

    /// Encode to deterministic CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| CoreError::Encoding(e.to_string()))?;
        Ok(buf)
    }

    /// Decode from CBOR bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        ciborium::from_reader(bytes).map_err(|e: ciborium::de::Error<std::io::Error>| {
            CoreError::Decoding(e.to_string())
        })
    }

    /// Encode to the base64 form used in broker redirect URLs.
    pub fn to_base64(&self) -> Result<String, CoreError> {
        Ok(BASE64.encode(self.to_bytes()?))
    }

    /// Decode from the base64 form used in broker redirect URLs.
    pub fn from_base64(s: &str) -> Result<Self, CoreError> {
        let bytes = BASE64
            .decode(s)
            .map_err(|e| CoreError::Decoding(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Sign the envelope's CBOR bytes with the given keypair.
    ///
    /// The keypair's public key must be the envelope's `public_key`; this
    /// is the caller's contract, not re-checked here.
    pub fn sign(self, keypair: &KeyPair) -> Result<SignedTransaction, CoreError> {
        let message = self.to_bytes()?;
        let signature = keypair.sign(&message);
        Ok(SignedTransaction {
            transaction: self,
            signature,
        })
    }
}

/// A transaction plus the signature over its CBOR bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// The signed envelope.
    pub transaction: Transaction,

    /// Ed25519 signature over the envelope's CBOR bytes.
    pub signature: Signature,
}

impl SignedTransaction {
    /// Verify the signature against the envelope's own public key.
    pub fn verify(&self) -> Result<(), CoreError> {
        let message = self.transaction.to_bytes()?;
        self.transaction.public_key.verify(&message, &self.signature)
    }
}
