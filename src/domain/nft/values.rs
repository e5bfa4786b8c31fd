//! Chain value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// A 20-byte account address, stored lowercase with its `0x` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EvmAddress(String);

impl EvmAddress {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| ValidationError::invalid_format("address", "missing 0x prefix"))?;
        if hex.len() != 40 {
            return Err(ValidationError::invalid_format(
                "address",
                format!("expected 40 hex digits, got {}", hex.len()),
            ));
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::invalid_format("address", "non-hex character"));
        }
        Ok(Self(format!("0x{}", hex.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 40 hex digits without prefix.
    pub fn hex_digits(&self) -> &str {
        &self.0[2..]
    }
}

impl fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EvmAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EvmAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EvmAddress> for String {
    fn from(address: EvmAddress) -> Self {
        address.0
    }
}

/// Who receives a minted token: a literal address or a `.eth` name that
/// still has to be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Recipient {
    Address(EvmAddress),
    EnsName(String),
}

impl Recipient {
    /// Interprets user-supplied recipient text.
    ///
    /// Names are normalised to lowercase; anything else must be an address.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("recipient"));
        }
        let lower = trimmed.to_ascii_lowercase();
        if lower.ends_with(".eth") {
            if lower.len() == ".eth".len() || lower.contains(char::is_whitespace) {
                return Err(ValidationError::invalid_format("recipient", "malformed name"));
            }
            return Ok(Recipient::EnsName(lower));
        }
        EvmAddress::parse(trimmed).map(Recipient::Address)
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recipient::Address(address) => write!(f, "{}", address),
            Recipient::EnsName(name) => write!(f, "{}", name),
        }
    }
}

/// Hash of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxHash(String);

impl TxHash {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let hex = value
            .strip_prefix("0x")
            .ok_or_else(|| ValidationError::invalid_format("tx_hash", "missing 0x prefix"))?;
        if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::invalid_format(
                "tx_hash",
                "expected 64 hex digits",
            ));
        }
        Ok(Self(value.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TxHash {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TxHash> for String {
    fn from(hash: TxHash) -> Self {
        hash.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_is_normalised_to_lowercase() {
        let address = EvmAddress::parse("0x742d35Cc6634C0532925a3b844Bc454e4438f44e").unwrap();
        assert_eq!(address.as_str(), "0x742d35cc6634c0532925a3b844bc454e4438f44e");
        assert_eq!(address.hex_digits().len(), 40);
    }

    #[test]
    fn address_rejects_bad_input() {
        assert!(EvmAddress::parse("742d35Cc6634C0532925a3b844Bc454e4438f44e").is_err());
        assert!(EvmAddress::parse("0x742d35").is_err());
        assert!(EvmAddress::parse("0xZZ2d35Cc6634C0532925a3b844Bc454e4438f44e").is_err());
    }

    #[test]
    fn recipient_distinguishes_names_from_addresses() {
        assert_eq!(
            Recipient::parse(" Vitalik.ETH ").unwrap(),
            Recipient::EnsName("vitalik.eth".to_string())
        );
        assert!(matches!(
            Recipient::parse("0x66f820a414680B5bcda5eECA5dea238543F42054").unwrap(),
            Recipient::Address(_)
        ));
    }

    #[test]
    fn recipient_rejects_street_addresses_and_blanks() {
        assert!(Recipient::parse("12 Main St, Springfield").is_err());
        assert!(Recipient::parse("   ").is_err());
        assert!(Recipient::parse(".eth").is_err());
    }

    #[test]
    fn tx_hash_requires_32_bytes() {
        let hash = format!("0x{}", "ab".repeat(32));
        assert_eq!(TxHash::parse(&hash).unwrap().as_str(), hash);
        assert!(TxHash::parse("0xabc").is_err());
    }

    #[test]
    fn address_deserializes_through_validation() {
        let ok: Result<EvmAddress, _> =
            serde_json::from_str("\"0x66F820a414680B5bcda5eECA5dea238543F42054\"");
        assert!(ok.is_ok());
        let bad: Result<EvmAddress, _> = serde_json::from_str("\"wevm.eth\"");
        assert!(bad.is_err());
    }
}
