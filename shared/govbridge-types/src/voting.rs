use core::fmt;

use serde::{Deserialize, Serialize};

/// A discriminant that does not map to a known enum variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownDiscriminant {
    pub kind: &'static str,
    pub value: u8,
}

impl fmt::Display for UnknownDiscriminant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} discriminant {}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownDiscriminant {}

/// Which ledger (or custom scheme) a whitelisted address belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum AddressKind {
    Starknet = 0,
    Ethereum = 1,
    Custom = 2,
}

impl TryFrom<u8> for AddressKind {
    type Error = UnknownDiscriminant;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AddressKind::Starknet),
            1 => Ok(AddressKind::Ethereum),
            2 => Ok(AddressKind::Custom),
            other => Err(UnknownDiscriminant {
                kind: "address kind",
                value: other,
            }),
        }
    }
}

impl From<AddressKind> for u8 {
    fn from(kind: AddressKind) -> Self {
        kind as u8
    }
}

/// Vote choice as encoded on both ledgers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Choice {
    Against = 0,
    For = 1,
    Abstain = 2,
}

impl TryFrom<u8> for Choice {
    type Error = UnknownDiscriminant;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Choice::Against),
            1 => Ok(Choice::For),
            2 => Ok(Choice::Abstain),
            other => Err(UnknownDiscriminant {
                kind: "choice",
                value: other,
            }),
        }
    }
}

impl From<Choice> for u8 {
    fn from(choice: Choice) -> Self {
        choice as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminants_match_on_chain_enums() {
        assert_eq!(u8::from(AddressKind::Starknet), 0);
        assert_eq!(u8::from(AddressKind::Ethereum), 1);
        assert_eq!(u8::from(AddressKind::Custom), 2);
        assert_eq!(u8::from(Choice::Abstain), 2);
        assert_eq!(Choice::try_from(1), Ok(Choice::For));
        assert!(AddressKind::try_from(3).is_err());
    }
}
