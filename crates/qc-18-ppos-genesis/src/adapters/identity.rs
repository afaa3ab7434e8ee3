//! Node identity to address mapping.

use crate::domain::DerivationError;
use crate::ports::AddressDeriver;
use k256::ecdsa::VerifyingKey;
use shared_types::{keccak256, Address, NodeId};

/// SEC1 tag of an uncompressed point.
const UNCOMPRESSED_TAG: u8 = 0x04;

/// Ethereum-style derivation: the node id must be a point on secp256k1; the
/// address is the last 20 bytes of `keccak256(node_id)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Secp256k1AddressDeriver;

impl AddressDeriver for Secp256k1AddressDeriver {
    fn node_address(&self, node_id: &NodeId) -> Result<Address, DerivationError> {
        let mut sec1 = [0u8; 1 + NodeId::LEN];
        sec1[0] = UNCOMPRESSED_TAG;
        sec1[1..].copy_from_slice(node_id.as_bytes());
        VerifyingKey::from_sec1_bytes(&sec1)
            .map_err(|e| DerivationError::InvalidPublicKey(e.to_string()))?;

        let hash = keccak256(node_id.as_bytes());
        let mut address = [0u8; Address::LEN];
        address.copy_from_slice(&hash[32 - Address::LEN..]);
        Ok(Address::new(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::elliptic_curve::sec1::ToEncodedPoint;
    use k256::SecretKey;

    fn node_id_for(seed: u8) -> NodeId {
        let secret = SecretKey::from_slice(&[seed; 32]).unwrap();
        let point = secret.public_key().to_encoded_point(false);
        NodeId::from_slice(&point.as_bytes()[1..]).unwrap()
    }

    #[test]
    fn test_derives_keccak_suffix() {
        let node_id = node_id_for(1);
        let address = Secp256k1AddressDeriver.node_address(&node_id).unwrap();
        let hash = keccak256(node_id.as_bytes());
        assert_eq!(address.as_bytes(), &hash[12..]);
    }

    #[test]
    fn test_distinct_nodes_distinct_addresses() {
        let a = Secp256k1AddressDeriver.node_address(&node_id_for(1)).unwrap();
        let b = Secp256k1AddressDeriver.node_address(&node_id_for(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_rejects_off_curve_id() {
        let bogus = NodeId::new([0xAB; 64]);
        assert!(matches!(
            Secp256k1AddressDeriver.node_address(&bogus),
            Err(DerivationError::InvalidPublicKey(_))
        ));
    }
}
