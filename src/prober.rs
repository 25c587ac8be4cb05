//! Probe a proposal's box storage for existing voter records.

use std::collections::HashSet;

use anyhow::Result;
use tracing::{debug, warn};

use crate::ledger::LedgerVariant;
use crate::traits::LedgerClient;
use crate::types::{Address, VOTER_BOX_KEY_LEN, VOTER_BOX_PREFIX};

/// Box name for one member's voter record: `prefix byte ++ address`.
pub fn voter_box_name(address: &Address) -> Vec<u8> {
    let mut name = Vec::with_capacity(VOTER_BOX_KEY_LEN);
    name.push(VOTER_BOX_PREFIX);
    name.extend_from_slice(address.as_bytes());
    name
}

/// Decode a voter-record box name back into the member address.
pub fn decode_voter_box_name(name: &[u8]) -> Option<Address> {
    if name.len() != VOTER_BOX_KEY_LEN {
        return None;
    }
    Address::from_slice(&name[1..])
}

/// Addresses already recorded as voters on the given proposal app.
///
/// Keys outside the voter namespace are ignored; malformed keys inside it
/// are logged and skipped, never fatal.
pub async fn probe_voters(ledger: &LedgerVariant, app_id: u64) -> Result<HashSet<Address>> {
    let names = ledger.box_names(app_id).await?;
    let mut voters = HashSet::new();
    for name in names {
        if name.first() != Some(&VOTER_BOX_PREFIX) {
            continue;
        }
        match decode_voter_box_name(&name) {
            Some(address) => {
                voters.insert(address);
            }
            None => warn!(
                "skipping malformed voter box key on app {} ({} bytes)",
                app_id,
                name.len()
            ),
        }
    }
    debug!("app {} has {} voter records", app_id, voters.len());
    Ok(voters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MockLedger;
    use crate::types::ADDRESS_LEN;

    fn addr(id: u8) -> Address {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[0] = id;
        Address::new(bytes)
    }

    #[test]
    fn box_name_roundtrip() {
        let a = addr(3);
        let name = voter_box_name(&a);
        assert_eq!(name.len(), VOTER_BOX_KEY_LEN);
        assert_eq!(decode_voter_box_name(&name), Some(a));
    }

    #[test]
    fn wrong_length_keys_do_not_decode() {
        assert_eq!(decode_voter_box_name(&[VOTER_BOX_PREFIX]), None);
        assert_eq!(decode_voter_box_name(&vec![VOTER_BOX_PREFIX; 34]), None);
    }

    #[tokio::test]
    async fn probe_filters_to_the_voter_namespace() {
        let ledger = MockLedger::new();
        ledger
            .seed_boxes(
                7,
                vec![
                    voter_box_name(&addr(1)),
                    voter_box_name(&addr(2)),
                    b"other-namespace-key".to_vec(),
                    // Voter prefix but truncated: malformed, skipped.
                    vec![VOTER_BOX_PREFIX, 0x01, 0x02],
                ],
            )
            .await;

        let voters = probe_voters(&LedgerVariant::Mock(ledger), 7).await.unwrap();
        assert_eq!(voters, [addr(1), addr(2)].into_iter().collect());
    }

    #[tokio::test]
    async fn probe_of_untouched_app_is_empty() {
        let ledger = MockLedger::new();
        let voters = probe_voters(&LedgerVariant::Mock(ledger), 42).await.unwrap();
        assert!(voters.is_empty());
    }
}
