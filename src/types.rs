use std::fmt;
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

/// Raw length of a member identity.
pub const ADDRESS_LEN: usize = 32;

/// Namespace byte reserved for voter-record boxes.
pub const VOTER_BOX_PREFIX: u8 = b'V';

/// A voter-record box name is exactly `prefix byte ++ address`.
pub const VOTER_BOX_KEY_LEN: usize = 1 + ADDRESS_LEN;

/// Content hash identifying a committee snapshot (hex-encoded sha256).
pub type SnapshotId = String;

/// Member identity. Displayed and parsed as base58.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Address(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Parse from a raw byte slice; `None` unless exactly `ADDRESS_LEN` bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let raw: [u8; ADDRESS_LEN] = bytes.try_into().ok()?;
        Some(Address(raw))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s).into_vec()?;
        Address::from_slice(&bytes)
            .ok_or_else(|| anyhow::anyhow!("address must decode to {} bytes", ADDRESS_LEN))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// One committee member with its voting power. Immutable once snapshotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteeMember {
    pub address: Address,
    pub votes: u64,
}

/// The fixed, content-addressed member list eligible to vote on a proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitteeSnapshot {
    pub id: SnapshotId,
    pub members: Vec<CommitteeMember>,
}

impl CommitteeSnapshot {
    /// Content hash of the canonical member serialization. Two snapshots
    /// with the same members produce the same id.
    pub fn content_id(members: &[CommitteeMember]) -> SnapshotId {
        let mut hasher = Sha256::new();
        for member in members {
            hasher.update(member.address.as_bytes());
            hasher.update(member.votes.to_be_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

/// One governance proposal under processing, as delivered by the
/// proposal directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalTarget {
    pub id: u64,
    pub title: String,
    #[serde(rename = "committeeSnapshotId")]
    pub snapshot_id: SnapshotId,
}

/// Unit of work scheduled into a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkItem {
    pub address: Address,
    pub votes: u64,
}

/// Whether a run adds or removes voter records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Assign,
    Unassign,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Assign => "assign",
            Mode::Unassign => "unassign",
        }
    }
}

/// Terminal result for one proposal. Partial success is an expected
/// outcome, not an exceptional one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalOutcome {
    pub proposal_id: u64,
    pub title: String,
    pub success: bool,
    pub voters_processed: usize,
    pub skipped: Option<usize>,
    pub total: Option<usize>,
    pub error: Option<String>,
}

impl ProposalOutcome {
    pub fn succeeded(
        target: &ProposalTarget,
        voters_processed: usize,
        skipped: usize,
        total: usize,
    ) -> Self {
        Self {
            proposal_id: target.id,
            title: target.title.clone(),
            success: true,
            voters_processed,
            skipped: Some(skipped),
            total: Some(total),
            error: None,
        }
    }

    pub fn failed(target: &ProposalTarget, voters_processed: usize, error: String) -> Self {
        Self {
            proposal_id: target.id,
            title: target.title.clone(),
            success: false,
            voters_processed,
            skipped: None,
            total: None,
            error: Some(error),
        }
    }

    /// Outcome for a task the runtime lost (panic/abort); the proposal is
    /// still enumerated in the summary.
    pub fn aborted(proposal_id: u64, title: String, error: String) -> Self {
        Self {
            proposal_id,
            title,
            success: false,
            voters_processed: 0,
            skipped: None,
            total: None,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(id: u8) -> Address {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[0] = id;
        Address::new(bytes)
    }

    #[test]
    fn address_display_roundtrip() {
        let a = addr(7);
        let parsed: Address = a.to_string().parse().unwrap();
        assert_eq!(a, parsed);
    }

    #[test]
    fn address_rejects_wrong_length() {
        assert!(Address::from_slice(&[0u8; 31]).is_none());
        assert!(Address::from_slice(&[0u8; 33]).is_none());
    }

    #[test]
    fn address_serde_as_string() {
        let a = addr(9);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, format!("\"{}\"", a));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(a, back);
    }

    #[test]
    fn snapshot_content_id_is_deterministic() {
        let members = vec![
            CommitteeMember { address: addr(1), votes: 10 },
            CommitteeMember { address: addr(2), votes: 20 },
        ];
        let id1 = CommitteeSnapshot::content_id(&members);
        let id2 = CommitteeSnapshot::content_id(&members);
        assert_eq!(id1, id2);

        let reordered = vec![members[1], members[0]];
        assert_ne!(id1, CommitteeSnapshot::content_id(&reordered));
    }
}
