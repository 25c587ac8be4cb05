//! Partition a work list into atomic submission groups.
//!
//! The first transaction of a group carries the registry cross-reference,
//! which consumes one slot of its capacity; the 7/8 split must be modeled
//! exactly or the ledger rejects the whole group.

use crate::types::WorkItem;

/// Items the first transaction of a group can hold.
pub const FIRST_TXN_CAPACITY: usize = 7;

/// Items every later transaction can hold.
pub const TXN_CAPACITY: usize = 8;

/// Transactions per atomic group.
pub const MAX_GROUP_TXNS: usize = 16;

/// Items per atomic group: 7 + 15 * 8 = 127.
pub const MAX_GROUP_ITEMS: usize = FIRST_TXN_CAPACITY + (MAX_GROUP_TXNS - 1) * TXN_CAPACITY;

/// One planned transaction: a capacity-bounded item slice.
#[derive(Debug, Clone)]
pub struct TxnPlan {
    pub items: Vec<WorkItem>,
    /// Only the first transaction of a group references the registry.
    pub carries_registry_ref: bool,
}

/// One atomic submission group: all transactions land or none do.
#[derive(Debug, Clone)]
pub struct GroupPlan {
    pub transactions: Vec<TxnPlan>,
}

impl GroupPlan {
    pub fn item_count(&self) -> usize {
        self.transactions.iter().map(|t| t.items.len()).sum()
    }
}

/// Plan the full work list into groups of at most `MAX_GROUP_ITEMS`,
/// preserving input order.
pub fn plan_groups(items: &[WorkItem]) -> Vec<GroupPlan> {
    items.chunks(MAX_GROUP_ITEMS).map(plan_one_group).collect()
}

fn plan_one_group(stride: &[WorkItem]) -> GroupPlan {
    let first_take = stride.len().min(FIRST_TXN_CAPACITY);
    let mut transactions = vec![TxnPlan {
        items: stride[..first_take].to_vec(),
        carries_registry_ref: true,
    }];
    for chunk in stride[first_take..].chunks(TXN_CAPACITY) {
        transactions.push(TxnPlan {
            items: chunk.to_vec(),
            carries_registry_ref: false,
        });
    }
    GroupPlan { transactions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Address, ADDRESS_LEN};

    fn items(n: usize) -> Vec<WorkItem> {
        (0..n)
            .map(|i| {
                let mut bytes = [0u8; ADDRESS_LEN];
                bytes[0] = (i % 256) as u8;
                bytes[1] = (i / 256) as u8;
                WorkItem { address: Address::new(bytes), votes: i as u64 + 1 }
            })
            .collect()
    }

    fn sizes(groups: &[GroupPlan]) -> Vec<Vec<usize>> {
        groups
            .iter()
            .map(|g| g.transactions.iter().map(|t| t.items.len()).collect())
            .collect()
    }

    #[test]
    fn empty_work_list_plans_nothing() {
        assert!(plan_groups(&[]).is_empty());
    }

    #[test]
    fn small_list_fits_first_transaction() {
        assert_eq!(sizes(&plan_groups(&items(1))), vec![vec![1]]);
        assert_eq!(sizes(&plan_groups(&items(7))), vec![vec![7]]);
    }

    #[test]
    fn eighth_item_spills_into_second_transaction() {
        assert_eq!(sizes(&plan_groups(&items(8))), vec![vec![7, 1]]);
        assert_eq!(sizes(&plan_groups(&items(10))), vec![vec![7, 3]]);
        assert_eq!(sizes(&plan_groups(&items(15))), vec![vec![7, 8]]);
        assert_eq!(sizes(&plan_groups(&items(16))), vec![vec![7, 8, 1]]);
    }

    #[test]
    fn full_group_boundary() {
        let groups = plan_groups(&items(127));
        assert_eq!(groups.len(), 1);
        let mut expected = vec![7];
        expected.extend(std::iter::repeat(8).take(15));
        assert_eq!(sizes(&groups), vec![expected]);
    }

    #[test]
    fn item_128_opens_a_second_group() {
        let groups = plan_groups(&items(128));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].item_count(), 127);
        assert_eq!(groups[1].item_count(), 1);
        assert_eq!(groups[1].transactions.len(), 1);
    }

    #[test]
    fn capacity_bounds_hold_for_any_length() {
        for n in 0..=300 {
            let work = items(n);
            let groups = plan_groups(&work);

            let mut flat = Vec::new();
            for group in &groups {
                assert!(group.transactions.len() <= MAX_GROUP_TXNS);
                for (i, txn) in group.transactions.iter().enumerate() {
                    if i == 0 {
                        assert!(txn.items.len() <= FIRST_TXN_CAPACITY);
                        assert!(txn.carries_registry_ref);
                    } else {
                        assert!(!txn.items.is_empty());
                        assert!(txn.items.len() <= TXN_CAPACITY);
                        assert!(!txn.carries_registry_ref);
                    }
                    flat.extend_from_slice(&txn.items);
                }
            }
            // Order preserved, nothing dropped or duplicated.
            assert_eq!(flat, work);
        }
    }
}
