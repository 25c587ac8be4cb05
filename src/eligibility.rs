//! Set-difference the committee snapshot against the probed voter records
//! to produce the work list for a proposal.

use std::collections::HashSet;

use crate::types::{Address, CommitteeSnapshot, WorkItem};

/// Work list plus the counts used later for reporting.
#[derive(Debug, Clone)]
pub struct WorkSet {
    pub items: Vec<WorkItem>,
    /// Snapshot size.
    pub total: usize,
    /// Members needing no action in this mode.
    pub skipped: usize,
}

/// Members of the snapshot that do not have a voter record yet, in
/// snapshot order.
pub fn assignable(snapshot: &CommitteeSnapshot, assigned: &HashSet<Address>) -> WorkSet {
    let items: Vec<WorkItem> = snapshot
        .members
        .iter()
        .filter(|m| !assigned.contains(&m.address))
        .map(|m| WorkItem { address: m.address, votes: m.votes })
        .collect();
    let total = snapshot.members.len();
    let skipped = total - items.len();
    WorkSet { items, total, skipped }
}

/// Every currently-recorded voter is a removal candidate. Snapshot members
/// come first in snapshot order (carrying their voting power); records for
/// addresses outside the snapshot follow, sorted, with zero votes.
pub fn unassignable(snapshot: &CommitteeSnapshot, assigned: &HashSet<Address>) -> WorkSet {
    let mut items: Vec<WorkItem> = snapshot
        .members
        .iter()
        .filter(|m| assigned.contains(&m.address))
        .map(|m| WorkItem { address: m.address, votes: m.votes })
        .collect();
    let known = items.len();

    let member_set: HashSet<Address> = snapshot.members.iter().map(|m| m.address).collect();
    let mut strays: Vec<Address> = assigned
        .iter()
        .filter(|a| !member_set.contains(*a))
        .copied()
        .collect();
    strays.sort();
    items.extend(strays.into_iter().map(|address| WorkItem { address, votes: 0 }));

    let total = snapshot.members.len();
    WorkSet { items, total, skipped: total - known }
}
