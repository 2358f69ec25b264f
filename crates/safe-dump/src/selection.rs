//! The set of Safes the user picked for dumping.

use alloy_primitives::Address;
use indexmap::IndexSet;
use safe_multisig::SafeOverview;

/// Whether a Safe can be dumped: a single signature has to be enough to swap the owner.
pub fn is_dumpable(overview: &SafeOverview) -> bool {
    overview.threshold == 1
}

/// Selected Safe addresses, in the order they were selected.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    chain_id: Option<u64>,
    selected: IndexSet<Address>,
}

impl Selection {
    pub fn new(chain_id: u64) -> Self {
        Self { chain_id: Some(chain_id), selected: IndexSet::new() }
    }

    /// Adds `safe` if missing, removes it otherwise. Returns whether it is now selected.
    pub fn toggle(&mut self, safe: Address) -> bool {
        if self.selected.shift_remove(&safe) {
            false
        } else {
            self.selected.insert(safe);
            true
        }
    }

    /// Selects every dumpable Safe of `overviews` when nothing is selected, otherwise clears
    /// the selection.
    pub fn toggle_all(&mut self, overviews: &[SafeOverview]) {
        if !self.selected.is_empty() {
            self.selected.clear();
            return;
        }

        self.selected = overviews
            .iter()
            .filter(|overview| is_dumpable(overview))
            .map(SafeOverview::safe_address)
            .collect();
    }

    /// Clears the selection when the wallet moved to another chain.
    pub fn reset_for_chain(&mut self, chain_id: u64) {
        if self.chain_id != Some(chain_id) {
            self.selected.clear();
            self.chain_id = Some(chain_id);
        }
    }

    pub fn contains(&self, safe: &Address) -> bool {
        self.selected.contains(safe)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.selected.iter()
    }

    pub fn to_vec(&self) -> Vec<Address> {
        self.selected.iter().copied().collect()
    }
}
