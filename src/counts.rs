use std::collections::BTreeMap;

use crate::types::{CellType, Task};

/// Number of emitted crops per task and cell type.
///
/// Entries are created on first increment, so a cell type that never received
/// a crop is absent rather than zero. Tables from independent runs over
/// disjoint inputs combine with [`CountsTable::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountsTable {
    counts: BTreeMap<Task, BTreeMap<CellType, usize>>,
}

impl CountsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, task: Task, cell_type: CellType) {
        *self
            .counts
            .entry(task)
            .or_default()
            .entry(cell_type)
            .or_insert(0) += 1;
    }

    pub fn get(&self, task: Task, cell_type: CellType) -> usize {
        self.counts
            .get(&task)
            .and_then(|per_cell| per_cell.get(&cell_type))
            .copied()
            .unwrap_or(0)
    }

    /// Cell types with at least one crop for `task`, in enum order.
    pub fn entries(&self, task: Task) -> impl Iterator<Item = (CellType, usize)> + '_ {
        self.counts
            .get(&task)
            .into_iter()
            .flat_map(|per_cell| per_cell.iter())
            .filter(|&(_, &count)| count > 0)
            .map(|(&cell_type, &count)| (cell_type, count))
    }

    pub fn task_total(&self, task: Task) -> usize {
        self.entries(task).map(|(_, count)| count).sum()
    }

    pub fn total(&self) -> usize {
        Task::ALL.iter().map(|&task| self.task_total(task)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Add every count of `other` into `self`.
    pub fn merge(&mut self, other: &CountsTable) {
        for (&task, per_cell) in &other.counts {
            let target = self.counts.entry(task).or_default();
            for (&cell_type, &count) in per_cell {
                *target.entry(cell_type).or_insert(0) += count;
            }
        }
    }
}
