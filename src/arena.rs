//! Generational storage for constrained points.
//!
//! Points are addressed by [`PointId`] rather than by position in the
//! system's ordered list, so inserting or removing parts never invalidates the
//! handles other points hold in their constraints.

use alloc::collections::VecDeque;
use alloc::vec::Vec as AllocVec;
use core::fmt;

/// Stable handle to a point owned by a [`ConstraintSystem`](crate::system::ConstraintSystem).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointId {
    index: u32,
    generation: u32,
}

impl PointId {
    pub(crate) fn new(index: usize, generation: u32) -> Self {
        PointId { index: index as u32, generation }
    }

    pub fn slot(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

pub(crate) struct Arena<T> {
    items: AllocVec<Option<T>>,
    generations: AllocVec<u32>,
    free_list: VecDeque<usize>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Arena {
            items: AllocVec::new(),
            generations: AllocVec::new(),
            free_list: VecDeque::new(),
        }
    }

    /// Reserve the id the next `insert` will hand out.
    pub fn next_id(&self) -> PointId {
        match self.free_list.front() {
            Some(&index) => PointId::new(index, self.generations[index]),
            None => PointId::new(self.items.len(), 0),
        }
    }

    pub fn insert(&mut self, item: T) -> PointId {
        if let Some(index) = self.free_list.pop_front() {
            self.items[index] = Some(item);
            return PointId::new(index, self.generations[index]);
        }
        let index = self.items.len();
        self.items.push(Some(item));
        self.generations.push(0);
        PointId::new(index, 0)
    }

    pub fn get(&self, id: PointId) -> Option<&T> {
        if self.is_valid(id) {
            self.items.get(id.slot()).and_then(|slot| slot.as_ref())
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, id: PointId) -> Option<&mut T> {
        if self.is_valid(id) {
            self.items.get_mut(id.slot()).and_then(|slot| slot.as_mut())
        } else {
            None
        }
    }

    pub fn remove(&mut self, id: PointId) -> Option<T> {
        if !self.is_valid(id) {
            return None;
        }
        let item = self.items.get_mut(id.slot())?.take()?;
        self.generations[id.slot()] = self.generations[id.slot()].wrapping_add(1);
        self.free_list.push_back(id.slot());
        Some(item)
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.get(id).is_some()
    }

    pub fn clear(&mut self) {
        for (index, slot) in self.items.iter_mut().enumerate() {
            if slot.take().is_some() {
                self.generations[index] = self.generations[index].wrapping_add(1);
                self.free_list.push_back(index);
            }
        }
    }

    fn is_valid(&self, id: PointId) -> bool {
        self.generations
            .get(id.slot())
            .map(|generation| *generation == id.generation)
            .unwrap_or(false)
    }
}
