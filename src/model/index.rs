//! Dense variable layout.
//!
//! Decision variables are addressed by a linear index over
//! `(student, subject, day, period, room)` with the room varying fastest,
//! so lookups never hash.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Index of a boolean decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub usize);

impl VarId {
    /// Returns the raw linear index.
    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for VarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// A (day, period) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeSlot {
    pub day: usize,
    pub period: usize,
}

impl TimeSlot {
    /// Creates a slot from day and period indices.
    pub fn new(day: usize, period: usize) -> Self {
        Self { day, period }
    }
}

/// Decomposed variable coordinates (all positional indices).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarKey {
    pub student: usize,
    pub subject: usize,
    pub day: usize,
    pub period: usize,
    pub room: usize,
}

impl VarKey {
    /// Returns the (day, period) slot of this key.
    pub fn slot(&self) -> TimeSlot {
        TimeSlot::new(self.day, self.period)
    }
}

/// Shape of the variable space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarLayout {
    pub students: usize,
    pub subjects: usize,
    pub days: usize,
    pub periods: usize,
    pub rooms: usize,
}

impl VarLayout {
    /// Total number of variables.
    pub fn len(&self) -> usize {
        self.students * self.subjects * self.days * self.periods * self.rooms
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maps a key to its linear variable index.
    #[inline]
    pub fn index(&self, key: VarKey) -> VarId {
        debug_assert!(key.student < self.students);
        debug_assert!(key.subject < self.subjects);
        debug_assert!(key.day < self.days);
        debug_assert!(key.period < self.periods);
        debug_assert!(key.room < self.rooms);
        let mut i = key.student;
        i = i * self.subjects + key.subject;
        i = i * self.days + key.day;
        i = i * self.periods + key.period;
        i = i * self.rooms + key.room;
        VarId(i)
    }

    /// Maps a linear variable index back to its key.
    #[inline]
    pub fn key(&self, var: VarId) -> VarKey {
        let mut i = var.0;
        let room = i % self.rooms;
        i /= self.rooms;
        let period = i % self.periods;
        i /= self.periods;
        let day = i % self.days;
        i /= self.days;
        let subject = i % self.subjects;
        VarKey {
            student: i / self.subjects,
            subject,
            day,
            period,
            room,
        }
    }

    /// Iterates every key in index order.
    pub fn keys(&self) -> impl Iterator<Item = VarKey> + '_ {
        (0..self.len()).map(move |i| self.key(VarId(i)))
    }
}
