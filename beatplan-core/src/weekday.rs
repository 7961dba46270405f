use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::recurrence::InvalidRuleError;

/// A set of weekdays, indexed `0 = Sunday .. 6 = Saturday`.
///
/// Serialized as an ascending list of indices.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Weekdays {
    mask: u8,
}

impl Weekdays {
    pub const fn empty() -> Self {
        Self { mask: 0 }
    }

    /// Builds a set from weekday indices. Duplicates are ignored.
    pub fn from_indices(indices: impl IntoIterator<Item = u8>) -> Result<Self, InvalidRuleError> {
        let mut set = Self::empty();
        for index in indices {
            if index > 6 {
                return Err(InvalidRuleError::WeekdayOutOfRange(index));
            }
            set.mask |= 1 << index;
        }
        Ok(set)
    }

    pub fn insert(&mut self, day: Weekday) {
        self.mask |= 1 << day.num_days_from_sunday();
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.mask & (1 << day.num_days_from_sunday()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    /// Indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = u8> + '_ {
        (0..7u8).filter(move |i| self.mask & (1 << i) != 0)
    }
}

impl FromIterator<Weekday> for Weekdays {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = Self::empty();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl TryFrom<Vec<u8>> for Weekdays {
    type Error = InvalidRuleError;

    fn try_from(indices: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_indices(indices)
    }
}

impl From<Weekdays> for Vec<u8> {
    fn from(set: Weekdays) -> Self {
        set.indices().collect()
    }
}

impl fmt::Debug for Weekdays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.indices()).finish()
    }
}
