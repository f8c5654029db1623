//! Capacity-bounded collections of independently expiring stacks.
//!
//! Each stack is its remaining duration in caller-chosen units (poison uses
//! ticks, tap frenzy uses seconds). Order is insertion order and only matters
//! for tie-breaks.

/// What happens when a stack is added at capacity.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[strum(serialize_all = "kebab-case")]
pub enum StackPolicy {
    /// Overwrite the stack with the least remaining duration (lowest index on ties).
    #[default]
    RefreshShortest,
    /// Drop the oldest stack and append the new one.
    AddNew,
    /// No capacity; every add appends.
    Unlimited,
}

/// Applies a [`StackPolicy`] with a fixed capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackManager {
    max: usize,
    policy: StackPolicy,
}

impl StackManager {
    pub const fn new(max: usize, policy: StackPolicy) -> Self {
        Self { max, policy }
    }

    /// Capacity derived from a stat value; negative or fractional values floor.
    pub fn from_stat(max: f64, policy: StackPolicy) -> Self {
        Self::new(max.max(0.0).floor() as usize, policy)
    }

    pub const fn max(&self) -> usize {
        self.max
    }

    pub const fn policy(&self) -> StackPolicy {
        self.policy
    }

    /// Adds `count` stacks of `duration`, applying the policy to each one in turn.
    ///
    /// With a capacity of zero, capped policies add nothing.
    pub fn add(&self, stacks: &mut Vec<u32>, duration: u32, count: u32) {
        for _ in 0..count {
            self.add_one(stacks, duration);
        }
    }

    fn add_one(&self, stacks: &mut Vec<u32>, duration: u32) {
        match self.policy {
            StackPolicy::Unlimited => stacks.push(duration),
            _ if stacks.len() < self.max => stacks.push(duration),
            StackPolicy::RefreshShortest => {
                // min_by_key keeps the first minimum, which is the lowest index.
                if let Some((shortest, _)) = stacks.iter().enumerate().min_by_key(|(_, d)| **d) {
                    stacks[shortest] = duration;
                }
            }
            StackPolicy::AddNew => {
                if stacks.is_empty() {
                    return;
                }
                stacks.remove(0);
                stacks.push(duration);
            }
        }
    }

    /// Decrements every stack by one unit and drops the expired ones.
    pub fn tick(&self, stacks: &mut Vec<u32>) {
        stacks.retain_mut(|remaining| {
            *remaining = remaining.saturating_sub(1);
            *remaining > 0
        });
    }

    /// Empties the collection.
    pub fn clear(&self, stacks: &mut Vec<u32>) {
        stacks.clear();
    }
}
