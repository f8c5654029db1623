//! Typed hits flowing through the combat pipeline.

use std::collections::BTreeMap;
use std::fmt;

/// Open tag naming the shape of a [`PipelineHit`].
///
/// The core only knows the built-in tags below. Systems introduce their own
/// with [`HitType::new`] and document the extra fields they attach.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HitType(&'static str);

impl HitType {
    /// A plain strike.
    pub const HIT: Self = Self("hit");
    /// A strike promoted by the crit system. Carries `critMultiplier`.
    pub const CRITICAL_HIT: Self = Self("criticalHit");
    /// An instant kill from the execute system.
    pub const EXECUTE_HIT: Self = Self("executeHit");
    /// Poison damage-over-time.
    pub const POISON: Self = Self("poison");
    /// Poison damage-over-time that critted.
    pub const POISON_CRIT: Self = Self("poisonCrit");

    pub const fn new(tag: &'static str) -> Self {
        Self(tag)
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for HitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HitType({})", self.0)
    }
}

impl fmt::Display for HitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A single hit: a type tag, its damage, the strike it belongs to, and any
/// type-specific fields.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineHit {
    pub hit_type: HitType,
    pub damage: f64,
    pub index: usize,
    fields: BTreeMap<&'static str, f64>,
}

impl PipelineHit {
    pub fn new(hit_type: HitType, damage: f64, index: usize) -> Self {
        Self {
            hit_type,
            damage,
            index,
            fields: BTreeMap::new(),
        }
    }

    /// Base strike of an attack.
    pub fn strike(damage: f64, index: usize) -> Self {
        Self::new(HitType::HIT, damage, index)
    }

    /// Attaches a type-specific field (builder pattern).
    #[must_use]
    pub fn with_field(mut self, name: &'static str, value: f64) -> Self {
        self.fields.insert(name, value);
        self
    }

    pub fn field(&self, name: &'static str) -> Option<f64> {
        self.fields.get(name).copied()
    }

    /// Re-tags this hit with new damage, keeping its strike index and fields.
    #[must_use]
    pub fn retyped(mut self, hit_type: HitType, damage: f64) -> Self {
        self.hit_type = hit_type;
        self.damage = damage;
        self
    }

    pub fn is(&self, hit_type: HitType) -> bool {
        self.hit_type == hit_type
    }
}
