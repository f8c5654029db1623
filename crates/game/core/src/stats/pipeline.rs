//! Per-stat layered pipelines.
//!
//! ```text
//! [ Base ]       Add(base value)
//!      ↓
//! [ Permanent ]  acquired upgrades
//!      ↓
//! [ Class ]      class bonuses
//!      ↓
//! [ Transient ]  short-lived effects (tap frenzy, ...)
//!      ↓
//! [ Clamp ]      ClampMin(0)
//! ```
//!
//! Each stat owns its own five layers, so rebuilding the permanent layer of
//! `Damage` never touches the caches of `CritChance`.

use std::collections::BTreeMap;

use strum::{EnumCount, IntoEnumIterator};

use super::keys::StatKey;
use super::layer::{PipelineLayer, compute_layered, create_layer, dirty_layers, rebuild_layer};
use super::player::PlayerStats;
use super::step::StatStep;
use super::upgrade::StatModifier;

/// The five tiers every stat flows through, in evaluation order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum LayerKind {
    Base,
    Permanent,
    Class,
    Transient,
    Clamp,
}

impl LayerKind {
    pub const fn index(self) -> usize {
        self as usize
    }
}

const LAYER_COUNT: usize = 5;

#[derive(Clone, Debug)]
struct StatEntry {
    base: f64,
    layers: [PipelineLayer; LAYER_COUNT],
}

impl StatEntry {
    fn new(base: f64) -> Self {
        Self {
            base,
            layers: [
                create_layer(vec![StatStep::add(base)]),
                create_layer(Vec::new()),
                create_layer(Vec::new()),
                create_layer(Vec::new()),
                create_layer(vec![StatStep::clamp_min(0.0)]),
            ],
        }
    }

    fn is_modified(&self) -> bool {
        self.layers[LayerKind::Permanent.index()..LayerKind::Clamp.index()]
            .iter()
            .any(|layer| !layer.is_empty())
    }
}

/// Memoized stat computation for every [`StatKey`].
#[derive(Clone, Debug)]
pub struct StatPipeline {
    entries: Vec<StatEntry>,
    base_values: BTreeMap<StatKey, f64>,
    base_execute_cap: Option<f64>,
}

impl StatPipeline {
    /// Creates pipelines seeded with `base_values`; unlisted stats start at zero.
    ///
    /// `base_execute_cap` of `None` leaves execute uncapped until something
    /// modifies [`StatKey::ExecuteCap`].
    pub fn new(base_values: BTreeMap<StatKey, f64>, base_execute_cap: Option<f64>) -> Self {
        let mut pipeline = Self {
            entries: Vec::with_capacity(StatKey::COUNT),
            base_values,
            base_execute_cap,
        };
        pipeline.reset();
        pipeline
    }

    /// Restores every stat to its base value and empties all modifier layers.
    pub fn reset(&mut self) {
        self.entries = StatKey::iter()
            .map(|key| StatEntry::new(self.initial_base(key)))
            .collect();
    }

    fn initial_base(&self, key: StatKey) -> f64 {
        if key == StatKey::ExecuteCap {
            return self.base_execute_cap.unwrap_or(0.0);
        }
        self.base_values.get(&key).copied().unwrap_or(0.0)
    }

    /// Reads the final value of `stat`, recomputing only invalidated layers.
    pub fn get(&mut self, stat: StatKey) -> f64 {
        let entry = &mut self.entries[stat.index()];
        compute_layered(0.0, &mut entry.layers)
    }

    pub fn base(&self, stat: StatKey) -> f64 {
        self.entries[stat.index()].base
    }

    /// Changes a stat's base value.
    pub fn set_base(&mut self, stat: StatKey, value: f64) {
        let entry = &mut self.entries[stat.index()];
        entry.base = value;
        rebuild_layer(&mut entry.layers, LayerKind::Base.index(), vec![StatStep::add(value)]);
    }

    /// True when any permanent, class or transient step touches `stat`.
    pub fn is_modified(&self, stat: StatKey) -> bool {
        self.entries[stat.index()].is_modified()
    }

    /// Replaces the steps of one layer of one stat.
    ///
    /// The clamp layer is fixed and cannot be replaced.
    pub fn set_layer_steps(&mut self, stat: StatKey, kind: LayerKind, steps: Vec<StatStep>) {
        if matches!(kind, LayerKind::Clamp) {
            tracing::warn!(
                target: "game_core::stats",
                stat = %stat,
                "Ignoring attempt to replace the clamp layer"
            );
            return;
        }
        let entry = &mut self.entries[stat.index()];
        rebuild_layer(&mut entry.layers, kind.index(), steps);
    }

    /// Forces `kind` and every later layer of `stat` to recompute, for steps
    /// whose conditions read outside state.
    pub fn invalidate(&mut self, stat: StatKey, kind: LayerKind) {
        dirty_layers(&mut self.entries[stat.index()].layers, kind.index());
    }

    /// Rebuilds `kind` for every stat from the complete modifier set.
    ///
    /// Stats named by `modifiers` get one `Add` per modifier; stats that had
    /// steps in this layer but no longer appear are emptied. Untouched stats
    /// keep their caches.
    pub fn rebuild_from_modifiers(&mut self, kind: LayerKind, modifiers: &[StatModifier]) {
        let mut grouped: BTreeMap<StatKey, Vec<StatStep>> = BTreeMap::new();
        for modifier in modifiers {
            grouped
                .entry(modifier.stat)
                .or_default()
                .push(StatStep::add(modifier.value));
        }

        for key in StatKey::iter() {
            let had_steps = !self.entries[key.index()].layers[kind.index()].is_empty();
            match grouped.remove(&key) {
                Some(steps) => self.set_layer_steps(key, kind, steps),
                None if had_steps => self.set_layer_steps(key, kind, Vec::new()),
                None => {}
            }
        }

        tracing::debug!(
            target: "game_core::stats",
            layer = %kind,
            modifiers = modifiers.len(),
            "Rebuilt stat layer"
        );
    }

    /// Rebuilds the permanent layer from every acquired upgrade's modifiers.
    pub fn rebuild_permanent(&mut self, modifiers: &[StatModifier]) {
        self.rebuild_from_modifiers(LayerKind::Permanent, modifiers);
    }

    /// Rebuilds the class layer.
    pub fn rebuild_class(&mut self, modifiers: &[StatModifier]) {
        self.rebuild_from_modifiers(LayerKind::Class, modifiers);
    }

    /// Rebuilds the transient layer.
    pub fn rebuild_transient(&mut self, modifiers: &[StatModifier]) {
        self.rebuild_from_modifiers(LayerKind::Transient, modifiers);
    }

    /// Computes every stat into a flat snapshot.
    pub fn snapshot(&mut self) -> PlayerStats {
        let mut stats = PlayerStats::from_fn(|key| self.get(key));
        let has_cap = self.base_execute_cap.is_some() || self.is_modified(StatKey::ExecuteCap);
        stats.execute_cap = has_cap.then(|| self.get(StatKey::ExecuteCap));
        stats
    }
}

impl Default for StatPipeline {
    fn default() -> Self {
        Self::new(BTreeMap::new(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn pipeline() -> StatPipeline {
        StatPipeline::new(
            BTreeMap::from([(StatKey::Damage, 1.0), (StatKey::CritMultiplier, 2.0)]),
            None,
        )
    }

    #[test]
    fn base_values_flow_through() {
        let mut p = pipeline();
        assert_eq!(p.get(StatKey::Damage), 1.0);
        assert_eq!(p.get(StatKey::CritMultiplier), 2.0);
        assert_eq!(p.get(StatKey::Poison), 0.0);
    }

    #[test]
    fn acquiring_same_upgrade_twice_adds_twice() {
        let mut p = pipeline();
        let sharpen = StatModifier::new(StatKey::Damage, 3.0);
        p.rebuild_permanent(&[sharpen, sharpen]);
        assert_eq!(p.get(StatKey::Damage), 7.0);
    }

    #[test]
    fn layers_stack_in_order_and_clamp() {
        let mut p = pipeline();
        p.rebuild_permanent(&[StatModifier::new(StatKey::Damage, 4.0)]);
        p.rebuild_class(&[StatModifier::new(StatKey::Damage, 1.0)]);
        p.rebuild_transient(&[StatModifier::new(StatKey::Damage, -100.0)]);
        assert_eq!(p.get(StatKey::Damage), 0.0);

        p.rebuild_transient(&[]);
        assert_eq!(p.get(StatKey::Damage), 6.0);
        assert!(!p.is_modified(StatKey::Poison));
        assert!(p.is_modified(StatKey::Damage));
    }

    #[test]
    fn rebuilding_one_stat_keeps_other_caches() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let mut p = pipeline();
        p.set_layer_steps(
            StatKey::CritMultiplier,
            LayerKind::Class,
            vec![StatStep::custom(move |v| {
                counter.fetch_add(1, Ordering::Relaxed);
                v
            })],
        );
        p.get(StatKey::CritMultiplier);
        assert_eq!(runs.load(Ordering::Relaxed), 1);

        p.rebuild_permanent(&[StatModifier::new(StatKey::Damage, 1.0)]);
        p.get(StatKey::CritMultiplier);
        p.get(StatKey::Damage);
        assert_eq!(runs.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn removed_modifiers_clear_their_layer() {
        let mut p = pipeline();
        p.rebuild_permanent(&[StatModifier::new(StatKey::Poison, 2.0)]);
        assert_eq!(p.get(StatKey::Poison), 2.0);
        p.rebuild_permanent(&[]);
        assert_eq!(p.get(StatKey::Poison), 0.0);
    }

    #[test]
    fn execute_cap_absent_until_configured_or_modified() {
        let mut p = pipeline();
        assert_eq!(p.snapshot().execute_cap, None);

        p.rebuild_permanent(&[StatModifier::new(StatKey::ExecuteCap, 0.25)]);
        assert_eq!(p.snapshot().execute_cap, Some(0.25));

        let mut capped = StatPipeline::new(BTreeMap::new(), Some(0.0));
        assert_eq!(capped.snapshot().execute_cap, Some(0.0));
    }

    #[test]
    fn clamp_layer_cannot_be_replaced() {
        let mut p = pipeline();
        p.set_layer_steps(StatKey::Damage, LayerKind::Clamp, vec![]);
        p.rebuild_transient(&[StatModifier::new(StatKey::Damage, -5.0)]);
        assert_eq!(p.get(StatKey::Damage), 0.0);
    }

    #[test]
    fn reset_restores_bases() {
        let mut p = pipeline();
        p.set_base(StatKey::Damage, 10.0);
        p.rebuild_permanent(&[StatModifier::new(StatKey::Damage, 5.0)]);
        assert_eq!(p.get(StatKey::Damage), 15.0);
        p.reset();
        assert_eq!(p.get(StatKey::Damage), 1.0);
    }
}
