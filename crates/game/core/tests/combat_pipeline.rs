use game_core::combat::systems::{CritState, ExecuteState, POISON_ID, PoisonState};
use game_core::combat::{PipelineHit, RngSource, SystemDefinition, Transformed, boxed};
use game_core::{
    AttackContext, CombatPipelineRunner, HitType, KillContext, PipelineEffect, PlayerStats,
    SequenceRng, TickContext, all_systems,
};

fn runner(stats: &PlayerStats) -> CombatPipelineRunner {
    let mut runner = CombatPipelineRunner::new(all_systems());
    runner.refresh_systems(stats);
    runner
}

fn base_stats() -> PlayerStats {
    PlayerStats {
        damage: 5.0,
        crit_multiplier: 2.0,
        damage_multiplier: 1.0,
        poison_duration: 5.0,
        poison_max_stacks: 5.0,
        ..PlayerStats::default()
    }
}

fn poison_stacks(runner: &CombatPipelineRunner) -> usize {
    runner
        .state::<PoisonState>(POISON_ID)
        .map(|state| state.stacks.len())
        .unwrap_or_default()
}

#[test]
fn crit_then_plain_strike_then_poison_tick_then_kill() {
    let stats = PlayerStats {
        damage: 5.0,
        crit_chance: 0.5,
        crit_multiplier: 2.0,
        damage_multiplier: 1.0,
        poison: 2.0,
        multi_strike: 1.0,
        ..PlayerStats::default()
    };
    let mut runner = runner(&stats);
    let mut rng = SequenceRng::new([0.3, 0.8]);

    let result = {
        let mut ctx = AttackContext::new(100.0, 100.0, &mut rng);
        runner.run_attack(&stats, &mut ctx)
    };

    assert_eq!(result.hits.len(), 2);
    assert_eq!(result.hits[0].hit_type, HitType::CRITICAL_HIT);
    assert_eq!(result.hits[0].damage, 10.0);
    assert_eq!(result.hits[1].hit_type, HitType::HIT);
    assert_eq!(result.hits[1].damage, 5.0);
    assert_eq!(result.total_damage, 15.0);
    assert_eq!(poison_stacks(&runner), 2);

    let ticks = {
        let mut ctx = TickContext::new(1000.0, &mut rng);
        runner.run_tick(&stats, &mut ctx)
    };
    assert_eq!(ticks.len(), 1);
    assert_eq!(ticks[0].system_id, POISON_ID);
    assert_eq!(ticks[0].damage, 4.0);
    assert_eq!(ticks[0].hit_type, HitType::POISON);

    runner.run_kill(&KillContext::default());
    assert_eq!(poison_stacks(&runner), 0);
}

#[test]
fn execute_short_circuits_every_other_system() {
    let stats = PlayerStats {
        execute_chance: 1.0,
        crit_chance: 1.0,
        poison: 3.0,
        ..base_stats()
    };
    let mut runner = runner(&stats);
    let mut rng = SequenceRng::new([0.0]);
    let mut ctx = AttackContext::new(37.0, 100.0, &mut rng);

    let result = runner.run_attack(&stats, &mut ctx);

    assert_eq!(result.short_circuited_by, Some("execute"));
    assert_eq!(result.hits.len(), 1);
    assert_eq!(result.hits[0].hit_type, HitType::EXECUTE_HIT);
    assert_eq!(result.total_damage, 37.0);
    assert_eq!(poison_stacks(&runner), 0);
    assert_eq!(runner.state::<CritState>("crit").map(|s| s.crits), Some(0));
    assert_eq!(
        runner.state::<ExecuteState>("execute").map(|s| s.executions),
        Some(1)
    );
}

#[test]
fn execute_never_rolls_against_bosses() {
    let stats = PlayerStats {
        execute_chance: 1.0,
        ..base_stats()
    };
    let mut runner = runner(&stats);
    let mut rng = SequenceRng::new([0.0, 0.99]);

    let result = {
        let mut ctx = AttackContext::new(500.0, 500.0, &mut rng).boss(true);
        runner.run_attack(&stats, &mut ctx)
    };

    assert_eq!(result.short_circuited_by, None);
    assert_eq!(result.hits[0].hit_type, HitType::HIT);
    // Only the crit roll was drawn.
    assert_eq!(rng.drawn(), 1);
}

#[test]
fn zero_execute_cap_disables_execute() {
    let stats = PlayerStats {
        execute_chance: 1.0,
        execute_cap: Some(0.0),
        ..base_stats()
    };
    let mut runner = runner(&stats);
    let mut rng = SequenceRng::new([0.0]);
    let mut ctx = AttackContext::new(50.0, 50.0, &mut rng);

    let result = runner.run_attack(&stats, &mut ctx);
    assert!(!result.has_hit_type(HitType::EXECUTE_HIT));
}

#[test]
fn each_strike_adds_a_poison_stack() {
    let stats = PlayerStats {
        poison: 1.0,
        multi_strike: 2.0,
        ..base_stats()
    };
    let mut runner = runner(&stats);
    let mut rng = SequenceRng::new([0.9]);
    let mut ctx = AttackContext::new(100.0, 100.0, &mut rng);

    let result = runner.run_attack(&stats, &mut ctx);
    assert_eq!(result.hits.len(), 3);
    assert_eq!(poison_stacks(&runner), 3);
}

#[test]
fn poison_respects_max_stacks_across_attacks() {
    let stats = PlayerStats {
        poison: 1.0,
        poison_max_stacks: 2.0,
        ..base_stats()
    };
    let mut runner = runner(&stats);
    let mut rng = SequenceRng::new([0.9]);

    for _ in 0..5 {
        let mut ctx = AttackContext::new(100.0, 100.0, &mut rng);
        runner.run_attack(&stats, &mut ctx);
    }
    assert_eq!(poison_stacks(&runner), 2);
}

#[test]
fn overkill_carries_only_when_enabled() {
    for (overkill, expected) in [(1.0, 40.0), (0.0, 0.0)] {
        let stats = PlayerStats {
            damage: 50.0,
            overkill,
            ..base_stats()
        };
        let mut runner = runner(&stats);
        let mut rng = SequenceRng::new([0.9]);
        let mut ctx = AttackContext::new(10.0, 10.0, &mut rng);

        let result = runner.run_attack(&stats, &mut ctx);
        assert_eq!(result.total_damage, 50.0);
        assert_eq!(result.overkill_damage_out, expected);
    }
}

#[test]
fn carried_overkill_lands_on_the_first_strike() {
    let stats = PlayerStats {
        multi_strike: 1.0,
        ..base_stats()
    };
    let mut runner = runner(&stats);
    let mut rng = SequenceRng::new([0.9]);
    let mut ctx = AttackContext::new(100.0, 100.0, &mut rng).with_overkill(40.0);

    let result = runner.run_attack(&stats, &mut ctx);
    assert_eq!(result.hits[0].damage, 45.0);
    assert_eq!(result.hits[1].damage, 5.0);
}

#[test]
fn damage_multiplier_scales_crit_damage() {
    let stats = PlayerStats {
        crit_chance: 1.0,
        damage_multiplier: 1.5,
        ..base_stats()
    };
    let mut runner = runner(&stats);
    let mut rng = SequenceRng::new([0.0]);
    let mut ctx = AttackContext::new(100.0, 100.0, &mut rng);

    let result = runner.run_attack(&stats, &mut ctx);
    let hit = &result.hits[0];
    assert_eq!(hit.hit_type, HitType::CRITICAL_HIT);
    assert_eq!(hit.damage, 15.0);
    assert_eq!(hit.field("critMultiplier"), Some(2.0));
}

#[test]
fn inactive_systems_are_skipped() {
    let stats = base_stats();
    let mut runner = runner(&stats);
    assert!(!runner.is_active(POISON_ID));
    assert!(!runner.is_active("execute"));
    assert!(runner.is_active("crit"));

    let mut rng = SequenceRng::new([0.9]);
    let mut ctx = TickContext::new(1000.0, &mut rng);
    assert!(runner.run_tick(&stats, &mut ctx).is_empty());
}

#[test]
fn reset_restores_initial_state() {
    let stats = PlayerStats {
        poison: 1.0,
        crit_chance: 1.0,
        ..base_stats()
    };
    let mut runner = runner(&stats);
    let mut rng = SequenceRng::new([0.0]);
    {
        let mut ctx = AttackContext::new(100.0, 100.0, &mut rng);
        runner.run_attack(&stats, &mut ctx);
    }
    assert_eq!(poison_stacks(&runner), 1);

    runner.reset();
    assert_eq!(poison_stacks(&runner), 0);
    assert_eq!(runner.state::<CritState>("crit").map(|s| s.crits), Some(0));
    assert!(runner.state::<ExecuteState>("crit").is_none());
}

/// Adds one damage per run and records the damage it saw in a field.
struct Tagger {
    id: &'static str,
    priority: i32,
}

impl SystemDefinition for Tagger {
    type State = ();

    fn id(&self) -> &'static str {
        self.id
    }

    fn initial_state(&self) -> Self::State {}

    fn priority(&self) -> i32 {
        self.priority
    }

    fn transforms_from(&self) -> &'static [HitType] {
        &[HitType::HIT]
    }

    fn transform_hit(
        &self,
        _state: &Self::State,
        hit: &PipelineHit,
        _stats: &PlayerStats,
        _rng: &mut dyn RngSource,
    ) -> Option<Transformed<Self::State>> {
        let damage = hit.damage;
        let mut hit = hit.clone().with_field(self.id, damage);
        hit.damage += 1.0;
        Some(Transformed { state: (), hit })
    }
}

#[test]
fn transforms_run_by_priority_then_registration_order() {
    let stats = base_stats();
    let mut runner = CombatPipelineRunner::new(vec![
        boxed(Tagger { id: "b", priority: 10 }),
        boxed(Tagger { id: "a", priority: 10 }),
        boxed(Tagger { id: "c", priority: 5 }),
    ]);
    runner.refresh_systems(&stats);
    let mut rng = SequenceRng::default();
    let mut ctx = AttackContext::new(100.0, 100.0, &mut rng);

    let hit = runner.run_attack(&stats, &mut ctx).hits.remove(0);
    assert_eq!(hit.field("c"), Some(5.0));
    assert_eq!(hit.field("b"), Some(6.0));
    assert_eq!(hit.field("a"), Some(7.0));
    assert_eq!(hit.damage, 8.0);
}

/// Low-priority bonus that only applies to critical hits.
struct CritBonus;

impl SystemDefinition for CritBonus {
    type State = ();

    fn id(&self) -> &'static str {
        "critBonus"
    }

    fn initial_state(&self) -> Self::State {}

    fn transforms_from(&self) -> &'static [HitType] {
        &[HitType::CRITICAL_HIT]
    }

    fn transform_hit(
        &self,
        _state: &Self::State,
        hit: &PipelineHit,
        _stats: &PlayerStats,
        _rng: &mut dyn RngSource,
    ) -> Option<Transformed<Self::State>> {
        let mut hit = hit.clone();
        hit.damage += 100.0;
        Some(Transformed { state: (), hit })
    }
}

#[test]
fn promoted_hits_run_transforms_for_their_new_type() {
    let stats = PlayerStats {
        crit_chance: 1.0,
        ..base_stats()
    };
    let mut systems = all_systems();
    systems.push(boxed(CritBonus));
    let mut runner = CombatPipelineRunner::new(systems);
    runner.refresh_systems(&stats);
    let mut rng = SequenceRng::new([0.0]);
    let mut ctx = AttackContext::new(100.0, 100.0, &mut rng);

    let result = runner.run_attack(&stats, &mut ctx);
    assert_eq!(result.hits[0].hit_type, HitType::CRITICAL_HIT);
    assert_eq!(result.hits[0].damage, 110.0);
}

/// Asks poison to clear on every hit and pings a system that does not exist.
struct Cleanser;

impl SystemDefinition for Cleanser {
    type State = u32;

    fn id(&self) -> &'static str {
        "cleanser"
    }

    fn initial_state(&self) -> Self::State {
        0
    }

    fn reacts_to(&self) -> &'static [HitType] {
        &[HitType::HIT]
    }

    fn on_hit(
        &self,
        state: &Self::State,
        _hit: &PipelineHit,
        _stats: &PlayerStats,
    ) -> Option<game_core::combat::Reaction<Self::State>> {
        Some(
            game_core::combat::Reaction::new(state + 1)
                .with_effect(PipelineEffect::signal(POISON_ID, "clear"))
                .with_effect(PipelineEffect::signal("nobody", "hello")),
        )
    }
}

#[test]
fn effects_are_delivered_after_all_hits() {
    let stats = PlayerStats {
        poison: 1.0,
        multi_strike: 2.0,
        ..base_stats()
    };
    let mut systems = vec![boxed(Cleanser)];
    systems.extend(all_systems());
    let mut runner = CombatPipelineRunner::new(systems);
    runner.refresh_systems(&stats);
    let mut rng = SequenceRng::new([0.9]);
    let mut ctx = AttackContext::new(100.0, 100.0, &mut rng);

    let result = runner.run_attack(&stats, &mut ctx);

    assert_eq!(result.hits.len(), 3);
    assert_eq!(runner.state::<u32>("cleanser"), Some(&3));
    // Every strike poisoned first; the queued clears landed afterwards.
    assert_eq!(poison_stacks(&runner), 0);
}

#[test]
fn minimal_crit_still_beats_a_one_damage_strike() {
    let stats = PlayerStats {
        damage: 1.0,
        crit_chance: 1.0,
        crit_multiplier: 1.01,
        damage_multiplier: 1.0,
        ..PlayerStats::default()
    };
    let mut runner = runner(&stats);
    let mut rng = SequenceRng::new([0.0]);

    let result = {
        let mut ctx = AttackContext::new(100.0, 100.0, &mut rng);
        runner.run_attack(&stats, &mut ctx)
    };

    assert_eq!(result.hits.len(), 1);
    assert_eq!(result.hits[0].hit_type, HitType::CRITICAL_HIT);
    assert_eq!(result.hits[0].damage, 2.0);
    assert_eq!(result.total_damage, 2.0);
}
