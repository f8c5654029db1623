//! Run orchestration: one player fighting a sequence of enemies.
//!
//! [`GameSession`] glues the stat pipeline, the combat runner and the balance
//! tables together. It owns no clock; every time-based behavior (attack
//! cooldowns, poison ticks, frenzy decay, boss countdowns) is driven from the
//! [`GameLoop`](crate::GameLoop) timers, which call the methods here.

use game_content::{BalanceTables, EnemyKind, GameContent};
use game_core::combat::systems::{self, POISON_ID, PoisonState};
use game_core::{
    AttackContext, AttackResult, ClassTable, CombatPipelineRunner, GameConfig, KillContext,
    PlayerClass, PlayerStats, RngSource, StackManager, StackPolicy, StatKey, StatModifier,
    StatPipeline, TickContext, Upgrade, UpgradeCatalog, UpgradeError,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::error::Result;
use crate::events::GameEvent;

/// The enemy currently on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub health: f64,
    pub max_health: f64,
    /// Unique per spawn, so stale boss timers can tell they are stale.
    pub serial: u64,
}

/// One run's worth of player and world state.
pub struct GameSession {
    config: GameConfig,
    tables: BalanceTables,
    upgrades: UpgradeCatalog,
    classes: ClassTable,

    pipeline: StatPipeline,
    stats: PlayerStats,
    runner: CombatPipelineRunner,
    rng: Box<dyn RngSource>,

    class: PlayerClass,
    acquired: Vec<String>,
    pending_offer: Option<Vec<String>>,
    queued_offers: u32,
    frenzy: Vec<u32>,

    stage: u32,
    kills_in_stage: u32,
    enemy: Enemy,
    next_serial: u64,
    overkill_carry: f64,

    gold: f64,
    xp: f64,
    level: u32,
    kills: u64,

    events: Vec<GameEvent>,
}

impl GameSession {
    /// Starts a run on stage 1 with `class`, rolling through `rng`.
    pub fn new(content: GameContent, class: PlayerClass, rng: impl RngSource + 'static) -> Self {
        let GameContent {
            config,
            tables,
            upgrades,
            classes,
        } = content;

        let pipeline = config.stat_pipeline();
        let runner = CombatPipelineRunner::new(systems::with_poison(config.poison_system()));
        let enemy = Enemy {
            kind: EnemyKind::Normal,
            health: 0.0,
            max_health: 0.0,
            serial: 0,
        };

        let mut session = Self {
            config,
            tables,
            upgrades,
            classes,
            pipeline,
            stats: PlayerStats::default(),
            runner,
            rng: Box::new(rng),
            class,
            acquired: Vec::new(),
            pending_offer: None,
            queued_offers: 0,
            frenzy: Vec::new(),
            stage: 1,
            kills_in_stage: 0,
            enemy,
            next_serial: 0,
            overkill_carry: 0.0,
            gold: 0.0,
            xp: 0.0,
            level: 1,
            kills: 0,
            events: Vec::new(),
        };
        session.start();
        session
    }

    /// Starts a run whose every roll comes from a `StdRng` seeded with `seed`.
    pub fn seeded(content: GameContent, class: PlayerClass, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new(content, class, move || rng.gen_range(0.0..1.0))
    }

    /// Throws away all progress and starts over on stage 1. Content and class are kept.
    pub fn reset(&mut self) {
        self.pipeline.reset();
        self.runner.reset();
        self.acquired.clear();
        self.pending_offer = None;
        self.queued_offers = 0;
        self.frenzy.clear();
        self.stage = 1;
        self.kills_in_stage = 0;
        self.overkill_carry = 0.0;
        self.gold = 0.0;
        self.xp = 0.0;
        self.level = 1;
        self.kills = 0;
        self.events.clear();
        self.start();
    }

    fn start(&mut self) {
        self.pipeline.rebuild_class(self.classes.bonuses(self.class));
        self.refresh_stats();
        self.spawn_next();
        info!(
            target: "runtime::session",
            class = %self.class,
            upgrades = self.upgrades.len(),
            "Run started"
        );
    }

    // ===== accessors =====

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn enemy(&self) -> &Enemy {
        &self.enemy
    }

    pub fn stage(&self) -> u32 {
        self.stage
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn gold(&self) -> f64 {
        self.gold
    }

    pub fn xp(&self) -> f64 {
        self.xp
    }

    pub fn kills(&self) -> u64 {
        self.kills
    }

    pub fn class(&self) -> PlayerClass {
        self.class
    }

    pub fn acquired(&self) -> &[String] {
        &self.acquired
    }

    pub fn pending_offer(&self) -> Option<&[String]> {
        self.pending_offer.as_deref()
    }

    pub fn frenzy_stacks(&self) -> usize {
        self.frenzy.len()
    }

    pub fn poison_stacks(&self) -> usize {
        self.runner
            .state::<PoisonState>(POISON_ID)
            .map_or(0, |state| state.stacks.len())
    }

    pub fn runner(&self) -> &CombatPipelineRunner {
        &self.runner
    }

    /// Boss countdown length in milliseconds.
    pub fn boss_time_limit_ms(&self) -> f64 {
        self.stats.boss_time.max(0.0) * 1000.0
    }

    /// Takes every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== stats =====

    fn refresh_stats(&mut self) {
        self.stats = self.pipeline.snapshot();
        self.runner.refresh_systems(&self.stats);
    }

    /// Switches class, rebuilding only the class layer.
    pub fn set_class(&mut self, class: PlayerClass) {
        self.class = class;
        self.pipeline.rebuild_class(self.classes.bonuses(class));
        self.refresh_stats();
    }

    fn rebuild_frenzy_layer(&mut self) {
        let bonus = self.stats.tap_frenzy_bonus * self.frenzy.len() as f64;
        let modifiers = if self.frenzy.is_empty() {
            Vec::new()
        } else {
            vec![StatModifier::new(StatKey::AttackSpeed, bonus)]
        };
        self.pipeline.rebuild_transient(&modifiers);
        self.refresh_stats();
    }

    fn frenzy_manager(&self) -> StackManager {
        StackManager::from_stat(self.stats.tap_frenzy_max_stacks, StackPolicy::AddNew)
    }

    /// Ages every frenzy stack by one unit.
    pub fn decay_frenzy(&mut self) {
        if self.frenzy.is_empty() {
            return;
        }
        let before = self.frenzy.len();
        self.frenzy_manager().tick(&mut self.frenzy);
        if self.frenzy.len() != before {
            self.rebuild_frenzy_layer();
        }
    }

    // ===== combat =====

    /// A player tap: attacks and, when frenzy is unlocked, adds a frenzy stack.
    pub fn tap(&mut self) -> AttackResult {
        let result = self.attack();
        if self.stats.tap_frenzy_bonus > 0.0 {
            let duration = self.stats.tap_frenzy_duration.max(0.0).round() as u32;
            let before = self.frenzy.clone();
            self.frenzy_manager().add(&mut self.frenzy, duration, 1);
            if self.frenzy != before {
                self.rebuild_frenzy_layer();
            }
        }
        result
    }

    /// Resolves one attack against the current enemy.
    pub fn attack(&mut self) -> AttackResult {
        self.runner.refresh_systems(&self.stats);

        let carry = std::mem::take(&mut self.overkill_carry);
        let mut ctx = AttackContext::new(self.enemy.health, self.enemy.max_health, self.rng.as_mut())
            .with_overkill(carry)
            .boss(self.enemy.kind.is_boss());
        let result = self.runner.run_attack(&self.stats, &mut ctx);

        for hit in &result.hits {
            self.events.push(GameEvent::Hit {
                hit_type: hit.hit_type.as_str(),
                damage: hit.damage,
                strike: hit.index,
            });
        }

        self.enemy.health -= result.total_damage;
        if self.enemy.health <= 0.0 {
            self.kill(result.overkill_damage_out);
        }
        result
    }

    /// Runs one periodic combat tick and applies its damage.
    pub fn combat_tick(&mut self, delta_ms: f64) -> f64 {
        let mut ctx = TickContext::new(delta_ms, self.rng.as_mut());
        let dealt = self.runner.run_tick(&self.stats, &mut ctx);

        let mut total = 0.0;
        for tick in dealt {
            total += tick.damage;
            self.events.push(GameEvent::PoisonTick {
                hit_type: tick.hit_type.as_str(),
                damage: tick.damage,
            });
        }

        if total > 0.0 {
            self.enemy.health -= total;
            if self.enemy.health <= 0.0 {
                self.kill(0.0);
            }
        }
        total
    }

    fn kill(&mut self, overkill: f64) {
        let enemy = self.enemy;
        let stage = self.stage;
        self.runner.run_kill(&KillContext {
            enemy_max_health: enemy.max_health,
            is_boss: enemy.kind.is_boss(),
            is_chest: enemy.kind.is_chest(),
            is_boss_chest: enemy.kind == EnemyKind::BossChest,
            stage,
        });

        let gold = self.tables.gold_reward(stage, enemy.kind)
            * self.stats.gold_multiplier
            * (1.0 + self.stats.greed.max(0.0));
        let xp = self.tables.xp_reward(stage, enemy.kind) * self.stats.xp_multiplier;
        self.gold += gold;
        self.kills += 1;
        self.overkill_carry = overkill;
        self.events.push(GameEvent::EnemyKilled {
            stage,
            kind: enemy.kind,
            gold,
            xp,
        });
        debug!(
            target: "runtime::session",
            stage,
            kind = ?enemy.kind,
            gold,
            xp,
            overkill,
            "Enemy killed"
        );

        self.gain_xp(xp);
        self.advance_after_kill(enemy.kind);
    }

    // ===== progression =====

    fn advance_after_kill(&mut self, killed: EnemyKind) {
        match killed {
            EnemyKind::Boss => {
                let boss_chest = self.roll() < self.stats.boss_chest_chance;
                self.advance_stage();
                if boss_chest {
                    self.spawn(EnemyKind::BossChest);
                    return;
                }
            }
            EnemyKind::Normal => {
                self.kills_in_stage += 1;
                let cleared = self.kills_in_stage >= self.tables.enemy.enemies_per_stage;
                if cleared && !self.tables.is_boss_stage(self.stage) {
                    self.advance_stage();
                }
            }
            EnemyKind::Chest | EnemyKind::BossChest => {}
        }
        self.spawn_next();
    }

    fn advance_stage(&mut self) {
        self.stage += 1;
        self.kills_in_stage = 0;
        self.events.push(GameEvent::StageAdvanced { stage: self.stage });
    }

    /// Spawns the enemy that should come next on the current stage.
    fn spawn_next(&mut self) {
        let boss_due = self.tables.is_boss_stage(self.stage)
            && self.kills_in_stage >= self.tables.enemy.enemies_per_stage;
        let kind = if boss_due {
            EnemyKind::Boss
        } else if self.roll() < self.stats.chest_chance {
            EnemyKind::Chest
        } else {
            EnemyKind::Normal
        };
        self.spawn(kind);
    }

    fn spawn(&mut self, kind: EnemyKind) {
        let max_health =
            (self.tables.enemy_health(self.stage, kind) * (1.0 + self.stats.greed.max(0.0))).ceil();
        self.next_serial += 1;
        self.enemy = Enemy {
            kind,
            health: max_health,
            max_health,
            serial: self.next_serial,
        };

        if kind.is_boss() {
            self.events.push(GameEvent::BossSpawned {
                stage: self.stage,
                max_health,
                time_limit_ms: self.boss_time_limit_ms(),
            });
        }
    }

    /// Ends a boss fight that ran out of time, falling back to the start of
    /// the previous stage. Ignored unless `serial` is still the live boss.
    pub fn boss_timeout(&mut self, serial: u64) {
        if !self.enemy.kind.is_boss() || self.enemy.serial != serial {
            return;
        }

        info!(target: "runtime::session", stage = self.stage, "Boss timer expired");
        self.events.push(GameEvent::BossFailed { stage: self.stage });
        self.stage = self.stage.saturating_sub(1).max(1);
        self.kills_in_stage = 0;
        self.overkill_carry = 0.0;
        self.spawn(EnemyKind::Normal);
    }

    fn gain_xp(&mut self, xp: f64) {
        self.xp += xp;
        loop {
            let needed = self.tables.xp_to_next_level(self.level);
            if needed <= 0.0 || self.xp < needed {
                break;
            }
            self.xp -= needed;
            self.level += 1;
            self.events.push(GameEvent::LevelUp { level: self.level });
            self.queued_offers += 1;
        }
        self.offer_next();
    }

    // ===== upgrades =====

    fn offer_next(&mut self) {
        if self.pending_offer.is_some() || self.queued_offers == 0 {
            return;
        }
        self.queued_offers -= 1;
        if let Some(choices) = self.roll_offer() {
            self.events.push(GameEvent::UpgradeOffered {
                choices: choices.clone(),
            });
            self.pending_offer = Some(choices);
        }
    }

    /// Draws distinct upgrades weighted by rarity, shifted by luck.
    fn roll_offer(&mut self) -> Option<Vec<String>> {
        let luck = self.stats.lucky_chance;
        let mut pool: Vec<(String, f64)> = self
            .upgrades
            .iter()
            .map(|upgrade| (upgrade.id.clone(), upgrade.rarity.weight(luck)))
            .filter(|(_, weight)| *weight > 0.0)
            .collect();

        let count = self.config.offer_count.min(pool.len());
        let mut choices = Vec::with_capacity(count);
        for _ in 0..count {
            let total: f64 = pool.iter().map(|(_, weight)| weight).sum();
            let mut target = self.roll() * total;
            let mut pick = pool.len() - 1;
            for (i, (_, weight)) in pool.iter().enumerate() {
                if target < *weight {
                    pick = i;
                    break;
                }
                target -= weight;
            }
            choices.push(pool.remove(pick).0);
        }

        (!choices.is_empty()).then_some(choices)
    }

    /// Picks slot `index` of the pending offer.
    pub fn choose_upgrade(&mut self, index: usize) -> Result<&Upgrade> {
        let choices = self.pending_offer.as_ref().ok_or(UpgradeError::NoPendingOffer)?;
        let id = choices
            .get(index)
            .cloned()
            .ok_or(UpgradeError::OfferSlotOutOfRange {
                index,
                len: choices.len(),
            })?;

        self.acquire_upgrade(&id)?;
        self.pending_offer = None;
        self.offer_next();
        Ok(self.upgrades.get(&id)?)
    }

    /// Acquires `id` directly and rebuilds the permanent layer.
    pub fn acquire_upgrade(&mut self, id: &str) -> Result<()> {
        self.upgrades.get(id)?;
        self.acquired.push(id.to_owned());

        let modifiers = self.upgrades.modifiers_for(&self.acquired)?;
        self.pipeline.rebuild_permanent(&modifiers);
        self.refresh_stats();

        self.events.push(GameEvent::UpgradeAcquired { id: id.to_owned() });
        info!(
            target: "runtime::session",
            upgrade = id,
            acquired = self.acquired.len(),
            "Upgrade acquired"
        );
        Ok(())
    }

    fn roll(&mut self) -> f64 {
        self.rng.next_f64()
    }
}
