use game_content::{BalanceTables, EnemyKind, GameContent};
use game_core::{
    ClassTable, GameConfig, PlayerClass, Rarity, SequenceRng, StatKey, StatModifier, Upgrade,
    UpgradeCatalog, UpgradeError,
};
use runtime::{GameEvent, GameSession, SessionError};

fn catalog() -> UpgradeCatalog {
    UpgradeCatalog::new(vec![
        Upgrade::new(
            "whetstone",
            "Whetstone",
            Rarity::Common,
            vec![StatModifier::new(StatKey::Damage, 2.0)],
        ),
        Upgrade::new(
            "keen_eye",
            "Keen Eye",
            Rarity::Rare,
            vec![StatModifier::new(StatKey::CritChance, 0.1)],
        ),
    ])
}

fn content(config: GameConfig, tables: BalanceTables) -> GameContent {
    GameContent {
        config,
        tables,
        upgrades: catalog(),
        classes: ClassTable::default(),
    }
}

fn session(config: GameConfig, tables: BalanceTables) -> GameSession {
    GameSession::new(
        content(config, tables),
        PlayerClass::None,
        SequenceRng::new(vec![0.5]),
    )
}

fn one_hit_tables() -> BalanceTables {
    let mut tables = BalanceTables::default();
    tables.enemy.base_health = 1.0;
    tables.enemy.health_growth = 1.0;
    tables
}

#[test]
fn tenth_tap_kills_the_first_enemy() {
    let mut session = session(GameConfig::default(), BalanceTables::default());
    assert_eq!(session.enemy().max_health, 10.0);

    for _ in 0..9 {
        session.attack();
    }
    assert_eq!(session.enemy().health, 1.0);
    assert!(session.drain_events().iter().all(|e| matches!(e, GameEvent::Hit { .. })));

    session.attack();
    let events = session.drain_events();
    assert!(events.contains(&GameEvent::EnemyKilled {
        stage: 1,
        kind: EnemyKind::Normal,
        gold: 1.0,
        xp: 1.0,
    }));
    assert_eq!(session.gold(), 1.0);
    assert_eq!(session.kills(), 1);
    assert_eq!(session.enemy().health, 10.0);
}

#[test]
fn clearing_a_stage_advances() {
    let mut tables = one_hit_tables();
    tables.enemy.enemies_per_stage = 3;
    let mut session = session(GameConfig::default(), tables);

    for _ in 0..3 {
        session.attack();
    }

    assert_eq!(session.stage(), 2);
    assert!(session
        .drain_events()
        .contains(&GameEvent::StageAdvanced { stage: 2 }));
}

#[test]
fn boss_spawns_after_stage_kills_and_timeout_falls_back() {
    let mut tables = one_hit_tables();
    tables.enemy.enemies_per_stage = 2;
    tables.enemy.boss_interval = 2;
    let mut session = session(GameConfig::default(), tables);

    for _ in 0..4 {
        session.attack();
    }

    assert_eq!(session.stage(), 2);
    assert_eq!(session.enemy().kind, EnemyKind::Boss);
    assert!(session.drain_events().contains(&GameEvent::BossSpawned {
        stage: 2,
        max_health: 8.0,
        time_limit_ms: 30_000.0,
    }));

    let serial = session.enemy().serial;
    session.boss_timeout(serial + 1);
    assert_eq!(session.enemy().kind, EnemyKind::Boss);

    session.boss_timeout(serial);
    assert_eq!(session.stage(), 1);
    assert_eq!(session.enemy().kind, EnemyKind::Normal);
    assert_eq!(session.drain_events(), vec![GameEvent::BossFailed { stage: 2 }]);
}

#[test]
fn killing_the_boss_advances_the_stage() {
    let mut tables = one_hit_tables();
    tables.enemy.enemies_per_stage = 1;
    tables.enemy.boss_interval = 1;
    let config = GameConfig::default().with_base_stat(StatKey::Damage, 8.0);
    let mut session = session(config, tables);

    session.attack();
    assert_eq!(session.enemy().kind, EnemyKind::Boss);
    session.attack();

    assert_eq!(session.stage(), 2);
    let killed = session
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::EnemyKilled { kind: EnemyKind::Boss, .. }))
        .count();
    assert_eq!(killed, 1);
}

#[test]
fn chests_do_not_count_toward_the_stage() {
    let config = GameConfig::default()
        .with_base_stat(StatKey::ChestChance, 1.0)
        .with_base_stat(StatKey::Damage, 5.0);
    let mut session = session(config, BalanceTables::default());
    assert_eq!(session.enemy().kind, EnemyKind::Chest);
    assert_eq!(session.enemy().max_health, 5.0);

    session.attack();

    assert_eq!(session.gold(), 5.0);
    assert_eq!(session.stage(), 1);
    assert_eq!(session.enemy().kind, EnemyKind::Chest);
}

#[test]
fn greed_scales_health_and_gold() {
    let config = GameConfig::default()
        .with_base_stat(StatKey::Greed, 1.0)
        .with_base_stat(StatKey::Damage, 20.0);
    let mut session = session(config, BalanceTables::default());
    assert_eq!(session.enemy().max_health, 20.0);

    session.attack();
    assert_eq!(session.gold(), 2.0);
}

#[test]
fn level_up_offers_distinct_upgrades() {
    let mut tables = one_hit_tables();
    tables.xp.level_base = 1.0;
    let mut session = session(GameConfig::default(), tables);

    session.attack();

    assert_eq!(session.level(), 2);
    let offer = session.pending_offer().unwrap().to_vec();
    // Only two upgrades exist, so the offer is smaller than offer_count.
    assert_eq!(offer.len(), 2);
    assert_ne!(offer[0], offer[1]);

    let events = session.drain_events();
    assert!(events.contains(&GameEvent::LevelUp { level: 2 }));
    assert!(events.contains(&GameEvent::UpgradeOffered { choices: offer }));
}

#[test]
fn choosing_an_upgrade_rebuilds_stats() {
    let mut tables = one_hit_tables();
    tables.xp.level_base = 1.0;
    let mut session = session(GameConfig::default(), tables);
    session.attack();

    let slot = session
        .pending_offer()
        .unwrap()
        .iter()
        .position(|id| id == "whetstone")
        .unwrap();
    let chosen = session.choose_upgrade(slot).unwrap();
    assert_eq!(chosen.id, "whetstone");

    assert_eq!(session.stats().damage, 3.0);
    assert_eq!(session.acquired(), ["whetstone".to_owned()]);
    assert!(session.pending_offer().is_none());
    assert!(session.drain_events().contains(&GameEvent::UpgradeAcquired {
        id: "whetstone".to_owned()
    }));
}

#[test]
fn bad_offer_choices_are_rejected() {
    let mut tables = one_hit_tables();
    tables.xp.level_base = 1.0;
    let mut session = session(GameConfig::default(), tables);

    assert_eq!(
        session.choose_upgrade(0).unwrap_err(),
        SessionError::Upgrade(UpgradeError::NoPendingOffer)
    );

    session.attack();
    assert_eq!(
        session.choose_upgrade(5).unwrap_err(),
        SessionError::Upgrade(UpgradeError::OfferSlotOutOfRange { index: 5, len: 2 })
    );
    assert!(session.pending_offer().is_some());
}

#[test]
fn unknown_upgrades_are_not_acquired() {
    let mut session = session(GameConfig::default(), BalanceTables::default());
    let err = session.acquire_upgrade("missing").unwrap_err();
    assert_eq!(
        err,
        SessionError::Upgrade(UpgradeError::UnknownUpgrade("missing".to_owned()))
    );
    assert!(session.acquired().is_empty());
}

#[test]
fn taps_build_frenzy_attack_speed() {
    let mut session = session(GameConfig::default(), BalanceTables::default());

    session.tap();
    session.tap();
    assert_eq!(session.frenzy_stacks(), 2);
    assert!((session.stats().attack_speed - 1.1).abs() < 1e-9);

    for _ in 0..3 {
        session.decay_frenzy();
    }
    assert_eq!(session.frenzy_stacks(), 0);
    assert_eq!(session.stats().attack_speed, 1.0);
}

#[test]
fn poison_ticks_damage_the_enemy() {
    let config = GameConfig::default().with_base_stat(StatKey::Poison, 2.0);
    let mut session = session(config, BalanceTables::default());

    session.attack();
    assert_eq!(session.poison_stacks(), 1);
    session.drain_events();

    let dealt = session.combat_tick(1000.0);
    assert_eq!(dealt, 2.0);
    assert_eq!(session.enemy().health, 7.0);
    assert_eq!(
        session.drain_events(),
        vec![GameEvent::PoisonTick {
            hit_type: "poison",
            damage: 2.0
        }]
    );
}

#[test]
fn class_change_only_touches_class_bonuses() {
    let mut session = session(GameConfig::default(), BalanceTables::default());
    session.acquire_upgrade("whetstone").unwrap();
    let before = session.stats().damage;

    session.set_class(PlayerClass::Warrior);
    let warrior = session.stats().damage;
    assert!(warrior > before);

    session.set_class(PlayerClass::None);
    assert_eq!(session.stats().damage, before);
}

#[test]
fn reset_starts_a_fresh_run() {
    let mut session = session(GameConfig::default(), one_hit_tables());
    session.acquire_upgrade("whetstone").unwrap();
    for _ in 0..15 {
        session.attack();
    }

    session.reset();

    assert_eq!(session.stage(), 1);
    assert_eq!(session.gold(), 0.0);
    assert_eq!(session.level(), 1);
    assert!(session.acquired().is_empty());
    assert_eq!(session.stats().damage, 1.0);
    assert!(session.drain_events().is_empty());
}

#[test]
fn seeded_sessions_replay_identically() {
    let run = |seed| {
        let config = GameConfig::default()
            .with_base_stat(StatKey::CritChance, 0.5)
            .with_base_stat(StatKey::ChestChance, 0.2);
        let content = content(config, BalanceTables::default());
        let mut session = GameSession::seeded(content, PlayerClass::Rogue, seed);
        for _ in 0..50 {
            session.attack();
        }
        session.drain_events()
    };

    assert_eq!(run(7), run(7));
}

#[test]
fn events_serialize_with_a_type_tag() {
    let json = serde_json::to_value(GameEvent::EnemyKilled {
        stage: 3,
        kind: EnemyKind::BossChest,
        gold: 20.0,
        xp: 1.0,
    })
    .unwrap();

    assert_eq!(json["type"], "enemy_killed");
    assert_eq!(json["kind"], "boss_chest");
    assert_eq!(json["stage"], 3);
}
