use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use game_core::{
    ClassTable, GameConfig, LayerKind, PlayerClass, Rarity, StatKey, StatModifier, StatStep,
    Upgrade, UpgradeCatalog, UpgradeError,
};

fn catalog() -> UpgradeCatalog {
    UpgradeCatalog::new(vec![
        Upgrade::new(
            "whetstone",
            "Whetstone",
            Rarity::Common,
            vec![StatModifier::new(StatKey::Damage, 2.0)],
        ),
        Upgrade::new(
            "assassin",
            "Assassin's Mark",
            Rarity::Epic,
            vec![
                StatModifier::new(StatKey::ExecuteChance, 0.05),
                StatModifier::new(StatKey::ExecuteCap, 0.2),
            ],
        ),
    ])
}

#[test]
fn acquired_upgrades_and_class_combine() {
    let config = GameConfig::default();
    let mut pipeline = config.stat_pipeline();
    let catalog = catalog();

    let acquired = vec!["whetstone".to_owned(), "whetstone".to_owned()];
    pipeline.rebuild_permanent(&catalog.modifiers_for(&acquired).unwrap());
    pipeline.rebuild_class(ClassTable::default().bonuses(PlayerClass::Warrior));

    let stats = pipeline.snapshot();
    // 1 base + 2 × 2 whetstone + 2 warrior
    assert_eq!(stats.damage, 7.0);
    assert_eq!(stats.execute_cap, None);
}

#[test]
fn modified_execute_cap_appears_in_snapshot() {
    let mut pipeline = GameConfig::default().stat_pipeline();
    let modifiers = catalog().modifiers_for(&["assassin".to_owned()]).unwrap();
    pipeline.rebuild_permanent(&modifiers);

    let stats = pipeline.snapshot();
    assert_eq!(stats.execute_chance, 0.05);
    assert_eq!(stats.execute_cap, Some(0.2));
}

#[test]
fn unknown_upgrade_is_rejected() {
    let err = catalog()
        .modifiers_for(&["missing".to_owned()])
        .unwrap_err();
    assert_eq!(err, UpgradeError::UnknownUpgrade("missing".to_owned()));
}

#[test]
fn conditional_steps_need_an_explicit_invalidate() {
    let enraged = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&enraged);
    let mut pipeline = GameConfig::default().stat_pipeline();
    pipeline.set_layer_steps(
        StatKey::Damage,
        LayerKind::Transient,
        vec![StatStep::conditional_add(10.0, move || {
            flag.load(Ordering::Relaxed)
        })],
    );
    assert_eq!(pipeline.get(StatKey::Damage), 1.0);

    enraged.store(true, Ordering::Relaxed);
    assert_eq!(pipeline.get(StatKey::Damage), 1.0);

    pipeline.invalidate(StatKey::Damage, LayerKind::Transient);
    assert_eq!(pipeline.get(StatKey::Damage), 11.0);
}

#[test]
fn only_layers_after_a_change_recompute() {
    let permanent_runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&permanent_runs);
    let mut pipeline = GameConfig::default().stat_pipeline();
    pipeline.set_layer_steps(
        StatKey::Damage,
        LayerKind::Permanent,
        vec![StatStep::custom(move |value| {
            counter.fetch_add(1, Ordering::Relaxed);
            value * 2.0
        })],
    );

    assert_eq!(pipeline.get(StatKey::Damage), 2.0);
    assert_eq!(pipeline.get(StatKey::Damage), 2.0);
    assert_eq!(permanent_runs.load(Ordering::Relaxed), 1);

    pipeline.rebuild_transient(&[StatModifier::new(StatKey::Damage, 3.0)]);
    assert_eq!(pipeline.get(StatKey::Damage), 5.0);
    assert_eq!(permanent_runs.load(Ordering::Relaxed), 1);

    pipeline.set_base(StatKey::Damage, 4.0);
    assert_eq!(pipeline.get(StatKey::Damage), 11.0);
    assert_eq!(permanent_runs.load(Ordering::Relaxed), 2);
}
