use criterion::{black_box, criterion_group, criterion_main, Criterion};
use emberscape_core::catalog::Catalogs;
use emberscape_core::config::CombatConfig;
use emberscape_core::engine::CombatEngine;
use emberscape_core::entity::{CombatStats, Entity, EntityId, EquipmentBonus};
use emberscape_core::formulas;

fn maxed(id: u64) -> Entity {
    let stats = CombatStats {
        attack: 99,
        strength: 99,
        defence: 99,
        ranged: 99,
        magic: 99,
        hitpoints: 99,
        prayer: 99,
    };
    let bonus = EquipmentBonus {
        attack_slash: 80,
        melee_strength: 100,
        defence_slash: 60,
        ..EquipmentBonus::default()
    };
    Entity::player(EntityId::new(id), "Bench", stats, bonus)
}

fn bench_formulas(c: &mut Criterion) {
    c.bench_function("hit_chance", |b| {
        b.iter(|| formulas::hit_chance(black_box(16236), black_box(9856)))
    });

    c.bench_function("max_hit", |b| {
        b.iter(|| formulas::max_hit(black_box(99), black_box(100), black_box(1.23), black_box(1.0)))
    });

    c.bench_function("combat_level", |b| {
        let stats = CombatStats {
            attack: 99,
            strength: 99,
            defence: 99,
            ranged: 99,
            magic: 99,
            hitpoints: 99,
            prayer: 99,
        };
        b.iter(|| formulas::combat_level(black_box(&stats)))
    });
}

fn bench_combat_tick(c: &mut Criterion) {
    let engine = CombatEngine::new(CombatConfig::default(), Catalogs::builtin(), 42);

    c.bench_function("combat_tick", |b| {
        b.iter_batched(
            || engine.start_combat(maxed(1), maxed(2), false).unwrap(),
            |mut session| {
                let _ = engine.process_combat_tick(black_box(&mut session));
                session
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_full_fight(c: &mut Criterion) {
    let engine = CombatEngine::new(CombatConfig::default(), Catalogs::builtin(), 42);

    c.bench_function("full_fight", |b| {
        b.iter_batched(
            || engine.start_combat(maxed(1), maxed(2), false).unwrap(),
            |mut session| {
                while !engine.process_combat_tick(&mut session).finished {}
                session
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_formulas, bench_combat_tick, bench_full_fight);
criterion_main!(benches);
