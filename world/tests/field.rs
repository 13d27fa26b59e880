use tile_defence_core::{
    Command, EnemyKind, EntityId, EntityKind, Event, Living, Rect, SpawnPlan, SpawnRequest,
    TowerKind,
};
use tile_defence_world::{apply, query, EnemyStats, Field, RuleBook};

#[test]
fn enemy_steps_toward_lower_road_distance() {
    let mut field = Field::new(test_rules(), 1);
    let mut events = Vec::new();
    spawn(&mut field, road(0.0, 0.0, 3.0), &mut events);
    spawn(&mut field, road(1.0, 0.0, 1.0), &mut events);
    let enemy = spawn(&mut field, enemy(0.0, 0.0), &mut events);

    apply(&mut field, Command::Tick, &mut events);

    let bounds = bounds_of(&field, enemy);
    assert!(bounds.x() > 0.0, "enemy stayed at {bounds:?}");
    assert!((bounds.x() - 1.0).abs() < 1e-12);
    assert!(bounds.y().abs() < 1e-12);
}

#[test]
fn destroyed_enemy_pays_reward_exactly_once() {
    let mut field = Field::new(test_rules(), 1);
    let mut events = Vec::new();
    spawn(&mut field, road(0.0, 0.0, 3.0), &mut events);
    spawn(&mut field, road(1.0, 0.0, 1.0), &mut events);
    let enemy = spawn(&mut field, enemy(0.0, 0.0), &mut events);
    let before = query::credit(&field);

    apply(
        &mut field,
        Command::ApplyEffect {
            target: enemy,
            value: -10,
        },
        &mut events,
    );
    events.clear();
    for _ in 0..5 {
        apply(&mut field, Command::Tick, &mut events);
    }

    assert_eq!(query::credit(&field), before + 5);
    let destroyed = events
        .iter()
        .filter(|event| matches!(event, Event::EntityDestroyed { id, .. } if *id == enemy))
        .count();
    assert_eq!(destroyed, 1);
    assert!(events.contains(&Event::CreditChanged {
        credit: before + 5,
        delta: 5,
    }));
    assert!(query::entity(&field, enemy).is_none());
    assert_eq!(query::enemy_count(&field), 0);
}

#[test]
fn destruction_requests_sound_and_leaves_explosion() {
    let mut field = Field::new(test_rules(), 1);
    let mut events = Vec::new();
    spawn(&mut field, road(0.0, 0.0, 3.0), &mut events);
    let enemy = spawn(&mut field, enemy(0.0, 0.0), &mut events);

    apply(&mut field, Command::Destroy { target: enemy }, &mut events);
    events.clear();
    apply(&mut field, Command::Tick, &mut events);

    assert!(events.iter().any(|event| matches!(
        event,
        Event::SoundRequested { kind: EntityKind::NormalEnemy, cue } if cue.as_str() == "normal_enemy_destroy"
    )));
    assert_eq!(query::count(&field, EntityKind::Explosion), 1);
}

#[test]
fn enemy_reaching_target_detonates() {
    let mut field = Field::new(test_rules(), 1);
    let mut events = Vec::new();
    spawn(&mut field, road(0.0, 0.0, 1.0), &mut events);
    spawn(&mut field, road(1.0, 0.0, 0.0), &mut events);
    let target = spawn(
        &mut field,
        SpawnRequest::Target {
            x: 1.0,
            y: 0.0,
            health: 50,
        },
        &mut events,
    );
    let enemy = spawn(&mut field, enemy(0.0, 0.0), &mut events);
    let before = query::credit(&field);
    events.clear();

    apply(&mut field, Command::Tick, &mut events);

    assert!(events.contains(&Event::Detonated {
        source: enemy,
        target,
    }));
    let health = query::entity(&field, target)
        .and_then(|entity| entity.as_living())
        .map(|living| living.health());
    assert_eq!(health, Some(40));
    assert!(query::entity(&field, enemy).is_none());
    assert_eq!(query::credit(&field), before + 5);
    assert!(!query::is_defeated(&field));
}

#[test]
fn repeated_detonations_destroy_the_target() {
    let mut field = Field::new(test_rules(), 1);
    let mut events = Vec::new();
    spawn(&mut field, road(0.0, 0.0, 1.0), &mut events);
    spawn(&mut field, road(1.0, 0.0, 0.0), &mut events);
    spawn(
        &mut field,
        SpawnRequest::Target {
            x: 1.0,
            y: 0.0,
            health: 15,
        },
        &mut events,
    );
    spawn(&mut field, enemy(0.0, 0.0), &mut events);
    spawn(&mut field, enemy(0.0, 0.0), &mut events);
    events.clear();

    apply(&mut field, Command::Tick, &mut events);

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::EntityDestroyed { kind: EntityKind::Target, .. })));
    assert!(query::is_defeated(&field));
}

#[test]
fn enemies_never_overlap_mountains() {
    let rules = RuleBook::default();
    let mut field = Field::new(rules, 42);
    let mut events = Vec::new();
    for column in 0..8 {
        let x = f64::from(column);
        spawn(&mut field, road(x, 0.0, 7.0 - x), &mut events);
        spawn(&mut field, SpawnRequest::Mountain { x, y: -1.0 }, &mut events);
        spawn(&mut field, SpawnRequest::Mountain { x, y: 1.0 }, &mut events);
    }
    spawn(&mut field, SpawnRequest::Mountain { x: 8.0, y: 0.0 }, &mut events);
    let walkers: Vec<EntityId> = EnemyKind::ALL
        .into_iter()
        .map(|kind| {
            spawn(
                &mut field,
                SpawnRequest::Enemy {
                    kind,
                    x: 0.04,
                    y: 0.01,
                },
                &mut events,
            )
        })
        .collect();

    for _ in 0..400 {
        apply(&mut field, Command::Tick, &mut events);
        let mountains: Vec<Rect> = query::entities(&field)
            .filter(|(_, entity)| entity.kind() == EntityKind::Mountain)
            .map(|(_, entity)| entity.base().bounds())
            .collect();
        for walker in &walkers {
            let bounds = bounds_of(&field, *walker);
            assert!(
                mountains.iter().all(|mountain| !mountain.intersects(&bounds)),
                "enemy {walker:?} entered a mountain at {bounds:?}"
            );
        }
    }

    for walker in &walkers {
        assert!(bounds_of(&field, *walker).x() > 1.0);
    }
}

#[test]
fn identical_seeds_replay_identically() {
    let first = run_scenario(2024);
    let second = run_scenario(2024);

    assert_eq!(first, second);
    assert!(first
        .iter()
        .any(|event| matches!(event, Event::EntityDestroyed { .. })));
}

#[test]
fn timer_tower_slows_and_decays_passing_enemy() {
    let mut field = Field::new(test_rules(), 9);
    let mut events = Vec::new();
    spawn(&mut field, road(0.0, 0.0, 0.0), &mut events);
    spawn(
        &mut field,
        SpawnRequest::Tower {
            kind: TowerKind::Timer,
            x: 0.0,
            y: 2.0,
        },
        &mut events,
    );
    let enemy = spawn(
        &mut field,
        SpawnRequest::Enemy {
            kind: EnemyKind::Tanker,
            x: 0.0,
            y: 0.0,
        },
        &mut events,
    );

    for _ in 0..30 {
        apply(&mut field, Command::Tick, &mut events);
    }

    let tanker = query::entity(&field, enemy)
        .and_then(|entity| entity.as_enemy())
        .expect("tanker survives");
    assert!(tanker.has_bad_effect());
    assert!(tanker.speed() < 0.04, "speed {}", tanker.speed());
    assert!(tanker.speed() >= 0.02);
    assert_eq!(tanker.health(), 540);
}

fn run_scenario(seed: u64) -> Vec<Event> {
    let mut field = Field::new(RuleBook::default(), seed);
    let mut events = Vec::new();
    for column in 0..10 {
        let x = f64::from(column);
        for row in 0..3 {
            let y = f64::from(row);
            spawn(&mut field, road(x, y, 10.0 - x), &mut events);
        }
    }
    spawn(
        &mut field,
        SpawnRequest::Target {
            x: 10.0,
            y: 1.0,
            health: 1_000,
        },
        &mut events,
    );
    spawn(
        &mut field,
        SpawnRequest::Tower {
            kind: TowerKind::MachineGun,
            x: 5.0,
            y: 3.0,
        },
        &mut events,
    );
    spawn(
        &mut field,
        SpawnRequest::Spawner {
            x: 0.0,
            y: 1.0,
            plan: SpawnPlan {
                enemy: EnemyKind::Smaller,
                initial_delay: 0,
                interval: 20,
                count: 6,
            },
        },
        &mut events,
    );
    for _ in 0..400 {
        apply(&mut field, Command::Tick, &mut events);
    }
    events
}

fn test_rules() -> RuleBook {
    let mut rules = RuleBook::default();
    for stats in &mut rules.enemies {
        if stats.kind == EnemyKind::Normal {
            *stats = EnemyStats {
                kind: EnemyKind::Normal,
                size: 1.0,
                health: 10,
                armor: 0,
                speed: 2.0,
                reward: 5,
                slow_floor: 0.5,
            };
        }
    }
    rules
}

fn spawn(field: &mut Field, request: SpawnRequest, events: &mut Vec<Event>) -> EntityId {
    let mut spawned = Vec::new();
    apply(field, Command::Spawn { request }, &mut spawned);
    let id = spawned
        .iter()
        .find_map(|event| match event {
            Event::EntitySpawned { id, .. } => Some(*id),
            _ => None,
        })
        .expect("spawn accepted");
    events.append(&mut spawned);
    id
}

fn road(x: f64, y: f64, distance: f64) -> SpawnRequest {
    SpawnRequest::Road { x, y, distance }
}

fn enemy(x: f64, y: f64) -> SpawnRequest {
    SpawnRequest::Enemy {
        kind: EnemyKind::Normal,
        x,
        y,
    }
}

fn bounds_of(field: &Field, id: EntityId) -> Rect {
    query::entity(field, id)
        .map(|entity| entity.base().bounds())
        .expect("entity present")
}
