use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tile_defence_core::{CollisionTable, EntityId, EntityKind, EntityView, Rect};
use tile_defence_system_movement::Movement;

#[test]
fn seeded_tie_breaks_replay_identically() {
    let (mover, views) = fork_in_the_road();
    let movement = Movement::default();
    let table = CollisionTable::standard();

    for seed in 0..32 {
        let mut first = ChaCha8Rng::seed_from_u64(seed);
        let mut second = ChaCha8Rng::seed_from_u64(seed);
        let a = movement.plan_step(&mover, 1.0, &views, &table, &mut first);
        let b = movement.plan_step(&mover, 1.0, &views, &table, &mut second);
        assert_eq!(a, b, "seed {seed}");
    }
}

#[test]
fn equally_good_branches_are_both_taken_across_seeds() {
    let (mover, views) = fork_in_the_road();
    let movement = Movement::default();
    let table = CollisionTable::standard();
    let mut left = 0;
    let mut right = 0;

    for seed in 0..128 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (x, y) = movement
            .plan_step(&mover, 1.0, &views, &table, &mut rng)
            .expect("both branches are reachable");
        assert!(y.abs() < 1e-12);
        if x < 0.0 {
            left += 1;
        } else {
            right += 1;
        }
    }

    assert!(left > 0 && right > 0, "left {left}, right {right}");
    assert!(left > right, "left {left}, right {right}");
}

#[test]
fn mountains_are_never_entered() {
    let mover = view(1, EntityKind::NormalEnemy, Rect::new(0.0, 0.0, 1.0, 1.0), None);
    let views = [
        mover,
        view(2, EntityKind::Road, Rect::new(0.0, 0.0, 1.0, 1.0), Some(3.0)),
        view(3, EntityKind::Road, Rect::new(1.0, 0.0, 1.0, 1.0), Some(1.0)),
        view(4, EntityKind::Mountain, Rect::new(1.5, 0.0, 1.0, 1.0), None),
    ];
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let (x, y) = Movement::default()
        .plan_step(&mover, 1.0, &views, &CollisionTable::standard(), &mut rng)
        .expect("short steps stay clear of the mountain");

    assert!(!Rect::new(x, y, 1.0, 1.0).intersects(&views[3].bounds));
    assert!(x > 0.0);
}

fn fork_in_the_road() -> (EntityView, Vec<EntityView>) {
    let mover = view(1, EntityKind::NormalEnemy, Rect::new(0.0, 0.0, 1.0, 1.0), None);
    let views = vec![
        mover,
        view(2, EntityKind::Road, Rect::new(-1.0, 0.0, 1.0, 1.0), Some(1.0)),
        view(3, EntityKind::Road, Rect::new(0.0, 0.0, 1.0, 1.0), Some(5.0)),
        view(4, EntityKind::Road, Rect::new(1.0, 0.0, 1.0, 1.0), Some(1.0)),
    ];
    (mover, views)
}

fn view(id: u32, kind: EntityKind, bounds: Rect, road_distance: Option<f64>) -> EntityView {
    EntityView {
        id: EntityId::new(id),
        kind,
        bounds,
        road_distance,
    }
}
