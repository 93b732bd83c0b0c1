//! Sample scene for demonstration purposes.

use refgraph_core::{NodeId, ObjectHandle, Record, Scene, SceneBuilder, SceneResult};

/// Number of enemies in the sample level. Enough rows to scroll.
pub const SAMPLE_ENEMIES: usize = 24;

const SPAWN_POINTS: usize = 4;

fn handle(node: NodeId) -> Option<ObjectHandle> {
    Some(ObjectHandle::Node(node))
}

/// Create a small game level whose behaviors reference each other.
///
/// "Player" is the busiest node: it references "Main Camera", its weapons and
/// "HealthBar", and is referenced by "Main Camera", every enemy and "HealthBar".
pub fn sample_scene() -> SceneResult<Scene> {
    let mut b = SceneBuilder::new();
    let level = b.add_root("Level");

    let camera = b.add_child(level, "Main Camera")?;
    let player = b.add_child(level, "Player")?;
    let sword = b.add_child(player, "Sword")?;
    let bow = b.add_child(player, "Bow")?;

    let spawner = b.add_child(level, "Spawner")?;
    let spawn_points = (0..SPAWN_POINTS)
        .map(|i| b.add_child(spawner, format!("SpawnPoint_{i}")))
        .collect::<SceneResult<Vec<_>>>()?;

    let enemies = b.add_child(level, "Enemies")?;
    let enemy_ids = (0..SAMPLE_ENEMIES)
        .map(|i| b.add_child(enemies, format!("Enemy_{i:02}")))
        .collect::<SceneResult<Vec<_>>>()?;

    let ui = b.add_child(level, "UI")?;
    let health_bar = b.add_child(ui, "HealthBar")?;
    let lighting = b.add_child(level, "Lighting")?;
    b.add_child(lighting, "Sun")?;

    b.attach(camera, Record::new("FollowCamera").with_single("follow", handle(player)))?;
    b.attach(
        player,
        Record::new("PlayerController")
            .with_single("camera", handle(camera))
            .with_sequence("weapons", vec![handle(sword), handle(bow)])
            .with_computed("health_bar", handle(health_bar)),
    )?;
    b.attach(sword, Record::new("Weapon").with_single("wielder", None))?;
    b.attach(
        spawner,
        Record::new("EnemySpawner")
            .with_sequence("spawn_points", spawn_points.iter().copied().map(handle).collect())
            .with_single("container", handle(enemies)),
    )?;
    for (i, enemy) in enemy_ids.iter().enumerate() {
        b.attach(
            *enemy,
            Record::new("EnemyAI")
                .with_single("target", handle(player))
                .with_array(
                    "patrol",
                    [
                        handle(spawn_points[i % SPAWN_POINTS]),
                        handle(spawn_points[(i + 1) % SPAWN_POINTS]),
                    ],
                ),
        )?;
    }
    b.attach(
        health_bar,
        Record::new("HealthBar")
            .with_computed("bound_to", handle(player))
            .with_unsafe_computed("shared_material", handle(level)),
    )?;

    Ok(b.build())
}
