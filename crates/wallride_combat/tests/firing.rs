//! Firing against a real Rapier world

use approx::assert_relative_eq;
use glam::Vec3;
use wallride_combat::prelude::*;
use wallride_physics::prelude::*;

const WALL: ObjectId = ObjectId(10);
const SHOOTER: ObjectId = ObjectId(1);

fn arena() -> PhysicsWorld {
    let mut world = PhysicsWorld::new(PhysicsConfig::default());
    let wall = world.create_rigid_body(RigidBodyDesc::fixed().with_position(0.0, 0.0, -30.5));
    world.create_collider(
        ColliderDesc::new(ColliderShape::cuboid(20.0, 20.0, 0.5))
            .with_collision_groups(CollisionGroups::from_layer(
                CollisionLayer::GROUND,
                &[CollisionLayer::PLAYER],
            ))
            .with_object(WALL),
        Some(wall),
    );

    // The shooter's own capsule sits right on the aim ray
    let player = world.create_rigid_body(RigidBodyDesc::fixed());
    world.create_collider(
        ColliderDesc::new(ColliderShape::capsule(0.5, 0.5))
            .with_collision_groups(CollisionGroups::from_layer(
                CollisionLayer::PLAYER,
                &[CollisionLayer::GROUND],
            ))
            .with_object(SHOOTER),
        Some(player),
    );

    world.sync_query_pipeline();
    world
}

#[test]
fn test_shot_resolves_on_wall() {
    let world = arena();
    let mut weapon = Weapon::new("Rifle").with_bullet_speed(100.0);
    let mut projectiles = ProjectileSet::new();
    let pose = AimPose::new(Vec3::ZERO, Vec3::new(0.3, -0.2, 1.0), Vec3::NEG_Z);

    let report = weapon.fire(&pose, SHOOTER, &world, &mut projectiles);
    assert_relative_eq!(report.hit_distance.unwrap(), 30.0, epsilon = 1e-3);
    let look_point = report.look_point.unwrap();
    assert_relative_eq!(look_point.z, -30.0, epsilon = 1e-3);
    assert!(report.display_speed_scale.unwrap() > 1.0);

    let mut impacts = Vec::new();
    for _ in 0..50 {
        impacts.extend(projectiles.step(world.timestep(), &world));
        if !impacts.is_empty() {
            break;
        }
    }

    assert_eq!(impacts.len(), 1);
    assert_eq!(impacts[0].object, WALL);
    assert_eq!(impacts[0].projectile, report.resolving);
    assert_relative_eq!(impacts[0].point.z, -30.0, epsilon = 1e-3);
    assert!(projectiles.is_empty(), "display projectile goes with its resolving one");
}

#[test]
fn test_shot_into_open_space() {
    let world = arena();
    let mut weapon = Weapon::new("Rifle").with_bullet_speed(100.0);
    let mut projectiles = ProjectileSet::new();
    let pose = AimPose::new(Vec3::ZERO, Vec3::new(0.3, -0.2, 1.0), Vec3::Z);

    let report = weapon.fire(&pose, SHOOTER, &world, &mut projectiles);
    assert_eq!(report.look_point, None);
    let display = projectiles.display(report.display.unwrap()).unwrap();
    assert_eq!(display.velocity, Vec3::new(0.0, 0.0, 100.0));
}
