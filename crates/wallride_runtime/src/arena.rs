//! Test arena: a floor, a long wall to ride and a target to shoot

use glam::Vec3;
use wallride_controller::SpawnPoint;
use wallride_physics::{
    ColliderDesc, ColliderShape, CollisionGroups, CollisionLayer, ObjectId, PhysicsWorld,
    RigidBodyDesc,
};

pub const FLOOR: ObjectId = ObjectId(100);
pub const WALL: ObjectId = ObjectId(101);
pub const TARGET: ObjectId = ObjectId(102);

/// X coordinate of the wall face the player rides along
pub const WALL_FACE_X: f32 = 3.0;

fn solid(world: &mut PhysicsWorld, object: ObjectId, center: Vec3, half_extents: Vec3) {
    let body = world.create_rigid_body(RigidBodyDesc::fixed().with_position(center.x, center.y, center.z));
    world.create_collider(
        ColliderDesc::new(ColliderShape::cuboid(half_extents.x, half_extents.y, half_extents.z))
            .with_collision_groups(CollisionGroups::from_layer(
                CollisionLayer::GROUND,
                &[CollisionLayer::PLAYER],
            ))
            .with_object(object),
        Some(body),
    );
}

/// Build the arena and return where the player may start
pub fn build(world: &mut PhysicsWorld) -> Vec<SpawnPoint> {
    solid(world, FLOOR, Vec3::new(0.0, -0.5, 0.0), Vec3::new(40.0, 0.5, 40.0));
    solid(
        world,
        WALL,
        Vec3::new(WALL_FACE_X + 0.5, 5.0, 0.0),
        Vec3::new(0.5, 5.0, 30.0),
    );
    solid(world, TARGET, Vec3::new(0.0, 5.0, -40.5), Vec3::new(20.0, 5.0, 0.5));
    world.sync_query_pipeline();

    log::info!(
        "Arena built: {} bodies, {} colliders",
        world.body_count(),
        world.collider_count()
    );

    vec![
        SpawnPoint::new(Vec3::new(0.0, 1.5, 20.0), 0.0),
        SpawnPoint::new(Vec3::new(-1.0, 1.5, 20.0), 0.0),
    ]
}
