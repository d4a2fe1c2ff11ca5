//! Physics queries (raycasting)

use crate::events::ObjectId;
use crate::layers::CollisionGroups;
use glam::Vec3;
use rapier3d::prelude as rapier;

/// Result of a raycast query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// The object that was hit
    pub object: ObjectId,
    /// Hit point in world space
    pub point: Vec3,
    /// Surface normal at hit point
    pub normal: Vec3,
    /// Distance from ray origin
    pub distance: f32,
}

/// Options for raycast queries
#[derive(Debug, Clone)]
pub struct RaycastOptions {
    /// Maximum distance for the ray
    pub max_distance: f32,
    /// Collision groups filter
    pub filter: CollisionGroups,
    /// Objects to ignore (usually the caster itself)
    pub exclude: Vec<ObjectId>,
}

impl Default for RaycastOptions {
    fn default() -> Self {
        Self {
            max_distance: f32::MAX,
            filter: CollisionGroups::ALL,
            exclude: Vec::new(),
        }
    }
}

impl RaycastOptions {
    /// Unbounded ray against every collider on the layers in `mask`
    pub fn against(mask: u32) -> Self {
        Self {
            filter: CollisionGroups::query_mask(mask),
            ..Default::default()
        }
    }

    /// Set maximum distance
    pub fn with_max_distance(mut self, distance: f32) -> Self {
        self.max_distance = distance;
        self
    }

    /// Add an object to exclude
    pub fn exclude(mut self, object: ObjectId) -> Self {
        self.exclude.push(object);
        self
    }
}

/// Anything that can answer "what does this ray pass through".
///
/// Implementations may return hits in any order; use [`sort_by_distance`]
/// or [`nearest`] on the result.
pub trait RayCaster {
    /// Every hit along the ray, up to `options.max_distance`
    fn raycast_all(&self, origin: Vec3, direction: Vec3, options: &RaycastOptions) -> Vec<RaycastHit>;
}

/// Sort hits by ascending distance
pub fn sort_by_distance(hits: &mut [RaycastHit]) {
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}

/// The closest hit, if any
pub fn nearest(hits: &[RaycastHit]) -> Option<RaycastHit> {
    hits.iter()
        .copied()
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Query interface for physics world
pub struct PhysicsQuery<'a> {
    pub(crate) query_pipeline: &'a rapier::QueryPipeline,
    pub(crate) colliders: &'a rapier::ColliderSet,
    pub(crate) bodies: &'a rapier::RigidBodySet,
}

impl<'a> RayCaster for PhysicsQuery<'a> {
    fn raycast_all(&self, origin: Vec3, direction: Vec3, options: &RaycastOptions) -> Vec<RaycastHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return Vec::new();
        }

        let ray = rapier::Ray::new(
            rapier::Point::new(origin.x, origin.y, origin.z),
            rapier::Vector::new(direction.x, direction.y, direction.z),
        );

        // Sensors never stop a shot
        let not_excluded = |_: rapier::ColliderHandle, collider: &rapier::Collider| {
            !options.exclude.contains(&ObjectId(collider.user_data as u64))
        };
        let groups = rapier::InteractionGroups::new(
            rapier::Group::from_bits_truncate(options.filter.memberships),
            rapier::Group::from_bits_truncate(options.filter.filter),
        );
        let filter = rapier::QueryFilter::new()
            .groups(groups)
            .exclude_sensors()
            .predicate(&not_excluded);

        let mut hits = Vec::new();
        self.query_pipeline.intersections_with_ray(
            self.bodies,
            self.colliders,
            &ray,
            options.max_distance,
            true,
            filter,
            |handle, intersection| {
                let object = match self.colliders.get(handle) {
                    Some(collider) => ObjectId(collider.user_data as u64),
                    None => return true,
                };
                let point = ray.point_at(intersection.time_of_impact);
                let n = intersection.normal;
                hits.push(RaycastHit {
                    object,
                    point: Vec3::new(point.x, point.y, point.z),
                    normal: Vec3::new(n.x, n.y, n.z),
                    distance: intersection.time_of_impact,
                });
                true
            },
        );

        sort_by_distance(&mut hits);
        hits
    }
}
