//! Contact normal registry
//!
//! Tracks which surfaces the body is touching and splits the contact points
//! into ground and wall by the angle between their normal and world up. The
//! first entry of each list is the reference normal used for movement.

use glam::Vec3;
use wallride_physics::{ContactPoint, ObjectId};

/// World up
pub const UP: Vec3 = Vec3::Y;

/// How a contact point was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Ground,
    Wall,
}

/// One classified contact point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub object: ObjectId,
    pub normal: Vec3,
    pub point: Vec3,
}

/// List sizes before and after a registry mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryDelta {
    pub prev_ground: usize,
    pub prev_wall: usize,
    pub cur_ground: usize,
    pub cur_wall: usize,
}

impl RegistryDelta {
    /// Went from no ground contact to some
    pub fn ground_gained(&self) -> bool {
        self.prev_ground == 0 && self.cur_ground > 0
    }

    /// Went from some ground contact to none
    pub fn ground_lost(&self) -> bool {
        self.prev_ground > 0 && self.cur_ground == 0
    }

    /// Went from no wall contact to some
    pub fn wall_gained(&self) -> bool {
        self.prev_wall == 0 && self.cur_wall > 0
    }

    /// Went from some wall contact to none
    pub fn wall_lost(&self) -> bool {
        self.prev_wall > 0 && self.cur_wall == 0
    }
}

/// Ground and wall contact lists.
///
/// Mutated only from contact callbacks on the fixed-step thread.
#[derive(Debug, Clone)]
pub struct ContactRegistry {
    ground: Vec<Contact>,
    wall: Vec<Contact>,
    slope_limit: f32,
    wall_dot_limit: f32,
}

impl ContactRegistry {
    /// Create an empty registry.
    ///
    /// `slope_limit` is the steepest ground angle in degrees;
    /// `wall_angle_tolerance` is how far from vertical a wall may lean, zero
    /// meaning exactly vertical.
    pub fn new(slope_limit: f32, wall_angle_tolerance: f32) -> Self {
        Self {
            ground: Vec::new(),
            wall: Vec::new(),
            slope_limit,
            wall_dot_limit: wall_angle_tolerance.to_radians().sin().max(0.0),
        }
    }

    /// Classify a surface normal, `None` if it is neither ground nor wall
    pub fn classify(&self, normal: Vec3) -> Option<SurfaceKind> {
        let n = normal.normalize_or_zero();
        if n == Vec3::ZERO {
            return None;
        }
        let cos = n.dot(UP);
        let angle = cos.clamp(-1.0, 1.0).acos().to_degrees();
        if angle <= self.slope_limit {
            Some(SurfaceKind::Ground)
        } else if cos.abs() <= self.wall_dot_limit {
            Some(SurfaceKind::Wall)
        } else {
            None
        }
    }

    /// Started touching `object`
    pub fn on_contact_begin(&mut self, object: ObjectId, contacts: &[ContactPoint]) -> RegistryDelta {
        let (prev_ground, prev_wall) = self.counts();
        self.insert_all(object, contacts);
        self.delta(prev_ground, prev_wall)
    }

    /// Still touching `object`; replaces everything known about it
    pub fn on_contact_persist(&mut self, object: ObjectId, contacts: &[ContactPoint]) -> RegistryDelta {
        let (prev_ground, prev_wall) = self.counts();
        self.purge(object);
        self.insert_all(object, contacts);
        self.delta(prev_ground, prev_wall)
    }

    /// Stopped touching `object`
    pub fn on_contact_end(&mut self, object: ObjectId) -> RegistryDelta {
        let (prev_ground, prev_wall) = self.counts();
        self.purge(object);
        self.delta(prev_ground, prev_wall)
    }

    /// Normal of the first ground contact, world up when there is none
    pub fn ground_normal(&self) -> Vec3 {
        self.ground.first().map(|c| c.normal).unwrap_or(UP)
    }

    /// Normal of the first wall contact, zero when there is none
    pub fn wall_normal(&self) -> Vec3 {
        self.wall.first().map(|c| c.normal).unwrap_or(Vec3::ZERO)
    }

    /// Ground contacts in insertion order
    pub fn ground(&self) -> &[Contact] {
        &self.ground
    }

    /// Wall contacts in insertion order
    pub fn wall(&self) -> &[Contact] {
        &self.wall
    }

    pub fn ground_count(&self) -> usize {
        self.ground.len()
    }

    pub fn wall_count(&self) -> usize {
        self.wall.len()
    }

    /// Check if any entry refers to `object`
    pub fn contains(&self, object: ObjectId) -> bool {
        self.ground.iter().chain(self.wall.iter()).any(|c| c.object == object)
    }

    fn counts(&self) -> (usize, usize) {
        (self.ground.len(), self.wall.len())
    }

    fn delta(&self, prev_ground: usize, prev_wall: usize) -> RegistryDelta {
        debug_assert!(
            !self.ground.iter().any(|g| self
                .wall
                .iter()
                .any(|w| w.object == g.object && w.point == g.point)),
            "contact point classified as both ground and wall"
        );
        RegistryDelta {
            prev_ground,
            prev_wall,
            cur_ground: self.ground.len(),
            cur_wall: self.wall.len(),
        }
    }

    fn insert_all(&mut self, object: ObjectId, contacts: &[ContactPoint]) {
        for contact in contacts {
            let entry = Contact {
                object,
                normal: contact.normal,
                point: contact.point,
            };
            match self.classify(contact.normal) {
                Some(SurfaceKind::Ground) => self.ground.push(entry),
                Some(SurfaceKind::Wall) => self.wall.push(entry),
                None => {}
            }
        }
    }

    fn purge(&mut self, object: ObjectId) {
        self.ground.retain(|c| c.object != object);
        self.wall.retain(|c| c.object != object);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Contact on a unit body, located opposite its normal
    fn point(normal: Vec3) -> ContactPoint {
        ContactPoint::new(-normal.normalize(), normal)
    }

    fn registry() -> ContactRegistry {
        ContactRegistry::new(45.0, 0.0)
    }

    #[test]
    fn test_classification() {
        let r = registry();
        assert_eq!(r.classify(Vec3::Y), Some(SurfaceKind::Ground));
        assert_eq!(r.classify(Vec3::new(0.0, 1.0, 0.5)), Some(SurfaceKind::Ground));
        assert_eq!(r.classify(Vec3::X), Some(SurfaceKind::Wall));
        assert_eq!(r.classify(Vec3::NEG_Z), Some(SurfaceKind::Wall));
        // Steeper than the slope limit but not vertical
        assert_eq!(r.classify(Vec3::new(0.0, 0.5, 1.0)), None);
        // Overhang
        assert_eq!(r.classify(Vec3::new(0.0, -0.1, 1.0)), None);
        assert_eq!(r.classify(Vec3::NEG_Y), None);
        assert_eq!(r.classify(Vec3::ZERO), None);
    }

    #[test]
    fn test_tolerance_widens_wall_band() {
        let r = ContactRegistry::new(45.0, 2.0);
        let leaning = Vec3::new(1.0, 0.01, 0.0);
        assert_eq!(r.classify(leaning), Some(SurfaceKind::Wall));
        assert_eq!(registry().classify(leaning), None);
    }

    #[test]
    fn test_begin_and_end() {
        let mut r = registry();
        let floor = ObjectId(1);

        let delta = r.on_contact_begin(floor, &[point(Vec3::Y), point(Vec3::Y)]);
        assert_eq!(
            delta,
            RegistryDelta {
                prev_ground: 0,
                prev_wall: 0,
                cur_ground: 2,
                cur_wall: 0
            }
        );
        assert!(delta.ground_gained());

        let delta = r.on_contact_end(floor);
        assert!(delta.ground_lost());
        assert!(!r.contains(floor));
        assert_eq!(r.ground_normal(), UP);
    }

    #[test]
    fn test_persist_reclassifies() {
        let mut r = registry();
        let block = ObjectId(3);
        r.on_contact_begin(block, &[point(Vec3::Y)]);

        // Rolled over the edge onto the block's side
        let delta = r.on_contact_persist(block, &[point(Vec3::X)]);
        assert!(delta.ground_lost());
        assert!(delta.wall_gained());
        assert_eq!(r.wall_normal(), Vec3::X);
    }

    #[test]
    fn test_reference_normal_is_first_added() {
        let mut r = registry();
        let slope = Vec3::new(0.0, 1.0, 0.5).normalize();
        r.on_contact_begin(ObjectId(1), &[point(slope)]);
        r.on_contact_begin(ObjectId(2), &[point(Vec3::Y)]);
        assert_eq!(r.ground_normal(), slope);

        r.on_contact_end(ObjectId(1));
        assert_eq!(r.ground_normal(), Vec3::Y);
    }

    #[test]
    fn test_no_wall_is_zero() {
        let r = registry();
        assert_eq!(r.wall_normal(), Vec3::ZERO);
        assert_eq!(r.ground_normal(), Vec3::Y);
    }

    #[test]
    fn test_end_purges_from_both_lists() {
        let mut r = registry();
        let corner = ObjectId(4);
        r.on_contact_begin(
            corner,
            &[
                ContactPoint::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y),
                ContactPoint::new(Vec3::new(1.0, 0.0, 0.0), Vec3::NEG_X),
            ],
        );
        r.on_contact_begin(ObjectId(5), &[point(Vec3::Y)]);
        assert_eq!((r.ground_count(), r.wall_count()), (2, 1));

        let delta = r.on_contact_end(corner);
        assert!(delta.wall_lost());
        assert!(!delta.ground_lost());
        assert!(!r.contains(corner));
        assert_eq!((r.ground_count(), r.wall_count()), (1, 0));
    }

    #[test]
    fn test_end_for_unknown_object_is_noop() {
        let mut r = registry();
        r.on_contact_begin(ObjectId(1), &[point(Vec3::Y)]);
        let delta = r.on_contact_end(ObjectId(2));
        assert_eq!(delta.prev_ground, delta.cur_ground);
        assert!(!delta.ground_lost());
    }

    #[test]
    fn test_random_sequences_never_keep_ended_objects() {
        // Small deterministic LCG so the sequence is reproducible
        let mut seed: u32 = 12345;
        let mut next = move || {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12345);
            (seed >> 16) as usize
        };
        let normals = [Vec3::Y, Vec3::X, Vec3::NEG_Z, Vec3::new(0.0, 0.2, 1.0)];

        let mut r = registry();
        for _ in 0..500 {
            let object = ObjectId((next() % 4) as u64 + 1);
            match next() % 3 {
                0 => {
                    r.on_contact_begin(object, &[point(normals[next() % normals.len()])]);
                }
                1 => {
                    r.on_contact_persist(object, &[point(normals[next() % normals.len()])]);
                }
                _ => {
                    r.on_contact_end(object);
                    assert!(!r.contains(object));
                }
            }
        }
    }
}
