//! Per-frame animation driver
//!
//! Owns the rotation-update rule and decouples it from the paint-loop
//! scheduling: the app calls [`AnimationDriver::tick`] once per paint cycle
//! with the elapsed time since the first tick, and every registered object
//! gets its rotation re-derived from that absolute time. Because rotation is
//! assigned rather than accumulated, the update is idempotent and immune to
//! frame-time drift.

use cgmath::Rad;

use crate::gfx::scene::{ObjectId, Scene};

/// Speed multiplier of the first registered entry
const BASE_SPEED: f32 = 1.0;
/// Speed multiplier increase per registration
const SPEED_STEP: f32 = 0.1;

/// One animated object and its speed multiplier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationEntry {
    pub object: ObjectId,
    pub speed: f32,
}

/// Registry of animated objects
///
/// Registration order is an observable contract: the k-th registered entry
/// (0-indexed) always receives speed `1.0 + 0.1 * k`.
#[derive(Default)]
pub struct AnimationDriver {
    entries: Vec<AnimationEntry>,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an object for rotation and returns its speed multiplier
    pub fn register(&mut self, object: ObjectId) -> f32 {
        let speed = BASE_SPEED + self.entries.len() as f32 * SPEED_STEP;
        self.entries.push(AnimationEntry { object, speed });
        speed
    }

    /// Registered entries, in registration order
    pub fn entries(&self) -> &[AnimationEntry] {
        &self.entries
    }

    /// Advances every entry to the rotation implied by `elapsed_seconds`
    ///
    /// Sets each object's rotation about the x and y axes to
    /// `elapsed_seconds * speed`. Entries whose object no longer resolves
    /// are skipped; nothing else in the scene is touched.
    pub fn tick(&self, scene: &mut Scene, elapsed_seconds: f32) {
        for entry in &self.entries {
            if let Some(object) = scene.get_object_mut(entry.object) {
                let angle = Rad(elapsed_seconds * entry.speed);
                object.rotation[0] = angle;
                object.rotation[1] = angle;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::PrimitiveShape;
    use cgmath::Vector3;

    fn demo_scene() -> (Scene, ObjectId, ObjectId) {
        let mut scene = Scene::new();
        let cone = scene.add_primitive(
            PrimitiveShape::Cone {
                radius: 1.0,
                height: 1.0,
            },
            [0.53, 0.27, 0.67],
            Vector3::new(-2.0, 0.0, 0.0),
        );
        let torus = scene.add_primitive(
            PrimitiveShape::Torus {
                radius: 0.5,
                tube_radius: 0.25,
            },
            [0.67, 0.53, 0.27],
            Vector3::new(2.0, 0.0, 0.0),
        );
        (scene, cone, torus)
    }

    #[test]
    fn test_registration_order_determines_speed() {
        let (_, cone, torus) = demo_scene();
        let mut driver = AnimationDriver::new();
        for (k, id) in [cone, torus, cone, torus, cone].into_iter().enumerate() {
            let speed = driver.register(id);
            assert!((speed - (1.0 + 0.1 * k as f32)).abs() < 1e-6);
        }
        assert_eq!(driver.entries().len(), 5);
    }

    #[test]
    fn test_tick_assigns_absolute_rotation() {
        let (mut scene, cone, _) = demo_scene();
        let mut driver = AnimationDriver::new();
        driver.register(cone);

        driver.tick(&mut scene, 3.0);
        driver.tick(&mut scene, 5.0);

        let obj = scene.get_object(cone).unwrap();
        assert_eq!(obj.rotation[0], Rad(5.0));
        assert_eq!(obj.rotation[1], Rad(5.0));
        assert_eq!(obj.rotation[2], Rad(0.0));
    }

    #[test]
    fn test_tick_is_idempotent_and_drift_free() {
        let (mut scene, cone, torus) = demo_scene();
        let mut driver = AnimationDriver::new();
        driver.register(cone);
        driver.register(torus);

        // Many calls at the same time stamp must not accumulate
        for _ in 0..100 {
            driver.tick(&mut scene, 2.0);
        }
        assert_eq!(scene.get_object(cone).unwrap().rotation[0], Rad(2.0));
        assert_eq!(scene.get_object(torus).unwrap().rotation[0], Rad(2.2));

        // Rotation depends only on the latest elapsed time, not call count
        let mut reference = Scene::new();
        let r_cone = reference.add_primitive(
            PrimitiveShape::Cone {
                radius: 1.0,
                height: 1.0,
            },
            [0.5, 0.5, 0.5],
            Vector3::new(-2.0, 0.0, 0.0),
        );
        let mut reference_driver = AnimationDriver::new();
        reference_driver.register(r_cone);
        reference_driver.tick(&mut reference, 2.0);
        assert_eq!(
            reference.get_object(r_cone).unwrap().rotation[0],
            scene.get_object(cone).unwrap().rotation[0]
        );
    }

    #[test]
    fn test_demo_scenario_cone_and_torus() {
        // Cone at x=-2 and torus at x=2 registered in order; after
        // tick(1.0) the cone shows 1.0 rad and the torus 1.1 rad on both
        // animated axes.
        let (mut scene, cone, torus) = demo_scene();
        let mut driver = AnimationDriver::new();
        driver.register(cone);
        driver.register(torus);

        driver.tick(&mut scene, 1.0);

        let cone_obj = scene.get_object(cone).unwrap();
        let torus_obj = scene.get_object(torus).unwrap();
        assert_eq!(cone_obj.rotation[0], Rad(1.0));
        assert_eq!(cone_obj.rotation[1], Rad(1.0));
        assert!((torus_obj.rotation[0].0 - 1.1).abs() < 1e-6);
        assert!((torus_obj.rotation[1].0 - 1.1).abs() < 1e-6);
    }
}
