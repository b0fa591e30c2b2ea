//! Scene builders shared by the benchmarks.

use glam::{Quat, Vec3};
use rein_physics::physics::{
    Collider, ColliderShape, CollisionConstraint, Contact, ContactResolver, PhysicsConfig,
    PhysicsWorld, RigidBody, TetherConstraint,
};
use rein_physics::{ConvexHull, MeshBuffers, Plane};

/// Resolver that drops every contact. Benchmarks measure generation only.
#[derive(Debug, Default)]
pub struct DiscardResolver {
    pub contacts_seen: usize,
}

impl ContactResolver for DiscardResolver {
    fn resolve(&mut self, _world: &mut hecs::World, contacts: &[Contact], _dt: f32) {
        self.contacts_seen += contacts.len();
    }
}

/// Deterministic pseudo-random point cloud inside a unit cube.
pub fn point_cloud(n: usize) -> Vec<Vec3> {
    let mut state = 0x2545_f491_u32;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state as f32 / u32::MAX as f32) * 2.0 - 1.0
    };
    (0..n).map(|_| Vec3::new(next(), next() * 0.5, next() * 0.25)).collect()
}

pub fn cube_hull() -> ConvexHull {
    match MeshBuffers::cube(1.0).convex_hull() {
        Ok(hull) => hull,
        Err(e) => panic!("cube hull is closed: {e}"),
    }
}

/// `n` bodies in a row just above the ground, alternating spheres, boxes and
/// capsules. Every body collides with the ground and with its neighbour.
pub fn setup_ground_scene(n: usize) -> (hecs::World, PhysicsWorld) {
    let mut world = hecs::World::new();
    let mut physics = PhysicsWorld::new(PhysicsConfig {
        max_contacts: n * 10,
        ..PhysicsConfig::default()
    });
    let ground = Plane::new(Vec3::Y, 0.0);

    let mut previous = None;
    for i in 0..n {
        let shape = match i % 3 {
            0 => ColliderShape::Sphere { radius: 0.5 },
            1 => ColliderShape::Box {
                half_extents: Vec3::splat(0.45),
            },
            _ => ColliderShape::Capsule {
                radius: 0.3,
                half_height: 0.2,
            },
        };
        let body = RigidBody::new_dynamic(1.0)
            .with_position(Vec3::new(i as f32 * 0.9, 0.48, 0.0))
            .with_orientation(Quat::from_rotation_y(i as f32 * 0.3));
        let entity = world.spawn((body, Collider::new(shape)));

        physics.add_constraint(CollisionConstraint::with_halfspace(entity, ground));
        if let Some(prev) = previous {
            physics.add_constraint(CollisionConstraint::between(prev, entity));
        }
        previous = Some(entity);
    }

    (world, physics)
}

/// `n` pendulum bobs tethered to anchors along the X axis, half of them
/// stretched past their rope length.
pub fn setup_tether_scene(n: usize) -> (hecs::World, PhysicsWorld) {
    let mut world = hecs::World::new();
    let mut physics = PhysicsWorld::new(PhysicsConfig {
        max_contacts: n,
        ..PhysicsConfig::default()
    });

    for i in 0..n {
        let anchor = Vec3::new(i as f32, 10.0, 0.0);
        let drop = if i % 2 == 0 { 2.0 } else { 2.5 };
        let entity = world.spawn((RigidBody::new_dynamic(1.0).with_position(anchor - Vec3::Y * drop),));
        physics.add_constraint(TetherConstraint::new(entity, anchor, Vec3::ZERO, 2.2, 0.1));
    }

    (world, physics)
}
