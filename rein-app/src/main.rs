mod resolver;

use glam::Vec3;
use rein_physics::physics::{Collider, ColliderShape, CollisionConstraint, PhysicsConfig};
use rein_physics::{MeshBuffers, PhysicsWorld, Plane, Ray, RigidBody, TetherConstraint};

use resolver::ImpulseResolver;

const ANCHOR: Vec3 = Vec3::new(0.0, 5.0, 0.0);
const ROPE_LENGTH: f32 = 2.0;
const FRAMES: u32 = 600;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut world = hecs::World::new();
    let mut physics = PhysicsWorld::new(PhysicsConfig::default());
    let mut resolver = ImpulseResolver::new(8);

    // Pendulum bob released horizontally from the anchor
    let bob = world.spawn((
        RigidBody::new_dynamic(1.0).with_position(ANCHOR + Vec3::X * ROPE_LENGTH),
        Collider::new(ColliderShape::Sphere { radius: 0.25 }),
    ));
    physics.add_constraint(TetherConstraint::new(
        bob,
        ANCHOR,
        Vec3::ZERO,
        ROPE_LENGTH,
        0.0,
    ));

    // Crate dropped onto the ground
    let crate_body = world.spawn((
        RigidBody::new_dynamic(2.0).with_position(Vec3::new(4.0, 3.0, 0.0)),
        Collider::new(ColliderShape::Box {
            half_extents: Vec3::splat(0.5),
        }),
    ));
    physics.add_constraint(CollisionConstraint::with_halfspace(
        crate_body,
        Plane::new(Vec3::Y, 0.0),
    ));

    log::info!(
        "simulating {FRAMES} frames with {} constraints",
        physics.constraint_count()
    );

    for frame in 0..FRAMES {
        physics.step(&mut world, &mut resolver, 1.0 / 60.0);

        if frame % 60 == 0 {
            let rb = world.get::<&RigidBody>(bob)?;
            log::info!(
                "t={:.1}s bob={:?} rope={:.3} contacts={}",
                frame as f32 / 60.0,
                rb.position,
                (rb.position - ANCHOR).length(),
                physics.contacts().len()
            );
        }
    }

    let rope = (world.get::<&RigidBody>(bob)?.position - ANCHOR).length();
    anyhow::ensure!(
        rope < ROPE_LENGTH + 0.1,
        "tether stretched to {rope:.3} (limit {ROPE_LENGTH})"
    );

    let crate_y = world.get::<&RigidBody>(crate_body)?.position.y;
    log::info!("crate settled at y={crate_y:.3}");

    // Probe the settled crate with a ray and its mesh hull.
    let hull = MeshBuffers::cube(0.5).convex_hull()?;
    let probe = Ray::from_to(Vec3::new(4.0, 10.0, 0.0), Vec3::new(4.0, -1.0, 0.0));
    match probe.cast_bodies(&world) {
        Some((entity, hit)) => log::info!(
            "probe hit {:?} at {:?} (crate: {})",
            entity,
            hit.point,
            entity == crate_body
        ),
        None => log::warn!("probe missed every body"),
    }
    log::info!(
        "crate hull has {} faces, contains origin: {}",
        hull.faces().len(),
        hull.contains_point(Vec3::ZERO)
    );

    Ok(())
}
