//! Sequential impulse contact resolver.

use glam::{Mat3, Vec3};
use rein_physics::physics::{Contact, ContactResolver, RigidBody};

/// Baumgarte stabilization parameter.
const BAUMGARTE_BETA: f32 = 0.2;
/// Penetration slop (allowed penetration before position correction).
const PENETRATION_SLOP: f32 = 0.005;

/// Resolves contacts by iterating normal and friction impulses.
///
/// A contact pushes `bodies[1]` along `+normal` relative to `bodies[0]`; a
/// missing body acts as immovable scenery.
pub struct ImpulseResolver {
    iterations: u32,
    accumulated: Vec<f32>,
}

impl ImpulseResolver {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations,
            accumulated: Vec::new(),
        }
    }
}

impl ContactResolver for ImpulseResolver {
    fn resolve(&mut self, world: &mut hecs::World, contacts: &[Contact], dt: f32) {
        self.accumulated.clear();
        self.accumulated.resize(contacts.len(), 0.0);

        for _ in 0..self.iterations {
            for (contact, normal_impulse) in contacts.iter().zip(&mut self.accumulated) {
                solve_contact(contact, normal_impulse, world, dt);
            }
        }
    }
}

fn solve_contact(contact: &Contact, normal_impulse: &mut f32, world: &mut hecs::World, dt: f32) {
    let a = BodyData::read(world, contact.bodies[0]);
    let b = BodyData::read(world, contact.bodies[1]);

    // Skip if both are immovable
    if a.inv_mass == 0.0 && b.inv_mass == 0.0 {
        return;
    }

    let normal = contact.normal;
    let r_a = contact.point - a.position;
    let r_b = contact.point - b.position;

    let relative_velocity = b.velocity_at(r_b) - a.velocity_at(r_a);
    let contact_velocity = relative_velocity.dot(normal);

    let inv_mass_sum = a.effective_inv_mass(r_a, normal) + b.effective_inv_mass(r_b, normal);
    if inv_mass_sum <= 0.0 {
        return;
    }

    // Baumgarte position correction
    let bias = BAUMGARTE_BETA / dt * (contact.penetration - PENETRATION_SLOP).max(0.0);
    let j_normal = (-(1.0 + contact.restitution) * contact_velocity + bias) / inv_mass_sum;

    // Clamp accumulated normal impulse
    let old_impulse = *normal_impulse;
    *normal_impulse = (old_impulse + j_normal).max(0.0);
    let j_normal = *normal_impulse - old_impulse;

    apply_impulse(world, contact, normal * j_normal);

    // Friction against the velocity left after the normal impulse
    let a = BodyData::read(world, contact.bodies[0]);
    let b = BodyData::read(world, contact.bodies[1]);
    let rel_vel = b.velocity_at(r_b) - a.velocity_at(r_a);
    let tangent_vel = rel_vel - normal * rel_vel.dot(normal);
    let tangent_len = tangent_vel.length();
    if tangent_len <= 1e-6 {
        return;
    }
    let tangent = tangent_vel / tangent_len;

    let inv_mass_t = a.effective_inv_mass(r_a, tangent) + b.effective_inv_mass(r_b, tangent);
    if inv_mass_t <= 0.0 {
        return;
    }

    // Coulomb friction: |Jt| <= mu * |Jn|
    let max_friction = contact.friction * *normal_impulse;
    let j_tangent = (-tangent_len / inv_mass_t).clamp(-max_friction, max_friction);
    apply_impulse(world, contact, tangent * j_tangent);
}

/// Apply `impulse` to `bodies[1]` and its opposite to `bodies[0]`.
fn apply_impulse(world: &mut hecs::World, contact: &Contact, impulse: Vec3) {
    let [a, b] = contact.bodies;
    if let Some(Ok(mut rb)) = a.map(|e| world.get::<&mut RigidBody>(e)) {
        rb.apply_impulse_at_point(-impulse, contact.point);
    }
    if let Some(Ok(mut rb)) = b.map(|e| world.get::<&mut RigidBody>(e)) {
        rb.apply_impulse_at_point(impulse, contact.point);
    }
}

/// Snapshot of the body data the solver reads.
struct BodyData {
    inv_mass: f32,
    inv_inertia: Mat3,
    linear_velocity: Vec3,
    angular_velocity: Vec3,
    position: Vec3,
}

impl BodyData {
    /// Missing entities read as immovable scenery at the origin.
    fn read(world: &hecs::World, entity: Option<hecs::Entity>) -> Self {
        match entity.map(|e| world.get::<&RigidBody>(e)) {
            Some(Ok(rb)) => Self {
                inv_mass: rb.inverse_mass,
                inv_inertia: rb.inverse_inertia_tensor_world(),
                linear_velocity: rb.linear_velocity,
                angular_velocity: rb.angular_velocity,
                position: rb.position,
            },
            _ => Self {
                inv_mass: 0.0,
                inv_inertia: Mat3::ZERO,
                linear_velocity: Vec3::ZERO,
                angular_velocity: Vec3::ZERO,
                position: Vec3::ZERO,
            },
        }
    }

    fn velocity_at(&self, r: Vec3) -> Vec3 {
        self.linear_velocity + self.angular_velocity.cross(r)
    }

    fn effective_inv_mass(&self, r: Vec3, direction: Vec3) -> f32 {
        let r_cross = r.cross(direction);
        self.inv_mass + (self.inv_inertia * r_cross).dot(r_cross)
    }
}
