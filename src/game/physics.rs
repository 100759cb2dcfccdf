use rapier3d::prelude::*;

use super::constants::physics as consts;

// Collision groups for sandbox geometry
// Grab rays are filtered by the configured mask against collider memberships
pub const GROUP_STATIC: Group = Group::GROUP_1; // Floors, walls, anchored props
pub const GROUP_PROPS: Group = Group::GROUP_2; // Loose dynamic props

/// Nearest hit of a grab ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Rigid body owning the hit collider; `None` for colliders without one
    pub body: Option<RigidBodyHandle>,
    pub distance: f32,
}

/// Linear and angular damping coefficients of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Damping {
    pub linear: f32,
    pub angular: f32,
}

/// The physics operations the grab controller needs from its host engine.
///
/// Bodies are addressed by generational handles. A handle whose body has been
/// removed no longer resolves, so getters return `None` and setters do nothing.
pub trait GrabPhysics {
    /// Nearest hit along a ray, limited to `max_distance` and to colliders
    /// whose groups intersect `mask`. Sensors are skipped.
    fn cast_grab_ray(
        &self,
        origin: Vector<Real>,
        direction: Vector<Real>,
        max_distance: f32,
        mask: Group,
    ) -> Option<RayHit>;

    fn contains_body(&self, body: RigidBodyHandle) -> bool;

    /// True for bodies moved by forces; false for fixed, kinematic and missing bodies
    fn is_dynamic(&self, body: RigidBodyHandle) -> bool;

    fn body_position(&self, body: RigidBodyHandle) -> Option<Vector<Real>>;

    fn linear_velocity(&self, body: RigidBodyHandle) -> Option<Vector<Real>>;

    /// Total mass in kilograms
    fn mass(&self, body: RigidBodyHandle) -> Option<f32>;

    fn set_linear_velocity(&mut self, body: RigidBodyHandle, velocity: Vector<Real>);

    fn damping(&self, body: RigidBodyHandle) -> Option<Damping>;

    fn set_damping(&mut self, body: RigidBodyHandle, damping: Damping);

    /// Continuous force, integrated over the next physics step only
    fn add_force(&mut self, body: RigidBodyHandle, force: Vector<Real>);

    /// Instantaneous, mass-independent change of angular velocity
    fn apply_torque_velocity_change(&mut self, body: RigidBodyHandle, torque: Vector<Real>);

    /// Turn on render interpolation for engines that need it. Rapier does not.
    fn enable_interpolation(&mut self, _body: RigidBodyHandle) {}
}

/// Wrapper around Rapier3D physics world for the grab sandbox.
pub struct PhysicsWorld {
    pub gravity: Vector<Real>,
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,

    /// Bodies that received a user force since the last step
    forced_bodies: Vec<RigidBodyHandle>,
}

impl PhysicsWorld {
    /// Creates a new physics world with default gravity
    pub fn new() -> Self {
        Self {
            gravity: vector![0.0, -consts::DEFAULT_GRAVITY, 0.0],
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            forced_bodies: Vec::new(),
        }
    }

    /// Sets the downward gravity magnitude
    pub fn set_gravity(&mut self, gravity_y: f32) {
        self.gravity = vector![0.0, -gravity_y, 0.0];
    }

    /// Steps the physics simulation forward by dt seconds.
    /// User forces added since the previous step are cleared afterwards.
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        for handle in self.forced_bodies.drain(..) {
            if let Some(body) = self.rigid_body_set.get_mut(handle) {
                body.reset_forces(false);
            }
        }
    }

    /// Refreshes ray queries so they see bodies added or moved since the last step
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Adds a box-shaped part to the physics world
    /// - Fixed parts never move and cannot be grabbed
    /// - Non-fixed parts are dynamic (affected by gravity, forces and collisions)
    pub fn add_part(
        &mut self,
        position: [f32; 3],
        half_extents: [f32; 3],
        fixed: bool,
    ) -> RigidBodyHandle {
        let body = if fixed {
            RigidBodyBuilder::fixed()
        } else {
            RigidBodyBuilder::dynamic()
        }
        .translation(vector![position[0], position[1], position[2]])
        .build();

        let handle = self.rigid_body_set.insert(body);

        let group = if fixed { GROUP_STATIC } else { GROUP_PROPS };
        let collider = ColliderBuilder::cuboid(half_extents[0], half_extents[1], half_extents[2])
            .collision_groups(InteractionGroups::new(group, Group::ALL))
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);

        handle
    }

    /// Adds a dynamic box with an explicit mass instead of unit density
    pub fn add_prop(&mut self, position: [f32; 3], half_extents: [f32; 3], mass: f32) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![position[0], position[1], position[2]])
            .build();
        let handle = self.rigid_body_set.insert(body);

        let collider = ColliderBuilder::cuboid(half_extents[0], half_extents[1], half_extents[2])
            .mass(mass)
            .collision_groups(InteractionGroups::new(GROUP_PROPS, Group::ALL))
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);

        handle
    }

    /// Adds a collider with no rigid body (pure scenery, visible to rays)
    pub fn add_scenery(&mut self, position: [f32; 3], half_extents: [f32; 3]) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents[0], half_extents[1], half_extents[2])
            .translation(vector![position[0], position[1], position[2]])
            .collision_groups(InteractionGroups::new(GROUP_STATIC, Group::ALL))
            .build();
        self.collider_set.insert(collider)
    }

    /// Removes a part from the physics world
    pub fn remove_part(&mut self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            )
            .is_some()
    }
}

impl GrabPhysics for PhysicsWorld {
    fn cast_grab_ray(
        &self,
        origin: Vector<Real>,
        direction: Vector<Real>,
        max_distance: f32,
        mask: Group,
    ) -> Option<RayHit> {
        let direction = direction.try_normalize(consts::EPSILON)?;
        let ray = Ray::new(point![origin.x, origin.y, origin.z], direction);

        let filter = QueryFilter::default()
            .exclude_sensors()
            .groups(InteractionGroups::new(Group::ALL, mask));

        let (hit_collider, distance) = self.query_pipeline.cast_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_distance,
            true, // solid
            filter,
        )?;

        let body = self
            .collider_set
            .get(hit_collider)
            .and_then(|collider| collider.parent());
        Some(RayHit { body, distance })
    }

    fn contains_body(&self, body: RigidBodyHandle) -> bool {
        self.rigid_body_set.contains(body)
    }

    fn is_dynamic(&self, body: RigidBodyHandle) -> bool {
        self.rigid_body_set
            .get(body)
            .map(|b| b.is_dynamic())
            .unwrap_or(false)
    }

    fn body_position(&self, body: RigidBodyHandle) -> Option<Vector<Real>> {
        self.rigid_body_set.get(body).map(|b| *b.translation())
    }

    fn linear_velocity(&self, body: RigidBodyHandle) -> Option<Vector<Real>> {
        self.rigid_body_set.get(body).map(|b| *b.linvel())
    }

    fn mass(&self, body: RigidBodyHandle) -> Option<f32> {
        let b = self.rigid_body_set.get(body)?;
        let mass = b.mass();
        if mass > 0.0 {
            return Some(mass);
        }
        // Mass properties of freshly attached colliders land on the body at the next step
        Some(
            b.colliders()
                .iter()
                .filter_map(|&handle| self.collider_set.get(handle))
                .map(|collider| collider.mass())
                .sum(),
        )
    }

    fn set_linear_velocity(&mut self, body: RigidBodyHandle, velocity: Vector<Real>) {
        if let Some(b) = self.rigid_body_set.get_mut(body) {
            if b.is_dynamic() {
                b.set_linvel(velocity, true);
            }
        }
    }

    fn damping(&self, body: RigidBodyHandle) -> Option<Damping> {
        self.rigid_body_set.get(body).map(|b| Damping {
            linear: b.linear_damping(),
            angular: b.angular_damping(),
        })
    }

    fn set_damping(&mut self, body: RigidBodyHandle, damping: Damping) {
        if let Some(b) = self.rigid_body_set.get_mut(body) {
            b.set_linear_damping(damping.linear);
            b.set_angular_damping(damping.angular);
        }
    }

    fn add_force(&mut self, body: RigidBodyHandle, force: Vector<Real>) {
        if let Some(b) = self.rigid_body_set.get_mut(body) {
            if b.is_dynamic() {
                b.add_force(force, true);
                self.forced_bodies.push(body);
            }
        }
    }

    fn apply_torque_velocity_change(&mut self, body: RigidBodyHandle, torque: Vector<Real>) {
        if let Some(b) = self.rigid_body_set.get_mut(body) {
            if b.is_dynamic() {
                let angvel = *b.angvel() + torque;
                b.set_angvel(angvel, true);
            }
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
