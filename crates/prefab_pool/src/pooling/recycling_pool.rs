//! Recycling Pool
//!
//! Lazily instantiates copies of a single template node and hands them out
//! placed where the caller asked. Instances come back when they are
//! deactivated and are reused instead of being destroyed and recreated.
//!
//! # Lifecycle
//!
//! ```text
//!   Free ──place──▶ Active ──deactivate──▶ PendingReturn ──next tick──▶ Free
//!                                               │
//!                                               └──▶ Destroyed (evicted / over capacity)
//! ```
//!
//! Returned instances are not reparented in the pass that deactivated them.
//! The move under the pool's holder node is deferred to the end of the tick
//! and re-checks the instance before touching it, so an instance destroyed or
//! reactivated in the meantime is simply skipped.
//!
//! # Capacity
//!
//! Placement never fails or blocks on capacity: when nothing is free a new
//! instance is created, even above capacity. Capacity only decides what
//! happens on return: while more instances are alive than the capacity
//! allows, returned instances are destroyed instead of kept.

use super::anchor::GlobalParentRegistry;
use super::error::PoolError;
use super::handle::PoolableHandle;
use super::placement::PlacementSpec;
use super::scheduler::TickScheduler;
use crate::config::{validate_capacity, PoolConfig};
use crate::foundation::math::{Quat, Vec3};
use crate::scene::{NodeId, Scene};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// Where a tracked instance is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    /// Inactive, parked under the holder node, ready for reuse
    Free,
    /// Placed and active
    Active,
    /// Deactivated, waiting for the end of the tick to become free
    PendingReturn,
}

/// What happened to a returned instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnOutcome {
    /// Deactivated; becomes free once the current tick completes
    Deferred,
    /// Destroyed because the pool was over capacity
    Destroyed,
    /// Return was not applicable (double return without collection check)
    Ignored,
}

/// Cumulative pool statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Instances instantiated from the template
    pub created: u64,
    /// Placements served from the free list
    pub reused: u64,
    /// Instances destroyed by the pool
    pub destroyed: u64,
    /// Deferred returns that found their instance destroyed or reactivated
    pub stale_continuations: u64,
    /// Maximum number of instances alive at once
    pub peak_live: usize,
}

pub(crate) struct PoolState {
    name: String,
    template: Option<NodeId>,
    capacity: usize,
    collection_check: bool,
    holder: NodeId,
    instances: HashMap<NodeId, InstanceState>,
    free: Vec<NodeId>,
    pending_placement: Option<PlacementSpec>,
    stats: PoolStats,
    scheduler: Rc<dyn TickScheduler>,
    registry: Rc<GlobalParentRegistry>,
}

impl PoolState {
    fn live_count(&self) -> usize {
        self.instances.len()
    }

    fn over_capacity(&self) -> bool {
        self.live_count() > self.capacity
    }

    fn ensure_holder(&mut self, scene: &mut dyn Scene) -> NodeId {
        if !scene.exists(self.holder) {
            self.holder = scene.create_node(&self.name);
            log::debug!("Pool '{}' recreated its holder node {:?}", self.name, self.holder);
        }
        self.holder
    }

    /// Forget instances the host destroyed behind the pool's back
    fn prune_destroyed(&mut self, scene: &dyn Scene) {
        let before = self.instances.len();
        self.instances.retain(|node, _| scene.exists(*node));
        self.free.retain(|node| scene.exists(*node));

        let dropped = before - self.instances.len();
        if dropped > 0 {
            log::debug!("Pool '{}' stopped tracking {} instances destroyed elsewhere", self.name, dropped);
        }
    }

    /// Pop the most recently freed instance that still exists
    fn pop_free(&mut self, scene: &dyn Scene) -> Option<NodeId> {
        while let Some(node) = self.free.pop() {
            if scene.exists(node) {
                return Some(node);
            }
            self.instances.remove(&node);
            log::debug!("Pool '{}' dropped free instance {:?} destroyed elsewhere", self.name, node);
        }
        None
    }

    fn create_instance(&mut self, scene: &mut dyn Scene) -> Result<NodeId, PoolError> {
        let Some(template) = self.template else {
            log::error!("Pool '{}' cannot create an instance: no template configured", self.name);
            return Err(PoolError::MissingTemplate { pool: self.name.clone() });
        };
        let Some(node) = scene.instantiate(template) else {
            log::error!("Pool '{}' cannot create an instance: template {:?} does not exist", self.name, template);
            return Err(PoolError::TemplateNotFound { pool: self.name.clone(), template });
        };

        // Never show a frame at the template's own transform
        scene.set_active(node, false);

        let base = scene.name(template).unwrap_or(&self.name).to_string();
        let name = format!("{}{:02}", base, self.live_count());
        scene.set_name(node, &name);

        self.stats.created += 1;
        log::debug!("Pool '{}' created instance '{}' ({:?})", self.name, name, node);
        Ok(node)
    }

    /// Consume the pending placement and bring the instance to life
    fn on_acquire(&mut self, scene: &mut dyn Scene, handle: &PoolableHandle) {
        let spec = self.pending_placement.take().unwrap_or_else(|| {
            log::warn!("Pool '{}' acquired {:?} without a pending placement", self.name, handle.node());
            PlacementSpec::default()
        });
        let parent = spec.parent().unwrap_or_else(|| self.registry.anchor(scene));

        handle.place(scene, &spec, parent);
        scene.set_active(handle.node(), true);

        self.instances.insert(handle.node(), InstanceState::Active);
        self.stats.peak_live = self.stats.peak_live.max(self.live_count());
    }

    fn destroy_instance(&mut self, scene: &mut dyn Scene, node: NodeId) {
        scene.destroy(node);
        self.instances.remove(&node);
        self.stats.destroyed += 1;
    }
}

/// Return an instance to the pool owning `state`
///
/// `observed_transition` is set when the caller saw the node go from active to
/// inactive. A pending instance that was reactivated and deactivated again
/// within the same tick is then returned afresh instead of being reported as a
/// double return.
pub(crate) fn release(
    state: &Rc<RefCell<PoolState>>,
    scene: &mut dyn Scene,
    node: NodeId,
    observed_transition: bool,
) -> Result<ReturnOutcome, PoolError> {
    let mut pool = state.borrow_mut();

    let already_queued = match pool.instances.get(&node) {
        Some(InstanceState::Active) => false,
        Some(InstanceState::PendingReturn) if observed_transition || scene.is_active(node) => {
            log::trace!("Instance {:?} returned to pool '{}' again after reactivation", node, pool.name);
            true
        }
        _ => {
            if pool.collection_check {
                log::error!("Instance {:?} returned to pool '{}' while not checked out", node, pool.name);
                return Err(PoolError::AlreadyReturned { pool: pool.name.clone(), node });
            }
            log::warn!("Ignoring return of {:?} to pool '{}': not checked out", node, pool.name);
            return Ok(ReturnOutcome::Ignored);
        }
    };

    pool.prune_destroyed(scene);
    if !pool.instances.contains_key(&node) {
        log::trace!("Return of {:?} to pool '{}' skipped: destroyed elsewhere", node, pool.name);
        return Ok(ReturnOutcome::Destroyed);
    }

    if pool.over_capacity() {
        pool.destroy_instance(scene, node);
        log::debug!(
            "Pool '{}' over capacity, destroyed {:?} ({} live, capacity {})",
            pool.name, node, pool.live_count(), pool.capacity
        );
        return Ok(ReturnOutcome::Destroyed);
    }

    scene.set_active(node, false);
    pool.instances.insert(node, InstanceState::PendingReturn);
    if already_queued {
        return Ok(ReturnOutcome::Deferred);
    }

    // Release the borrow first: the scheduler may call back into the pool
    let scheduler = Rc::clone(&pool.scheduler);
    drop(pool);

    let weak = Rc::downgrade(state);
    scheduler.defer(Box::new(move |scene| resolve_deferred_return(&weak, scene, node)));
    Ok(ReturnOutcome::Deferred)
}

/// End-of-tick half of a return: park the instance under the holder and free it
fn resolve_deferred_return(state: &Weak<RefCell<PoolState>>, scene: &mut dyn Scene, node: NodeId) {
    let Some(state) = state.upgrade() else {
        log::trace!("Deferred return of {:?} skipped: pool dropped", node);
        return;
    };
    let mut pool = state.borrow_mut();

    if pool.instances.get(&node) != Some(&InstanceState::PendingReturn) {
        pool.stats.stale_continuations += 1;
        log::trace!("Deferred return of {:?} skipped: no longer pending", node);
        return;
    }
    if !scene.exists(node) {
        pool.instances.remove(&node);
        pool.stats.stale_continuations += 1;
        log::trace!("Deferred return of {:?} skipped: destroyed while pending", node);
        return;
    }
    if scene.is_active(node) {
        pool.instances.insert(node, InstanceState::Active);
        pool.stats.stale_continuations += 1;
        log::trace!("Deferred return of {:?} skipped: reactivated while pending", node);
        return;
    }

    // Capacity may have been lowered while the return was pending
    if pool.over_capacity() {
        pool.destroy_instance(scene, node);
        log::debug!("Pool '{}' shrank to capacity {}, destroyed {:?}", pool.name, pool.capacity, node);
        return;
    }

    let holder = pool.ensure_holder(scene);
    scene.set_parent(node, Some(holder));
    pool.instances.insert(node, InstanceState::Free);
    pool.free.push(node);
    log::debug!("Pool '{}' freed {:?} ({} free)", pool.name, node, pool.free.len());
}

/// Pool of recyclable instances of one template
///
/// All operations take the scene explicitly; the pool itself only keeps
/// bookkeeping. Acquisitions on one pool must not overlap: placing from inside
/// another placement on the same pool is not supported.
///
/// # Usage
///
/// ```rust
/// use std::rc::Rc;
/// use prefab_pool::prelude::*;
///
/// let mut scene = SimpleScene::new();
/// let template = scene.create_node("Bullet");
/// let scheduler = Rc::new(FrameScheduler::new());
///
/// let pool = RecyclingPool::new(
///     &mut scene,
///     PoolConfig::new("Bullets").with_template(template).with_capacity(8),
///     scheduler.clone(),
/// )?;
///
/// let bullet = pool.place_at(&mut scene, Vec3::new(0.0, 1.0, 0.0))?;
/// bullet.deactivate(&mut scene)?;
/// scheduler.end_tick(&mut scene);
/// assert_eq!(pool.count_inactive(), 1);
/// # Ok::<(), PoolError>(())
/// ```
pub struct RecyclingPool {
    state: Rc<RefCell<PoolState>>,
}

impl RecyclingPool {
    /// Create a pool and its holder node
    ///
    /// The template is not checked here; a missing template surfaces as
    /// [`PoolError::MissingTemplate`] on the first placement that has to
    /// create an instance.
    pub fn new(
        scene: &mut dyn Scene,
        config: PoolConfig,
        scheduler: Rc<dyn TickScheduler>,
    ) -> Result<Self, PoolError> {
        config.validate()?;

        let holder = scene.create_node(&config.name);
        log::info!("Created pool '{}' with capacity {}", config.name, config.capacity);

        let state = PoolState {
            name: config.name,
            template: config.template,
            capacity: config.capacity,
            collection_check: config.collection_check,
            holder,
            instances: HashMap::new(),
            free: Vec::new(),
            pending_placement: None,
            stats: PoolStats::default(),
            scheduler,
            registry: GlobalParentRegistry::shared(),
        };
        Ok(Self { state: Rc::new(RefCell::new(state)) })
    }

    /// Use a specific global parent registry instead of the shared one
    #[must_use]
    pub fn with_registry(self, registry: Rc<GlobalParentRegistry>) -> Self {
        self.state.borrow_mut().registry = registry;
        self
    }

    /// Hand out an instance placed according to `spec`
    ///
    /// Reuses a free instance when there is one and creates a new one
    /// otherwise, regardless of capacity.
    pub fn place(&self, scene: &mut dyn Scene, spec: PlacementSpec) -> Result<PoolableHandle, PoolError> {
        let mut pool = self.state.borrow_mut();
        debug_assert!(pool.pending_placement.is_none(), "overlapping acquisition on pool '{}'", pool.name);
        pool.pending_placement = Some(spec);

        let node = if let Some(node) = pool.pop_free(scene) {
            pool.stats.reused += 1;
            log::trace!("Pool '{}' reusing {:?}", pool.name, node);
            node
        } else {
            pool.prune_destroyed(scene);
            match pool.create_instance(scene) {
                Ok(node) => node,
                Err(err) => {
                    pool.pending_placement = None;
                    return Err(err);
                }
            }
        };

        let handle = PoolableHandle::new(node, Rc::downgrade(&self.state));
        pool.on_acquire(scene, &handle);
        Ok(handle)
    }

    /// Place at the position and rotation of `node`, parented to it
    pub fn place_under(&self, scene: &mut dyn Scene, node: NodeId) -> Result<PoolableHandle, PoolError> {
        let transform = scene.transform(node).unwrap_or_default();
        let spec = PlacementSpec::with_rotation(transform.position, transform.rotation).parented(node);
        self.place(scene, spec)
    }

    /// Place at `position` with identity rotation and unit scale
    pub fn place_at(&self, scene: &mut dyn Scene, position: Vec3) -> Result<PoolableHandle, PoolError> {
        self.place(scene, PlacementSpec::at(position))
    }

    /// Place at `position` rotated by euler angles in radians
    pub fn place_with_euler(&self, scene: &mut dyn Scene, position: Vec3, euler: Vec3) -> Result<PoolableHandle, PoolError> {
        self.place(scene, PlacementSpec::with_euler(position, euler))
    }

    /// Place at `position` with `rotation`
    pub fn place_with_rotation(&self, scene: &mut dyn Scene, position: Vec3, rotation: Quat) -> Result<PoolableHandle, PoolError> {
        self.place(scene, PlacementSpec::with_rotation(position, rotation))
    }

    /// Return an instance to this pool
    ///
    /// Normally reached through [`PoolableHandle::deactivate`]; calling it
    /// directly also deactivates the instance.
    pub fn return_to_pool(&self, scene: &mut dyn Scene, handle: &PoolableHandle) -> Result<ReturnOutcome, PoolError> {
        if !handle.is_owned_by(&self.state) {
            let pool = self.state.borrow();
            return Err(PoolError::ForeignHandle { pool: pool.name.clone(), node: handle.node() });
        }
        release(&self.state, scene, handle.node(), false)
    }

    /// Destroy every free instance
    ///
    /// Active and pending instances stay tracked. Returns how many were destroyed.
    pub fn clear(&self, scene: &mut dyn Scene) -> usize {
        let mut pool = self.state.borrow_mut();
        let free = std::mem::take(&mut pool.free);
        let count = free.len();
        for node in free {
            pool.destroy_instance(scene, node);
        }
        log::debug!("Pool '{}' cleared {} free instances", pool.name, count);
        count
    }

    /// Change the capacity
    ///
    /// Applies lazily: nothing is destroyed now, later returns are destroyed
    /// until the live count fits.
    pub fn set_capacity(&self, capacity: usize) -> Result<(), PoolError> {
        validate_capacity(capacity)?;
        let mut pool = self.state.borrow_mut();
        log::info!("Pool '{}' capacity {} -> {}", pool.name, pool.capacity, capacity);
        pool.capacity = capacity;
        Ok(())
    }

    /// Lifecycle state of a tracked instance
    pub fn state_of(&self, handle: &PoolableHandle) -> Option<InstanceState> {
        self.state.borrow().instances.get(&handle.node()).copied()
    }

    /// Total number of tracked instances
    pub fn count_all(&self) -> usize {
        self.state.borrow().live_count()
    }

    /// Instances checked out, including those pending return
    pub fn count_active(&self) -> usize {
        let pool = self.state.borrow();
        pool.live_count() - pool.free.len()
    }

    /// Free instances ready for reuse
    pub fn count_inactive(&self) -> usize {
        self.state.borrow().free.len()
    }

    /// Instances deactivated but not yet freed
    pub fn pending_count(&self) -> usize {
        self.state.borrow()
            .instances
            .values()
            .filter(|state| **state == InstanceState::PendingReturn)
            .count()
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.state.borrow().capacity
    }

    /// Pool name
    pub fn name(&self) -> String {
        self.state.borrow().name.clone()
    }

    /// Node free instances are parked under
    pub fn holder(&self) -> NodeId {
        self.state.borrow().holder
    }

    /// Statistics snapshot
    pub fn stats(&self) -> PoolStats {
        self.state.borrow().stats.clone()
    }
}

impl fmt::Debug for RecyclingPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pool = self.state.borrow();
        f.debug_struct("RecyclingPool")
            .field("name", &pool.name)
            .field("capacity", &pool.capacity)
            .field("live", &pool.live_count())
            .field("free", &pool.free.len())
            .finish_non_exhaustive()
    }
}

impl Drop for RecyclingPool {
    fn drop(&mut self) {
        let pool = self.state.borrow();
        log::debug!(
            "Dropping pool '{}': {} outstanding instances become orphaned",
            pool.name,
            pool.live_count() - pool.free.len()
        );
    }
}
