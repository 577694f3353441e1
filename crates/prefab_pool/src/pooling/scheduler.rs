//! Tick scheduling
//!
//! Pools never reparent an instance inside the same pass that deactivated it.
//! Instead they hand a continuation to a [`TickScheduler`], which runs it once
//! the current tick has completed.

use crate::scene::Scene;
use std::cell::{Cell, RefCell};
use std::fmt;

/// Work deferred to a later tick
pub type Continuation = Box<dyn FnOnce(&mut dyn Scene)>;

/// "Run this after the current tick" capability injected into pools
///
/// Pools hold no borrow of their own state while calling [`TickScheduler::defer`],
/// so an implementation may inspect the pool from inside it.
pub trait TickScheduler {
    /// Queue a continuation to run after the current tick completes
    fn defer(&self, task: Continuation);
}

/// Tick-indexed continuation queue
///
/// The host calls [`FrameScheduler::end_tick`] once per frame. Continuations
/// deferred during a tick run at the end of that tick; anything they defer in
/// turn waits for the following one.
pub struct FrameScheduler {
    tick: Cell<u64>,
    deferred_queue: RefCell<Vec<(u64, Continuation)>>,
}

impl FrameScheduler {
    /// Create a scheduler at tick zero
    pub fn new() -> Self {
        Self {
            tick: Cell::new(0),
            deferred_queue: RefCell::new(Vec::new()),
        }
    }
    
    /// Index of the tick currently in progress
    pub fn current_tick(&self) -> u64 {
        self.tick.get()
    }
    
    /// Number of continuations waiting to run
    pub fn pending(&self) -> usize {
        self.deferred_queue.borrow().len()
    }
    
    /// Complete the current tick
    ///
    /// Advances the tick counter, then runs every continuation queued up to and
    /// including the tick that just finished. Returns how many ran.
    pub fn end_tick(&self, scene: &mut dyn Scene) -> usize {
        let finished = self.tick.get();
        self.tick.set(finished + 1);
        
        // Take due work out first; continuations may defer more
        let due: Vec<Continuation> = {
            let mut queue = self.deferred_queue.borrow_mut();
            let (due, later): (Vec<_>, Vec<_>) = std::mem::take(&mut *queue)
                .into_iter()
                .partition(|(queued_at, _)| *queued_at <= finished);
            *queue = later;
            due.into_iter().map(|(_, task)| task).collect()
        };
        
        let count = due.len();
        for task in due {
            task(scene);
        }
        
        if count > 0 {
            log::trace!("Tick {} finished, ran {} deferred continuations", finished, count);
        }
        count
    }
    
    /// Drop every queued continuation without running it
    pub fn clear(&self) {
        self.deferred_queue.borrow_mut().clear();
    }
}

impl TickScheduler for FrameScheduler {
    fn defer(&self, task: Continuation) {
        self.deferred_queue.borrow_mut().push((self.tick.get(), task));
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("tick", &self.tick.get())
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SimpleScene;
    use std::rc::Rc;
    
    #[test]
    fn test_deferred_runs_after_tick() {
        let scheduler = FrameScheduler::new();
        let mut scene = SimpleScene::new();
        let ran = Rc::new(Cell::new(false));
        
        let flag = Rc::clone(&ran);
        scheduler.defer(Box::new(move |_| flag.set(true)));
        assert!(!ran.get());
        assert_eq!(scheduler.pending(), 1);
        
        assert_eq!(scheduler.end_tick(&mut scene), 1);
        assert!(ran.get());
        assert_eq!(scheduler.current_tick(), 1);
    }
    
    #[test]
    fn test_nested_defer_waits_for_next_tick() {
        let scheduler = Rc::new(FrameScheduler::new());
        let mut scene = SimpleScene::new();
        let runs = Rc::new(Cell::new(0));
        
        let inner_scheduler = Rc::clone(&scheduler);
        let counter = Rc::clone(&runs);
        scheduler.defer(Box::new(move |_| {
            counter.set(counter.get() + 1);
            let counter = Rc::clone(&counter);
            inner_scheduler.defer(Box::new(move |_| counter.set(counter.get() + 1)));
        }));
        
        scheduler.end_tick(&mut scene);
        assert_eq!(runs.get(), 1);
        assert_eq!(scheduler.pending(), 1);
        
        scheduler.end_tick(&mut scene);
        assert_eq!(runs.get(), 2);
    }
    
    #[test]
    fn test_continuation_sees_scene() {
        let scheduler = FrameScheduler::new();
        let mut scene = SimpleScene::new();
        let node = scene.create_node("n");
        
        scheduler.defer(Box::new(move |scene| {
            scene.set_active(node, false);
        }));
        scheduler.end_tick(&mut scene);
        assert!(!scene.is_active(node));
    }
}
