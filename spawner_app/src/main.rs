//! Projectile demo: a turret firing pooled projectiles that expire after a
//! few ticks

use prefab_pool::foundation::logging;
use prefab_pool::foundation::math::utils::deg_to_rad;
use prefab_pool::prelude::*;
use rand::Rng;
use std::rc::Rc;

// Demo configuration
const POOL_CAPACITY: usize = 16;
const TICKS: u64 = 120;
const SHOTS_PER_TICK: usize = 2;
const MIN_LIFETIME_TICKS: u64 = 5;
const MAX_LIFETIME_TICKS: u64 = 15;
const PROJECTILE_SPEED: f32 = 0.5;   // Units per tick along the firing direction

struct Projectile {
    handle: PoolableHandle,
    direction: Vec3,
    expires_at: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_config(&EngineConfig::default());
    log::info!("Starting projectile pool demo");

    let mut scene = SimpleScene::new();
    let scheduler = Rc::new(FrameScheduler::new());
    let mut rng = rand::thread_rng();

    let template = scene.create_node("Projectile");
    scene.set_local_scale(template, Vec3::new(0.2, 0.2, 0.6));
    let turret = scene.create_node("Turret");
    scene.set_position_and_rotation(turret, Vec3::new(0.0, 1.5, 0.0), Quat::identity());

    let config = PoolConfig::new("Projectiles")
        .with_template(template)
        .with_capacity(POOL_CAPACITY);
    let pool = RecyclingPool::new(&mut scene, config, scheduler.clone())?;

    let mut in_flight: Vec<Projectile> = Vec::new();

    for tick in 0..TICKS {
        // Fire
        for _ in 0..SHOTS_PER_TICK {
            // Spread shots by turning about the up axis
            let heading = deg_to_rad(rng.gen_range(-30.0..30.0));
            let muzzle = scene.transform(turret).unwrap_or_default().position;
            let handle = pool.place_with_euler(&mut scene, muzzle, Vec3::new(0.0, heading, 0.0))?;
            let rotation = scene.transform(handle.node()).unwrap_or_default().rotation;
            in_flight.push(Projectile {
                handle,
                direction: rotation * Vec3::new(0.0, 0.0, 1.0),
                expires_at: tick + rng.gen_range(MIN_LIFETIME_TICKS..=MAX_LIFETIME_TICKS),
            });
        }

        // Move
        for projectile in &in_flight {
            if let Some(transform) = scene.transform(projectile.handle.node()) {
                let position = transform.position + projectile.direction * PROJECTILE_SPEED;
                scene.set_position_and_rotation(projectile.handle.node(), position, transform.rotation);
            }
        }

        // Expire: deactivation is what sends a projectile back to the pool
        let (expired, alive): (Vec<_>, Vec<_>) = in_flight
            .into_iter()
            .partition(|projectile| projectile.expires_at <= tick);
        in_flight = alive;
        for projectile in expired {
            projectile.handle.deactivate(&mut scene)?;
        }

        scheduler.end_tick(&mut scene);

        if tick % 20 == 0 {
            log::info!(
                "tick {:>3}: live {:>2} active {:>2} free {:>2} pending {}",
                tick,
                pool.count_all(),
                pool.count_active(),
                pool.count_inactive(),
                pool.pending_count()
            );
        }
    }

    let stats = pool.stats();
    log::info!(
        "Done: created {}, reused {}, destroyed {}, peak live {}",
        stats.created, stats.reused, stats.destroyed, stats.peak_live
    );
    Ok(())
}
