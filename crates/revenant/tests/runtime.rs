//! Integration tests for the frame driver wired to the service registry:
//! event-driven releases, timed releases and configuration loading.

use std::cell::RefCell;
use std::rc::Rc;

use revenant::core::{InstanceId, Poolable, Prefab};
use revenant::shared::{Quaternion, Vec3};
use revenant::{services, EventId, GameLoop, RuntimeConfig, RuntimeError};

#[derive(Default)]
struct Projectile {
    active: bool,
    position: Vec3,
}

impl Poolable for Projectile {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_transform(&mut self, position: Vec3, _rotation: Quaternion) {
        self.position = position;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct Shot;

impl Prefab for Shot {
    type Instance = Projectile;

    fn name(&self) -> &str {
        "shot"
    }

    fn instantiate(&self) -> Projectile {
        Projectile::default()
    }
}

fn runtime_config() -> RuntimeConfig {
    RuntimeConfig::from_toml_str(
        r#"
        [pools]
        init_size = 2

        [auto_return]
        delay_secs = 0.1

        [dispatcher]
        sweep_interval_frames = 2
        "#,
    )
    .unwrap()
}

#[test]
fn test_bullet_hit_releases_through_services() {
    services::teardown_all();
    let game = GameLoop::new(runtime_config(), [Shot]).unwrap();
    game.install_services().unwrap();

    // A listener that knows nothing but the event: it finds the pools
    // through the registry and returns the hit projectile.
    services::dispatcher()
        .unwrap()
        .register_listener(EventId::BulletHit, |_, payload| {
            let Some(id) = payload.and_then(|p| p.downcast_ref::<InstanceId>()) else {
                return;
            };
            if let Ok(pools) = services::pools::<Shot>() {
                pools.borrow_mut().release_object(*id);
            }
        });

    let shot = game
        .pools()
        .borrow_mut()
        .spawn_object(&Shot, Vec3::new(0.0, 1.0, 0.0), Quaternion::IDENTITY);
    assert!(game
        .pools()
        .borrow()
        .get(shot)
        .is_some_and(|p| p.active && p.position == Vec3::new(0.0, 1.0, 0.0)));

    let report = game
        .dispatcher()
        .post_with(EventId::BulletHit, &"earth", &shot);
    assert_eq!(report.delivered, 1);
    assert!(!game.pools().borrow().is_spawned(shot));

    game.uninstall_services();
    assert!(matches!(
        services::dispatcher(),
        Err(RuntimeError::ServiceMissing(_))
    ));
}

#[test]
fn test_installing_twice_is_rejected() {
    services::teardown_all();
    let game = GameLoop::new(RuntimeConfig::default(), [Shot]).unwrap();
    let other = GameLoop::new(RuntimeConfig::default(), [Shot]).unwrap();

    game.install_services().unwrap();
    assert!(matches!(
        other.install_services(),
        Err(RuntimeError::ServiceAlreadyInstalled(_))
    ));

    // The first installation is untouched.
    assert!(Rc::ptr_eq(&services::dispatcher().unwrap(), game.dispatcher()));
    services::teardown_all();
}

#[test]
fn test_timed_spawns_come_back_on_tick() {
    let mut game = GameLoop::new(runtime_config(), [Shot]).unwrap();

    let volley: Vec<InstanceId> = (0..3)
        .map(|i| game.spawn_timed(&Shot, Vec3::new(i as f32, 0.0, 0.0), Quaternion::IDENTITY))
        .collect();
    assert_eq!(game.pools().borrow().spawned_count(), 3);
    assert_eq!(game.pools().borrow().pool_status(&Shot).unwrap().total, 3);

    let first = game.tick(0.05);
    assert_eq!(first.auto_returned, 0);

    let second = game.tick(0.06);
    assert_eq!(second.auto_returned, 3);
    for id in volley {
        assert!(!game.pools().borrow().is_spawned(id));
    }
    assert_eq!(game.pools().borrow().spawned_count(), 0);
}

#[test]
fn test_sweep_follows_configured_interval() {
    struct Turret;

    let mut game = GameLoop::new(runtime_config(), [Shot]).unwrap();
    let log: Rc<RefCell<Vec<u32>>> = Rc::default();

    let turret = Rc::new(Turret);
    let doomed = Rc::new(Turret);
    let sink = Rc::clone(&log);
    game.dispatcher()
        .register_owned(EventId::AudioDbValueChange, &turret, move |_, _, payload| {
            if let Some(db) = payload.and_then(|p| p.downcast_ref::<u32>()) {
                sink.borrow_mut().push(*db);
            }
        });
    game.dispatcher()
        .register_owned(EventId::AudioDbValueChange, &doomed, |_, _, _| {});
    drop(doomed);

    assert_eq!(game.tick(0.016).swept, 0);
    assert_eq!(game.tick(0.016).swept, 1);
    assert_eq!(game.dispatcher().listener_count(EventId::AudioDbValueChange), 1);

    game.dispatcher()
        .post_with(EventId::AudioDbValueChange, &(), &42_u32);
    assert_eq!(*log.borrow(), vec![42]);
}

#[test]
fn test_status_logging_reports_once_per_change() {
    let mut config = RuntimeConfig::default();
    config.pools.log_status = true;
    let mut game = GameLoop::new(config, [Shot]).unwrap();

    // Warm-up marks the manager dirty.
    assert!(game.tick(0.016).status_reported);
    assert!(!game.tick(0.016).status_reported);

    let id = game.pools().borrow_mut().spawn(&Shot);
    assert!(game.tick(0.016).status_reported);
    game.pools().borrow_mut().release_object(id);
    assert!(game.tick(0.016).status_reported);
    assert!(!game.tick(0.016).status_reported);
}

#[test]
fn test_invalid_config_is_rejected() {
    let err = RuntimeConfig::from_toml_str("[auto_return]\ndelay_secs = nan").unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidConfig(_)));

    let mut config = RuntimeConfig::default();
    config.auto_return.delay_secs = -0.5;
    assert!(GameLoop::new(config, [Shot]).is_err());
}
