use carillon::audio::AudioSystem;
use carillon::config::AudioConfig;

// These run the engine without a device (play = false), so they hold in
// headless CI.

#[test]
fn activate_is_idempotent() {
    let mut system = AudioSystem::new();
    let cfg = AudioConfig::default();

    system.activate(&cfg, false, None);
    assert!(system.is_active());
    assert!(system.bank().ready());

    let first = system.bank().allocate().expect("slot");
    // second activation must not rebuild the engine or forget the slot
    system.activate(&cfg, false, None);
    assert!(system.is_active());
    let second = system.bank().allocate().expect("slot");
    assert_ne!(first, second, "existing allocation survived reactivation");
}

#[test]
fn unactivated_system_is_silent_and_safe() {
    let mut system = AudioSystem::new();
    assert!(!system.is_active());
    assert!(!system.bank().ready());
    assert!(system.bank().allocate().is_none());
}

#[test]
fn slots_are_recycled_after_release() {
    let mut system = AudioSystem::new();
    system.activate(&AudioConfig::default(), false, None);

    let a = system.bank().allocate().expect("slot");
    system.bank().release(a);
    let b = system.bank().allocate().expect("slot");
    assert_eq!(a, b, "released slot is reused");
}
