use badge_core::os_module::{BOARD_NAME, SYSNAME};
use badge_core::{BadgeError, Errno, Value};
use badge_scenario_harness::ScenarioHarness;

#[test]
fn uname_reports_the_board() {
    let mut harness = ScenarioHarness::new();
    let info = harness.run_ok("uos.uname()");

    assert_eq!(info.field("sysname"), Some(&Value::from(SYSNAME)));
    assert_eq!(info.field("nodename"), Some(&Value::from(SYSNAME)));
    assert_eq!(
        info.field("release").and_then(Value::as_str),
        Some(env!("CARGO_PKG_VERSION"))
    );
    let machine = info.field("machine").and_then(Value::as_str).expect("machine");
    assert!(machine.starts_with(BOARD_NAME));
    assert_eq!(info.as_items().map(<[Value]>::len), Some(5));
}

#[test]
fn urandom_draws_from_board_entropy() {
    let mut harness = ScenarioHarness::new();
    harness.board_mut().entropy.push_words(&[0xDDCC_BBAA]);

    assert_eq!(
        harness.run_ok("uos.urandom(3)"),
        Value::Bytes(vec![0xAA, 0xBB, 0xCC])
    );
    let Value::Bytes(bytes) = harness.run_ok("uos.urandom(32)") else {
        panic!("expected bytes");
    };
    assert_eq!(bytes.len(), 32);
    assert_eq!(harness.board().entropy.draws(), 9);
    assert!(matches!(harness.run("uos.urandom('x')"), Err(BadgeError::Type(_))));
}

#[test]
fn urandom_too_large_is_a_memory_error() {
    let mut harness = ScenarioHarness::new();
    for line in ["uos.urandom(4611686018427387904)", "uos.urandom(9223372036854775807)"] {
        assert!(matches!(harness.run(line), Err(BadgeError::Memory(_))), "{}", line);
    }
    assert_eq!(harness.board().entropy.draws(), 0);
    assert_eq!(harness.run_ok("uos.urandom(0)"), Value::Bytes(vec![]));
}

#[test]
fn mount_lifecycle() {
    let mut harness = ScenarioHarness::new();

    harness.run_ok("uos.mount('locfd', '/bpi')");
    assert!(harness.runtime().mounts().is_mounted("/bpi"));
    assert_eq!(
        harness.board().vfs.mounted().get("/bpi").map(String::as_str),
        Some("locfd")
    );

    // a busy mount point is a recoverable failure
    assert_eq!(
        harness.run("uos.mount('locfd', '/bpi')"),
        Err(BadgeError::Os(Errno::Einval))
    );
    assert!(harness.runtime().mounts().is_mounted("/bpi"));

    harness.run_ok("uos.umount('/bpi')");
    assert!(!harness.runtime().mounts().is_mounted("/bpi"));
    assert!(harness.board().vfs.mounted().is_empty());

    // and the path can be mounted again
    harness.run_ok("uos.mount('locfd', '/bpi')");
    assert!(harness.runtime().mounts().is_mounted("/bpi"));
}

#[test]
fn failed_mount_leaves_nothing_behind() {
    let mut harness = ScenarioHarness::new();
    harness.board_mut().vfs.fail_mount = true;

    let err = harness.run("uos.mount('nope', '/sd')").unwrap_err();
    assert_eq!(err, BadgeError::Os(Errno::Einval));
    assert_eq!(err.to_string(), "OSError: [Errno 22] EINVAL");
    assert_eq!(harness.runtime().mounts().paths().count(), 0);
}

#[test]
#[should_panic(expected = "nothing mounted")]
fn umount_of_unknown_path_aborts() {
    let mut harness = ScenarioHarness::new();
    harness.run_ok("uos.mount('locfd', '/bpi')");
    let _ = harness.run("uos.umount('/sd')");
}

#[test]
fn attributes_and_errors_at_the_console() {
    let mut harness = ScenarioHarness::new();
    assert_eq!(harness.run_ok("uos.__name__"), Value::from("uos"));
    assert_eq!(harness.run_ok("badge.justifyRight"), Value::Int(2));

    assert!(matches!(
        harness.run("badge.nope()"),
        Err(BadgeError::Attribute { .. })
    ));
    assert!(matches!(
        harness.run("machine.reset()"),
        Err(BadgeError::Attribute { .. })
    ));
    assert!(matches!(harness.run("badge.BLACK()"), Err(BadgeError::Type(_))));
    assert!(matches!(
        harness.run("badge.line(1, 2 3)"),
        Err(BadgeError::Parse { .. })
    ));
}
