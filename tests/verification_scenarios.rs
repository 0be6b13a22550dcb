//! Integration tests for call recording and verification
//!
//! Each test works on its own `SharedRegistry`, so they can run in parallel.

use seamcheck::comparator::{any, custom, eq, ne};
use seamcheck::{
    CallArgs, CallCount, EntityId, Expectation, SeamError, SharedRegistry, VerifierConfig,
};

fn create_registry() -> SharedRegistry {
    SharedRegistry::new(VerifierConfig::default())
}

fn update_args(value: i32) -> CallArgs {
    CallArgs::new().arg("value", value)
}

#[test]
fn test_never_called_method() {
    let registry = create_registry();
    let mock = registry.mock(EntityId::from_raw(0x1000), "Repository");

    assert!(mock.verify("save", CallCount::Never));
    assert!(mock.verify("save", CallCount::AtMost(0)));
    assert!(!mock.verify_with("save", CallCount::AtLeast(1), true));

    let report = mock.report("save", CallCount::AtLeast(1));
    assert!(!report.registered);
    assert_eq!(report.calls, 0);
    assert!(report.to_string().contains("0 observed calls"));
}

#[test]
fn test_exact_call_count() {
    let registry = create_registry();
    let mock = registry.mock(EntityId::from_raw(0x1000), "Repository");

    for n in 1..=5 {
        mock.record_call("load", &CallArgs::new()).unwrap();
        assert!(mock.verify("load", CallCount::Exactly(n)));
        assert!(!mock.verify_with("load", CallCount::Exactly(n + 1), false));
    }
}

#[test]
fn test_update_expectation_scenario() {
    let registry = create_registry();
    let mock = registry.mock(EntityId::from_raw(0x2000), "Repository");
    mock.expect("update", vec![eq(1_i32)], CallCount::Exactly(2));

    for value in [1, 2, 1] {
        mock.record_call("update", &update_args(value)).unwrap();
    }

    assert!(mock.verify("update", CallCount::Exactly(3)));
    let report = mock.report("update", CallCount::Exactly(3));
    assert_eq!(report.expectations.len(), 1);
    assert_eq!(report.expectations[0].matched, 2);
    assert!(report.expectations[0].satisfied);
    assert!(report.passed);
}

#[test]
fn test_equal_matches_only_equal_argument() {
    let registry = create_registry();
    let mock = registry.mock(EntityId::from_raw(0x3000), "Repository");
    mock.expect("update", vec![eq(5_i32)], CallCount::Exactly(1));

    mock.record_call("update", &update_args(6)).unwrap();
    assert!(!mock.verify_with("update", CallCount::AtLeast(1), false));

    mock.record_call("update", &update_args(5)).unwrap();
    assert!(mock.verify("update", CallCount::Exactly(2)));
}

#[test]
fn test_multiple_expectations_are_independent() {
    let registry = create_registry();
    let mock = registry.mock(EntityId::from_raw(0x4000), "Mailer");
    mock.expect(
        "send",
        vec![ne("root".to_string()), any()],
        CallCount::AtLeast(2),
    );
    mock.expect(
        "send",
        vec![any(), custom(|size: &usize| *size > 1024)],
        CallCount::Never,
    );

    for (to, size) in [("alice", 10_usize), ("bob", 20), ("root", 30)] {
        let args = CallArgs::new().arg("to", to.to_string()).arg("size", size);
        mock.record_call("send", &args).unwrap();
    }

    let report = mock.report("send", CallCount::Exactly(3));
    assert!(report.passed, "{}", report);
    assert_eq!(report.expectations[0].matched, 2);
    assert_eq!(report.expectations[1].matched, 0);
}

#[test]
fn test_later_expectation_only_sees_later_calls() {
    let registry = create_registry();
    let mock = registry.mock(EntityId::from_raw(0x5000), "Repository");

    mock.record_call("update", &update_args(1)).unwrap();
    mock.expect("update", vec![eq(1_i32)], CallCount::Exactly(1));
    mock.record_call("update", &update_args(1)).unwrap();

    assert!(mock.verify("update", CallCount::Exactly(2)));
}

#[test]
fn test_type_mismatch_fails_fast() {
    let registry = create_registry();
    let mock = registry.mock(EntityId::from_raw(0x6000), "Repository");
    mock.expect("update", vec![eq(1_u64)], CallCount::Exactly(1));

    let err = mock.record_call("update", &update_args(1)).unwrap_err();
    match err {
        SeamError::TypeMismatch { expected, actual } => {
            assert_eq!(expected, "u64");
            assert_eq!(actual, "i32");
        }
        other => panic!("expected type mismatch, got {other}"),
    }
}

#[test]
fn test_override_replace_and_compose() {
    let registry = create_registry();
    let mock = registry.mock(EntityId::from_raw(0x7000), "Clock");

    mock.record_call("now", &CallArgs::new()).unwrap();
    mock.record_call("now", &CallArgs::new()).unwrap();

    mock.dupe("now", |args| args.set_return(1_000_i64));
    assert_eq!(mock.call_count("now"), 0);

    let mut args = mock.dispatch("now", CallArgs::new()).unwrap();
    assert_eq!(args.take_return::<i64>().unwrap(), Some(1_000));

    mock.dupe_composed("now", |args| args.set_return(2_000_i64));
    assert_eq!(mock.call_count("now"), 1);

    let mut args = mock.dispatch("now", CallArgs::new()).unwrap();
    assert_eq!(args.take_return::<i64>().unwrap(), Some(2_000));
    assert_eq!(mock.call_count("now"), 2);
}

#[test]
fn test_expectation_survives_override() {
    let registry = create_registry();
    let mock = registry.mock(EntityId::from_raw(0x8000), "Repository");

    mock.add_expectation(
        "update",
        Expectation::new(vec![eq(3_i32)], CallCount::Exactly(1)),
    );
    mock.dupe("update", |_| {});
    mock.dispatch("update", update_args(3)).unwrap();

    assert!(mock.verify("update", CallCount::Exactly(1)));
}

#[test]
fn test_instances_do_not_share_ledgers() {
    let registry = create_registry();
    let first = registry.mock(EntityId::from_raw(1), "Repository");
    let second = registry.mock(EntityId::from_raw(2), "Repository");
    let default = registry.default_mock("Repository");

    first.record_call("save", &CallArgs::new()).unwrap();

    assert!(first.verify("save", CallCount::Exactly(1)));
    assert!(second.verify("save", CallCount::Never));
    assert!(default.verify("save", CallCount::Never));
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_reset_all_isolates_tests() {
    let registry = create_registry();
    let ids: Vec<_> = (10..15).map(EntityId::from_raw).collect();
    for id in &ids {
        let mock = registry.mock(*id, "Repository");
        mock.record_call("save", &CallArgs::new()).unwrap();
        mock.expect("save", vec![any()], CallCount::Exactly(10));
    }

    registry.reset_all();
    registry.reset_all();

    for id in &ids {
        assert!(!registry.is_registered(*id));
        let mock = registry.resolve(*id, "Repository");
        assert!(mock.verify("save", CallCount::Never));
        assert!(mock.verify("anything", CallCount::Never));
    }
    assert!(registry.is_empty());
}

#[test]
fn test_history_and_report_export() {
    let registry = create_registry();
    let mock = registry.mock(EntityId::from_raw(0x9000), "Repository");

    mock.record_call("update", &update_args(7)).unwrap();
    mock.record_call("update", &update_args(8)).unwrap();

    let history = mock.history("update");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].arguments, vec!["value=7"]);
    assert!(history[0].at <= history[1].at);

    let json = mock.report("update", 2_u32).to_json().unwrap();
    assert!(json.contains("\"passed\": true"));
}

#[test]
fn test_history_limit_from_config() {
    let registry = SharedRegistry::new(VerifierConfig::default().with_history_limit(Some(2)));
    let mock = registry.mock(EntityId::from_raw(0xA000), "Repository");

    for value in 0..5 {
        mock.record_call("update", &update_args(value)).unwrap();
    }

    let sequences: Vec<_> = mock.history("update").iter().map(|r| r.sequence).collect();
    assert_eq!(sequences, vec![4, 5]);
    assert_eq!(mock.call_count("update"), 5);
}
