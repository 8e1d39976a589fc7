use ferrous_automock::{
    AutoMock, DiError, MockBehavior, MockControl, MockError, MockResult, Resolver,
    ServiceFacts, TypeFacts,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// ===== Fixture types =====

trait Gateway: Send + Sync {
    fn ping(&self) -> bool;
}

struct GatewayMock {
    pinged: AtomicBool,
}

impl Gateway for GatewayMock {
    fn ping(&self) -> bool {
        self.pinged.store(true, Ordering::SeqCst);
        true
    }
}

// Hand-rolled verification handle: in strict mode the ping expectation is
// marked, so plain verification checks it; in loose mode only verify-all
// does.
struct GatewayControl {
    mock: Arc<GatewayMock>,
    strict: bool,
}

impl GatewayControl {
    fn unmet(&self) -> MockError {
        MockError::UnmetExpectations {
            type_name: self.type_name(),
            details: vec!["ping was never called".to_string()],
        }
    }
}

impl MockControl for GatewayControl {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<dyn Gateway>()
    }

    fn verify_marked(&self) -> MockResult<()> {
        if self.strict && !self.mock.pinged.load(Ordering::SeqCst) {
            Err(self.unmet())
        } else {
            Ok(())
        }
    }

    fn verify_all(&self) -> MockResult<()> {
        if self.mock.pinged.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(self.unmet())
        }
    }
}

impl ServiceFacts for dyn Gateway {
    fn facts() -> TypeFacts {
        TypeFacts::interface::<dyn Gateway>()
            .mocked_with(|behavior| {
                let mock = Arc::new(GatewayMock {
                    pinged: AtomicBool::new(false),
                });
                let control = GatewayControl {
                    mock: mock.clone(),
                    strict: behavior == MockBehavior::Strict,
                };
                Ok((
                    mock as Arc<dyn Gateway>,
                    Arc::new(control) as Arc<dyn MockControl>,
                ))
            })
            .build()
    }
}

struct Monitor {
    gateway: Arc<dyn Gateway>,
}

impl Monitor {
    fn check(&self) -> bool {
        self.gateway.ping()
    }
}

impl ServiceFacts for Monitor {
    fn facts() -> TypeFacts {
        TypeFacts::concrete::<Monitor>()
            .constructed_with(|ctx| {
                Ok(Monitor {
                    gateway: ctx.get_trait::<dyn Gateway>()?,
                })
            })
            .build()
    }
}

// ===== Tests =====

#[test]
fn test_strict_session_passes_when_expectation_met() {
    let auto = AutoMock::strict();

    let monitor = auto.create::<Monitor>().unwrap();
    assert!(monitor.check());

    auto.verify().unwrap();
}

#[test]
fn test_strict_session_fails_when_expectation_unmet() {
    let auto = AutoMock::strict();

    let _monitor = auto.create::<Monitor>().unwrap();
    // ping never called

    match auto.verify() {
        Err(MockError::Verification(failures)) => {
            assert_eq!(failures.len(), 1);
            match &failures[0] {
                MockError::UnmetExpectations { type_name, details } => {
                    assert!(type_name.contains("Gateway"));
                    assert_eq!(details.len(), 1);
                }
                other => panic!("expected UnmetExpectations, got {:?}", other),
            }
        }
        other => panic!("expected Verification failure, got {:?}", other),
    }
}

#[test]
fn test_loose_session_passes_without_calls() {
    let auto = AutoMock::loose();

    let _monitor = auto.create::<Monitor>().unwrap();

    auto.verify().unwrap();
}

#[test]
fn test_verify_all_checks_unmarked_expectations_too() {
    let mut auto = AutoMock::loose();
    auto.set_verify_all(true);

    let _monitor = auto.create::<Monitor>().unwrap();

    assert!(matches!(auto.verify(), Err(MockError::Verification(_))));
}

#[test]
#[should_panic(expected = "mock verification failed")]
fn test_unverified_strict_session_panics_on_drop() {
    let auto = AutoMock::strict();
    let _monitor = auto.create::<Monitor>().unwrap();
    // Dropped without verify(): teardown verification panics
}

#[test]
fn test_behavior_mode_reaches_the_proxy_factory() {
    let strict = AutoMock::strict();
    let loose = AutoMock::loose();

    assert_eq!(strict.repository().behavior(), MockBehavior::Strict);
    assert_eq!(loose.repository().behavior(), MockBehavior::Loose);

    // Loose control never fails plain verification
    let _gateway = loose.provider().get_trait::<dyn Gateway>().unwrap();
    loose.verify().unwrap();
    strict.verify().unwrap();
}

#[test]
fn test_creation_failure_surfaces_the_original_error() {
    trait Uplink: Send + Sync {}

    impl ServiceFacts for dyn Uplink {
        fn facts() -> TypeFacts {
            TypeFacts::interface::<dyn Uplink>()
                .mocked_with(|_| {
                    Err(MockError::creation(
                        std::any::type_name::<dyn Uplink>(),
                        std::io::Error::new(std::io::ErrorKind::Other, "disk offline"),
                    ))
                })
                .build()
        }
    }

    struct Relay {
        _uplink: Arc<dyn Uplink>,
    }

    impl std::fmt::Debug for Relay {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Relay").finish_non_exhaustive()
        }
    }

    impl ServiceFacts for Relay {
        fn facts() -> TypeFacts {
            TypeFacts::concrete::<Relay>()
                .constructed_with(|ctx| {
                    Ok(Relay {
                        _uplink: ctx.get_trait::<dyn Uplink>()?,
                    })
                })
                .build()
        }
    }

    let auto = AutoMock::loose();
    let err = auto.create::<Relay>().unwrap_err();

    // The failure reads as the root cause, not a resolution wrapper
    assert_eq!(err.to_string(), "disk offline");

    let mock_err = match &err {
        DiError::Mock(inner) => inner,
        other => panic!("expected DiError::Mock, got {:?}", other),
    };
    match mock_err {
        MockError::Creation { source, .. } => {
            let io = source.downcast_ref::<std::io::Error>();
            assert!(io.is_some()); // Original error still reachable
        }
        other => panic!("expected Creation, got {:?}", other),
    }

    auto.verify().unwrap();
}

#[test]
fn test_forced_mock_of_unproxyable_type_fails_loudly() {
    struct Opaque;

    impl ServiceFacts for Opaque {
        fn facts() -> TypeFacts {
            TypeFacts::concrete::<Opaque>().sealed().build()
        }
    }

    let auto = AutoMock::loose();

    match auto.mock::<Opaque>() {
        Err(DiError::Mock(MockError::Unsupported(name))) => {
            assert!(name.contains("Opaque"));
        }
        other => panic!("expected Unsupported, got {:?}", other.map(|_| ())),
    }

    auto.verify().unwrap();
}
