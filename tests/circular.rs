use ferrous_automock::{AutoMock, DiError, Resolver, ServiceFacts, TypeFacts};
use std::sync::Arc;

// Two concretes that need each other. Neither is proxyable, so the
// fallback constructs both for real and the cycle must be detected.
#[derive(Debug)]
struct Chicken {
    _egg: Arc<Egg>,
}

impl ServiceFacts for Chicken {
    fn facts() -> TypeFacts {
        TypeFacts::concrete::<Chicken>()
            .constructed_with(|ctx| {
                Ok(Chicken {
                    _egg: ctx.get::<Egg>()?,
                })
            })
            .build()
    }
}

#[derive(Debug)]
struct Egg {
    _chicken: Arc<Chicken>,
}

impl ServiceFacts for Egg {
    fn facts() -> TypeFacts {
        TypeFacts::concrete::<Egg>()
            .constructed_with(|ctx| {
                Ok(Egg {
                    _chicken: ctx.get::<Chicken>()?,
                })
            })
            .build()
    }
}

struct Ouroboros {
    _tail: Arc<Ouroboros>,
}

impl ServiceFacts for Ouroboros {
    fn facts() -> TypeFacts {
        TypeFacts::concrete::<Ouroboros>()
            .constructed_with(|ctx| {
                Ok(Ouroboros {
                    _tail: ctx.get::<Ouroboros>()?,
                })
            })
            .build()
    }
}

#[test]
fn test_mutual_dependency_is_detected() {
    let auto = AutoMock::loose();

    match auto.create::<Chicken>() {
        Err(DiError::Circular(path)) => {
            assert_eq!(path.len(), 3);
            assert_eq!(path.first(), path.last()); // Cycle closes on itself
            assert!(path[0].contains("Chicken"));
            assert!(path[1].contains("Egg"));
        }
        other => panic!("expected Circular, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_self_dependency_is_detected() {
    let auto = AutoMock::loose();

    match auto.create::<Ouroboros>() {
        Err(DiError::Circular(path)) => {
            assert_eq!(path.len(), 2);
            assert_eq!(path.first(), path.last());
        }
        other => panic!("expected Circular, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_circular_error_reports_the_path_in_order() {
    let auto = AutoMock::loose();

    let err = auto.create::<Chicken>().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Circular dependency"));
    assert!(message.contains(" -> "));
}
