use ferrous_automock::classify::{
    direct_registration_compatible, is_excluded, mock_compatible,
};
use ferrous_automock::{TypeFacts, WrapperKind};

trait Notifier: Send + Sync {}
trait Repository: Send + Sync {}

struct Plain;
struct WithDefault;
struct Sealed;
struct EnumerableOf;
struct LazyOf;
struct Startup;
struct Plumbing;
struct Callback;
struct OpenDef;

#[test]
fn test_interfaces_are_mock_compatible() {
    let facts = TypeFacts::interface::<dyn Notifier>().build();

    assert!(mock_compatible(&facts));
    assert!(!is_excluded(&facts));
    assert!(!direct_registration_compatible(&facts));
}

#[test]
fn test_abstract_bases_are_mock_compatible() {
    let facts = TypeFacts::abstract_base::<dyn Repository>().build();

    assert!(mock_compatible(&facts));
    assert!(!direct_registration_compatible(&facts));
}

#[test]
fn test_concrete_without_default_ctor_is_not_mockable() {
    let facts = TypeFacts::concrete::<Plain>().build();

    assert!(!mock_compatible(&facts));
    // Still a valid direct-registration target
    assert!(direct_registration_compatible(&facts));
}

#[test]
fn test_concrete_with_default_ctor_is_mockable() {
    let facts = TypeFacts::concrete::<WithDefault>().with_default_ctor().build();

    assert!(mock_compatible(&facts));
    assert!(direct_registration_compatible(&facts));
}

#[test]
fn test_sealed_concrete_is_never_mockable() {
    let facts = TypeFacts::concrete::<Sealed>().sealed().with_default_ctor().build();

    assert!(!mock_compatible(&facts));
    assert!(direct_registration_compatible(&facts));
}

#[test]
fn test_wrappers_are_excluded() {
    struct OwnedOf;
    struct MetaOf;

    let enumerable = TypeFacts::wrapper::<EnumerableOf>(WrapperKind::Enumerable);
    let lazy = TypeFacts::wrapper::<LazyOf>(WrapperKind::Lazy);
    let owned = TypeFacts::wrapper::<OwnedOf>(WrapperKind::Owned);
    let meta = TypeFacts::wrapper::<MetaOf>(WrapperKind::Meta);

    assert!(is_excluded(&enumerable));
    assert!(is_excluded(&lazy));
    assert!(is_excluded(&owned));
    assert!(is_excluded(&meta));
}

#[test]
fn test_startables_are_excluded() {
    let concrete = TypeFacts::concrete::<Startup>().startable().build();
    let contract = TypeFacts::interface::<dyn Notifier>().startable().build();

    assert!(is_excluded(&concrete));
    assert!(is_excluded(&contract));
    // Exclusion is independent of proxyability
    assert!(mock_compatible(&contract));
}

#[test]
fn test_container_internals_are_excluded() {
    let facts = TypeFacts::internal::<Plumbing>();

    assert!(is_excluded(&facts));
}

#[test]
fn test_text_is_not_direct_registration_compatible() {
    let facts = TypeFacts::concrete::<String>().build();

    assert!(facts.is_text());
    assert!(!is_excluded(&facts));
    assert!(!mock_compatible(&facts));
    assert!(!direct_registration_compatible(&facts));
}

#[test]
fn test_delegates_are_not_direct_registration_compatible() {
    let facts = TypeFacts::concrete::<Callback>().delegate().build();

    assert!(!direct_registration_compatible(&facts));
}

#[test]
fn test_open_generics_are_not_direct_registration_compatible() {
    let facts = TypeFacts::concrete::<OpenDef>().open_generic().build();

    assert!(!direct_registration_compatible(&facts));
}
