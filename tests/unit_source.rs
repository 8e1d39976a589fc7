use ferrous_automock::{
    key_of_named_type, passing_control, AutoMockSource, EmptyLookup, Key, Lifetime,
    MockBehavior, MockRepository, Ownership, ProviderKind, RegistrationLookup,
    RegistrationSource, ServiceRequest, TypeFacts, TypeSet, WrapperKind,
};
use std::any::TypeId;
use std::sync::Arc;

trait Notifier: Send + Sync {}
trait Repository: Send + Sync {}

struct NullNotifier;
impl Notifier for NullNotifier {}

struct Sealed;
struct Plain;
struct WithDefault;
struct EnumerableOf;
struct Startup;
struct Callback;

/// A lookup reporting everything registered.
struct FullLookup;
impl RegistrationLookup for FullLookup {
    fn has_registration(&self, _key: &Key) -> bool {
        true
    }
}

fn source() -> AutoMockSource {
    AutoMockSource::new(
        Arc::new(MockRepository::new(MockBehavior::Loose)),
        TypeSet::new(),
        TypeSet::new(),
    )
}

fn interface_facts() -> TypeFacts {
    TypeFacts::interface::<dyn Notifier>()
        .mocked_with(|_| {
            Ok((
                Arc::new(NullNotifier) as Arc<dyn Notifier>,
                passing_control::<dyn Notifier>(),
            ))
        })
        .build()
}

#[test]
fn test_descriptor_less_requests_pass_through() {
    let request = ServiceRequest::keyed(key_of_named_type::<Plain>("primary"));

    assert!(source().registrations_for(&request, &EmptyLookup).is_none());
}

#[test]
fn test_registered_services_pass_through() {
    let request = ServiceRequest::from_facts(interface_facts());

    // Manual registrations always win, even for perfectly mockable types
    assert!(source().registrations_for(&request, &FullLookup).is_none());
}

#[test]
fn test_interface_gets_scoped_externally_owned_mock() {
    let request = ServiceRequest::from_facts(interface_facts());
    let registration = source()
        .registrations_for(&request, &EmptyLookup)
        .expect("interface should be mocked");

    assert_eq!(registration.provider_kind(), ProviderKind::Mock);
    assert_eq!(registration.lifetime(), Lifetime::Scoped);
    assert_eq!(registration.ownership(), Ownership::ExternallyOwned);
    assert_eq!(registration.key(), request.key());
}

#[test]
fn test_abstract_base_gets_mock() {
    let request =
        ServiceRequest::from_facts(TypeFacts::abstract_base::<dyn Repository>().build());
    let registration = source()
        .registrations_for(&request, &EmptyLookup)
        .expect("abstract base should be mocked");

    assert_eq!(registration.provider_kind(), ProviderKind::Mock);
}

#[test]
fn test_concrete_with_default_ctor_gets_mock() {
    let request = ServiceRequest::from_facts(
        TypeFacts::concrete::<WithDefault>().with_default_ctor().build(),
    );
    let registration = source()
        .registrations_for(&request, &EmptyLookup)
        .expect("proxyable concrete should be mocked");

    assert_eq!(registration.provider_kind(), ProviderKind::Mock);
}

#[test]
fn test_sealed_concrete_gets_direct_construction() {
    let request = ServiceRequest::from_facts(TypeFacts::concrete::<Sealed>().sealed().build());
    let registration = source()
        .registrations_for(&request, &EmptyLookup)
        .expect("sealed concrete should be directly registered");

    assert_eq!(registration.provider_kind(), ProviderKind::Construct);
    assert_eq!(registration.lifetime(), Lifetime::Scoped);
    assert_eq!(registration.ownership(), Ownership::ExternallyOwned);
}

#[test]
fn test_plain_concrete_gets_direct_construction() {
    let request = ServiceRequest::from_facts(TypeFacts::concrete::<Plain>().build());
    let registration = source()
        .registrations_for(&request, &EmptyLookup)
        .expect("unmockable concrete should be directly registered");

    assert_eq!(registration.provider_kind(), ProviderKind::Construct);
}

#[test]
fn test_created_types_get_container_owned_construction() {
    let created = TypeSet::new();
    created.insert(TypeId::of::<dyn Notifier>());
    let source = AutoMockSource::new(
        Arc::new(MockRepository::new(MockBehavior::Loose)),
        created,
        TypeSet::new(),
    );

    let request = ServiceRequest::from_facts(interface_facts());
    let registration = source
        .registrations_for(&request, &EmptyLookup)
        .expect("created types should be constructed");

    // Creation wins over mocking for the subject under test
    assert_eq!(registration.provider_kind(), ProviderKind::Construct);
    assert_eq!(registration.ownership(), Ownership::ContainerOwned);
    assert_eq!(registration.lifetime(), Lifetime::Scoped);
}

#[test]
fn test_forced_mock_wins_over_direct_construction() {
    let mocked = TypeSet::new();
    mocked.insert(TypeId::of::<Sealed>());
    let source = AutoMockSource::new(
        Arc::new(MockRepository::new(MockBehavior::Loose)),
        TypeSet::new(),
        mocked,
    );

    // Sealed types would normally be directly constructed, but an explicit
    // mock request always tries the repository so failures surface.
    let request = ServiceRequest::from_facts(TypeFacts::concrete::<Sealed>().sealed().build());
    let registration = source
        .registrations_for(&request, &EmptyLookup)
        .expect("forced mock should produce a registration");

    assert_eq!(registration.provider_kind(), ProviderKind::Mock);
}

#[test]
fn test_wrappers_pass_through() {
    let request = ServiceRequest::from_facts(TypeFacts::wrapper::<EnumerableOf>(
        WrapperKind::Enumerable,
    ));

    assert!(source().registrations_for(&request, &EmptyLookup).is_none());
}

#[test]
fn test_startables_pass_through() {
    let request =
        ServiceRequest::from_facts(TypeFacts::interface::<dyn Notifier>().startable().build());

    assert!(source().registrations_for(&request, &EmptyLookup).is_none());
}

#[test]
fn test_container_internals_pass_through() {
    let request = ServiceRequest::from_facts(TypeFacts::internal::<Plain>());

    assert!(source().registrations_for(&request, &EmptyLookup).is_none());
}

#[test]
fn test_text_passes_through() {
    let request = ServiceRequest::from_facts(TypeFacts::concrete::<String>().build());

    assert!(source().registrations_for(&request, &EmptyLookup).is_none());
}

#[test]
fn test_delegates_pass_through() {
    let request = ServiceRequest::from_facts(TypeFacts::concrete::<Callback>().delegate().build());

    assert!(source().registrations_for(&request, &EmptyLookup).is_none());
}

#[test]
fn test_startup_types_in_created_set_are_still_constructed() {
    // The created set is consulted before exclusions: creating a startable
    // type through the session means the caller wants the real thing.
    let created = TypeSet::new();
    created.insert(TypeId::of::<Startup>());
    let source = AutoMockSource::new(
        Arc::new(MockRepository::new(MockBehavior::Loose)),
        created,
        TypeSet::new(),
    );

    let request =
        ServiceRequest::from_facts(TypeFacts::concrete::<Startup>().startable().build());
    let registration = source
        .registrations_for(&request, &EmptyLookup)
        .expect("created startable should be constructed");

    assert_eq!(registration.provider_kind(), ProviderKind::Construct);
}

#[test]
fn test_source_is_not_an_adapter() {
    assert!(!source().is_adapter_for_individual_components());
}

#[test]
fn test_decision_is_stable_across_repeated_queries() {
    let source = source();
    let request = ServiceRequest::from_facts(interface_facts());

    for _ in 0..3 {
        let registration = source.registrations_for(&request, &EmptyLookup).unwrap();
        assert_eq!(registration.provider_kind(), ProviderKind::Mock);
        assert_eq!(registration.lifetime(), Lifetime::Scoped);
    }
}
