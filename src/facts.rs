//! Type descriptors: the per-type metadata the fallback source reasons over.
//!
//! There is no runtime reflection to lean on, so everything the resolution
//! policy needs to know about a service type is captured in an explicit
//! [`TypeFacts`] record: what kind of type it is, whether the container
//! gives it special meaning, whether a proxy can be generated for it, and
//! how to actually build it. Service types advertise their record through
//! the [`ServiceFacts`] trait, and every typed resolution request carries
//! the record along, which is what lets dependencies discovered deep inside
//! a constructor graph be auto-mocked on sight.

use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{DiResult, MockError};
use crate::key::{key_of_trait, key_of_type, Key};
use crate::provider::ResolverContext;
use crate::registration::AnyArc;
use crate::repository::{MockBehavior, MockControl, MockInstance};

/// Constructor hook: builds an instance, resolving dependencies as it goes.
pub(crate) type CtorFn =
    Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync>;

/// Proxy hook: produces a mock instance plus its verification handle.
pub(crate) type ProxyFn =
    Arc<dyn Fn(MockBehavior) -> Result<MockInstance, MockError> + Send + Sync>;

/// Broad classification of a service type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// A trait object: pure contract, always proxyable.
    Interface,
    /// An extensible base contract with partial behavior; proxyable like an
    /// interface but never eligible for automatic direct construction.
    AbstractBase,
    /// An ordinary concrete type. Sealed concretes cannot be proxied.
    Concrete {
        /// Whether proxy subclassing is impossible for this type.
        sealed: bool,
    },
}

/// Generic wrapper types the container itself gives special meaning to.
///
/// Requests for these are never intercepted by the fallback source,
/// regardless of what they wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperKind {
    /// Sequence aggregation over all registered implementations.
    Enumerable,
    /// Deferred resolution.
    Lazy,
    /// Caller-controlled lifetime.
    Owned,
    /// Implementation plus registration metadata.
    Meta,
}

/// Everything the resolution policy knows about one service type.
///
/// Built through [`TypeFacts::interface`], [`TypeFacts::abstract_base`],
/// [`TypeFacts::concrete`], [`TypeFacts::wrapper`] or [`TypeFacts::internal`],
/// and exposed per type via [`ServiceFacts`].
///
/// # Examples
///
/// ```rust
/// use ferrous_automock::{ServiceFacts, TypeFacts, TypeKind};
///
/// trait Mailer: Send + Sync {
///     fn send(&self, to: &str);
/// }
///
/// struct SmtpMailer {
///     relay: String,
/// }
///
/// impl ServiceFacts for SmtpMailer {
///     fn facts() -> TypeFacts {
///         TypeFacts::concrete::<SmtpMailer>()
///             .constructed_with(|_| Ok(SmtpMailer { relay: "localhost".into() }))
///             .build()
///     }
/// }
///
/// let facts = SmtpMailer::facts();
/// assert_eq!(facts.kind(), TypeKind::Concrete { sealed: false });
/// assert!(facts.can_construct());
/// assert!(!facts.can_proxy());
/// ```
#[derive(Clone)]
pub struct TypeFacts {
    pub(crate) key: Key,
    pub(crate) kind: TypeKind,
    pub(crate) wrapper: Option<WrapperKind>,
    pub(crate) startable: bool,
    pub(crate) container_internal: bool,
    pub(crate) text: bool,
    pub(crate) delegate: bool,
    pub(crate) open_generic: bool,
    pub(crate) has_default_ctor: bool,
    pub(crate) proxy: Option<ProxyFn>,
    pub(crate) construct: Option<CtorFn>,
}

impl TypeFacts {
    /// Starts a descriptor for a trait-object service.
    pub fn interface<T: ?Sized + Send + Sync + 'static>() -> FactsBuilder<T> {
        FactsBuilder::new(key_of_trait::<T>(), TypeKind::Interface)
    }

    /// Starts a descriptor for an abstract base contract.
    pub fn abstract_base<T: ?Sized + Send + Sync + 'static>() -> FactsBuilder<T> {
        FactsBuilder::new(key_of_trait::<T>(), TypeKind::AbstractBase)
    }

    /// Starts a descriptor for a concrete service type.
    pub fn concrete<T: Send + Sync + 'static>() -> ConcreteFactsBuilder<T> {
        ConcreteFactsBuilder::new()
    }

    /// Descriptor for a container-special generic wrapper type.
    ///
    /// The container resolves these through its own machinery (enumerable
    /// aggregation, deferred resolution, and so on), so the fallback source
    /// leaves them alone no matter what they wrap.
    pub fn wrapper<T: Send + Sync + 'static>(kind: WrapperKind) -> TypeFacts {
        let mut facts = blank(key_of_type::<T>(), TypeKind::Concrete { sealed: true });
        facts.wrapper = Some(kind);
        facts
    }

    /// Descriptor for a container-internal plumbing type.
    ///
    /// Infrastructure types are never mocked and never auto-registered.
    pub fn internal<T: Send + Sync + 'static>() -> TypeFacts {
        let mut facts = blank(key_of_type::<T>(), TypeKind::Concrete { sealed: true });
        facts.container_internal = true;
        facts
    }

    /// The service key this descriptor belongs to.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The described type's `TypeId`.
    pub fn type_id(&self) -> TypeId {
        self.key.type_id()
    }

    /// The described type's name, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    /// Broad classification of the type.
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// The special wrapper kind, if the container owns this shape.
    pub fn wrapper_kind(&self) -> Option<WrapperKind> {
        self.wrapper
    }

    /// Whether the container lifecycle-manages this type at startup.
    pub fn is_startable(&self) -> bool {
        self.startable
    }

    /// Whether this type belongs to the container's own plumbing.
    pub fn is_container_internal(&self) -> bool {
        self.container_internal
    }

    /// Whether this is the string type.
    pub fn is_text(&self) -> bool {
        self.text
    }

    /// Whether this type is a delegate (function-valued service).
    pub fn is_delegate(&self) -> bool {
        self.delegate
    }

    /// Whether this is an open generic definition rather than a closed type.
    pub fn is_open_generic(&self) -> bool {
        self.open_generic
    }

    /// Whether the type exposes a zero-argument constructor a proxy
    /// subclass could call.
    pub fn has_default_ctor(&self) -> bool {
        self.has_default_ctor
    }

    /// Whether a proxy factory is attached.
    pub fn can_proxy(&self) -> bool {
        self.proxy.is_some()
    }

    /// Whether a real-constructor hook is attached.
    pub fn can_construct(&self) -> bool {
        self.construct.is_some()
    }

    pub(crate) fn proxy_fn(&self) -> Option<&ProxyFn> {
        self.proxy.as_ref()
    }

    pub(crate) fn construct_fn(&self) -> Option<&CtorFn> {
        self.construct.as_ref()
    }
}

impl fmt::Debug for TypeFacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeFacts")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("wrapper", &self.wrapper)
            .field("startable", &self.startable)
            .field("container_internal", &self.container_internal)
            .field("text", &self.text)
            .field("delegate", &self.delegate)
            .field("open_generic", &self.open_generic)
            .field("has_default_ctor", &self.has_default_ctor)
            .field("can_proxy", &self.proxy.is_some())
            .field("can_construct", &self.construct.is_some())
            .finish()
    }
}

fn blank(key: Key, kind: TypeKind) -> TypeFacts {
    TypeFacts {
        key,
        kind,
        wrapper: None,
        startable: false,
        container_internal: false,
        text: false,
        delegate: false,
        open_generic: false,
        has_default_ctor: false,
        proxy: None,
        construct: None,
    }
}

/// Builder for trait-object and abstract-base descriptors.
pub struct FactsBuilder<T: ?Sized> {
    facts: TypeFacts,
    _marker: PhantomData<*const T>,
}

impl<T: ?Sized + Send + Sync + 'static> FactsBuilder<T> {
    fn new(key: Key, kind: TypeKind) -> Self {
        Self {
            facts: blank(key, kind),
            _marker: PhantomData,
        }
    }

    /// Marks the contract as lifecycle-managed by the container at startup.
    pub fn startable(mut self) -> Self {
        self.facts.startable = true;
        self
    }

    /// Marks the contract as container-internal plumbing.
    pub fn container_internal(mut self) -> Self {
        self.facts.container_internal = true;
        self
    }

    /// Attaches the proxy factory used when a mock of this contract is
    /// requested. The factory receives the session's behavior mode and
    /// returns the proxy object together with its verification handle.
    pub fn mocked_with<F>(mut self, factory: F) -> Self
    where
        F: Fn(MockBehavior) -> Result<(Arc<T>, Arc<dyn MockControl>), MockError>
            + Send
            + Sync
            + 'static,
    {
        self.facts.proxy = Some(Arc::new(move |behavior| {
            let (object, control) = factory(behavior)?;
            Ok(MockInstance::new(Arc::new(object) as AnyArc, control))
        }));
        self
    }

    /// Attaches a real constructor producing a concrete implementation of
    /// the contract. Used when the contract itself is the subject under
    /// test rather than a dependency to mock.
    pub fn constructed_with<F>(mut self, ctor: F) -> Self
    where
        F: for<'a> Fn(&ResolverContext<'a>) -> DiResult<Arc<T>> + Send + Sync + 'static,
    {
        self.facts.construct = Some(Arc::new(move |ctx| {
            Ok(Arc::new(ctor(ctx)?) as AnyArc)
        }));
        self
    }

    /// Finishes the descriptor.
    pub fn build(self) -> TypeFacts {
        self.facts
    }
}

/// Builder for concrete-type descriptors.
pub struct ConcreteFactsBuilder<T> {
    facts: TypeFacts,
    _marker: PhantomData<*const T>,
}

impl<T: Send + Sync + 'static> ConcreteFactsBuilder<T> {
    fn new() -> Self {
        let mut facts = blank(key_of_type::<T>(), TypeKind::Concrete { sealed: false });
        facts.text = TypeId::of::<T>() == TypeId::of::<String>();
        Self {
            facts,
            _marker: PhantomData,
        }
    }

    /// Marks the type as sealed: no proxy subclass can be generated for it.
    pub fn sealed(mut self) -> Self {
        self.facts.kind = TypeKind::Concrete { sealed: true };
        self
    }

    /// Marks the type as a delegate (function-valued service).
    pub fn delegate(mut self) -> Self {
        self.facts.delegate = true;
        self
    }

    /// Marks the type as an open generic definition.
    pub fn open_generic(mut self) -> Self {
        self.facts.open_generic = true;
        self
    }

    /// Marks the type as lifecycle-managed by the container at startup.
    pub fn startable(mut self) -> Self {
        self.facts.startable = true;
        self
    }

    /// Marks the type as container-internal plumbing.
    pub fn container_internal(mut self) -> Self {
        self.facts.container_internal = true;
        self
    }

    /// Records that the type exposes a zero-argument constructor without
    /// attaching a proxy factory. Classification will treat the type as
    /// proxyable; mock creation then fails loudly if no factory exists.
    pub fn with_default_ctor(mut self) -> Self {
        self.facts.has_default_ctor = true;
        self
    }

    /// Attaches the proxy factory used when a mock of this type is
    /// requested. Implies a callable zero-argument base constructor.
    pub fn mockable_with<F>(mut self, factory: F) -> Self
    where
        F: Fn(MockBehavior) -> Result<(T, Arc<dyn MockControl>), MockError>
            + Send
            + Sync
            + 'static,
    {
        self.facts.has_default_ctor = true;
        self.facts.proxy = Some(Arc::new(move |behavior| {
            let (object, control) = factory(behavior)?;
            Ok(MockInstance::new(Arc::new(object) as AnyArc, control))
        }));
        self
    }

    /// Attaches the real constructor. It resolves the type's own
    /// dependencies through the container, which is what makes unregistered
    /// dependencies deeper in the graph get auto-mocked recursively.
    pub fn constructed_with<F>(mut self, ctor: F) -> Self
    where
        F: for<'a> Fn(&ResolverContext<'a>) -> DiResult<T> + Send + Sync + 'static,
    {
        self.facts.construct = Some(Arc::new(move |ctx| {
            Ok(Arc::new(ctor(ctx)?) as AnyArc)
        }));
        self
    }

    /// Finishes the descriptor.
    pub fn build(self) -> TypeFacts {
        self.facts
    }
}

/// Per-type access to the descriptor record.
///
/// Implemented for every service type participating in auto-mocking,
/// including trait objects:
///
/// ```rust
/// use ferrous_automock::{ServiceFacts, TypeFacts};
///
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// struct FixedClock(u64);
/// impl Clock for FixedClock {
///     fn now(&self) -> u64 {
///         self.0
///     }
/// }
///
/// impl ServiceFacts for dyn Clock {
///     fn facts() -> TypeFacts {
///         TypeFacts::interface::<dyn Clock>().build()
///     }
/// }
/// ```
pub trait ServiceFacts {
    /// The descriptor for this service type.
    fn facts() -> TypeFacts;
}

/// A resolution request as seen by registration sources.
///
/// A request is *typed* when it carries an unnamed key together with the
/// type's descriptor; only typed requests are candidates for fallback
/// registration synthesis.
#[derive(Debug, Clone)]
pub struct ServiceRequest {
    key: Key,
    facts: Option<Arc<TypeFacts>>,
}

impl ServiceRequest {
    /// Builds the typed request for a service type.
    pub fn typed<T: ?Sized + ServiceFacts + 'static>() -> Self {
        let facts = Arc::new(T::facts());
        Self {
            key: facts.key.clone(),
            facts: Some(facts),
        }
    }

    /// Builds a request from a bare key, with no descriptor attached.
    pub fn keyed(key: Key) -> Self {
        Self { key, facts: None }
    }

    /// Builds a request carrying an explicit descriptor record. Useful for
    /// exercising registration sources directly.
    pub fn from_facts(facts: TypeFacts) -> Self {
        let facts = Arc::new(facts);
        Self {
            key: facts.key.clone(),
            facts: Some(facts),
        }
    }

    /// The requested service key.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The descriptor when this is a typed request, `None` for named
    /// (keyed) or descriptor-less requests.
    pub fn as_typed(&self) -> Option<&Arc<TypeFacts>> {
        if self.key.is_named() {
            None
        } else {
            self.facts.as_ref()
        }
    }
}
