//! Service key types for registration storage and lookup.

use std::any::TypeId;

/// Key identifying a service in the container.
///
/// A key is either *typed* (identified purely by a runtime type, concrete
/// or trait object) or *named* (additionally qualified by
/// a string name). The auto-mock fallback source only ever synthesizes
/// registrations for typed, unnamed keys; named services pass through
/// untouched.
///
/// # Examples
///
/// ```rust
/// use ferrous_automock::{key_of_type, key_of_trait, Key};
///
/// trait Logger: Send + Sync {}
///
/// let type_key = key_of_type::<String>();
/// assert!(type_key.display_name().contains("String"));
/// assert_eq!(type_key.service_name(), None);
///
/// let trait_key = key_of_trait::<dyn Logger>();
/// assert!(trait_key.display_name().contains("Logger"));
/// assert!(!trait_key.is_named());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Concrete type key with TypeId and type name for diagnostics.
    Type(TypeId, &'static str),
    /// Trait-object key with TypeId and trait name.
    Trait(TypeId, &'static str),
    /// Named concrete type key: TypeId, type name, service name.
    TypeNamed(TypeId, &'static str, &'static str),
    /// Named trait-object key: TypeId, trait name, service name.
    TraitNamed(TypeId, &'static str, &'static str),
}

impl Key {
    /// The type or trait name for display in diagnostics and errors.
    pub fn display_name(&self) -> &'static str {
        match self {
            Key::Type(_, name) => name,
            Key::Trait(_, name) => name,
            Key::TypeNamed(_, name, _) => name,
            Key::TraitNamed(_, name, _) => name,
        }
    }

    /// The service name for named services, or `None` for unnamed services.
    pub fn service_name(&self) -> Option<&'static str> {
        match self {
            Key::Type(_, _) | Key::Trait(_, _) => None,
            Key::TypeNamed(_, _, name) => Some(name),
            Key::TraitNamed(_, _, name) => Some(name),
        }
    }

    /// The `TypeId` behind this key.
    pub fn type_id(&self) -> TypeId {
        match self {
            Key::Type(id, _)
            | Key::Trait(id, _)
            | Key::TypeNamed(id, _, _)
            | Key::TraitNamed(id, _, _) => *id,
        }
    }

    /// Whether this key carries a service name.
    pub fn is_named(&self) -> bool {
        self.service_name().is_some()
    }
}

/// Builds the unnamed key for a concrete service type.
#[inline]
pub fn key_of_type<T: 'static>() -> Key {
    Key::Type(TypeId::of::<T>(), std::any::type_name::<T>())
}

/// Builds the unnamed key for a trait-object service type.
#[inline]
pub fn key_of_trait<T: ?Sized + 'static>() -> Key {
    Key::Trait(TypeId::of::<T>(), std::any::type_name::<T>())
}

/// Builds the named key for a concrete service type.
#[inline]
pub fn key_of_named_type<T: 'static>(name: &'static str) -> Key {
    Key::TypeNamed(TypeId::of::<T>(), std::any::type_name::<T>(), name)
}
