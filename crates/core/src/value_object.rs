//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two
/// `PrincipalId`s wrapping the same string are the same principal, and two
/// permission sets with the same members grant the same access.
///
/// To "modify" a value object, build a new one. That keeps them safe to share
/// across threads and to hand out from stores without defensive copies.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
