//! Row-level ownership filtering.
//!
//! Plain functions that keep only the items owned by the authenticated
//! principal: `retain_owned` filters inputs before an operation acts on them,
//! `filter_owned` filters results on the way out. Relative order is kept.

use keyward_core::PrincipalId;

use crate::authenticate::AuthenticatedPrincipal;

/// Something that belongs to exactly one principal.
pub trait Owned {
    fn owner(&self) -> &PrincipalId;
}

impl<T: Owned + ?Sized> Owned for &T {
    fn owner(&self) -> &PrincipalId {
        (**self).owner()
    }
}

/// Drop every item not owned by `principal`.
pub fn retain_owned<T: Owned>(principal: &AuthenticatedPrincipal, mut items: Vec<T>) -> Vec<T> {
    items.retain(|item| item.owner() == &principal.principal_id);
    items
}

/// Lazily yield only the items owned by `principal`.
pub fn filter_owned<'a, I>(
    principal: &'a AuthenticatedPrincipal,
    items: I,
) -> impl Iterator<Item = I::Item> + 'a
where
    I: IntoIterator,
    I::IntoIter: 'a,
    I::Item: Owned,
{
    items
        .into_iter()
        .filter(move |item| item.owner() == &principal.principal_id)
}
