//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Records fetched from the backend (menu items) are entities: two records
/// with the same id describe the same thing, even if a later fetch changed
/// their fields. The menu tree builder keys its placed-set on [`Entity::id`].
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
