//! Keyed groups produced by [`Seq::group_by`].

use std::fmt;
use std::ops::Deref;

use crate::seq::{Iter, Seq};

/// The members of one group plus the key they share.
///
/// Dereferences to the member sequence, so every operator is available.
///
/// ```
/// use sequin::seq;
///
/// let groups = seq(vec![1, 2, 3]).group_by(|n| n / 2).to_vec();
/// assert_eq!(groups.len(), 2);
/// assert_eq!(*groups[1].key(), 1);
/// assert_eq!(groups[1].to_vec(), vec![2, 3]);
/// ```
pub struct Grouping<K, T> {
    key: K,
    members: Seq<T>,
}

impl<K, T> Grouping<K, T> {
    pub(crate) fn new(key: K, members: Seq<T>) -> Self {
        Grouping { key, members }
    }

    /// The key every member shares.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Splits into the key and the member sequence.
    pub fn into_parts(self) -> (K, Seq<T>) {
        (self.key, self.members)
    }
}

impl<K: Clone, T> Clone for Grouping<K, T> {
    fn clone(&self) -> Self {
        Grouping {
            key: self.key.clone(),
            members: self.members.clone(),
        }
    }
}

impl<K: fmt::Debug, T> fmt::Debug for Grouping<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grouping")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl<K, T> Deref for Grouping<K, T> {
    type Target = Seq<T>;

    fn deref(&self) -> &Seq<T> {
        &self.members
    }
}

impl<K, T> From<Grouping<K, T>> for Seq<T> {
    fn from(group: Grouping<K, T>) -> Self {
        group.members
    }
}

impl<K, T: 'static> IntoIterator for Grouping<K, T> {
    type Item = T;
    type IntoIter = Iter<T>;

    fn into_iter(self) -> Iter<T> {
        self.members.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_fixed_and_members_iterate() {
        let group = Grouping::new("odd", Seq::from_vec(vec![1, 3]));
        assert_eq!(*group.key(), "odd");
        assert_eq!(group.sum(), 4);

        let (key, members) = group.clone().into_parts();
        assert_eq!(key, "odd");
        assert_eq!(members.to_vec(), vec![1, 3]);
        assert_eq!(group.into_iter().collect::<Vec<_>>(), vec![1, 3]);
    }
}
