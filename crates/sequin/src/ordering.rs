//! Ordered sequences.
//!
//! Ordering never uses a multi-key comparator. `order_by` stable-sorts the
//! source by key, cuts the result into runs of equal keys, and exposes their
//! flattening. `then_by` repeats that inside each existing run, so a
//! secondary key only ever breaks ties of the keys before it. Members of a
//! run keep source order.
//!
//! Keys only need [`PartialOrd`], so `f64` works directly. A key that does
//! not compare equal to itself (a `NaN`) sorts after every other key in
//! both directions.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::seq::{deferred, Deferred, Iter, Seq};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Smallest key first.
    #[default]
    Asc,
    /// Largest key first.
    Desc,
}

impl Dir {
    /// `true` for [`Dir::Asc`].
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// `true` for [`Dir::Desc`].
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Reverses `ordering` for `Desc`, passes it through for `Asc`.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// The lowercase name, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compares two keys in the given direction.
///
/// Keys that cannot be compared (a `NaN`, say) tie.
pub fn compare_keys<K>(a: &K, b: &K, dir: Dir) -> Ordering
where
    K: PartialOrd + ?Sized,
{
    dir.apply(a.partial_cmp(b).unwrap_or(Ordering::Equal))
}

/// Stable merge sort. Never panics on a comparator that is not a total
/// order, unlike `slice::sort_by`.
fn merge_sort_by<T, F>(mut items: Vec<T>, cmp: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort_by(items, cmp);
    let right = merge_sort_by(right, cmp);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(r, l) == Ordering::Less,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }
    merged
}

/// Splits `src` into equal-key groups sorted by key.
///
/// Items whose key is unordered even against itself (`f64::NAN`) are kept
/// out of the sort and form one trailing group, in source order.
fn sort_groups<T, K, F>(src: &Seq<T>, key: &F, dir: Dir) -> Vec<Seq<T>>
where
    T: Clone + 'static,
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    let mut keyed = Vec::new();
    let mut unordered = Vec::new();
    for item in src.iter() {
        let k = key(&item);
        if k.partial_cmp(&k).is_some() {
            keyed.push((k, item));
        } else {
            unordered.push(item);
        }
    }
    let sorted = merge_sort_by(keyed, &|(a, _): &(K, T), (b, _): &(K, T)| {
        compare_keys(a, b, dir)
    });

    let mut groups: Vec<(K, Vec<T>)> = Vec::new();
    for (k, item) in sorted {
        match groups.last_mut() {
            Some((first, members)) if compare_keys(&*first, &k, dir) == Ordering::Equal => {
                members.push(item)
            }
            _ => groups.push((k, vec![item])),
        }
    }
    #[cfg(feature = "tracing")]
    tracing::trace!(
        groups = groups.len(),
        unordered = unordered.len(),
        %dir,
        "sorted order groups"
    );
    let mut groups: Vec<Seq<T>> = groups
        .into_iter()
        .map(|(_, members)| Seq::from_vec(members))
        .collect();
    if !unordered.is_empty() {
        groups.push(Seq::from_vec(unordered));
    }
    groups
}

/// A sequence that remembers the groups it was sorted into, so further
/// keys can refine the order.
///
/// ```
/// use sequin::seq;
///
/// let people = seq(vec![("b", 2), ("a", 2), ("c", 1)]);
/// let names = people
///     .order_by(|p| p.1)
///     .then_by(|p| p.0)
///     .select(|p| p.0)
///     .to_vec();
/// assert_eq!(names, vec!["c", "a", "b"]);
/// ```
pub struct OrderedSeq<T> {
    grouping: Deferred<Vec<Seq<T>>>,
    seq: Seq<T>,
}

impl<T: Clone + 'static> OrderedSeq<T> {
    fn from_grouping(grouping: Deferred<Vec<Seq<T>>>) -> Self {
        let groups = Rc::clone(&grouping);
        let seq = Seq::from_fn(move || {
            groups
                .to_vec()
                .into_iter()
                .flat_map(|group| group.iter())
        });
        OrderedSeq { grouping, seq }
    }

    /// Breaks ties of the current order with a further key.
    pub fn then_by_dir<K, F>(&self, key: F, dir: Dir) -> OrderedSeq<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> K + 'static,
    {
        let parent = Rc::clone(&self.grouping);
        let grouping: Deferred<Vec<Seq<T>>> = deferred(move || {
            parent
                .iter()
                .flat_map(|group| sort_groups(group, &key, dir))
                .collect()
        });
        OrderedSeq::from_grouping(grouping)
    }

    /// Breaks ties with a further ascending key.
    pub fn then_by<K, F>(&self, key: F) -> OrderedSeq<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> K + 'static,
    {
        self.then_by_dir(key, Dir::Asc)
    }

    /// Breaks ties with a further descending key.
    pub fn then_by_descending<K, F>(&self, key: F) -> OrderedSeq<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> K + 'static,
    {
        self.then_by_dir(key, Dir::Desc)
    }

    /// The tie groups in sort order. Forces the sort.
    pub fn order_groups(&self) -> &[Seq<T>] {
        &self.grouping
    }

    /// The flattened order as a plain sequence.
    pub fn as_seq(&self) -> &Seq<T> {
        &self.seq
    }
}

impl<T: Clone + 'static> Seq<T> {
    /// Orders by key in the given direction. The sort runs on first pull.
    pub fn order_by_dir<K, F>(&self, key: F, dir: Dir) -> OrderedSeq<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> K + 'static,
    {
        let src = self.clone();
        let grouping: Deferred<Vec<Seq<T>>> = deferred(move || sort_groups(&src, &key, dir));
        OrderedSeq::from_grouping(grouping)
    }

    /// Orders by an ascending key.
    pub fn order_by<K, F>(&self, key: F) -> OrderedSeq<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> K + 'static,
    {
        self.order_by_dir(key, Dir::Asc)
    }

    /// Orders by a descending key.
    pub fn order_by_descending<K, F>(&self, key: F) -> OrderedSeq<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> K + 'static,
    {
        self.order_by_dir(key, Dir::Desc)
    }
}

impl<T> Clone for OrderedSeq<T> {
    fn clone(&self) -> Self {
        OrderedSeq {
            grouping: Rc::clone(&self.grouping),
            seq: self.seq.clone(),
        }
    }
}

impl<T> fmt::Debug for OrderedSeq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedSeq").finish_non_exhaustive()
    }
}

impl<T> Deref for OrderedSeq<T> {
    type Target = Seq<T>;

    fn deref(&self) -> &Seq<T> {
        &self.seq
    }
}

impl<T> From<OrderedSeq<T>> for Seq<T> {
    fn from(ordered: OrderedSeq<T>) -> Self {
        ordered.seq
    }
}

impl<T: 'static> IntoIterator for OrderedSeq<T> {
    type Item = T;
    type IntoIter = Iter<T>;

    fn into_iter(self) -> Iter<T> {
        self.seq.iter()
    }
}
