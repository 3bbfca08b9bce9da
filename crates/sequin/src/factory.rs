//! Sequence construction: the `seq` entry point and the typed factories.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;
use std::ops::{Range, RangeInclusive};
use std::rc::Rc;

use crate::grouped::Grouping;
use crate::map::SeqMap;
use crate::ordering::OrderedSeq;
use crate::seq::Seq;
use crate::set::SeqSet;

/// Conversion into the queryable wrapper for a source.
///
/// Wrapper types convert into themselves, so wrapping is idempotent.
/// Std sets and maps convert into [`SeqSet`] and [`SeqMap`] wrappers that
/// keep the original collection as their backing.
pub trait IntoSeq {
    type Output;

    fn into_seq(self) -> Self::Output;
}

/// Wraps a source into a sequence.
///
/// ```
/// use sequin::{seq, Seq};
///
/// let numbers = seq(vec![1, 2, 3]);
/// let same = seq(numbers.clone());
/// assert!(Seq::ptr_eq(&numbers, &same));
///
/// let letters = seq("abc");
/// assert_eq!(letters.to_vec(), vec!['a', 'b', 'c']);
/// ```
pub fn seq<S: IntoSeq>(source: S) -> S::Output {
    source.into_seq()
}

macro_rules! into_self {
    ($($ty:ident<$($p:ident),+>),+ $(,)?) => {
        $(
            impl<$($p),+> IntoSeq for $ty<$($p),+> {
                type Output = Self;

                fn into_seq(self) -> Self {
                    self
                }
            }
        )+
    };
}

into_self!(
    Seq<T>,
    SeqSet<T, S>,
    SeqMap<K, V, S>,
    OrderedSeq<T>,
    Grouping<K, T>,
);

impl<T: Clone + 'static> IntoSeq for Vec<T> {
    type Output = Seq<T>;

    fn into_seq(self) -> Seq<T> {
        Seq::from_vec(self)
    }
}

impl<T: Clone + 'static, const N: usize> IntoSeq for [T; N] {
    type Output = Seq<T>;

    fn into_seq(self) -> Seq<T> {
        Seq::from(self)
    }
}

impl<T: Clone + 'static> IntoSeq for &[T] {
    type Output = Seq<T>;

    fn into_seq(self) -> Seq<T> {
        Seq::from(self)
    }
}

impl<T: Clone + 'static> IntoSeq for VecDeque<T> {
    type Output = Seq<T>;

    fn into_seq(self) -> Seq<T> {
        Seq::from_vec(self.into())
    }
}

impl<T> IntoSeq for Range<T>
where
    T: 'static,
    Range<T>: Iterator<Item = T> + Clone,
{
    type Output = Seq<T>;

    fn into_seq(self) -> Seq<T> {
        Seq::from_iterable(self)
    }
}

impl<T> IntoSeq for RangeInclusive<T>
where
    T: 'static,
    RangeInclusive<T>: Iterator<Item = T> + Clone,
{
    type Output = Seq<T>;

    fn into_seq(self) -> Seq<T> {
        Seq::from_iterable(self)
    }
}

impl IntoSeq for String {
    type Output = Seq<char>;

    fn into_seq(self) -> Seq<char> {
        Seq::from_vec(self.chars().collect())
    }
}

impl IntoSeq for &str {
    type Output = Seq<char>;

    fn into_seq(self) -> Seq<char> {
        Seq::from_vec(self.chars().collect())
    }
}

impl<T: Eq + Hash + Clone + 'static> IntoSeq for HashSet<T> {
    type Output = SeqSet<T, HashSet<T>>;

    fn into_seq(self) -> Self::Output {
        SeqSet::from_backing(self)
    }
}

impl<T: Ord + Clone + 'static> IntoSeq for BTreeSet<T> {
    type Output = SeqSet<T, BTreeSet<T>>;

    fn into_seq(self) -> Self::Output {
        SeqSet::from_backing(self)
    }
}

impl<K, V> IntoSeq for HashMap<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
{
    type Output = SeqMap<K, V, HashMap<K, V>>;

    fn into_seq(self) -> Self::Output {
        SeqMap::from_backing(self)
    }
}

impl<K, V> IntoSeq for BTreeMap<K, V>
where
    K: Ord + Clone + 'static,
    V: Clone + 'static,
{
    type Output = SeqMap<K, V, BTreeMap<K, V>>;

    fn into_seq(self) -> Self::Output {
        SeqMap::from_backing(self)
    }
}

thread_local! {
    static EMPTY: RefCell<HashMap<TypeId, Box<dyn Any>>> = RefCell::new(HashMap::new());
}

impl<T: 'static> Seq<T> {
    /// The shared empty sequence for `T`.
    ///
    /// Repeated calls on one thread return the same handle.
    pub fn empty() -> Seq<T> {
        EMPTY.with(|cache| {
            let mut cache = cache.borrow_mut();
            let slot = cache.entry(TypeId::of::<T>()).or_insert_with(|| {
                let shared: Box<dyn Any> = Box::new(Seq::<T>::from_fn(std::iter::empty));
                shared
            });
            match slot.downcast_ref::<Seq<T>>() {
                Some(shared) => shared.clone(),
                None => Seq::from_fn(std::iter::empty),
            }
        })
    }

    /// Creates a sequence from a generator. The generator runs once per pass.
    ///
    /// ```
    /// use sequin::Seq;
    ///
    /// let squares = Seq::from_generator(|| (1..).map(|n: u32| n * n));
    /// assert_eq!(squares.take(3).to_vec(), vec![1, 4, 9]);
    /// assert_eq!(squares.take(2).to_vec(), vec![1, 4]);
    /// ```
    pub fn from_generator<F, I>(generator: F) -> Seq<T>
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Seq::from_fn(generator)
    }

    /// Yields `factory()` `count` times, calling it again for each item.
    pub fn repeat_generate<F>(factory: F, count: usize) -> Seq<T>
    where
        F: Fn() -> T + 'static,
    {
        let factory = Rc::new(factory);
        Seq::from_fn(move || {
            let factory = Rc::clone(&factory);
            (0..count).map(move |_| factory())
        })
    }
}

impl<T: Clone + 'static> Seq<T> {
    /// A sequence of exactly one item.
    pub fn from_single_value(value: T) -> Seq<T> {
        Seq::from_vec(vec![value])
    }

    /// Yields `value` `count` times.
    pub fn repeat(value: T, count: usize) -> Seq<T> {
        Seq::from_fn(move || std::iter::repeat(value.clone()).take(count))
    }
}

impl Seq<i64> {
    /// Yields `count` consecutive integers starting at `start`.
    ///
    /// Stops early rather than wrapping if the range would pass `i64::MAX`.
    pub fn range(start: i64, count: usize) -> Seq<i64> {
        Seq::from_fn(move || {
            (0..count).map_while(move |offset| {
                i64::try_from(offset)
                    .ok()
                    .and_then(|offset| start.checked_add(offset))
            })
        })
    }
}

impl<T: 'static> Default for Seq<T> {
    fn default() -> Self {
        Seq::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn wrapping_is_idempotent() {
        let numbers = seq(vec![1, 2, 3]);
        assert!(Seq::ptr_eq(&numbers, &seq(numbers.clone())));

        let ordered = numbers.order_by(|n| -n);
        assert_eq!(seq(ordered).to_vec(), vec![3, 2, 1]);
    }

    #[test]
    fn wraps_std_collections() {
        assert_eq!(seq([1, 2]).to_vec(), vec![1, 2]);
        assert_eq!(seq(&[3, 4][..]).to_vec(), vec![3, 4]);
        assert_eq!(seq(VecDeque::from(vec![5])).to_vec(), vec![5]);
        assert_eq!(seq(1..4).to_vec(), vec![1, 2, 3]);
        assert_eq!(seq('a'..='c').to_vec(), vec!['a', 'b', 'c']);
        assert_eq!(seq(String::from("hi")).to_vec(), vec!['h', 'i']);

        let set = seq(BTreeSet::from([2, 1]));
        assert!(set.has(&1));
        assert_eq!(set.to_vec(), vec![1, 2]);
        let kept: &BTreeSet<i32> = set.backing();
        assert_eq!(kept.len(), 2);

        let map = seq(HashMap::from([("k", 1)]));
        assert_eq!(map.get("k"), Some(&1));
        let kept: &HashMap<&str, i32> = map.backing();
        assert!(kept.contains_key("k"));
    }

    #[test]
    fn range_counts_from_start() {
        assert_eq!(Seq::range(1, 3).to_vec(), vec![1, 2, 3]);
        assert_eq!(Seq::range(-2, 0).to_vec(), Vec::<i64>::new());
        assert_eq!(Seq::range(i64::MAX - 1, 5).to_vec(), vec![i64::MAX - 1, i64::MAX]);
    }

    #[test]
    fn repeat_and_single_value() {
        assert_eq!(Seq::repeat("x", 3).to_vec(), vec!["x", "x", "x"]);
        assert_eq!(Seq::from_single_value(9).to_vec(), vec![9]);
    }

    #[test]
    fn repeat_generate_calls_factory_per_item() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let generated = Seq::repeat_generate(
            move || {
                counter.set(counter.get() + 1);
                counter.get()
            },
            3,
        );
        assert_eq!(calls.get(), 0);
        assert_eq!(generated.to_vec(), vec![1, 2, 3]);
        assert_eq!(generated.to_vec(), vec![4, 5, 6]);
    }

    #[test]
    fn empty_is_shared_per_type() {
        let a = Seq::<i32>::empty();
        let b = Seq::<i32>::empty();
        assert!(Seq::ptr_eq(&a, &b));
        assert!(Seq::ptr_eq(&a, &Seq::default()));
        assert!(a.is_empty());
        assert!(Seq::<String>::empty().is_empty());
    }
}
