//! Cyclic-sequence operations for window/session navigation.
//!
//! A ring is an ordered sequence treated as cyclic for indexing purposes:
//! index arithmetic is taken modulo the length. Sessions and windows are
//! navigated and reordered through these operations without mutating any
//! shared state. Key invariants:
//!
//! - **Non-mutating**: every operation borrows its input and returns a
//!   fresh vector; the caller owns replacing its stored sequence
//! - **First match wins**: operations that search by element equality act
//!   on the first match only; duplicates are permitted
//! - **Relative position**: no element owns a position; position is always
//!   recomputed from the current sequence
//!
//! Operations keyed off an element return `None` when it is absent —
//! callers must check. Cyclic indexing into an empty ring is an error,
//! and out-of-range insertion indices are contract violations that panic.
//!
//! Search uses `PartialEq` in the primary functions; the `_by` variants
//! take an externally supplied equality for entities compared by
//! identifier rather than by value.

use thiserror::Error;

/// Errors that can occur during cyclic lookups.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RingError {
    /// Cyclic indexing into an empty sequence.
    #[error("cyclic lookup on an empty sequence")]
    EmptySequence,
}

/// Rotates `seq` left by `offset` positions (right for negative offsets).
///
/// The split point is `offset` modulo the length, so any magnitude of
/// offset wraps. An empty sequence rotates to itself.
pub fn rotate<T: Clone>(seq: &[T], offset: isize) -> Vec<T> {
    if seq.is_empty() {
        return Vec::new();
    }
    let split = offset.rem_euclid(seq.len() as isize) as usize;
    let mut out = Vec::with_capacity(seq.len());
    out.extend_from_slice(&seq[split..]);
    out.extend_from_slice(&seq[..split]);
    out
}

/// Rotates `seq` so its first element lands at the center.
///
/// For even lengths the first element ends up just before center.
pub fn center_rotate<T: Clone>(seq: &[T]) -> Vec<T> {
    if seq.is_empty() {
        return Vec::new();
    }
    rotate(seq, -(((seq.len() - 1) / 2) as isize))
}

/// Returns `seq` with `elt` inserted before position `index`.
///
/// # Panics
///
/// Panics if `index > seq.len()`.
pub fn insert_before<T: Clone>(elt: T, seq: &[T], index: usize) -> Vec<T> {
    assert!(
        index <= seq.len(),
        "insertion index {index} out of range for ring of length {}",
        seq.len()
    );
    let mut out = Vec::with_capacity(seq.len() + 1);
    out.extend_from_slice(&seq[..index]);
    out.push(elt);
    out.extend_from_slice(&seq[index..]);
    out
}

/// Returns `seq` with `elt` inserted after position `index`.
///
/// # Panics
///
/// Panics if `index >= seq.len()`.
pub fn insert_after<T: Clone>(elt: T, seq: &[T], index: usize) -> Vec<T> {
    assert!(
        index < seq.len(),
        "insertion index {index} out of range for ring of length {}",
        seq.len()
    );
    insert_before(elt, seq, index + 1)
}

/// Removes the first element equal to `elt` (per `eq`), then reinserts
/// `elt` before `index` in the shortened sequence.
///
/// An absent element degrades to plain insertion into the full sequence.
/// This is the primitive underlying cyclic offset and swap.
///
/// # Panics
///
/// Panics if `index` exceeds the length of the sequence after removal.
pub fn move_element_by<T, F>(elt: T, seq: &[T], index: usize, eq: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    let remaining: Vec<T> = match seq.iter().position(|x| eq(x, &elt)) {
        Some(p) => {
            let mut v = Vec::with_capacity(seq.len() - 1);
            v.extend_from_slice(&seq[..p]);
            v.extend_from_slice(&seq[p + 1..]);
            v
        }
        None => seq.to_vec(),
    };
    insert_before(elt, &remaining, index)
}

/// [`move_element_by`] with `PartialEq` equality.
pub fn move_element<T: Clone + PartialEq>(elt: T, seq: &[T], index: usize) -> Vec<T> {
    move_element_by(elt, seq, index, |a, b| a == b)
}

/// Returns the element at `n` taken modulo the ring length.
pub fn cyclic_nth<T>(seq: &[T], n: isize) -> Result<&T, RingError> {
    if seq.is_empty() {
        return Err(RingError::EmptySequence);
    }
    let idx = n.rem_euclid(seq.len() as isize) as usize;
    Ok(&seq[idx])
}

/// Moves `elt` by `n` positions around the ring.
///
/// The target slot is `(p + n) mod len` where `p` is the first position
/// of `elt`. Returns `None` when `elt` is absent.
pub fn cyclic_offset_element_by<T, F>(elt: T, seq: &[T], n: isize, eq: F) -> Option<Vec<T>>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    let p = seq.iter().position(|x| eq(x, &elt))?;
    let target = (p as isize + n).rem_euclid(seq.len() as isize) as usize;
    Some(move_element_by(elt, seq, target, eq))
}

/// [`cyclic_offset_element_by`] with `PartialEq` equality.
pub fn cyclic_offset_element<T: Clone + PartialEq>(elt: T, seq: &[T], n: isize) -> Option<Vec<T>> {
    cyclic_offset_element_by(elt, seq, n, |a, b| a == b)
}

/// Returns the element `n` positions around the ring from `elt`.
///
/// The offset is added to the unwrapped position of `elt` before the
/// modulus is applied, so any magnitude of `n` resolves. Returns `None`
/// when `elt` is absent.
pub fn cyclic_nth_from_element_by<'a, T, F>(elt: &T, seq: &'a [T], n: isize, eq: F) -> Option<&'a T>
where
    F: Fn(&T, &T) -> bool,
{
    let p = seq.iter().position(|x| eq(x, elt))?;
    cyclic_nth(seq, p as isize + n).ok()
}

/// [`cyclic_nth_from_element_by`] with `PartialEq` equality.
pub fn cyclic_nth_from_element<'a, T: PartialEq>(elt: &T, seq: &'a [T], n: isize) -> Option<&'a T> {
    cyclic_nth_from_element_by(elt, seq, n, |a, b| a == b)
}

/// Exchanges the positions of `elt1` and `elt2`.
///
/// Positions are the elements' original positions in `seq`. Returns
/// `None` when either element is absent.
pub fn swap_by<T, F>(elt1: T, elt2: T, seq: &[T], eq: F) -> Option<Vec<T>>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    let p1 = seq.iter().position(|x| eq(x, &elt1))?;
    let p2 = seq.iter().position(|x| eq(x, &elt2))?;
    let moved = move_element_by(elt2, seq, p1, &eq);
    Some(move_element_by(elt1, &moved, p2, &eq))
}

/// [`swap_by`] with `PartialEq` equality.
pub fn swap<T: Clone + PartialEq>(elt1: T, elt2: T, seq: &[T]) -> Option<Vec<T>> {
    swap_by(elt1, elt2, seq, |a, b| a == b)
}

/// Returns the first element that occurs more than once, if any.
pub fn has_duplicates_by<T, F>(seq: &[T], eq: F) -> Option<&T>
where
    F: Fn(&T, &T) -> bool,
{
    seq.iter()
        .enumerate()
        .find(|&(i, x)| seq[i + 1..].iter().any(|y| eq(x, y)))
        .map(|(_, x)| x)
}

/// [`has_duplicates_by`] with `PartialEq` equality.
pub fn has_duplicates<T: PartialEq>(seq: &[T]) -> Option<&T> {
    has_duplicates_by(seq, |a, b| a == b)
}


#[cfg(test)]
mod props {
    use super::*;
    use proptest::prelude::*;
    use proptest::sample::Index;

    fn unique_ring() -> impl Strategy<Value = Vec<i32>> {
        proptest::collection::btree_set(0i32..1000, 1..12).prop_map(|s| s.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_rotate_inverse(seq in proptest::collection::vec(0i32..100, 0..12), k in -1000isize..1000) {
            prop_assert_eq!(rotate(&rotate(&seq, k), -k), seq);
        }

        #[test]
        fn prop_rotate_full_cycle(seq in proptest::collection::vec(0i32..100, 0..12)) {
            prop_assert_eq!(rotate(&seq, seq.len() as isize), seq);
        }

        #[test]
        fn prop_cyclic_nth_periodic(seq in proptest::collection::vec(0i32..100, 1..12), n in -1000isize..1000, m in -10isize..10) {
            let len = seq.len() as isize;
            prop_assert_eq!(cyclic_nth(&seq, n).unwrap(), cyclic_nth(&seq, n + len * m).unwrap());
        }

        #[test]
        fn prop_cyclic_offset_places_at_target(seq in unique_ring(), at in any::<Index>(), n in -100isize..100) {
            let p = at.index(seq.len());
            let elt = seq[p];
            let out = cyclic_offset_element(elt, &seq, n).unwrap();
            let target = (p as isize + n).rem_euclid(seq.len() as isize) as usize;
            prop_assert_eq!(out.len(), seq.len());
            prop_assert_eq!(out[target], elt);
        }

        #[test]
        fn prop_swap_self_inverse(seq in unique_ring(), a in any::<Index>(), b in any::<Index>()) {
            let i1 = a.index(seq.len());
            let i2 = b.index(seq.len());
            prop_assume!(i1 != i2);
            let once = swap(seq[i1], seq[i2], &seq).unwrap();
            let twice = swap(seq[i1], seq[i2], &once).unwrap();
            prop_assert_eq!(twice, seq);
        }

        #[test]
        fn prop_move_element_preserves_length(seq in unique_ring(), at in any::<Index>(), to in any::<Index>()) {
            let elt = seq[at.index(seq.len())];
            let out = move_element(elt, &seq, to.index(seq.len()));
            prop_assert_eq!(out.len(), seq.len());
        }
    }
}
