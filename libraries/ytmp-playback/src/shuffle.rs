//! Shuffle order generation
//!
//! A shuffle order is a permutation of track indices. The playlist itself is
//! never reordered; traversal follows the permutation instead.

use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};

/// Random permutation of `0..len` with `current` at position 0
pub fn shuffle_order(len: usize, current: usize) -> Vec<usize> {
    shuffle_order_with(&mut thread_rng(), len, current)
}

/// [`shuffle_order`] with a caller-supplied generator
///
/// Fisher-Yates over the identity permutation, then `current` is swapped into
/// the front so the track that is playing stays first in traversal order.
pub fn shuffle_order_with<R: Rng + ?Sized>(rng: &mut R, len: usize, current: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(rng);

    if let Some(pos) = order.iter().position(|&i| i == current) {
        order.swap(0, pos);
    }

    order
}
