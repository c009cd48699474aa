//! Key synthesis for workloads and demos.
//!
//! Generates batches of fresh keys in random, ascending or descending order
//! for either key domain. Generated keys never collide with the existing
//! keys handed in, feeding the tree's caller-guaranteed uniqueness contract.
//! All randomness comes from a caller-supplied generator so tests can seed
//! it.

#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use std::collections::HashSet;

use rand::Rng;

use crate::types::{Key, KeyType};

/// The 52-letter alphabet text keys are drawn from, in byte order.
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// The order a generated batch arrives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrder {
    /// Uniformly drawn from a keyspace sized to the request.
    Random,
    /// Strictly increasing, continuing above the current maximum.
    Ascending,
    /// Strictly decreasing, continuing below the current minimum.
    Descending,
}

/// Generate `count` fresh keys of `key_type` in the requested order.
///
/// The keys avoid everything in `existing` and each other.
pub fn generate_keys<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    key_type: KeyType,
    order: KeyOrder,
    existing: &[Key],
) -> Vec<Key> {
    match key_type {
        KeyType::Number => generate_numbers(rng, count, order, existing),
        KeyType::Text => generate_strings(rng, count, order, existing),
    }
}

fn generate_numbers<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    order: KeyOrder,
    existing: &[Key],
) -> Vec<Key> {
    let numbers: Vec<i64> = existing
        .iter()
        .filter_map(|key| match key {
            Key::Number(n) => Some(*n),
            Key::Text(_) => None,
        })
        .collect();

    match order {
        KeyOrder::Ascending => {
            let start = numbers.iter().copied().max().unwrap_or(0);
            (1..=count as i64).map(|i| Key::Number(start + i)).collect()
        }
        KeyOrder::Descending => {
            let start = numbers.iter().copied().min().unwrap_or(count as i64 + 1);
            (1..=count as i64).map(|i| Key::Number(start - i)).collect()
        }
        KeyOrder::Random => {
            // Size the keyspace to twice the request so rejection stays
            // cheap, then widen to cover the existing extremes.
            let span = 2 * (count + numbers.len()) as i64;
            let ceiling = lift_ceiling(span).max(numbers.iter().copied().max().unwrap_or(0));
            let floor = 0i64.min(numbers.iter().copied().min().unwrap_or(0));

            let mut taken: HashSet<i64> = numbers.into_iter().collect();
            let mut out = Vec::with_capacity(count);
            while out.len() < count {
                let candidate = rng.random_range(floor..=ceiling);
                if taken.insert(candidate) {
                    out.push(Key::Number(candidate));
                }
            }
            out
        }
    }
}

/// Round a span up to the next all-nines decimal ceiling (99, 999, ...).
fn lift_ceiling(span: i64) -> i64 {
    let mut ceiling = 9;
    while ceiling < span {
        ceiling = ceiling * 10 + 9;
    }
    ceiling
}

fn generate_strings<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    order: KeyOrder,
    existing: &[Key],
) -> Vec<Key> {
    let strings: Vec<&str> = existing
        .iter()
        .filter_map(|key| match key {
            Key::Text(s) => Some(s.as_str()),
            Key::Number(_) => None,
        })
        .collect();
    let length = required_length(count, &strings);

    match order {
        KeyOrder::Ascending => {
            let mut current = strings
                .iter()
                .max()
                .map_or_else(String::new, ToString::to_string);
            let mut out = Vec::with_capacity(count);
            for _ in 0..count {
                current = successor(&current, length);
                out.push(Key::Text(current.clone()));
            }
            out
        }
        KeyOrder::Descending => {
            let mut current = strings.iter().min().map_or_else(
                || all_of(ALPHABET[ALPHABET.len() - 1], length),
                ToString::to_string,
            );
            let mut out = Vec::with_capacity(count);
            for _ in 0..count {
                let next = predecessor(&current, length);
                if next.is_empty() || next >= current {
                    // The keyspace below is exhausted.
                    break;
                }
                out.push(Key::Text(next.clone()));
                current = next;
            }
            out
        }
        KeyOrder::Random => {
            let mut taken: HashSet<String> =
                strings.iter().map(ToString::to_string).collect();
            let mut out = Vec::with_capacity(count);
            while out.len() < count {
                let candidate: String = (0..length)
                    .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
                    .collect();
                if taken.insert(candidate.clone()) {
                    out.push(Key::Text(candidate));
                }
            }
            out
        }
    }
}

/// Smallest length whose cumulative keyspace comfortably exceeds the
/// request, never shorter than the longest existing key.
fn required_length(count: usize, existing: &[&str]) -> usize {
    let needed = 2 * (count + existing.len());
    let mut keyspace = 0usize;
    let mut length = 0usize;
    while keyspace <= needed {
        length += 1;
        keyspace = keyspace.saturating_add(52usize.saturating_pow(length as u32));
    }
    let longest = existing.iter().map(|s| s.len()).max().unwrap_or(0);
    length.max(longest)
}

fn all_of(letter: u8, length: usize) -> String {
    std::iter::repeat_n(char::from(letter), length).collect()
}

fn digit_of(byte: u8) -> Option<usize> {
    ALPHABET.iter().position(|&candidate| candidate == byte)
}

/// The next lexicographically larger string, padded to `length`.
fn successor(current: &str, length: usize) -> String {
    let mut digits: Vec<usize> = current.bytes().filter_map(digit_of).collect();
    while digits.len() < length {
        // Shorter strings sort first; pad with the lowest letter.
        digits.push(0);
    }

    if digits.iter().all(|&digit| digit == ALPHABET.len() - 1) {
        // "zz" steps to "zzA": appending keeps lexicographic order, while
        // carrying into a new place would wrap back below "zz".
        digits.push(0);
    } else {
        let mut position = digits.len();
        while position > 0 {
            position -= 1;
            if digits[position] + 1 < ALPHABET.len() {
                digits[position] += 1;
                break;
            }
            digits[position] = 0;
        }
    }

    digits
        .iter()
        .map(|&digit| char::from(ALPHABET[digit]))
        .collect()
}

/// The next lexicographically smaller string, padded to `length`.
///
/// Returns the empty string when `current` is already the smallest.
fn predecessor(current: &str, length: usize) -> String {
    let mut digits: Vec<usize> = current.bytes().filter_map(digit_of).collect();
    while digits.len() < length {
        digits.push(0);
    }

    if digits.iter().all(|&digit| digit == 0) {
        // "AA" steps down to "A": the shorter prefix sorts first.
        let _ = digits.pop();
    } else {
        let mut position = digits.len();
        while position > 0 {
            position -= 1;
            if digits[position] > 0 {
                digits[position] -= 1;
                break;
            }
            digits[position] = ALPHABET.len() - 1;
        }
    }

    digits
        .iter()
        .map(|&digit| char::from(ALPHABET[digit]))
        .collect()
}
