//! # Fuzzy Factory
//!
//! Quantized lookup that maps values within tolerance of each other onto a
//! single shared object.
//!
//! ## Algorithm
//!
//! Each coordinate is scaled by `1 / tolerance`. Lookups round every scaled
//! coordinate to the nearest integer. Inserting an object registers it under
//! all `2^N` cells formed by the floor and floor + 1 of each scaled
//! coordinate, so any later value that rounds into one of those cells finds
//! it.

use std::collections::HashMap;

/// Tolerance-based deduplication over `N`-dimensional keys.
///
/// # Example
///
/// ```rust
/// use csg_kernel::fuzzy::FuzzyFactory;
///
/// let mut factory: FuzzyFactory<u32, 2> = FuzzyFactory::new(1e-5);
/// let a = factory.lookup_or_create([1.0, 2.0], |_| 7);
/// let b = factory.lookup_or_create([1.0 + 1e-7, 2.0], |_| 8);
/// assert_eq!((a, b), (7, 7));
/// ```
#[derive(Debug, Clone)]
pub struct FuzzyFactory<T, const N: usize> {
    lookup: HashMap<[i64; N], T>,
    multiplier: f64,
}

impl<T: Clone, const N: usize> FuzzyFactory<T, N> {
    /// Creates an empty factory merging values within `tolerance`.
    pub fn new(tolerance: f64) -> Self {
        Self {
            lookup: HashMap::new(),
            multiplier: 1.0 / tolerance,
        }
    }

    /// Returns the object registered near `key`, creating it with `create`
    /// when there is none.
    pub fn lookup_or_create(&mut self, key: [f64; N], create: impl FnOnce(&[f64; N]) -> T) -> T {
        let rounded = key.map(|el| (el * self.multiplier).round() as i64);
        if let Some(found) = self.lookup.get(&rounded) {
            return found.clone();
        }

        let object = create(&key);
        let floors = key.map(|el| (el * self.multiplier).floor() as i64);
        for mask in 0..(1usize << N) {
            let mut cell = floors;
            for (dim, value) in cell.iter_mut().enumerate() {
                if mask & (1 << dim) != 0 {
                    *value += 1;
                }
            }
            self.lookup.entry(cell).or_insert_with(|| object.clone());
        }
        object
    }

    /// Number of registered cells.
    pub fn cell_count(&self) -> usize {
        self.lookup.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearby_values_merge() {
        let mut factory: FuzzyFactory<usize, 3> = FuzzyFactory::new(1e-5);
        let mut next = 0;
        let mut make = || {
            next += 1;
            next
        };
        let a = factory.lookup_or_create([0.5, 0.5, 0.5], |_| make());
        let b = factory.lookup_or_create([0.5 + 4e-6, 0.5 - 4e-6, 0.5], |_| make());
        assert_eq!(a, b);
    }

    #[test]
    fn test_distant_values_stay_apart() {
        let mut factory: FuzzyFactory<u8, 2> = FuzzyFactory::new(1e-5);
        let a = factory.lookup_or_create([0.0, 0.0], |_| 1);
        let b = factory.lookup_or_create([1e-3, 0.0], |_| 2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_registers_all_neighbor_cells() {
        let mut factory: FuzzyFactory<u8, 4> = FuzzyFactory::new(1e-5);
        factory.lookup_or_create([0.3, 0.3, 0.3, 0.3], |_| 1);
        assert_eq!(factory.cell_count(), 16);
    }

    #[test]
    fn test_creator_receives_original_key() {
        let mut factory: FuzzyFactory<[f64; 2], 2> = FuzzyFactory::new(1e-5);
        let stored = factory.lookup_or_create([1.25, -3.5], |key| *key);
        assert_eq!(stored, [1.25, -3.5]);
    }

    #[test]
    fn test_negative_zero_matches_zero() {
        let mut factory: FuzzyFactory<u8, 1> = FuzzyFactory::new(1e-5);
        let a = factory.lookup_or_create([0.0], |_| 1);
        let b = factory.lookup_or_create([-0.0], |_| 2);
        assert_eq!(a, b);
    }
}
