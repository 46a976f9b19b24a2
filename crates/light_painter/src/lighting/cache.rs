//! Skips mesh rebuilds when the input geometry has not changed

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::foundation::math::Vec3;

/// Content hash of a point list over the exact f32 bit patterns
pub fn hash_points(points: &[Vec3]) -> u64 {
    let mut hasher = DefaultHasher::new();
    points.len().hash(&mut hasher);
    for p in points {
        for c in p.iter() {
            c.to_bits().hash(&mut hasher);
        }
    }
    hasher.finish()
}

/// Content hash of a point list together with its connectivity
pub fn hash_polylines(points: &[Vec3], edges: &[[u32; 2]]) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_points(points).hash(&mut hasher);
    edges.hash(&mut hasher);
    hasher.finish()
}

/// Last geometry hash seen per output object
#[derive(Debug, Clone)]
pub struct GeometryCache<K> {
    hashes: HashMap<K, u64>,
}

impl<K: Eq + Hash> GeometryCache<K> {
    /// Empty cache
    pub fn new() -> Self {
        Self { hashes: HashMap::new() }
    }

    /// True when `hash` differs from what was last stored for `key`
    pub fn is_dirty(&self, key: &K, hash: u64) -> bool {
        self.hashes.get(key) != Some(&hash)
    }

    /// Store `hash` for `key`, returning whether it changed
    pub fn update(&mut self, key: K, hash: u64) -> bool {
        self.hashes.insert(key, hash) != Some(hash)
    }

    /// Forget one key so its next update rebuilds
    pub fn invalidate(&mut self, key: &K) {
        self.hashes.remove(key);
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.hashes.clear();
    }
}

impl<K: Eq + Hash> Default for GeometryCache<K> {
    fn default() -> Self {
        Self::new()
    }
}
