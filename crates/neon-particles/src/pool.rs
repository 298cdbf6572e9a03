//! Contiguous live-particle collection

use crate::particle::{Particle, ParticleKind};

/// Swap-remove pool for O(1) particle removal and contiguous iteration.
///
/// Removal moves the last particle into the freed slot, so iteration order
/// is not stable across removals. Capacity is kept across `clear`.
pub struct ParticlePool {
    particles: Vec<Particle>,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.particles.capacity()
    }

    /// Make room for `additional` particles without reallocating mid-frame
    pub fn reserve(&mut self, additional: usize) {
        self.particles.reserve(additional);
    }

    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Drop every particle, keeping the allocation
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Run `step` on every particle and swap-remove those it reports dead.
    /// Returns the number removed.
    pub fn update_and_compact<F>(&mut self, mut step: F) -> usize
    where
        F: FnMut(&mut Particle) -> bool,
    {
        let mut removed = 0;
        let mut i = 0;
        while i < self.particles.len() {
            if step(&mut self.particles[i]) {
                i += 1;
            } else {
                self.particles.swap_remove(i);
                removed += 1;
                // The swapped-in particle still needs stepping
            }
        }
        removed
    }

    pub fn count_kind(&self, kind: ParticleKind) -> usize {
        self.particles.iter().filter(|p| p.kind() == kind).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new(0)
    }
}
