//! The set of emitter sites and their cooldown state.

use std::collections::HashMap;

use glam::DVec3;
use rand::Rng;
use tonefield_terrain::{EmitterId, EmitterSite};

use crate::error::RegistryError;

/// Emitter sites in creation order with O(1) lookup by id.
///
/// Mutation goes through `&mut self`, so the eligibility check and the
/// cooldown update of a trigger can never interleave with another writer.
#[derive(Clone, Debug, Default)]
pub struct EmitterRegistry {
    sites: Vec<EmitterSite>,
    index: HashMap<EmitterId, usize>,
}

impl EmitterRegistry {
    /// Build a registry from freshly generated sites.
    pub fn from_sites(sites: Vec<EmitterSite>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(sites.len());
        for (i, site) in sites.iter().enumerate() {
            if index.insert(site.id, i).is_some() {
                return Err(RegistryError::DuplicateEmitter(site.id));
            }
        }
        Ok(Self { sites, index })
    }

    /// Number of registered sites.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// True if the terrain produced no sites.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Sites in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &EmitterSite> {
        self.sites.iter()
    }

    /// Look up a site by id.
    pub fn get(&self, id: EmitterId) -> Option<&EmitterSite> {
        self.index.get(&id).map(|&i| &self.sites[i])
    }

    /// All sites strictly closer than `radius` to `position`, in creation order.
    pub fn sites_within(&self, position: DVec3, radius: f64) -> Vec<&EmitterSite> {
        let radius_sq = radius * radius;
        self.sites
            .iter()
            .filter(|site| radius > 0.0 && site.position.distance_squared(position) < radius_sq)
            .collect()
    }

    /// Whether `id` may fire at scheduler time `now`.
    pub fn is_eligible(&self, id: EmitterId, now: f64) -> Result<bool, RegistryError> {
        self.get(id)
            .map(|site| site.is_eligible(now))
            .ok_or(RegistryError::UnknownEmitter(id))
    }

    /// Start a cooldown for `id`: it becomes eligible again at
    /// `now + cooldown_min + U[0, cooldown_jitter_max]`.
    ///
    /// Returns the new eligibility time.
    pub fn mark_triggered<R: Rng + ?Sized>(
        &mut self,
        id: EmitterId,
        now: f64,
        cooldown_min: f64,
        cooldown_jitter_max: f64,
        rng: &mut R,
    ) -> Result<f64, RegistryError> {
        let &i = self
            .index
            .get(&id)
            .ok_or(RegistryError::UnknownEmitter(id))?;
        let jitter = if cooldown_jitter_max > 0.0 {
            rng.random_range(0.0..=cooldown_jitter_max)
        } else {
            0.0
        };
        let next = now + cooldown_min + jitter;
        self.sites[i].next_eligible_time = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn site(id: u32, x: f64, z: f64) -> EmitterSite {
        EmitterSite {
            id: EmitterId(id),
            position: DVec3::new(x, 1.1, z),
            next_eligible_time: 0.0,
        }
    }

    fn registry() -> EmitterRegistry {
        EmitterRegistry::from_sites(vec![
            site(0, 0.0, 0.0),
            site(1, 7.0, 0.0),
            site(2, 14.0, 0.0),
            site(3, 0.0, 7.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_sites_within_uses_strict_distance() {
        let reg = registry();
        let ids: Vec<_> = reg
            .sites_within(DVec3::new(0.0, 1.1, 0.0), 7.0)
            .iter()
            .map(|s| s.id)
            .collect();
        // Sites exactly 7 units away are excluded.
        assert_eq!(ids, vec![EmitterId(0)]);

        let ids: Vec<_> = reg
            .sites_within(DVec3::new(0.0, 1.1, 0.0), 7.0001)
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![EmitterId(0), EmitterId(1), EmitterId(3)]);
    }

    #[test]
    fn test_sites_within_is_3d() {
        let reg = registry();
        // Directly above site 0 but 20 units up.
        assert!(reg.sites_within(DVec3::new(0.0, 21.1, 0.0), 10.0).is_empty());
    }

    #[test]
    fn test_zero_radius_finds_nothing() {
        let reg = registry();
        assert!(reg.sites_within(DVec3::new(0.0, 1.1, 0.0), 0.0).is_empty());
    }

    #[test]
    fn test_mark_triggered_cooldown_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let mut reg = registry();
        for _ in 0..500 {
            let next = reg
                .mark_triggered(EmitterId(1), 1000.0, 4000.0, 3000.0, &mut rng)
                .unwrap();
            assert!((5000.0..=8000.0).contains(&next), "next={next}");
            assert_eq!(reg.get(EmitterId(1)).unwrap().next_eligible_time, next);
        }
    }

    #[test]
    fn test_still_listed_while_cooling_down() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut reg = registry();
        reg.mark_triggered(EmitterId(0), 1000.0, 4000.0, 3000.0, &mut rng)
            .unwrap();
        let near = reg.sites_within(DVec3::new(0.0, 1.1, 0.0), 1.0);
        assert_eq!(near.len(), 1);
        assert!(!reg.is_eligible(EmitterId(0), 4999.0).unwrap());
        assert!(reg.is_eligible(EmitterId(0), 8000.0).unwrap());
    }

    #[test]
    fn test_zero_jitter_is_exact() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut reg = registry();
        let next = reg
            .mark_triggered(EmitterId(2), 50.0, 100.0, 0.0, &mut rng)
            .unwrap();
        assert_eq!(next, 150.0);
    }

    #[test]
    fn test_unknown_emitter_is_an_error() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut reg = registry();
        assert_eq!(
            reg.mark_triggered(EmitterId(99), 0.0, 1.0, 1.0, &mut rng),
            Err(RegistryError::UnknownEmitter(EmitterId(99)))
        );
        assert!(reg.is_eligible(EmitterId(99), 0.0).is_err());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = EmitterRegistry::from_sites(vec![site(4, 0.0, 0.0), site(4, 1.0, 1.0)]);
        assert_eq!(
            result.unwrap_err(),
            RegistryError::DuplicateEmitter(EmitterId(4))
        );
    }
}
