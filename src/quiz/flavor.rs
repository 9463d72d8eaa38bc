use std::fs;
use std::path::Path;

use log::warn;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rust_embed::Embed;
use serde::Deserialize;

#[derive(Embed)]
#[folder = "assets/"]
struct FlavorAssets;

const FALLBACK_GOOD: &str = "正解";
const FALLBACK_BAD: &str = "違います";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FlavorPools {
    #[serde(default)]
    pub goods: Vec<String>,
    #[serde(default)]
    pub bads: Vec<String>,
}

impl FlavorPools {
    pub fn bundled() -> Self {
        FlavorAssets::get("emotions.json")
            .and_then(|file| serde_json::from_slice(file.data.as_ref()).ok())
            .unwrap_or_default()
    }

    /// Replace each pool of `self` that `other` has entries for.
    fn overlay(mut self, other: FlavorPools) -> Self {
        if !other.goods.is_empty() {
            self.goods = other.goods;
        }
        if !other.bads.is_empty() {
            self.bads = other.bads;
        }
        self
    }
}

/// Cheering and commiserating lines shown after each answer.
pub struct Flavor {
    pools: FlavorPools,
    rng: SmallRng,
}

impl Flavor {
    pub fn load(user_file: Option<&Path>) -> Self {
        let mut pools = FlavorPools::bundled();
        if let Some(path) = user_file {
            match fs::read_to_string(path)
                .map_err(anyhow::Error::from)
                .and_then(|s| Ok(serde_json::from_str::<FlavorPools>(&s)?))
            {
                Ok(user) => pools = pools.overlay(user),
                Err(e) => warn!("ignoring emotions file {}: {e}", path.display()),
            }
        }
        Self::new(pools, SmallRng::from_entropy())
    }

    pub fn new(pools: FlavorPools, rng: SmallRng) -> Self {
        Self { pools, rng }
    }

    pub fn pick(&mut self, correct: bool) -> &str {
        let (pool, fallback) = if correct {
            (&self.pools.goods, FALLBACK_GOOD)
        } else {
            (&self.pools.bads, FALLBACK_BAD)
        };
        pool.choose(&mut self.rng)
            .map(String::as_str)
            .unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(pools: FlavorPools) -> Flavor {
        Flavor::new(pools, SmallRng::seed_from_u64(7))
    }

    #[test]
    fn test_bundled_pools_are_not_empty() {
        let pools = FlavorPools::bundled();
        assert!(!pools.goods.is_empty());
        assert!(!pools.bads.is_empty());
    }

    #[test]
    fn test_pick_comes_from_matching_pool() {
        let pools = FlavorPools::bundled();
        let mut flavor = seeded(pools.clone());
        for _ in 0..50 {
            let good = flavor.pick(true).to_string();
            assert!(pools.goods.contains(&good));
            let bad = flavor.pick(false).to_string();
            assert!(pools.bads.contains(&bad));
        }
    }

    #[test]
    fn test_empty_pools_use_fallback() {
        let mut flavor = seeded(FlavorPools::default());
        assert_eq!(flavor.pick(true), FALLBACK_GOOD);
        assert_eq!(flavor.pick(false), FALLBACK_BAD);
    }

    #[test]
    fn test_user_file_overrides_only_given_pool() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("emotions.json");
        fs::write(&path, r#"{"goods": ["やった"]}"#).unwrap();

        let mut flavor = Flavor::load(Some(&path));
        assert_eq!(flavor.pick(true), "やった");
        let bad = flavor.pick(false).to_string();
        assert!(FlavorPools::bundled().bads.contains(&bad));
    }

    #[test]
    fn test_unreadable_user_file_keeps_bundled() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("emotions.json");
        fs::write(&path, "not json").unwrap();

        let mut flavor = Flavor::load(Some(&path));
        let good = flavor.pick(true).to_string();
        assert!(FlavorPools::bundled().goods.contains(&good));
    }
}
