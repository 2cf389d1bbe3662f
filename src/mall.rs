//! Mall layout representation, generation, and persistence.
//!
//! A mall is an ordered set of shops, each with a name, planar coordinates,
//! and a floor index. Layouts can be generated randomly (seeded) or loaded
//! from the JSON format produced by earlier runs.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::cost::CostModel;

/// Default floor-change penalty, in the same unit as planar distance.
pub const DEFAULT_FLOOR_PENALTY: f64 = 50.0;

/// Side length of the square floor plan used by the generator.
const FLOOR_EXTENT: f64 = 100.0;

/// Minimum distance between two generated shops on the same floor.
const MIN_SHOP_SEPARATION: f64 = 2.0;

/// A single shop in the mall.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    /// Display name, e.g. "Shop_2_4" for the fourth shop on floor 2
    pub name: String,
    /// Floor index (ground floor = 1 in generated layouts)
    pub floor: u32,
    /// X coordinate on the floor plan
    pub x: f64,
    /// Y coordinate on the floor plan
    pub y: f64,
}

impl Shop {
    pub fn new(name: impl Into<String>, floor: u32, x: f64, y: f64) -> Self {
        Shop { name: name.into(), floor, x, y }
    }
}

/// A complete mall layout: the shop set plus the floor-change penalty used
/// when walking between shops on different floors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mall {
    /// Layout name (used in reports and rendered output)
    pub name: String,
    /// All shops, in generation/input order; indices 0..N-1 are stable
    pub shops: Vec<Shop>,
    /// Extra cost added to an edge whose endpoints are on different floors
    pub floor_penalty: f64,
}

impl Mall {
    /// Create a mall from an existing shop list.
    pub fn new(name: impl Into<String>, shops: Vec<Shop>, floor_penalty: f64) -> Self {
        Mall { name: name.into(), shops, floor_penalty }
    }

    /// Generate a random layout with `shops_per_floor` shops on each of
    /// `num_floors` floors. Coordinates are uniform over the floor plan;
    /// a shop is resampled when it lands too close to an existing shop on
    /// the same floor. Deterministic for a given seed.
    pub fn generate(num_floors: u32, shops_per_floor: u32, floor_penalty: f64, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut shops = Vec::with_capacity((num_floors * shops_per_floor) as usize);

        for floor in 1..=num_floors {
            for shop_id in 1..=shops_per_floor {
                let name = format!("Shop_{}_{}", floor, shop_id);
                let (x, y) = Self::place_shop(&mut rng, &shops, floor);
                shops.push(Shop::new(name, floor, x, y));
            }
        }

        log::debug!(
            "generated mall: {} floors x {} shops, seed {}",
            num_floors, shops_per_floor, seed
        );

        Mall::new(format!("mall-{}x{}-s{}", num_floors, shops_per_floor, seed), shops, floor_penalty)
    }

    /// Sample coordinates for a new shop, avoiding near-collisions with
    /// shops already placed on the same floor. Gives up on separation after
    /// a bounded number of attempts so dense floors still terminate.
    fn place_shop(rng: &mut ChaCha8Rng, placed: &[Shop], floor: u32) -> (f64, f64) {
        const MAX_ATTEMPTS: usize = 50;

        let mut candidate = (rng.gen_range(0.0..FLOOR_EXTENT), rng.gen_range(0.0..FLOOR_EXTENT));
        for _ in 0..MAX_ATTEMPTS {
            let clear = placed
                .iter()
                .filter(|s| s.floor == floor)
                .all(|s| (s.x - candidate.0).hypot(s.y - candidate.1) >= MIN_SHOP_SEPARATION);
            if clear {
                break;
            }
            candidate = (rng.gen_range(0.0..FLOOR_EXTENT), rng.gen_range(0.0..FLOOR_EXTENT));
        }
        candidate
    }

    /// Load a layout from the JSON shop-array format.
    pub fn from_file<P: AsRef<Path>>(path: P, floor_penalty: f64) -> Result<Self, String> {
        let file = File::open(&path)
            .map_err(|e| format!("Cannot open layout file: {}", e))?;
        let reader = BufReader::new(file);

        let shops: Vec<Shop> = serde_json::from_reader(reader)
            .map_err(|e| format!("Invalid layout JSON: {}", e))?;

        let name = path
            .as_ref()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "mall".to_string());

        Ok(Mall::new(name, shops, floor_penalty))
    }

    /// Save the shop list as a JSON array, round-trippable by `from_file`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let json = serde_json::to_string_pretty(&self.shops)
            .map_err(|e| format!("Cannot serialize layout: {}", e))?;
        let mut file = File::create(&path)
            .map_err(|e| format!("Cannot create layout file: {}", e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| format!("Cannot write layout file: {}", e))?;
        Ok(())
    }

    /// Load a layout if the file exists, otherwise generate one and persist
    /// it so subsequent runs see the same mall.
    pub fn load_or_generate<P: AsRef<Path>>(
        path: P,
        num_floors: u32,
        shops_per_floor: u32,
        floor_penalty: f64,
        seed: u64,
    ) -> Result<Self, String> {
        if path.as_ref().exists() {
            Mall::from_file(&path, floor_penalty)
        } else {
            let mall = Mall::generate(num_floors, shops_per_floor, floor_penalty, seed);
            mall.save(&path)?;
            Ok(mall)
        }
    }

    /// Number of shops.
    #[inline]
    pub fn len(&self) -> usize {
        self.shops.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shops.is_empty()
    }

    /// Cost model configured with this mall's floor penalty.
    #[inline]
    pub fn cost_model(&self) -> CostModel {
        CostModel::new(self.floor_penalty)
    }

    /// Walking cost between two shops by index.
    #[inline]
    pub fn cost(&self, i: usize, j: usize) -> f64 {
        self.cost_model().cost(&self.shops[i], &self.shops[j])
    }

    /// Find a shop index by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.shops.iter().position(|s| s.name == name)
    }

    /// Number of distinct floors present in the layout.
    pub fn num_floors(&self) -> usize {
        let mut floors: Vec<u32> = self.shops.iter().map(|s| s.floor).collect();
        floors.sort_unstable();
        floors.dedup();
        floors.len()
    }

    /// Summary statistics for reports.
    pub fn statistics(&self) -> MallStatistics {
        let n = self.len();
        let mut costs: Vec<f64> = Vec::new();
        for i in 0..n {
            for j in i + 1..n {
                costs.push(self.cost(i, j));
            }
        }
        let avg_cost = if costs.is_empty() {
            0.0
        } else {
            costs.iter().sum::<f64>() / costs.len() as f64
        };
        let max_cost = costs.iter().cloned().fold(0.0, f64::max);

        let min_x = self.shops.iter().map(|s| s.x).fold(f64::INFINITY, f64::min);
        let max_x = self.shops.iter().map(|s| s.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = self.shops.iter().map(|s| s.y).fold(f64::INFINITY, f64::min);
        let max_y = self.shops.iter().map(|s| s.y).fold(f64::NEG_INFINITY, f64::max);

        MallStatistics {
            name: self.name.clone(),
            num_shops: n,
            num_floors: self.num_floors(),
            floor_penalty: self.floor_penalty,
            avg_cost,
            max_cost,
            bounds: (min_x, max_x, min_y, max_y),
        }
    }
}

/// Summary statistics about a mall layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MallStatistics {
    pub name: String,
    pub num_shops: usize,
    pub num_floors: usize,
    pub floor_penalty: f64,
    pub avg_cost: f64,
    pub max_cost: f64,
    /// (min_x, max_x, min_y, max_y) over all shops
    pub bounds: (f64, f64, f64, f64),
}

impl std::fmt::Display for MallStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mall: {}", self.name)?;
        writeln!(f, "  Shops: {}", self.num_shops)?;
        writeln!(f, "  Floors: {}", self.num_floors)?;
        writeln!(f, "  Floor penalty: {:.1}", self.floor_penalty)?;
        writeln!(f, "  Avg pairwise cost: {:.2}", self.avg_cost)?;
        writeln!(f, "  Max pairwise cost: {:.2}", self.max_cost)?;
        let (min_x, max_x, min_y, max_y) = self.bounds;
        writeln!(f, "  Bounds: x [{:.1}, {:.1}], y [{:.1}, {:.1}]", min_x, max_x, min_y, max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_counts_and_names() {
        let mall = Mall::generate(3, 5, DEFAULT_FLOOR_PENALTY, 42);
        assert_eq!(mall.len(), 15);
        assert_eq!(mall.num_floors(), 3);
        assert_eq!(mall.shops[0].name, "Shop_1_1");
        assert_eq!(mall.shops[14].name, "Shop_3_5");
        assert!(mall.shops.iter().all(|s| (0.0..100.0).contains(&s.x)));
        assert!(mall.shops.iter().all(|s| (0.0..100.0).contains(&s.y)));
    }

    #[test]
    fn test_generate_deterministic() {
        let a = Mall::generate(2, 4, 50.0, 7);
        let b = Mall::generate(2, 4, 50.0, 7);
        for (sa, sb) in a.shops.iter().zip(&b.shops) {
            assert_eq!(sa.name, sb.name);
            assert_eq!(sa.x, sb.x);
            assert_eq!(sa.y, sb.y);
        }
    }

    #[test]
    fn test_same_floor_separation() {
        let mall = Mall::generate(1, 10, 50.0, 3);
        for i in 0..mall.len() {
            for j in i + 1..mall.len() {
                let (a, b) = (&mall.shops[i], &mall.shops[j]);
                let d = (a.x - b.x).hypot(a.y - b.y);
                assert!(d >= MIN_SHOP_SEPARATION, "shops {} and {} too close: {}", i, j, d);
            }
        }
    }

    #[test]
    fn test_layout_json_format() {
        let data = r#"[
            {"name": "Shop_1_1", "floor": 1, "x": 10.0, "y": 20.0},
            {"name": "Shop_2_1", "floor": 2, "x": 30.0, "y": 40.0}
        ]"#;
        let shops: Vec<Shop> = serde_json::from_str(data).unwrap();
        let mall = Mall::new("test", shops, 50.0);
        assert_eq!(mall.len(), 2);
        assert_eq!(mall.index_of("Shop_2_1"), Some(1));
        assert_eq!(mall.shops[1].floor, 2);
    }

    #[test]
    fn test_save_then_load_preserves_layout() {
        let path = std::env::temp_dir().join(format!("mall_roundtrip_{}.json", std::process::id()));
        let mall = Mall::generate(2, 3, 50.0, 19);
        mall.save(&path).unwrap();

        let loaded = Mall::from_file(&path, 50.0).unwrap();
        assert_eq!(loaded.len(), mall.len());
        for (orig, read) in mall.shops.iter().zip(&loaded.shops) {
            assert_eq!(orig.name, read.name);
            assert_eq!(orig.floor, read.floor);
            assert_eq!(orig.x, read.x);
            assert_eq!(orig.y, read.y);
        }
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_or_generate_reuses_persisted_file() {
        let path = std::env::temp_dir().join(format!("mall_logen_{}.json", std::process::id()));
        std::fs::remove_file(&path).ok();

        let first = Mall::load_or_generate(&path, 2, 4, 50.0, 5).unwrap();
        assert!(path.exists());
        assert_eq!(first.len(), 8);

        // Different seed and shape: the persisted layout must win
        let second = Mall::load_or_generate(&path, 3, 9, 50.0, 99).unwrap();
        assert_eq!(second.len(), first.len());
        for (a, b) in first.shops.iter().zip(&second.shops) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.x, b.x);
            assert_eq!(a.y, b.y);
        }
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_statistics() {
        let shops = vec![
            Shop::new("a", 1, 0.0, 0.0),
            Shop::new("b", 1, 3.0, 4.0),
        ];
        let stats = Mall::new("test", shops, 50.0).statistics();
        assert_eq!(stats.num_shops, 2);
        assert_eq!(stats.num_floors, 1);
        assert!((stats.avg_cost - 5.0).abs() < 1e-10);
        assert!((stats.max_cost - 5.0).abs() < 1e-10);
    }
}
