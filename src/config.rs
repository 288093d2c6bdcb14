//! Obstacle cost configuration and the YAML processing config.
//!
//! The obstacle text form maps ISOM symbol codes to cost multipliers, one
//! `CODE: MULTIPLIER` entry per line; `-1.0` marks impassable. The YAML
//! config carries the same table inline together with grid dimensions and
//! algorithm selection.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::Deserialize;

use crate::search::{Algorithm, Heuristic};
use crate::types::PlannerError;

/// Symbol code to cost multiplier mapping used during rasterization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObstacleConfig {
    costs: HashMap<String, f32>,
}

impl ObstacleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the plain-text form. Blank lines and `#` comments are skipped;
    /// whitespace around the colon is insignificant.
    pub fn parse(text: &str) -> Result<Self, PlannerError> {
        let mut costs = HashMap::new();
        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((code, value)) = line.split_once(':') else {
                return Err(PlannerError::BadConfig {
                    line: i + 1,
                    message: format!("missing ':' in {line:?}"),
                });
            };
            let code = code.trim();
            if code.is_empty() {
                return Err(PlannerError::BadConfig {
                    line: i + 1,
                    message: "empty symbol code".to_string(),
                });
            }
            let multiplier: f32 = value.trim().parse().map_err(|_| PlannerError::BadConfig {
                line: i + 1,
                message: format!("bad multiplier {:?}", value.trim()),
            })?;
            if multiplier != -1.0 && !(multiplier.is_finite() && multiplier > 0.0) {
                return Err(PlannerError::BadConfig {
                    line: i + 1,
                    message: format!("multiplier must be positive or -1.0, got {multiplier}"),
                });
            }
            costs.insert(code.to_string(), multiplier);
        }
        Ok(Self { costs })
    }

    /// Default ISOM-2017-2 cost table used by the desktop application.
    pub fn isom_defaults() -> Self {
        const DEFAULTS: &str = "\
            201: -1.0\n301: -1.0\n307: -1.0\n509: -1.0\n513: -1.0\n514: -1.0\n\
            515: -1.0\n516: -1.0\n520: -1.0\n526: -1.0\n528: -1.0\n529: -1.0\n\
            206: -1.0\n417: -1.0\n518: -1.0\n202: 10.0\n210: 1.25\n211: 1.67\n\
            212: 5.0\n213: 1.25\n302: 5.0\n308: 2.0\n309: 1.67\n310: 1.43\n\
            403: 1.25\n404: 1.25\n406: 1.50\n407: 1.50\n408: 1.67\n409: 1.67\n\
            410: 5.0\n412: 1.11\n413: 1.11\n414: 1.11\n311: 1.01\n401: 1.0\n\
            402: 1.0\n405: 1.0\n501: 0.6\n502: 0.6\n503: 0.6\n504: 0.6\n\
            505: 0.6\n506: 0.65\n507: 0.75\n508: 0.8\n519: 0.9\n527: 1.0";
        Self::parse(DEFAULTS).expect("default table parses")
    }

    pub fn from_map(costs: HashMap<String, f32>) -> Self {
        Self { costs }
    }

    pub fn multiplier(&self, code: &str) -> Option<f32> {
        self.costs.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// Order-independent hash of the table, for grid cache keys.
    pub fn fingerprint(&self) -> u64 {
        let mut entries: Vec<_> = self.costs.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        let mut hasher = DefaultHasher::new();
        for (code, multiplier) in entries {
            code.hash(&mut hasher);
            multiplier.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// Identity of a rasterized grid: callers reuse a cached grid when the key
/// matches the previous run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridCacheKey {
    pub map_source: String,
    pub width: u32,
    pub height: u32,
    pub obstacle_fingerprint: u64,
}

impl GridCacheKey {
    pub fn new(map_source: impl Into<String>, width: u32, height: u32, obstacles: &ObstacleConfig) -> Self {
        Self {
            map_source: map_source.into(),
            width,
            height,
            obstacle_fingerprint: obstacles.fingerprint(),
        }
    }
}

/// Processing configuration, deserializable from YAML.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerConfig {
    #[serde(default = "default_grid_dim")]
    pub grid_width: u32,
    #[serde(default = "default_grid_dim")]
    pub grid_height: u32,
    #[serde(default = "default_layers")]
    pub layers: Vec<String>,
    #[serde(default)]
    pub algorithm: Algorithm,
    #[serde(default)]
    pub heuristic: Heuristic,
    #[serde(default)]
    pub obstacle_costs: HashMap<String, f32>,
}

fn default_grid_dim() -> u32 {
    1000
}

fn default_layers() -> Vec<String> {
    vec!["barrier".to_string(), "course".to_string()]
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            grid_width: default_grid_dim(),
            grid_height: default_grid_dim(),
            layers: default_layers(),
            algorithm: Algorithm::default(),
            heuristic: Heuristic::default(),
            obstacle_costs: HashMap::new(),
        }
    }
}

impl PlannerConfig {
    pub fn from_yaml(text: &str) -> Result<Self, PlannerError> {
        serde_yaml::from_str(text).map_err(|e| PlannerError::BadConfig {
            line: e.location().map(|l| l.line()).unwrap_or(0),
            message: e.to_string(),
        })
    }

    pub fn obstacles(&self) -> ObstacleConfig {
        ObstacleConfig::from_map(self.obstacle_costs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entries_and_skips_comments() {
        let config = ObstacleConfig::parse("# header\n201 : -1.0\n\n302: 5.0\n").unwrap();
        assert_eq!(config.len(), 2);
        assert_eq!(config.multiplier("201"), Some(-1.0));
        assert_eq!(config.multiplier("302"), Some(5.0));
        assert_eq!(config.multiplier("999"), None);
    }

    #[test]
    fn missing_colon_is_bad_config() {
        let err = ObstacleConfig::parse("201 -1.0").unwrap_err();
        assert!(matches!(err, PlannerError::BadConfig { line: 1, .. }));
    }

    #[test]
    fn non_positive_multiplier_rejected() {
        assert!(ObstacleConfig::parse("201: 0.0").is_err());
        assert!(ObstacleConfig::parse("201: -2.5").is_err());
        assert!(ObstacleConfig::parse("201: nan").is_err());
    }

    #[test]
    fn defaults_table_loads() {
        let defaults = ObstacleConfig::isom_defaults();
        assert_eq!(defaults.multiplier("201"), Some(-1.0));
        assert_eq!(defaults.multiplier("505"), Some(0.6));
        assert!(defaults.len() > 40);
    }

    #[test]
    fn fingerprint_is_order_independent() {
        let a = ObstacleConfig::parse("201: -1.0\n302: 5.0").unwrap();
        let b = ObstacleConfig::parse("302: 5.0\n201: -1.0").unwrap();
        let c = ObstacleConfig::parse("302: 5.0\n201: 2.0").unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn cache_key_equality() {
        let obstacles = ObstacleConfig::parse("201: -1.0").unwrap();
        let a = GridCacheKey::new("map.xml", 1000, 800, &obstacles);
        let b = GridCacheKey::new("map.xml", 1000, 800, &obstacles);
        let c = GridCacheKey::new("map.xml", 500, 800, &obstacles);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn yaml_config_round_trip() {
        let config = PlannerConfig::from_yaml(
            "grid_width: 500\nalgorithm: theta-star\nheuristic: euclidean\nobstacle_costs:\n  \"201\": -1.0\n",
        )
        .unwrap();
        assert_eq!(config.grid_width, 500);
        assert_eq!(config.grid_height, 1000);
        assert_eq!(config.algorithm, Algorithm::ThetaStar);
        assert_eq!(config.heuristic, Heuristic::Euclidean);
        assert_eq!(config.obstacles().multiplier("201"), Some(-1.0));
    }

    #[test]
    fn bad_yaml_is_bad_config() {
        assert!(matches!(
            PlannerConfig::from_yaml("grid_width: [not a number"),
            Err(PlannerError::BadConfig { .. })
        ));
    }
}
