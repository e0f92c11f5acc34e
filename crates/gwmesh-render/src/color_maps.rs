//! Color map system.

use std::collections::HashMap;

use glam::Vec3;

use crate::mesh_state::ColorRange;

/// Color used for values that cannot be mapped (NaN or infinite).
pub const NAN_COLOR: Vec3 = Vec3::new(0.5, 0.5, 0.5);

/// Built-in presets: viridis for geology, blues for conductance and recharge,
/// coolwarm for signed differences such as drawdown.
const PRESETS: &[(&str, &[[f32; 3]])] = &[
    (
        "viridis",
        &[
            [0.267, 0.004, 0.329],
            [0.282, 0.140, 0.457],
            [0.253, 0.265, 0.529],
            [0.206, 0.371, 0.553],
            [0.163, 0.471, 0.558],
            [0.127, 0.566, 0.550],
            [0.134, 0.658, 0.517],
            [0.266, 0.749, 0.440],
            [0.477, 0.821, 0.318],
            [0.741, 0.873, 0.150],
            [0.993, 0.906, 0.144],
        ],
    ),
    (
        "blues",
        &[
            [0.969, 0.984, 1.000],
            [0.871, 0.922, 0.969],
            [0.776, 0.859, 0.937],
            [0.620, 0.792, 0.882],
            [0.419, 0.682, 0.839],
            [0.259, 0.573, 0.776],
            [0.129, 0.443, 0.710],
            [0.031, 0.318, 0.612],
            [0.031, 0.188, 0.420],
        ],
    ),
    (
        "coolwarm",
        &[
            [0.230, 0.299, 0.754],
            [0.552, 0.690, 0.996],
            [0.866, 0.866, 0.866],
            [0.956, 0.604, 0.486],
            [0.706, 0.016, 0.150],
        ],
    ),
];

/// A color map for mapping scalar values to colors.
#[derive(Debug, Clone)]
pub struct ColorMap {
    /// Color map name.
    pub name: String,
    /// Color samples (evenly spaced from 0 to 1).
    pub colors: Vec<Vec3>,
}

impl ColorMap {
    /// Creates a new color map.
    pub fn new(name: impl Into<String>, colors: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            colors,
        }
    }

    /// Samples the color map at a given value (0 to 1).
    pub fn sample(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);

        if self.colors.is_empty() {
            return Vec3::ZERO;
        }

        if self.colors.len() == 1 {
            return self.colors[0];
        }

        let n = self.colors.len() - 1;
        let idx = (t * n as f32).floor() as usize;
        let idx = idx.min(n - 1);
        let frac = t * n as f32 - idx as f32;

        self.colors[idx].lerp(self.colors[idx + 1], frac)
    }

    /// Maps data values through `range` onto this color map.
    ///
    /// Values outside the range are clamped; non-finite values get [`NAN_COLOR`].
    pub fn map_values(&self, values: &[f64], range: ColorRange) -> Vec<Vec3> {
        values
            .iter()
            .map(|&v| {
                if v.is_finite() {
                    self.sample(range.normalize(v))
                } else {
                    NAN_COLOR
                }
            })
            .collect()
    }
}

/// Registry for managing color maps.
#[derive(Default)]
pub struct ColorMapRegistry {
    color_maps: HashMap<String, ColorMap>,
}

impl ColorMapRegistry {
    /// Creates a new color map registry with default color maps.
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        for &(name, samples) in PRESETS {
            let colors = samples.iter().map(|&rgb| Vec3::from_array(rgb)).collect();
            self.register(ColorMap::new(name, colors));
        }
    }

    /// Registers a color map, replacing any map of the same name.
    pub fn register(&mut self, color_map: ColorMap) {
        if let Some(previous) = self.color_maps.insert(color_map.name.clone(), color_map) {
            log::debug!("replaced color map '{}'", previous.name);
        }
    }

    /// Gets a color map by name.
    pub fn get(&self, name: &str) -> Option<&ColorMap> {
        self.color_maps.get(name)
    }

    /// Returns true if a color map with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.color_maps.contains_key(name)
    }

    /// Returns all color map names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.color_maps.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_registered() {
        let registry = ColorMapRegistry::new();
        for name in ["viridis", "blues", "coolwarm"] {
            assert!(registry.contains(name), "missing {name}");
        }
        assert!(registry.get("jet").is_none());
        assert!(registry.get("rainbow").is_none());
        assert_eq!(registry.names().count(), PRESETS.len());
    }

    #[test]
    fn test_preset_endpoints() {
        let registry = ColorMapRegistry::new();
        let viridis = registry.get("viridis").unwrap();
        assert_eq!(viridis.colors.len(), 11);
        assert!((viridis.sample(0.0) - Vec3::new(0.267, 0.004, 0.329)).length() < 1e-6);
        assert!((viridis.sample(1.0) - Vec3::new(0.993, 0.906, 0.144)).length() < 1e-6);

        let blues = registry.get("blues").unwrap();
        assert!(blues.sample(0.0).length() > blues.sample(1.0).length());

        let coolwarm = registry.get("coolwarm").unwrap();
        let (cold, warm) = (coolwarm.sample(0.0), coolwarm.sample(1.0));
        assert!(cold.z > cold.x && warm.x > warm.z);
    }

    #[test]
    fn test_sample_endpoints() {
        let map = ColorMap::new("bw", vec![Vec3::ZERO, Vec3::ONE]);
        assert_eq!(map.sample(0.0), Vec3::ZERO);
        assert_eq!(map.sample(1.0), Vec3::ONE);
        assert!((map.sample(0.5) - Vec3::splat(0.5)).length() < 1e-6);
        // Clamped
        assert_eq!(map.sample(-2.0), Vec3::ZERO);
        assert_eq!(map.sample(3.0), Vec3::ONE);
    }

    #[test]
    fn test_map_values_with_nan() {
        let map = ColorMap::new("bw", vec![Vec3::ZERO, Vec3::ONE]);
        let range = ColorRange::new(10.0, 20.0).unwrap();
        let colors = map.map_values(&[10.0, f64::NAN, 20.0, 30.0], range);
        assert_eq!(colors[0], Vec3::ZERO);
        assert_eq!(colors[1], NAN_COLOR);
        assert_eq!(colors[2], Vec3::ONE);
        assert_eq!(colors[3], Vec3::ONE);
    }
}
