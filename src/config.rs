//! Diagram Configuration and Builder
//!
//! This module provides configuration types for deterministic random diagram generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glam::DVec2;

use crate::error::{Result, VoronoiError};
use crate::generation::Bounds;

/// Upper limit on Lloyd iterations accepted by the builder
pub const MAX_LLOYD_ITERATIONS: usize = 50;

/// Configuration for deterministic random Voronoi diagrams
///
/// The same configuration will always produce the identical diagram.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_plane::*;
///
/// let config = DiagramConfigBuilder::new()
///     .seed(42)
///     .size(200.0, 100.0)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// // Config is serializable (with "serde" feature)
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: DiagramConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramConfig {
    /// Random seed for site placement
    pub seed: u64,

    /// Number of random sites (and therefore cells)
    pub site_count: usize,

    /// Width of the bounding rectangle
    pub width: f64,

    /// Height of the bounding rectangle
    pub height: f64,

    /// Lower-left corner of the bounding rectangle
    pub origin: [f64; 2],

    /// Number of Lloyd's Relaxation iterations applied to the random sites
    ///
    /// - 0: Random Voronoi cells (irregular, default)
    /// - 2-3: Decent uniformity
    /// - 5+: Close to a centroidal tessellation
    pub lloyd_iterations: usize,

    /// Convergence threshold for Lloyd's relaxation (fraction of the box diagonal)
    ///
    /// - 0.0: Disable early termination (run all iterations)
    /// - 0.001: Default
    pub lloyd_convergence: f64,
}

impl DiagramConfig {
    /// The bounding rectangle `[origin, origin + (width, height)]`
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the fields were edited into an invalid box.
    pub fn bounds(&self) -> Result<Bounds> {
        Bounds::new(DVec2::from(self.origin), DVec2::new(self.width, self.height))
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        DiagramConfigBuilder::new().into_config()
    }
}

/// Builder for creating DiagramConfig with validation
///
/// # Example
///
/// ```rust
/// use rust_voronoi_plane::*;
///
/// // Use defaults
/// let config = DiagramConfigBuilder::new().build().unwrap();
///
/// // Customize
/// let config = DiagramConfigBuilder::new()
///     .seed(12345)
///     .site_count(500)
///     .unwrap()
///     .origin(-50.0, -50.0)
///     .lloyd_iterations(3)
///     .unwrap()
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DiagramConfigBuilder {
    seed: Option<u64>,
    site_count: usize,
    width: f64,
    height: f64,
    origin: [f64; 2],
    lloyd_iterations: usize,
    lloyd_convergence: f64,
}

impl DiagramConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random
    /// - site_count: 100
    /// - size: 100 x 100 at origin (0, 0)
    /// - lloyd_iterations: 0
    /// - lloyd_convergence: 0.001
    pub fn new() -> Self {
        Self {
            seed: None,
            site_count: 100,
            width: 100.0,
            height: 100.0,
            origin: [0.0, 0.0],
            lloyd_iterations: 0,
            lloyd_convergence: 0.001,
        }
    }

    /// Set the random seed for site placement
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of random sites
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `count` is zero
    pub fn site_count(mut self, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(VoronoiError::InvalidConfig(
                "site count must be at least 1".to_string(),
            ));
        }
        self.site_count = count;
        Ok(self)
    }

    /// Set the size of the bounding rectangle
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either dimension is not positive and finite
    pub fn size(mut self, width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(VoronoiError::InvalidConfig(format!(
                "bounding box size must be positive (got {} x {})",
                width, height
            )));
        }
        self.width = width;
        self.height = height;
        Ok(self)
    }

    /// Set the lower-left corner of the bounding rectangle
    pub fn origin(mut self, x: f64, y: f64) -> Self {
        self.origin = [x, y];
        self
    }

    /// Set the number of Lloyd's Relaxation iterations
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if iterations > [`MAX_LLOYD_ITERATIONS`]
    pub fn lloyd_iterations(mut self, iterations: usize) -> Result<Self> {
        if iterations > MAX_LLOYD_ITERATIONS {
            return Err(VoronoiError::InvalidConfig(format!(
                "Lloyd iterations must be <= {} (got {})",
                MAX_LLOYD_ITERATIONS, iterations
            )));
        }
        self.lloyd_iterations = iterations;
        Ok(self)
    }

    /// Set the convergence threshold for Lloyd's relaxation
    ///
    /// The threshold is a fraction of the box diagonal.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if threshold is negative or NaN
    pub fn lloyd_convergence(mut self, threshold: f64) -> Result<Self> {
        if threshold.is_nan() || threshold < 0.0 {
            return Err(VoronoiError::InvalidConfig(format!(
                "Lloyd convergence threshold must be >= 0 (got {})",
                threshold
            )));
        }
        self.lloyd_convergence = threshold;
        Ok(self)
    }

    fn into_config(self) -> DiagramConfig {
        DiagramConfig {
            seed: self.seed.unwrap_or_else(rand::random),
            site_count: self.site_count,
            width: self.width,
            height: self.height,
            origin: self.origin,
            lloyd_iterations: self.lloyd_iterations,
            lloyd_convergence: self.lloyd_convergence,
        }
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the origin is not finite.
    pub fn build(self) -> Result<DiagramConfig> {
        let config = self.into_config();
        config.bounds()?;
        Ok(config)
    }
}

impl Default for DiagramConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = DiagramConfigBuilder::new().build().unwrap();
        assert_eq!(config.site_count, 100);
        assert_eq!(config.width, 100.0);
        assert_eq!(config.height, 100.0);
        assert_eq!(config.origin, [0.0, 0.0]);
        assert_eq!(config.lloyd_iterations, 0);
        assert_eq!(config.lloyd_convergence, 0.001);
    }

    #[test]
    fn test_builder_custom() {
        let config = DiagramConfigBuilder::new()
            .seed(42)
            .site_count(10)
            .unwrap()
            .size(40.0, 20.0)
            .unwrap()
            .origin(5.0, -5.0)
            .lloyd_iterations(3)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.site_count, 10);
        assert_eq!(config.lloyd_iterations, 3);

        let bounds = config.bounds().unwrap();
        assert_eq!(bounds.min, DVec2::new(5.0, -5.0));
        assert_eq!(bounds.max, DVec2::new(45.0, 15.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = DiagramConfigBuilder::new()
            .seed(12345)
            .site_count(64)
            .unwrap()
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: DiagramConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }

    #[test]
    fn test_builder_too_many_iterations() {
        assert!(DiagramConfigBuilder::new().lloyd_iterations(50).is_ok());
        assert!(DiagramConfigBuilder::new().lloyd_iterations(51).is_err());
    }

    #[test]
    fn test_builder_invalid_values() {
        assert!(DiagramConfigBuilder::new().site_count(0).is_err());
        assert!(DiagramConfigBuilder::new().size(0.0, 10.0).is_err());
        assert!(DiagramConfigBuilder::new().size(10.0, -1.0).is_err());
        assert!(DiagramConfigBuilder::new().size(f64::INFINITY, 1.0).is_err());
        assert!(DiagramConfigBuilder::new().lloyd_convergence(-0.1).is_err());
        assert!(DiagramConfigBuilder::new().lloyd_convergence(f64::NAN).is_err());
        assert!(DiagramConfigBuilder::new().origin(f64::NAN, 0.0).build().is_err());
    }

    #[test]
    fn test_edited_config_is_rechecked() {
        let mut config = DiagramConfigBuilder::new().seed(1).build().unwrap();
        config.width = -3.0;
        assert!(matches!(config.bounds(), Err(VoronoiError::InvalidConfig(_))));
    }
}
