//! Configuration parsing and validation for fluid simulations

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fs;

use kernel::{IntegrationMode, SimParams};

/// Main simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Human-readable simulation name
    pub name: String,
    /// Number of particles to spawn
    pub particle_count: usize,
    /// Kernel support radius (simulation units)
    pub smoothing_radius: f32,
    /// Rest density the equation of state relaxes toward
    pub target_density: f32,
    /// Stiffness of the equation of state
    pub pressure_multiplier: f32,
    /// Downward gravity magnitude
    #[serde(default)]
    pub gravity: f32,
    /// Velocity retention on wall impact, in [0, 1]
    #[serde(default = "default_collision_damping")]
    pub collision_damping: f32,
    /// Uniform particle mass
    #[serde(default = "default_particle_mass")]
    pub particle_mass: f32,
    /// Physical particle radius used for wall clearance and grid spacing
    pub particle_radius: f32,
    /// Extra gap between particles in the grid layout
    #[serde(default)]
    pub particle_spacing: f32,
    /// Full extents [width, height] of the bounds box centered at the origin
    pub bounds_size: [f32; 2],
    /// Initial particle placement
    #[serde(default)]
    pub layout: InitialLayout,
    /// Neighbor query mode
    #[serde(default = "default_integration")]
    pub integration: IntegrationMode,
    /// Simulation sub-steps per rendered frame
    #[serde(default = "default_substeps")]
    pub substeps_per_frame: u32,
    /// Simulated duration of one rendered frame (seconds)
    #[serde(default = "default_frame_dt")]
    pub frame_dt: f32,
    /// Pointer force parameters; absent disables the pointer force
    #[serde(default)]
    pub pointer: Option<PointerConfig>,
    /// Stop after this many simulation sub-steps
    pub max_timesteps: Option<u64>,
    /// Stop after this much simulated time (seconds)
    pub max_time: Option<f64>,
}

/// Initial particle placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InitialLayout {
    /// Centered square grid at rest spacing
    Grid,
    /// Uniform random placement inside the bounds, reproducible by seed
    Random {
        /// RNG seed
        seed: u64,
    },
}

impl Default for InitialLayout {
    fn default() -> Self {
        Self::Grid
    }
}

/// Pointer force parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointerConfig {
    /// Influence radius around the pointer position
    pub radius: f32,
    /// Pull/push strength magnitude; the driver picks the sign per frame
    pub strength: f32,
}

// Default values
fn default_collision_damping() -> f32 {
    0.4
}

fn default_particle_mass() -> f32 {
    1.0
}

fn default_integration() -> IntegrationMode {
    IntegrationMode::Predicted
}

fn default_substeps() -> u32 {
    3
}

fn default_frame_dt() -> f32 {
    1.0 / 60.0
}

impl SimulationConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &str) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {}", path, e))?;

        let config: SimulationConfig = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse config JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.particle_count == 0 {
            return Err("Particle count must be positive".to_string());
        }

        if self.smoothing_radius <= 0.0 {
            return Err("Smoothing radius must be positive".to_string());
        }

        if self.target_density <= 0.0 {
            return Err("Target density must be positive".to_string());
        }

        if self.particle_mass <= 0.0 {
            return Err("Particle mass must be positive".to_string());
        }

        if !(0.0..=1.0).contains(&self.collision_damping) {
            return Err("Collision damping must be in range [0, 1]".to_string());
        }

        if self.particle_radius < 0.0 {
            return Err("Particle radius must be non-negative".to_string());
        }

        if self.particle_spacing < 0.0 {
            return Err("Particle spacing must be non-negative".to_string());
        }

        if self.bounds_size[0] <= 0.0 || self.bounds_size[1] <= 0.0 {
            return Err("Bounds extents must be positive".to_string());
        }

        if self.particle_radius >= self.half_bounds().min_element() {
            return Err("Particle radius must fit inside the bounds".to_string());
        }

        if self.substeps_per_frame == 0 {
            return Err("Substeps per frame must be at least 1".to_string());
        }

        if self.frame_dt <= 0.0 {
            return Err("Frame dt must be positive".to_string());
        }

        if let Some(pointer) = &self.pointer {
            if pointer.radius <= 0.0 {
                return Err("Pointer radius must be positive".to_string());
            }
            if pointer.strength <= 0.0 {
                return Err("Pointer strength must be positive".to_string());
            }
        }

        if let Some(max_timesteps) = self.max_timesteps {
            if max_timesteps == 0 {
                return Err("max_timesteps must be at least 1".to_string());
            }
        }

        if let Some(max_time) = self.max_time {
            if max_time <= 0.0 {
                return Err("max_time must be positive".to_string());
            }
        }

        Ok(())
    }

    /// Half extents of the bounds box
    pub fn half_bounds(&self) -> Vec2 {
        Vec2::new(self.bounds_size[0] / 2.0, self.bounds_size[1] / 2.0)
    }

    /// Grid layout spacing: one particle diameter plus the configured gap
    pub fn grid_spacing(&self) -> f32 {
        self.particle_radius * 2.0 + self.particle_spacing
    }

    /// Kernel parameters derived from this configuration
    pub fn sim_params(&self) -> SimParams {
        SimParams {
            smoothing_radius: self.smoothing_radius,
            target_density: self.target_density,
            pressure_multiplier: self.pressure_multiplier,
            gravity: self.gravity,
            collision_damping: self.collision_damping,
            particle_mass: self.particle_mass,
            particle_radius: self.particle_radius,
            half_bounds: self.half_bounds(),
            integration: self.integration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> SimulationConfig {
        SimulationConfig {
            name: "test".to_string(),
            particle_count: 1024,
            smoothing_radius: 23.0,
            target_density: 0.007,
            pressure_multiplier: 2700.0,
            gravity: 8.0,
            collision_damping: default_collision_damping(),
            particle_mass: default_particle_mass(),
            particle_radius: 3.1,
            particle_spacing: 1.9,
            bounds_size: [1280.0, 720.0],
            layout: InitialLayout::default(),
            integration: default_integration(),
            substeps_per_frame: default_substeps(),
            frame_dt: default_frame_dt(),
            pointer: None,
            max_timesteps: None,
            max_time: None,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn rejects_zero_particles() {
        let mut config = base_config();
        config.particle_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_smoothing_radius() {
        let mut config = base_config();
        config.smoothing_radius = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_damping_outside_unit_interval() {
        let mut config = base_config();
        config.collision_damping = 1.01;
        assert!(config.validate().is_err());
        config.collision_damping = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_oversized_particle_radius() {
        let mut config = base_config();
        config.particle_radius = 360.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_pointer_parameters() {
        let mut config = base_config();
        config.pointer = Some(PointerConfig {
            radius: 0.0,
            strength: 2.0,
        });
        assert!(config.validate().is_err());
        config.pointer = Some(PointerConfig {
            radius: 80.0,
            strength: 2.0,
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn minimal_json_uses_defaults() {
        let json = r#"{
            "name": "minimal",
            "particle_count": 256,
            "smoothing_radius": 23.0,
            "target_density": 0.001,
            "pressure_multiplier": 1200.0,
            "particle_radius": 3.1,
            "bounds_size": [1280.0, 720.0]
        }"#;
        let config: SimulationConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.gravity, 0.0);
        assert_eq!(config.collision_damping, 0.4);
        assert_eq!(config.particle_mass, 1.0);
        assert_eq!(config.substeps_per_frame, 3);
        assert!(matches!(config.layout, InitialLayout::Grid));
        assert_eq!(config.integration, IntegrationMode::Predicted);
        assert!(config.pointer.is_none());
    }

    #[test]
    fn json_roundtrip_preserves_layout_variant() {
        let mut config = base_config();
        config.layout = InitialLayout::Random { seed: 1234 };
        let json = serde_json::to_string(&config).unwrap();
        let back: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert!(matches!(back.layout, InitialLayout::Random { seed: 1234 }));
    }

    #[test]
    fn grid_spacing_is_diameter_plus_gap() {
        let config = base_config();
        assert!((config.grid_spacing() - 8.1).abs() < 1.0e-6);
    }
}
