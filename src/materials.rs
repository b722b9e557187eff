//! Ball materials and color helpers.
//!
//! The ball cycles through a fixed set of materials: two standard
//! metal/rough surfaces, a shiny phong, and a reflection material whose
//! environment map is the secondary camera's render target. The reflection
//! entry is only selectable while the secondary camera is enabled; switching
//! skips over it otherwise, and disabling the camera while it is active falls
//! through to the next material rather than showing a stale environment map.

use glam::Vec3;

/// Attractor tint.
pub const ATTRACTOR_BASE: Vec3 = Vec3::new(0.816, 0.816, 0.0);
/// Attractor emissive color.
pub const ATTRACTOR_EMISSIVE: Vec3 = Vec3::new(1.0, 0.059, 1.0);
/// Attractor emissive intensity.
pub const ATTRACTOR_EMISSIVE_INTENSITY: f32 = 0.2;

/// Convert an HSL triple (all components in [0,1]) to linear-ish RGB.
///
/// Same piecewise formula the ripple shader uses, kept in lockstep so CPU
/// and GPU hues agree.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Vec3 {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h * 6.0).rem_euclid(2.0) - 1.0).abs());
    let m = l - c * 0.5;
    let rgb = if h < 1.0 / 6.0 {
        Vec3::new(c, x, 0.0)
    } else if h < 2.0 / 6.0 {
        Vec3::new(x, c, 0.0)
    } else if h < 3.0 / 6.0 {
        Vec3::new(0.0, c, x)
    } else if h < 4.0 / 6.0 {
        Vec3::new(0.0, x, c)
    } else if h < 5.0 / 6.0 {
        Vec3::new(x, 0.0, c)
    } else {
        Vec3::new(c, 0.0, x)
    };
    rgb + Vec3::splat(m)
}

/// The ball's continuous hue cycle, independent of all other state.
pub fn ball_hue(time: f32) -> f32 {
    (0.2 * time).rem_euclid(1.0)
}

/// Shading model selector for the scene shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    /// Metalness/roughness shading.
    Standard,
    /// Specular-exponent shading.
    Phong,
    /// Phong plus an environment-map lookup.
    Reflection,
}

/// One entry in the material cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub base_color: Vec3,
    pub metalness: f32,
    pub roughness: f32,
    pub shininess: f32,
    pub reflectivity: f32,
}

/// The selectable material cycle.
#[derive(Debug, Clone)]
pub struct MaterialSet {
    materials: [Material; 4],
    index: usize,
}

impl MaterialSet {
    pub fn new() -> Self {
        let materials = [
            Material {
                kind: MaterialKind::Standard,
                base_color: hsl_to_rgb(200.0 / 360.0, 1.0, 0.5),
                metalness: 0.9,
                roughness: 0.2,
                shininess: 0.0,
                reflectivity: 0.0,
            },
            Material {
                kind: MaterialKind::Standard,
                base_color: hsl_to_rgb(100.0 / 360.0, 1.0, 0.5),
                metalness: 0.5,
                roughness: 0.8,
                shininess: 0.0,
                reflectivity: 0.0,
            },
            Material {
                kind: MaterialKind::Phong,
                base_color: hsl_to_rgb(300.0 / 360.0, 1.0, 0.5),
                metalness: 0.0,
                roughness: 0.0,
                shininess: 30.0,
                reflectivity: 0.0,
            },
            Material {
                kind: MaterialKind::Reflection,
                base_color: Vec3::ONE,
                metalness: 0.0,
                roughness: 0.0,
                shininess: 100.0,
                reflectivity: 1.0,
            },
        ];
        Self {
            materials,
            index: 0,
        }
    }

    /// The material currently on the ball.
    pub fn current(&self) -> Material {
        self.materials[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Move to the next material, skipping the reflection entry while the
    /// secondary camera is disabled.
    pub fn advance(&mut self, reflection_enabled: bool) {
        let mut next = (self.index + 1) % self.materials.len();
        if !reflection_enabled && self.materials[next].kind == MaterialKind::Reflection {
            next = (next + 1) % self.materials.len();
        }
        self.index = next;
    }

    /// Keep the selection consistent after the secondary camera turns off.
    pub fn on_reflection_disabled(&mut self) {
        if self.current().kind == MaterialKind::Reflection {
            self.advance(false);
        }
    }
}

impl Default for MaterialSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsl_primaries() {
        assert!((hsl_to_rgb(0.0, 1.0, 0.5) - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
        assert!((hsl_to_rgb(1.0 / 3.0, 1.0, 0.5) - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);
        assert!((hsl_to_rgb(2.0 / 3.0, 1.0, 0.5) - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_hsl_lightness_extremes() {
        assert!((hsl_to_rgb(0.3, 1.0, 0.0)).length() < 1e-6);
        assert!((hsl_to_rgb(0.3, 1.0, 1.0) - Vec3::ONE).length() < 1e-5);
    }

    #[test]
    fn test_ball_hue_wraps() {
        assert!((ball_hue(0.0)).abs() < 1e-6);
        assert!((ball_hue(2.5) - 0.5).abs() < 1e-5);
        assert!((ball_hue(5.0)).abs() < 1e-5);
    }

    #[test]
    fn test_advance_skips_reflection_when_disabled() {
        let mut set = MaterialSet::new();
        set.advance(false); // -> 1
        set.advance(false); // -> 2
        set.advance(false); // -> skips 3, wraps to 0
        assert_eq!(set.index(), 0);
    }

    #[test]
    fn test_advance_reaches_reflection_when_enabled() {
        let mut set = MaterialSet::new();
        set.advance(true);
        set.advance(true);
        set.advance(true);
        assert_eq!(set.current().kind, MaterialKind::Reflection);
    }

    #[test]
    fn test_disable_falls_through_to_next_material() {
        let mut set = MaterialSet::new();
        set.advance(true);
        set.advance(true);
        set.advance(true);
        assert_eq!(set.index(), 3);

        set.on_reflection_disabled();
        assert_eq!(set.index(), 0);
        assert_ne!(set.current().kind, MaterialKind::Reflection);
    }

    #[test]
    fn test_disable_leaves_other_materials_alone() {
        let mut set = MaterialSet::new();
        set.advance(false);
        let before = set.index();
        set.on_reflection_disabled();
        assert_eq!(set.index(), before);
    }
}
