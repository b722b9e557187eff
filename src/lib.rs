//! # wavetank
//!
//! An interactive bouncing-ball toy. A ball drifts across a ground plane in
//! front of the camera; clicks queue destination points it chases in order,
//! dragging steers it directly, and right-clicks drop spinning gravity wells
//! that pull it off course. Behind everything a full-screen procedural
//! ripple field trails the ball, and each click fires a short-lived pulse of
//! expanding rings.
//!
//! ## Quick Start
//!
//! ```ignore
//! use winit::event_loop::{ControlFlow, EventLoop};
//!
//! fn main() -> Result<(), wavetank::RunError> {
//!     env_logger::init();
//!     let event_loop = EventLoop::new()?;
//!     event_loop.set_control_flow(ControlFlow::Poll);
//!     let mut app = wavetank::window::App::new();
//!     event_loop.run_app(&mut app)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Structure
//!
//! The simulation core is one explicit context struct, [`Scene`], advanced
//! once per frame and driveable entirely from tests, no GPU required. Each
//! frame runs the same pipeline: the clock ticks, proximity to attractors is
//! classified, the motion integrator picks one of three velocity regimes
//! (target-seeking, drag-following, idle decay), attractor gravity and wall
//! bounces apply, and the ripple state is refreshed.
//!
//! Rendering is an explicit ordered list of passes in [`gpu`]: ripple field
//! to texture, scene composite over it, and an optional secondary-camera
//! pass that feeds both a reflection map and a picture-in-picture preview.
//!
//! | Concern | Module |
//! |---------|--------|
//! | Fixed-step clock, pause/resume | [`clock`] |
//! | Pointer-to-plane mapping | [`camera`] |
//! | Click-target FIFO | [`targets`] |
//! | Gravity-well ring buffer | [`attractors`] |
//! | Velocity regimes, walls, decay | [`motion`] |
//! | Proximity bands | [`proximity`] |
//! | Ripple + click pulse | [`ripple`] |
//! | Material cycle | [`materials`] |
//! | Render passes | [`gpu`] |

pub mod attractors;
pub mod camera;
pub mod clock;
mod error;
pub mod geometry;
pub mod gpu;
pub mod input;
pub mod materials;
pub mod motion;
pub mod proximity;
pub mod ripple;
pub mod scene;
pub mod targets;
pub mod window;

pub use error::{GpuError, RunError};
pub use glam::{Vec2, Vec3};
pub use scene::Scene;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::attractors::{Attractor, AttractorRing};
    pub use crate::camera::{OrbitEye, SceneCamera};
    pub use crate::clock::FrameClock;
    pub use crate::input::MouseButton;
    pub use crate::materials::MaterialSet;
    pub use crate::motion::{Ball, Decay};
    pub use crate::proximity::Proximity;
    pub use crate::ripple::RippleState;
    pub use crate::scene::Scene;
    pub use crate::targets::TargetQueue;
    pub use crate::window::App;
    pub use crate::{RunError, Vec2, Vec3};
}
