//! Shared domain — cross-cutting типы
//!
//! Содержит типы используемые в нескольких доменах:
//! - Camera (CameraPose — world pose зрителя, каждый кадр от host engine)
//! - World positioning (WeaponWorldTransform — world matrix оружия)

pub mod camera;
pub mod world;

// Re-export all components
pub use camera::*;
pub use world::*;
