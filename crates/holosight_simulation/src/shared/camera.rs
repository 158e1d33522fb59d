//! Camera pose resource
//!
//! Host engine обновляет позу зрителя каждый render frame.

use bevy::math::DVec3;
use bevy::prelude::Resource;

/// World pose камеры (позиция + ортонормированный базис)
///
/// Resource опционален: dedicated server без локального зрителя просто
/// никогда его не вставляет, и evaluation pass ничего не рисует.
///
/// Конвенции осей как у Bevy Transform: forward = -Z, left = -X, up = +Y.
#[derive(Resource, Debug, Clone, Copy)]
pub struct CameraPose {
    pub position: DVec3,
    pub forward: DVec3,
    pub left: DVec3,
    pub up: DVec3,
}

impl CameraPose {
    pub fn new(position: DVec3, forward: DVec3, left: DVec3, up: DVec3) -> Self {
        Self {
            position,
            forward,
            left,
            up,
        }
    }

    /// Камера в world position, смотрит вдоль -Z (axis-aligned)
    pub fn axis_aligned(position: DVec3) -> Self {
        Self {
            position,
            forward: DVec3::NEG_Z,
            left: DVec3::NEG_X,
            up: DVec3::Y,
        }
    }
}
