//! World positioning компоненты
//!
//! Host engine владеет физикой и сценой; сюда синхронизируется только
//! world matrix оружия (как и камера — каждый render frame).

use bevy::math::DVec3;
use bevy::prelude::*;

/// World transform оружия (позиция + ортонормированный базис, f64)
///
/// Host engine вставляет компонент при spawn'е weapon entity и обновляет
/// его каждый кадр. Угловая математика работает в double precision —
/// граничные углы прицелов порядка миллирадиан, f32 acos там шумит.
///
/// Конвенции осей как у Bevy Transform: forward = -Z, left = -X, up = +Y.
#[derive(Component, Debug, Clone, Copy)]
pub struct WeaponWorldTransform {
    pub translation: DVec3,
    pub forward: DVec3,
    pub left: DVec3,
    pub up: DVec3,
}

impl WeaponWorldTransform {
    /// Identity-ориентация в world position (forward = -Z)
    pub fn identity_at(translation: DVec3) -> Self {
        Self {
            translation,
            forward: DVec3::NEG_Z,
            left: DVec3::NEG_X,
            up: DVec3::Y,
        }
    }

    /// Точка из weapon-local space в world space
    ///
    /// Local конвенция: x вдоль right (= -left), y вдоль up, z вдоль back (= -forward).
    pub fn transform_point(&self, local: DVec3) -> DVec3 {
        self.translation - self.left * local.x + self.up * local.y - self.forward * local.z
    }

    /// Валидация данных от host'а: NaN/inf в transform'е = transient ошибка кадра
    pub fn is_finite(&self) -> bool {
        self.translation.is_finite()
            && self.forward.is_finite()
            && self.left.is_finite()
            && self.up.is_finite()
    }
}
