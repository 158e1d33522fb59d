//! Sight module — reticle как screen-space-stable билборд
//!
//! ECS ответственность:
//! - Калибровка угловых границ прицела (один раз на тип оружия)
//! - Registry живых weapon instance'ов
//! - Per-frame evaluation: culling, fade, позиция марки → BillboardRequest
//!
//! Host ответственность:
//! - Entity lifecycle notifications (WeaponSpawned, MarkedForDestruction)
//! - Model introspection (ModelDummies при spawn'е)
//! - CameraPose каждый кадр
//! - Рендер билбордов из BillboardRequest
//!
//! Никакой sight-glass геометрии и render target'ов: только transforms in,
//! billboard requests out.

use bevy::prelude::*;

pub mod calibration;
pub mod components;
pub mod systems;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod calibration_tests;

// Re-export основных типов
pub use calibration::{
    calibrate, calibrate_from_dummies, parse_dummy_name, AnchorStrategy, BoundaryShape,
    CalibrationError, DummyName, MountBasis, SightCalibration,
};
pub use components::{
    BillboardRequest, BlendKind, MarkedForDestruction, ModelDummies, SightCalibrations,
    SightInstance, SightRegistry, WeaponKind, WeaponSpawned,
};
pub use systems::{evaluate_instance, evaluate_sights, fade_for_angle, fade_within, register_sights};

use crate::settings::{emit_model_overrides, ModelOverrideRequest, SightSettings, SightTuning};

/// Sight Plugin
///
/// Регистрирует events, registry ресурсы и цепочку систем в Update.
///
/// Порядок выполнения (один логический поток, frame-synchronous):
/// 1. register_sights — обработка host notifications о новых entity
/// 2. evaluate_sights — prune + culling + эмиссия BillboardRequest
///
/// Startup: emit_model_overrides (one-time замена моделей из настроек).
pub struct SightPlugin;

impl Plugin for SightPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<WeaponSpawned>()
            .add_event::<BillboardRequest>()
            .add_event::<ModelOverrideRequest>()
            .init_resource::<SightSettings>()
            .init_resource::<SightTuning>()
            .init_resource::<SightRegistry>()
            .init_resource::<SightCalibrations>()
            .add_systems(Startup, emit_model_overrides)
            .add_systems(Update, (register_sights, evaluate_sights).chain());
    }
}
