//! HOLOSIGHT Simulation Core
//!
//! Headless ECS-симуляция holographic/red-dot прицелов на Bevy 0.16.
//! Рисует марку прицела как screen-space-stable билборд, считая всё из
//! transform'ов оружия и камеры — без sight-glass геометрии и render
//! target'ов.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = sight core (калибровка, registry, per-frame evaluation)
//! - Host engine = tactical layer (сцена, модели, рендер билбордов);
//!   общение через events/resources на границе

use bevy::prelude::*;

// Публичные модули
pub mod logger;
pub mod settings;
pub mod shared;
pub mod sight;

// Re-export базовых типов для удобства
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger,
    set_logger_if_needed, LogLevel, LogPrinter, StdoutLogger,
};
pub use settings::{
    emit_model_overrides, ModelOverrideRequest, SightRenderConfig, SightSettings, SightTuning,
    WeaponTypeId,
};
pub use shared::{CameraPose, WeaponWorldTransform};
pub use sight::{
    calibrate, calibrate_from_dummies, evaluate_instance, evaluate_sights, fade_for_angle,
    fade_within, parse_dummy_name, register_sights, AnchorStrategy, BillboardRequest, BlendKind,
    BoundaryShape, CalibrationError, DummyName, MarkedForDestruction, ModelDummies, MountBasis,
    SightCalibration, SightCalibrations, SightInstance, SightPlugin, SightRegistry, WeaponKind,
    WeaponSpawned,
};

/// Headless App с sight core (для тестов и standalone запуска)
///
/// Host-bridge вместо этого добавляет SightPlugin в свой App и ставит
/// собственный LogPrinter.
pub fn create_headless_app(settings: SightSettings) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(settings)
        .add_plugins(SightPlugin);

    app
}
