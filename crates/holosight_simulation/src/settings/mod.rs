//! Authored sight settings — per-gun конфигурация
//!
//! ECS ответственность:
//! - SightSettings: таблица weapon type id → SightRenderConfig
//! - SightTuning: численные константы калибровки
//! - ModelOverrideRequest: one-time замена визуальной модели (Startup)
//!
//! Host ответственность:
//! - Загрузка таблицы из data-файлов (serde) либо hardcoded setup
//! - Применение ModelOverrideRequest к definition системе движка

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;

/// Id типа оружия (subtype физического item'а в definition системе host'а)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct WeaponTypeId(pub String);

impl From<&str> for WeaponTypeId {
    fn from(subtype: &str) -> Self {
        Self(subtype.to_string())
    }
}

impl std::fmt::Display for WeaponTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Рендер-настройки прицельной марки одного типа оружия
///
/// Цвет linear RGB + intensity: компоненты могут быть > 1.0 (HDR/bloom).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SightRenderConfig {
    /// Material id марки в transparent-geometry системе host'а
    pub reticle_material: String,

    /// Цвет × интенсивность (RGBA, linear)
    pub reticle_color: [f32; 4],

    /// Half-size билборда в метрах (марка должна быть крошечной)
    pub reticle_size: f32,

    /// Доля граничного угла с которой начинается fade-out.
    /// 0.0 — гаснет сразу от центра; ближе к 1.0 — почти без fade'а.
    pub fade_start_ratio: f64,

    /// Замена модели оружия (None = не трогаем definition)
    pub replace_model: Option<String>,
}

impl Default for SightRenderConfig {
    fn default() -> Self {
        Self::holo()
    }
}

impl SightRenderConfig {
    /// Дефолты для holographic sight (красная марка ×2, fade от 80% границы)
    pub fn holo() -> Self {
        Self {
            reticle_material: "HoloSight_Reticle".to_string(),
            reticle_color: [2.0, 0.0, 0.0, 2.0],
            reticle_size: 0.008,
            fade_start_ratio: 0.8,
            replace_model: None,
        }
    }

    /// Дефолты для red dot sight (fade с половины границы)
    pub fn red_dot() -> Self {
        Self {
            reticle_material: "RedDotSight_Reticle".to_string(),
            reticle_color: [2.0, 0.0, 0.0, 2.0],
            reticle_size: 0.008,
            fade_start_ratio: 0.5,
            replace_model: None,
        }
    }
}

/// Таблица sight-настроек по типам оружия (authored data)
///
/// Не каждый entity в мире — tracked weapon: отсутствие type id в таблице
/// означает "этот тип нас не интересует", регистрация будет no-op.
#[derive(Resource, Debug, Clone, Default, Deserialize)]
pub struct SightSettings {
    pub guns: HashMap<WeaponTypeId, SightRenderConfig>,
}

impl SightSettings {
    /// Добавить поддерживаемый тип оружия (setup при старте)
    pub fn add_gun(&mut self, subtype: &str, config: SightRenderConfig) {
        self.guns.insert(WeaponTypeId::from(subtype), config);
    }

    pub fn get(&self, type_id: &WeaponTypeId) -> Option<&SightRenderConfig> {
        self.guns.get(type_id)
    }
}

/// Численные константы калибровки
#[derive(Resource, Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SightTuning {
    /// Дистанция проекции reticle anchor'а для window-прицелов, в метрах.
    ///
    /// Безопасный диапазон ≈ 50..10_000: меньше — parallax конечной ширины
    /// окна заметно искажает граничный угол, больше — acos около 1.0
    /// начинает терять точность. Дефолт 400.0.
    pub projected_distance: f64,
}

impl Default for SightTuning {
    fn default() -> Self {
        Self {
            projected_distance: 400.0,
        }
    }
}

/// Event: запрос замены визуальной модели типа оружия (Startup, one-time)
///
/// Definition система host'а применяет замену до spawn'а первых instance'ов.
#[derive(Event, Debug, Clone)]
pub struct ModelOverrideRequest {
    pub type_id: WeaponTypeId,
    pub model_path: String,
}

/// System: эмиссия ModelOverrideRequest для всех типов с replace_model
///
/// Выполняется один раз в Startup; host читает events в первом Update.
pub fn emit_model_overrides(
    settings: Res<SightSettings>,
    mut requests: EventWriter<ModelOverrideRequest>,
) {
    for (type_id, config) in settings.guns.iter() {
        if let Some(path) = &config.replace_model {
            requests.write(ModelOverrideRequest {
                type_id: type_id.clone(),
                model_path: path.clone(),
            });
        }
    }
}
