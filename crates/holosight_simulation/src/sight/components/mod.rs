//! Sight компоненты, events и registry ресурсы
//!
//! ECS ответственность:
//! - Registry живых weapon instance'ов + двухфазный кэш калибровок
//! - Events: WeaponSpawned (host → ECS), BillboardRequest (ECS → host)
//!
//! Host ответственность:
//! - Spawn weapon entity с ModelDummies + WeaponWorldTransform
//! - MarkedForDestruction при despawn'е в движке
//! - Рендер билбордов из BillboardRequest

use bevy::math::DVec3;
use bevy::prelude::*;
use std::collections::HashMap;

use crate::settings::WeaponTypeId;
use crate::sight::calibration::{MountBasis, SightCalibration};

/// Вид weapon entity на границе с host'ом
///
/// Host различает лежащий в мире item и оружие в руках персонажа; оба дают
/// прицелу одинаковый type id. Разрешается один раз при notification,
/// host-специфичные типы дальше границы не проходят.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeaponKind {
    /// Floating item в мире (выброшенное/выпавшее оружие)
    FloatingItem { item_id: WeaponTypeId },

    /// Оружие в руках (hand-held gun entity)
    HeldGun { physical_item_id: WeaponTypeId },
}

impl WeaponKind {
    pub fn weapon_type_id(&self) -> &WeaponTypeId {
        match self {
            WeaponKind::FloatingItem { item_id } => item_id,
            WeaponKind::HeldGun { physical_item_id } => physical_item_id,
        }
    }
}

/// Event: host сообщает о новом entity в мире (entity lifecycle source)
#[derive(Event, Debug, Clone)]
pub struct WeaponSpawned {
    /// ECS entity, заспавненный host-bridge'ем для этого объекта движка
    pub entity: Entity,

    /// Вид + type id (разрешено на границе из host-типов)
    pub kind: WeaponKind,
}

/// Таблица dummy модели: имя → local transform
///
/// Host вставляет при spawn'е weapon entity (model introspection).
/// Читается лениво — один раз на тип оружия при первой регистрации.
#[derive(Component, Debug, Clone, Default)]
pub struct ModelDummies {
    pub dummies: HashMap<String, MountBasis>,
}

impl ModelDummies {
    pub fn with_dummy(name: &str, mount: MountBasis) -> Self {
        let mut dummies = HashMap::new();
        dummies.insert(name.to_string(), mount);
        Self { dummies }
    }
}

/// Marker: entity помечен движком на уничтожение
///
/// Проверяется каждый кадр в evaluation pass'е (не через event) —
/// instance выбрасывается из registry лениво.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MarkedForDestruction;

/// Живой weapon instance в registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SightInstance {
    pub entity: Entity,
    pub type_id: WeaponTypeId,
}

/// Registry живых weapon instance'ов
///
/// Append при регистрации, lazy prune в evaluation pass'е (reverse
/// iteration + swap_remove). Вне evaluation pass'а registry может
/// содержать уже уничтоженные entity.
#[derive(Resource, Debug, Default)]
pub struct SightRegistry {
    pub instances: Vec<SightInstance>,
}

impl SightRegistry {
    pub fn contains(&self, entity: Entity) -> bool {
        self.instances.iter().any(|inst| inst.entity == entity)
    }
}

/// Двухфазный кэш калибровок по типам оружия
///
/// Нет ключа — калибровка ещё не запускалась; Some(None) — запускалась и
/// тип не поддержан (залогировано, instance'ы никогда не рисуются);
/// Some(Some(..)) — готовая immutable калибровка, дальше только чтение.
#[derive(Resource, Debug, Default)]
pub struct SightCalibrations {
    pub by_type: HashMap<WeaponTypeId, Option<SightCalibration>>,
}

impl SightCalibrations {
    /// Готовая калибровка типа (None и для незапущенной, и для неудачной)
    pub fn get(&self, type_id: &WeaponTypeId) -> Option<&SightCalibration> {
        self.by_type.get(type_id).and_then(|c| c.as_ref())
    }

    pub fn is_attempted(&self, type_id: &WeaponTypeId) -> bool {
        self.by_type.contains_key(type_id)
    }
}

/// Blend mode билборда в transparent-geometry системе host'а
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendKind {
    Standard,
    Sdr,
    AdditiveTop,
}

/// Event: запрос на отрисовку билборда марки (ECS → host, per frame)
///
/// Ноль или один request на instance за кадр. Ориентация — оси оружия
/// (left/up), НЕ камеры: марка живёт в плоскости прицела.
#[derive(Event, Debug, Clone)]
pub struct BillboardRequest {
    /// Material id из конфига типа оружия
    pub material: String,

    /// Цвет × интенсивность × fade (RGBA, linear, может быть > 1.0)
    pub color: [f32; 4],

    /// World position билборда
    pub position: DVec3,

    /// Оси ориентации = left/up оружия
    pub left: DVec3,
    pub up: DVec3,

    /// Half-size в метрах
    pub radius: f32,

    /// Blend mode (у марки всегда SDR)
    pub blend: BlendKind,
}
