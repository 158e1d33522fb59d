//! Visibility & projection evaluation — per-frame pass
//!
//! Каждый render frame по всем живым instance'ам: lazy prune уничтоженных,
//! цепочка culling-тестов, угловой тест против калиброванной границы, fade,
//! позиция билборда, эмиссия BillboardRequest. Состояния между кадрами нет —
//! каждый кадр считается с нуля из текущих transform'ов.

use bevy::prelude::*;
use std::f64::consts::FRAC_PI_2;

use crate::settings::{SightRenderConfig, SightSettings, SightTuning};
use crate::shared::{CameraPose, WeaponWorldTransform};
use crate::sight::calibration::{AnchorStrategy, BoundaryShape, SightCalibration};
use crate::sight::components::{
    BillboardRequest, BlendKind, MarkedForDestruction, SightCalibrations, SightRegistry,
};

/// Квадрат дистанции камера↔оружие, дальше которой марку не рисуем (5 м).
/// Граница исключается: ровно на пороге instance отбрасывается.
const MAX_VIEW_DIST_SQ: f64 = 5.0 * 5.0;

/// Сдвиг билборда вперёд вдоль луча камера→anchor, чтобы марка рисовалась
/// чуть перед стеклом и не тонула в меше оружия (window-прицелы)
const RETICLE_FRONT_OFFSET: f64 = 0.25;

const RETICLE_BLEND: BlendKind = BlendKind::Sdr;

/// System: per-frame evaluation всех зарегистрированных instance'ов
///
/// Порядок за кадр:
/// 1. Prune: despawned и MarkedForDestruction entity выбрасываются из registry
/// 2. Эмиссия ноль-или-одного BillboardRequest на живой instance,
///    most-recently-added первым (порядок на результат не влияет —
///    request'ы независимы)
///
/// Без камеры (dedicated server) pass ничего не делает.
pub fn evaluate_sights(
    camera: Option<Res<CameraPose>>,
    settings: Res<SightSettings>,
    tuning: Res<SightTuning>,
    calibrations: Res<SightCalibrations>,
    mut registry: ResMut<SightRegistry>,
    weapons: Query<(&WeaponWorldTransform, Has<MarkedForDestruction>)>,
    mut draws: EventWriter<BillboardRequest>,
) {
    if registry.instances.is_empty() {
        return;
    }

    let Some(camera) = camera else {
        return;
    };

    // lazy prune: entity despawned хостом либо помечен на уничтожение
    registry.instances.retain(|inst| match weapons.get(inst.entity) {
        Err(_) => false,
        Ok((_, marked)) => !marked,
    });

    for inst in registry.instances.iter().rev() {
        let Ok((weapon, _)) = weapons.get(inst.entity) else {
            continue;
        };

        if !weapon.is_finite() {
            // transient мусор от host'а: кадр продолжается, instance пропущен
            crate::logger::log_error(&format!(
                "{}: non-finite weapon transform from host, skipping",
                inst.type_id
            ));
            continue;
        }

        let Some(config) = settings.get(&inst.type_id) else {
            continue;
        };

        // None = тип не поддержан (configuration error уже залогирован)
        let Some(calibration) = calibrations.get(&inst.type_id) else {
            continue;
        };

        if let Some(request) = evaluate_instance(
            &camera,
            weapon,
            calibration,
            config,
            tuning.projected_distance,
        ) {
            draws.write(request);
        }
    }
}

/// Оценка одного instance'а — pure, ноль-или-один draw request
pub fn evaluate_instance(
    camera: &CameraPose,
    weapon: &WeaponWorldTransform,
    calibration: &SightCalibration,
    config: &SightRenderConfig,
    projected_distance: f64,
) -> Option<BillboardRequest> {
    // камера смотрит больше чем на 90° в сторону от направления оружия
    if weapon.forward.dot(camera.forward) <= 0.0 {
        return None;
    }

    // слишком далеко чтобы было видно
    if camera.position.distance_squared(weapon.translation) >= MAX_VIEW_DIST_SQ {
        return None;
    }

    let anchor_world = weapon.transform_point(calibration.anchor_local(projected_distance));
    let sight_world = weapon.transform_point(calibration.sight_local());

    // камера физически перед стеклом прицела — марку не рисуем
    if weapon.forward.dot(sight_world - camera.position) < 0.0 {
        return None;
    }

    let cam_to_anchor = (anchor_world - camera.position).normalize();

    let fade = match calibration.shape {
        BoundaryShape::Rectangle => {
            let angle_h = (angle_to(weapon.left, cam_to_anchor) - FRAC_PI_2).abs();
            let angle_v = (angle_to(weapon.up, cam_to_anchor) - FRAC_PI_2).abs();

            let fade_h = fade_within(config.fade_start_ratio, angle_h, calibration.max_angle_h)?;
            let fade_v = fade_within(config.fade_start_ratio, angle_v, calibration.max_angle_v)?;
            fade_h * fade_v
        }
        BoundaryShape::Circle => {
            let angle = angle_to(weapon.forward, cam_to_anchor);
            fade_within(config.fade_start_ratio, angle, calibration.max_angle_h)?
        }
    };

    let position = match calibration.anchor {
        AnchorStrategy::WindowProjected => {
            // на луче камера→anchor, на дистанции до стекла + front offset
            let cam_to_sight = camera.position.distance(sight_world) + RETICLE_FRONT_OFFSET;
            camera.position + cam_to_anchor * cam_to_sight
        }
        // anchor И ЕСТЬ физическая плоскость марки
        AnchorStrategy::ThroughSight => anchor_world,
    };

    Some(BillboardRequest {
        material: config.reticle_material.clone(),
        color: config.reticle_color.map(|c| c * fade),
        position,
        left: weapon.left,
        up: weapon.up,
        radius: config.reticle_size,
        blend: RETICLE_BLEND,
    })
}

/// Угол между двумя unit-направлениями
fn angle_to(a: bevy::math::DVec3, b: bevy::math::DVec3) -> f64 {
    // clamp: dot почти-коллинеарных unit-векторов вылезает за 1.0 на ulp
    a.dot(b).clamp(-1.0, 1.0).acos()
}

/// Fade внутри границы: Some(fade) при angle < boundary, иначе None.
/// Граница strict — angle ровно на boundary марку не рисует.
pub fn fade_within(fade_start_ratio: f64, angle: f64, boundary: f64) -> Option<f32> {
    if angle < boundary {
        Some(fade_for_angle(fade_start_ratio, angle, boundary))
    } else {
        None
    }
}

/// Fade по углу: 1.0 до boundary * fade_start_ratio, дальше линейно к 0.0
/// на boundary
pub fn fade_for_angle(fade_start_ratio: f64, angle: f64, boundary: f64) -> f32 {
    let fade_start = boundary * fade_start_ratio;

    if angle > fade_start {
        let amount = (angle - fade_start) / (boundary - fade_start);
        1.0 - amount as f32
    } else {
        1.0
    }
}
