//! Sight registration system (host → ECS граница)

use bevy::prelude::*;

use crate::settings::{SightSettings, SightTuning};
use crate::sight::calibration::{calibrate_from_dummies, CalibrationError};
use crate::sight::components::{
    ModelDummies, SightCalibrations, SightInstance, SightRegistry, WeaponSpawned,
};

/// System: регистрация новых weapon entity из host notifications
///
/// Pipeline на event:
/// 1. Type id не в SightSettings → no-op (не каждый entity — tracked weapon)
/// 2. Entity уже в registry → no-op
/// 3. Калибровка типа ещё не запускалась → запускаем один раз, по модели
///    первого увиденного instance'а (геометрия у всех instance'ов типа
///    одинаковая). Неудача — это configuration error: логируем, кэшируем
///    None, instance'ы типа регистрируются но никогда не рисуются.
/// 4. Append SightInstance
pub fn register_sights(
    mut spawned: EventReader<WeaponSpawned>,
    settings: Res<SightSettings>,
    tuning: Res<SightTuning>,
    mut registry: ResMut<SightRegistry>,
    mut calibrations: ResMut<SightCalibrations>,
    dummies: Query<&ModelDummies>,
) {
    for ev in spawned.read() {
        let type_id = ev.kind.weapon_type_id();

        if settings.get(type_id).is_none() {
            continue;
        }

        if registry.contains(ev.entity) {
            continue;
        }

        if !calibrations.is_attempted(type_id) {
            let result = match dummies.get(ev.entity) {
                Ok(model) => {
                    calibrate_from_dummies(&model.dummies, tuning.projected_distance)
                }
                // host не приложил таблицу dummy — модель без sight dummy
                Err(_) => Err(CalibrationError::NoSightDummy),
            };

            match result {
                Ok(calibration) => {
                    if !calibration.mount.is_finite() || !calibration.max_angle_h.is_finite() {
                        // transient мусор от host'а: не кэшируем, следующий
                        // instance типа попробует снова
                        crate::logger::log_error(&format!(
                            "{}: non-finite dummy transform from host, skipping calibration",
                            type_id
                        ));
                    } else {
                        crate::logger::log_info(&format!(
                            "{}: sight calibrated ({:?}/{:?}, max_angle_h={:.6} rad, max_angle_v={:.6} rad)",
                            type_id,
                            calibration.anchor,
                            calibration.shape,
                            calibration.max_angle_h,
                            calibration.max_angle_v,
                        ));
                        calibrations.by_type.insert(type_id.clone(), Some(calibration));
                    }
                }
                Err(err) => {
                    crate::logger::log_error(&format!(
                        "{}: sight calibration failed: {}",
                        type_id, err
                    ));
                    calibrations.by_type.insert(type_id.clone(), None);
                }
            }
        }

        registry.instances.push(SightInstance {
            entity: ev.entity,
            type_id: type_id.clone(),
        });
    }
}
