//! Sight geometry calibration — вывод угловых границ прицела
//!
//! Один раз на тип оружия: из local transform'а sight dummy в модели
//! выводятся максимальные углы, под которыми марку ещё видно через окно
//! прицела. Вся математика в weapon-local space (forward = -Z), поэтому
//! world transform оружия-шаблона на результат не влияет.
//!
//! Два семейства прицелов = две стратегии anchor'а, формула угла общая:
//! - WindowProjected (holographic): марка проецируется далеко вперёд через
//!   рамку-окно, anchor = dummy + forward * projected_distance
//! - ThroughSight (red dot): марка лежит на теле прицела, anchor = dummy
//!   минус пол-глубины, окно = плоскость на пол-глубины вперёд
//!
//! Dummy naming convention: `{prefix}{qualifier?}{shape suffix}`,
//! например "holosight_rectangle", "reddotsight1_circle".

use bevy::math::DVec3;
use std::collections::HashMap;
use std::fmt;

const DUMMY_PREFIX_HOLO: &str = "holosight";
const DUMMY_PREFIX_RED_DOT: &str = "reddotsight";

const DUMMY_SUFFIX_RECTANGLE: &str = "_rectangle";
const DUMMY_SUFFIX_SQUARE: &str = "_square";
const DUMMY_SUFFIX_CIRCLE: &str = "_circle";

/// Половина edge юнит-dummy: базис dummy в модели отскейлен под физический
/// размер окна, поэтому пол-оси = край окна.
const DUMMY_HALF_EXTENT: f64 = 0.5;

/// Форма границы окна прицела
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryShape {
    /// Две ортогональные границы (max_angle_h + max_angle_v)
    Rectangle,

    /// Одна радиальная граница (только max_angle_h)
    Circle,
}

/// Стратегия размещения reticle anchor'а
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorStrategy {
    /// Anchor спроецирован на projected_distance вперёд (holographic sight);
    /// билборд кладётся на луч камера→anchor чуть перед стеклом
    WindowProjected,

    /// Anchor на теле прицела (red dot); билборд ровно в anchor'е
    ThroughSight,
}

/// Local transform sight dummy: позиция + отскейленный базис
///
/// Оси НЕ юнитарные — их длина кодирует физический размер окна прицела.
/// Всё в weapon-local space (конвенция weapon forward = -Z).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MountBasis {
    pub translation: DVec3,
    pub left: DVec3,
    pub up: DVec3,
    pub forward: DVec3,
}

impl MountBasis {
    pub fn new(translation: DVec3, left: DVec3, up: DVec3, forward: DVec3) -> Self {
        Self {
            translation,
            left,
            up,
            forward,
        }
    }

    /// Юнит-dummy в weapon-local позиции, оси сонаправлены с оружием
    pub fn unit_at(translation: DVec3) -> Self {
        Self {
            translation,
            left: DVec3::NEG_X,
            up: DVec3::Y,
            forward: DVec3::NEG_Z,
        }
    }

    /// Равномерно отскейленная копия (размер окна = scale метров)
    pub fn scaled(&self, scale: f64) -> Self {
        Self {
            translation: self.translation,
            left: self.left * scale,
            up: self.up * scale,
            forward: self.forward * scale,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.translation.is_finite()
            && self.left.is_finite()
            && self.up.is_finite()
            && self.forward.is_finite()
    }
}

/// Результат калибровки типа оружия — immutable после вычисления
///
/// Хранится в SightCalibrations и читается evaluation pass'ом каждый кадр.
#[derive(Debug, Clone, PartialEq)]
pub struct SightCalibration {
    pub shape: BoundaryShape,
    pub anchor: AnchorStrategy,
    pub mount: MountBasis,

    /// Граничный угол по горизонтали (радианы); для Circle — единственный радиус
    pub max_angle_h: f64,

    /// Граничный угол по вертикали (радианы); для Circle не используется
    pub max_angle_v: f64,
}

impl SightCalibration {
    /// Reticle anchor в weapon-local space
    pub fn anchor_local(&self, projected_distance: f64) -> DVec3 {
        match self.anchor {
            AnchorStrategy::WindowProjected => {
                self.mount.translation + DVec3::NEG_Z * projected_distance
            }
            AnchorStrategy::ThroughSight => {
                self.mount.translation - self.mount.forward * DUMMY_HALF_EXTENT
            }
        }
    }

    /// Позиция стекла прицела в weapon-local space (для теста "камера перед стеклом")
    pub fn sight_local(&self) -> DVec3 {
        match self.anchor {
            AnchorStrategy::WindowProjected => self.mount.translation,
            AnchorStrategy::ThroughSight => {
                self.mount.translation + self.mount.forward * DUMMY_HALF_EXTENT
            }
        }
    }
}

/// Ошибка калибровки = configuration error типа оружия (non-fatal)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalibrationError {
    /// В модели нет dummy с распознанным sight-префиксом
    NoSightDummy,

    /// Префикс распознан, shape suffix — нет
    UnsupportedDummySuffix { name: String },
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationError::NoSightDummy => {
                write!(f, "model has no sight dummy (holosight*/reddotsight*)")
            }
            CalibrationError::UnsupportedDummySuffix { name } => {
                write!(f, "unsupported dummy suffix: {}", name)
            }
        }
    }
}

impl std::error::Error for CalibrationError {}

/// Результат разбора имени dummy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DummyName {
    /// Не sight dummy (другие attachment points модели)
    NotASight,

    /// Sight-префикс есть, но shape suffix не из закрытого набора
    UnsupportedSuffix,

    /// Распознанный sight dummy
    Sight {
        anchor: AnchorStrategy,
        shape: BoundaryShape,
    },
}

/// Разбор имени dummy по convention `{prefix}{qualifier?}{shape suffix}`
pub fn parse_dummy_name(name: &str) -> DummyName {
    let anchor = if name.starts_with(DUMMY_PREFIX_HOLO) {
        AnchorStrategy::WindowProjected
    } else if name.starts_with(DUMMY_PREFIX_RED_DOT) {
        AnchorStrategy::ThroughSight
    } else {
        return DummyName::NotASight;
    };

    let shape = if name.ends_with(DUMMY_SUFFIX_RECTANGLE) || name.ends_with(DUMMY_SUFFIX_SQUARE) {
        BoundaryShape::Rectangle
    } else if name.ends_with(DUMMY_SUFFIX_CIRCLE) {
        BoundaryShape::Circle
    } else {
        return DummyName::UnsupportedSuffix;
    };

    DummyName::Sight { anchor, shape }
}

/// Угол между weapon forward и направлением edge → anchor
fn edge_angle(anchor: DVec3, edge: DVec3) -> f64 {
    let edge_to_anchor = (anchor - edge).normalize();
    // clamp: при почти-коллинеарных векторах dot может вылезти за 1.0 на ulp
    DVec3::NEG_Z.dot(edge_to_anchor).clamp(-1.0, 1.0).acos()
}

/// Калибровка из local transform'а sight dummy — pure, детерминированная
///
/// Вся геометрия в weapon-local space: позиция/ориентация конкретного
/// instance'а-шаблона не участвует, результат одинаков для любого
/// instance'а того же типа.
pub fn calibrate(
    mount: &MountBasis,
    shape: BoundaryShape,
    anchor: AnchorStrategy,
    projected_distance: f64,
) -> SightCalibration {
    let (anchor_point, window_center) = match anchor {
        AnchorStrategy::WindowProjected => (
            mount.translation + DVec3::NEG_Z * projected_distance,
            mount.translation,
        ),
        AnchorStrategy::ThroughSight => (
            mount.translation - mount.forward * DUMMY_HALF_EXTENT,
            mount.translation + mount.forward * DUMMY_HALF_EXTENT,
        ),
    };

    let edge_h = window_center + mount.left * DUMMY_HALF_EXTENT;
    let max_angle_h = edge_angle(anchor_point, edge_h);

    let max_angle_v = match shape {
        BoundaryShape::Rectangle => {
            let edge_v = window_center + mount.up * DUMMY_HALF_EXTENT;
            edge_angle(anchor_point, edge_v)
        }
        // для Circle вертикальная граница не используется
        BoundaryShape::Circle => max_angle_h,
    };

    SightCalibration {
        shape,
        anchor,
        mount: *mount,
        max_angle_h,
        max_angle_v,
    }
}

/// Калибровка из таблицы dummy модели (первый распознанный sight dummy)
///
/// Имена перебираются в отсортированном порядке — результат не зависит от
/// порядка итерации HashMap.
pub fn calibrate_from_dummies(
    dummies: &HashMap<String, MountBasis>,
    projected_distance: f64,
) -> Result<SightCalibration, CalibrationError> {
    let mut names: Vec<&String> = dummies.keys().collect();
    names.sort();

    for name in names {
        match parse_dummy_name(name) {
            DummyName::NotASight => continue,
            DummyName::UnsupportedSuffix => {
                return Err(CalibrationError::UnsupportedDummySuffix { name: name.clone() });
            }
            DummyName::Sight { anchor, shape } => {
                let mount = &dummies[name];
                return Ok(calibrate(mount, shape, anchor, projected_distance));
            }
        }
    }

    Err(CalibrationError::NoSightDummy)
}
