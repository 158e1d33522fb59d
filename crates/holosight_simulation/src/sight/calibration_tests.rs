//! Tests for sight calibration geometry.

#[cfg(test)]
mod tests {
    use bevy::math::DVec3;
    use std::collections::HashMap;

    use crate::sight::calibration::{
        calibrate, calibrate_from_dummies, parse_dummy_name, AnchorStrategy, BoundaryShape,
        CalibrationError, DummyName, MountBasis,
    };

    const D: f64 = 400.0;

    #[test]
    fn test_parse_dummy_names() {
        assert_eq!(
            parse_dummy_name("holosight_rectangle"),
            DummyName::Sight {
                anchor: AnchorStrategy::WindowProjected,
                shape: BoundaryShape::Rectangle,
            }
        );
        assert_eq!(
            parse_dummy_name("holosight_circle"),
            DummyName::Sight {
                anchor: AnchorStrategy::WindowProjected,
                shape: BoundaryShape::Circle,
            }
        );
        assert_eq!(
            parse_dummy_name("reddotsight_square"),
            DummyName::Sight {
                anchor: AnchorStrategy::ThroughSight,
                shape: BoundaryShape::Rectangle,
            }
        );
        // qualifier между префиксом и суффиксом допустим
        assert_eq!(
            parse_dummy_name("reddotsight1_circle"),
            DummyName::Sight {
                anchor: AnchorStrategy::ThroughSight,
                shape: BoundaryShape::Circle,
            }
        );

        // распознанный префикс + неизвестный суффикс = configuration error
        assert_eq!(
            parse_dummy_name("holosight_triangle"),
            DummyName::UnsupportedSuffix
        );

        // обычные dummy модели нас не касаются
        assert_eq!(parse_dummy_name("muzzle_flash"), DummyName::NotASight);
        assert_eq!(parse_dummy_name("grip_left"), DummyName::NotASight);
    }

    #[test]
    fn test_window_circle_boundary_angle() {
        // юнит-окно: пол-edge 0.5, проекция 400 → atan(0.5/400), малые углы
        let mount = MountBasis::unit_at(DVec3::ZERO);
        let calib = calibrate(&mount, BoundaryShape::Circle, AnchorStrategy::WindowProjected, D);

        let expected = (0.5f64 / D).atan();
        assert!((calib.max_angle_h - expected).abs() < 1e-12);
        // Circle: вертикаль не используется, хранится тот же угол
        assert_eq!(calib.max_angle_v, calib.max_angle_h);
    }

    #[test]
    fn test_window_rectangle_boundary_angles() {
        // ширина окна 2× высоты → горизонтальная граница шире вертикальной
        let mount = MountBasis::new(
            DVec3::new(0.0, 0.0, -0.3),
            DVec3::NEG_X * 0.10,
            DVec3::Y * 0.05,
            DVec3::NEG_Z * 0.05,
        );
        let calib = calibrate(
            &mount,
            BoundaryShape::Rectangle,
            AnchorStrategy::WindowProjected,
            D,
        );

        assert!((calib.max_angle_h - (0.05f64 / D).atan()).abs() < 1e-12);
        assert!((calib.max_angle_v - (0.025f64 / D).atan()).abs() < 1e-12);
        assert!(calib.max_angle_h > calib.max_angle_v);
    }

    #[test]
    fn test_calibration_is_translation_invariant() {
        // позиция dummy внутри оружия на углы не влияет (вся геометрия
        // относительно anchor'а)
        let at_origin = calibrate(
            &MountBasis::unit_at(DVec3::ZERO),
            BoundaryShape::Circle,
            AnchorStrategy::WindowProjected,
            D,
        );
        let offset = calibrate(
            &MountBasis::unit_at(DVec3::new(0.1, -0.05, -0.4)),
            BoundaryShape::Circle,
            AnchorStrategy::WindowProjected,
            D,
        );

        assert_eq!(at_origin.max_angle_h, offset.max_angle_h);
    }

    #[test]
    fn test_calibration_is_deterministic() {
        let mount = MountBasis::unit_at(DVec3::new(0.0, 0.05, -0.3)).scaled(0.05);

        let a = calibrate(&mount, BoundaryShape::Rectangle, AnchorStrategy::WindowProjected, D);
        let b = calibrate(&mount, BoundaryShape::Rectangle, AnchorStrategy::WindowProjected, D);

        // бит-в-бит: никакого скрытого состояния в выводе углов
        assert_eq!(a.max_angle_h, b.max_angle_h);
        assert_eq!(a.max_angle_v, b.max_angle_v);
        assert_eq!(a, b);
    }

    #[test]
    fn test_dummy_scale_scales_angle() {
        // базис отскейлен под физический размер окна: окно 5 см → углы 5%
        // от юнит-окна (в small-angle режиме)
        let unit = calibrate(
            &MountBasis::unit_at(DVec3::ZERO),
            BoundaryShape::Circle,
            AnchorStrategy::WindowProjected,
            D,
        );
        let small = calibrate(
            &MountBasis::unit_at(DVec3::ZERO).scaled(0.05),
            BoundaryShape::Circle,
            AnchorStrategy::WindowProjected,
            D,
        );

        assert!((small.max_angle_h - (0.025f64 / D).atan()).abs() < 1e-12);
        assert!(small.max_angle_h < unit.max_angle_h);
    }

    #[test]
    fn test_through_sight_anchor_points() {
        // red dot: anchor на пол-глубины назад, стекло на пол-глубины вперёд
        let mount = MountBasis::unit_at(DVec3::new(0.0, 0.0, -0.3));
        let calib = calibrate(&mount, BoundaryShape::Circle, AnchorStrategy::ThroughSight, D);

        assert_eq!(calib.anchor_local(D), DVec3::new(0.0, 0.0, 0.2));
        assert_eq!(calib.sight_local(), DVec3::new(0.0, 0.0, -0.8));

        // формула угла общая с window-вариантом: edge→anchor против forward.
        // для юнит-dummy направление уходит назад → тупой граничный угол
        let expected = (-1.0f64 / 1.25f64.sqrt()).acos();
        assert!((calib.max_angle_h - expected).abs() < 1e-12);
    }

    #[test]
    fn test_window_anchor_uses_projected_distance() {
        let mount = MountBasis::unit_at(DVec3::new(0.0, 0.0, -0.3));
        let calib = calibrate(
            &mount,
            BoundaryShape::Rectangle,
            AnchorStrategy::WindowProjected,
            D,
        );

        assert_eq!(calib.anchor_local(D), DVec3::new(0.0, 0.0, -400.3));
        assert_eq!(calib.sight_local(), DVec3::new(0.0, 0.0, -0.3));
    }

    #[test]
    fn test_projected_distance_sweep_is_stable() {
        // безопасный диапазон projected_distance: углы конечны, положительны,
        // близки к atan(0.5/d) и монотонно убывают с ростом d
        let mount = MountBasis::unit_at(DVec3::ZERO);
        let mut previous = f64::INFINITY;

        for d in [50.0, 100.0, 200.0, 400.0, 1000.0, 2500.0, 5000.0, 10_000.0] {
            let calib = calibrate(&mount, BoundaryShape::Circle, AnchorStrategy::WindowProjected, d);

            assert!(calib.max_angle_h.is_finite());
            assert!(calib.max_angle_h > 0.0);

            let expected = (0.5f64 / d).atan();
            let relative_error = (calib.max_angle_h - expected).abs() / expected;
            assert!(
                relative_error < 1e-6,
                "d={}: angle={} expected={}",
                d,
                calib.max_angle_h,
                expected
            );

            assert!(calib.max_angle_h < previous);
            previous = calib.max_angle_h;
        }
    }

    #[test]
    fn test_calibrate_from_dummies_picks_sight_dummy() {
        let mut dummies = HashMap::new();
        dummies.insert("muzzle_flash".to_string(), MountBasis::unit_at(DVec3::ZERO));
        dummies.insert(
            "holosight_circle".to_string(),
            MountBasis::unit_at(DVec3::new(0.0, 0.0, -0.3)),
        );

        let calib = calibrate_from_dummies(&dummies, D).unwrap();
        assert_eq!(calib.shape, BoundaryShape::Circle);
        assert_eq!(calib.anchor, AnchorStrategy::WindowProjected);
    }

    #[test]
    fn test_calibrate_from_dummies_no_sight_dummy() {
        let mut dummies = HashMap::new();
        dummies.insert("muzzle_flash".to_string(), MountBasis::unit_at(DVec3::ZERO));

        assert_eq!(
            calibrate_from_dummies(&dummies, D),
            Err(CalibrationError::NoSightDummy)
        );
        assert_eq!(
            calibrate_from_dummies(&HashMap::new(), D),
            Err(CalibrationError::NoSightDummy)
        );
    }

    #[test]
    fn test_calibrate_from_dummies_unsupported_suffix() {
        let mut dummies = HashMap::new();
        dummies.insert(
            "holosight_triangle".to_string(),
            MountBasis::unit_at(DVec3::ZERO),
        );

        assert_eq!(
            calibrate_from_dummies(&dummies, D),
            Err(CalibrationError::UnsupportedDummySuffix {
                name: "holosight_triangle".to_string()
            })
        );
    }
}
