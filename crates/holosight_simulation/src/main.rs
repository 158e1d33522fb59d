//! Headless запуск HOLOSIGHT
//!
//! Запускает Bevy App без host engine: один holographic и один red dot
//! прицел, камера уезжает вбок от boresight — печатаем draw requests
//! по мере того как марка гаснет.

use bevy::math::DVec3;
use bevy::prelude::*;

use holosight_simulation::{
    create_headless_app, BillboardRequest, CameraPose, ModelDummies, MountBasis,
    SightRenderConfig, SightSettings, WeaponKind, WeaponSpawned, WeaponTypeId,
    WeaponWorldTransform,
};

fn main() {
    let mut settings = SightSettings::default();
    settings.add_gun("PreciseAutomaticRifleItem", SightRenderConfig::holo());
    settings.add_gun(
        "UltimateAutomaticRifleItem",
        SightRenderConfig {
            reticle_color: [0.0, 1.0, 0.0, 1.0],
            reticle_size: 0.01,
            ..SightRenderConfig::red_dot()
        },
    );

    let mut app = create_headless_app(settings);

    // Holographic sight: окно 5 см, dummy на 30 см вперёд вдоль ствола
    let holo = app
        .world_mut()
        .spawn((
            WeaponWorldTransform::identity_at(DVec3::ZERO),
            ModelDummies::with_dummy(
                "holosight_rectangle",
                MountBasis::unit_at(DVec3::new(0.0, 0.0, -0.3)).scaled(0.05),
            ),
        ))
        .id();

    // Red dot: лежит в мире как floating item в двух метрах левее
    let red_dot = app
        .world_mut()
        .spawn((
            WeaponWorldTransform::identity_at(DVec3::new(-2.0, 0.0, 0.0)),
            ModelDummies::with_dummy(
                "reddotsight_circle",
                MountBasis::unit_at(DVec3::new(0.0, 0.0, -0.25)).scaled(0.05),
            ),
        ))
        .id();

    app.world_mut().send_event(WeaponSpawned {
        entity: holo,
        kind: WeaponKind::HeldGun {
            physical_item_id: WeaponTypeId::from("PreciseAutomaticRifleItem"),
        },
    });
    app.world_mut().send_event(WeaponSpawned {
        entity: red_dot,
        kind: WeaponKind::FloatingItem {
            item_id: WeaponTypeId::from("UltimateAutomaticRifleItem"),
        },
    });

    println!("Starting HOLOSIGHT headless run (lateral camera sweep)");

    // 50 тиков: камера уезжает вбок, марка holo-прицела гаснет около x ≈ 0.025
    for tick in 0..50 {
        let x = tick as f64 * 0.001;
        app.insert_resource(CameraPose::axis_aligned(DVec3::new(x, 0.0, 2.0)));

        app.update();

        let requests: Vec<BillboardRequest> = app
            .world_mut()
            .resource_mut::<Events<BillboardRequest>>()
            .drain()
            .collect();

        for req in &requests {
            println!(
                "tick {:2} x={:.3}: {} alpha={:.3} at ({:.3}, {:.3}, {:.3})",
                tick, x, req.material, req.color[3], req.position.x, req.position.y, req.position.z
            );
        }

        if requests.is_empty() {
            println!("tick {:2} x={:.3}: no draw requests", tick, x);
        }
    }

    println!("Run complete");
}
