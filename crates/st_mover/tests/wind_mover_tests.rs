//! crates/st_mover/tests/wind_mover_tests.rs
//!
//! 风漂移器端到端测试
//!
//! 覆盖：
//! - 恒定风、无不确定性的位移换算
//! - 水下/分散粒子在 subsurface 关闭时静止
//! - 扰动项数组大小与子集结构一致
//! - 持续时间窗口内扰动项不变
//! - 零风速下位移恒为零
//! - 批量并行移动与逐粒子计算一致

use std::sync::Arc;

use st_forcing::{ExtrapolationMode, WindField};
use st_foundation::{WorldPoint3D, METERS_PER_DEGREE_LAT};
use st_mover::{
    uncertainty::{within_max_angle, StoreState},
    ConstantMixedLayer, DispersionStatus, LeKind, LeRecord, LeSetSizes, UpdateOutcome, WindMover,
    WindMoverConfig,
};

// ============================================================
// 测试辅助设施
// ============================================================

const HOUR: f64 = 3600.0;

fn seeded(seed: u64) -> WindMoverConfig {
    WindMoverConfig::default().with_seed(seed)
}

fn surface_le(long: f64, lat: f64, windage: f64) -> LeRecord {
    LeRecord::surface(WorldPoint3D::from_degrees(long, lat, 0.0), windage)
}

// ============================================================
// 确定性位移
// ============================================================

#[test]
fn test_constant_east_wind_equator() {
    let mut mover = WindMover::new(seeded(1), WindField::constant(5.0, 0.0)).unwrap();
    mover
        .prepare_for_step(0.0, 0.0, HOUR, false, &LeSetSizes::new(vec![1]))
        .unwrap();

    let le = surface_le(0.0, 0.0, 1.0);
    let d = mover.displacement(0.0, HOUR, 0, 0, &le, LeKind::Forecast);

    let expected = (5.0 / METERS_PER_DEGREE_LAT) * HOUR * 1e6;
    assert_eq!(d.p.lat, 0);
    assert!(d.p.long > 0);
    assert_eq!(d.p.long, expected as i64);
    assert_eq!(d.z, 0.0);
}

#[test]
fn test_windage_scales_linearly() {
    let mover = WindMover::new(seeded(2), WindField::constant(0.0, 10.0)).unwrap();
    let full = mover.displacement(0.0, HOUR, 0, 0, &surface_le(0.0, 30.0, 1.0), LeKind::Forecast);
    let tiny = mover.displacement(0.0, HOUR, 0, 0, &surface_le(0.0, 30.0, 0.03), LeKind::Forecast);

    assert_eq!(full.p.long, 0);
    assert!((tiny.p.lat as f64 - 0.03 * full.p.lat as f64).abs() <= 1.0);
}

#[test]
fn test_interpolated_wind_series() {
    let wind = WindField::time_series(
        vec![0.0, 2.0 * HOUR],
        vec![0.0, 10.0],
        vec![0.0, 0.0],
        ExtrapolationMode::Clamp,
    )
    .unwrap();
    let mover = WindMover::new(seeded(3), wind).unwrap();
    let le = surface_le(0.0, 0.0, 1.0);

    let mid = mover.displacement(HOUR, HOUR, 0, 0, &le, LeKind::Forecast);
    let expected = (5.0 / METERS_PER_DEGREE_LAT) * HOUR * 1e6;
    assert_eq!(mid.p.long, expected as i64);
}

// ============================================================
// 水下与分散粒子
// ============================================================

#[test]
fn test_dispersed_particle_inactive_is_still() {
    let mover = WindMover::new(seeded(4), WindField::constant(10.0, 10.0)).unwrap();
    let le = LeRecord::surface(WorldPoint3D::from_degrees(0.0, 0.0, 50.0), 0.03)
        .with_dispersion(DispersionStatus::HaveDispersed);

    for kind in [LeKind::Forecast, LeKind::Uncertainty] {
        let d = mover.displacement(0.0, HOUR, 0, 0, &le, kind);
        assert!(d.is_zero());
    }
}

#[test]
fn test_deep_surface_oil_inactive_is_still() {
    let mover = WindMover::new(seeded(5), WindField::constant(10.0, 0.0)).unwrap();
    let le = LeRecord::surface(WorldPoint3D::from_degrees(0.0, 0.0, 2.0), 0.03);
    assert!(mover.displacement(0.0, HOUR, 0, 0, &le, LeKind::Forecast).is_zero());
}

#[test]
fn test_dispersed_particle_active_below_mixed_layer() {
    let config = seeded(6).with_subsurface_active(true);
    let mover = WindMover::new(config, WindField::constant(10.0, 0.0))
        .unwrap()
        .with_map(Arc::new(ConstantMixedLayer::new(10.0, 100.0)));

    let shallow = LeRecord::surface(WorldPoint3D::from_degrees(0.0, 0.0, 10.0), 0.03)
        .with_dispersion(DispersionStatus::HaveDispersedNatural);
    let deep = LeRecord::surface(WorldPoint3D::from_degrees(0.0, 0.0, 200.0), 0.03)
        .with_dispersion(DispersionStatus::HaveDispersedNatural);

    let d_shallow = mover.displacement(0.0, HOUR, 0, 0, &shallow, LeKind::Forecast);
    let expected = (10.0 * 0.03 * 2.0 / 3.0 / METERS_PER_DEGREE_LAT) * HOUR * 1e6;
    assert!((d_shallow.p.long as f64 - expected).abs() <= 1.0);
    assert!(d_shallow.p.lat.abs() <= 1);

    assert!(mover.displacement(0.0, HOUR, 0, 0, &deep, LeKind::Forecast).is_zero());
}

// ============================================================
// 不确定性存储
// ============================================================

#[test]
fn test_store_size_tracks_sets() {
    let mut mover = WindMover::new(seeded(7), WindField::constant(5.0, 5.0)).unwrap();

    let configs = [
        vec![10],
        vec![0, 10, 0, 5],
        vec![3, 3, 3],
        vec![],
        vec![0, 0],
        vec![7],
    ];
    for (step, counts) in configs.iter().enumerate() {
        let sets = LeSetSizes::new(counts.clone());
        mover
            .prepare_for_step(step as f64 * 900.0, 0.0, 900.0, true, &sets)
            .unwrap();
        let store = mover.uncertainty_store();
        assert_eq!(store.len(), counts.iter().sum::<usize>());
        assert_eq!(store.set_offsets().len(), counts.len());
        assert_eq!(store.state(), StoreState::Valid);
    }
}

#[test]
fn test_structure_change_forces_reinit() {
    let mut mover = WindMover::new(seeded(8), WindField::constant(5.0, 5.0)).unwrap();

    let outcome = mover
        .prepare_for_step(0.0, 0.0, 900.0, true, &LeSetSizes::new(vec![4, 4]))
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::Reinitialized);

    let outcome = mover
        .prepare_for_step(900.0, 0.0, 900.0, true, &LeSetSizes::new(vec![4, 4]))
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::Unchanged);

    let outcome = mover
        .prepare_for_step(1800.0, 0.0, 900.0, true, &LeSetSizes::new(vec![4, 6]))
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::Reinitialized);
    assert_eq!(mover.uncertainty_store().len(), 10);
}

#[test]
fn test_resample_once_per_persistence_window() {
    let config = seeded(9).with_persistence_duration(2.0 * HOUR);
    let mut mover = WindMover::new(config, WindField::constant(5.0, 5.0)).unwrap();
    let sets = LeSetSizes::new(vec![16]);

    let mut changes = Vec::new();
    let mut last = Vec::new();
    for step in 0..9 {
        let t = step as f64 * 0.5 * HOUR;
        mover.prepare_for_step(t, 0.0, 0.5 * HOUR, true, &sets).unwrap();
        let terms = mover.uncertainty_store().terms().to_vec();
        if terms != last {
            changes.push(t);
        }
        last = terms;
    }

    assert_eq!(changes, vec![0.0, 2.0 * HOUR, 4.0 * HOUR]);
}

#[test]
fn test_uncertainty_off_releases_store() {
    let mut mover = WindMover::new(seeded(10), WindField::constant(5.0, 5.0)).unwrap();
    let sets = LeSetSizes::new(vec![5]);

    mover.prepare_for_step(0.0, 0.0, 900.0, true, &sets).unwrap();
    assert_eq!(mover.uncertainty_store().len(), 5);

    let outcome = mover.prepare_for_step(900.0, 0.0, 900.0, false, &sets).unwrap();
    assert_eq!(outcome, UpdateOutcome::Disabled);
    assert_eq!(mover.uncertainty_store().state(), StoreState::Empty);
    assert!(mover.uncertainty_params().is_none());
}

#[test]
fn test_accepted_terms_respect_max_angle() {
    let mut mover = WindMover::new(seeded(11), WindField::constant(5.0, 5.0)).unwrap();
    let sets = LeSetSizes::new(vec![2000]);
    mover.prepare_for_step(6.0 * HOUR, 0.0, 900.0, true, &sets).unwrap();

    let params = mover.uncertainty_params().unwrap();
    let max_angle = mover.config().max_angle;
    let violations = mover
        .uncertainty_store()
        .terms()
        .iter()
        .filter(|t| !within_max_angle(t, params.sigma_theta, max_angle))
        .count();

    assert_eq!(violations, 0);
}

// ============================================================
// 扰动施加
// ============================================================

#[test]
fn test_zero_wind_never_moves() {
    let mut mover = WindMover::new(seeded(12), WindField::calm()).unwrap();
    let sets = LeSetSizes::new(vec![0, 8]);
    mover.prepare_for_step(12.0 * HOUR, 0.0, HOUR, true, &sets).unwrap();

    for i in 0..8 {
        for windage in [0.01, 0.03, 1.0] {
            let le = surface_le(-72.5, 41.25, windage);
            for kind in [LeKind::Forecast, LeKind::Uncertainty] {
                let d = mover.displacement(12.0 * HOUR, HOUR, 1, i, &le, kind);
                assert!(d.is_zero());
            }
        }
    }
}

#[test]
fn test_uncertainty_member_differs_from_forecast() {
    let mut mover = WindMover::new(seeded(13), WindField::constant(8.0, 3.0)).unwrap();
    let sets = LeSetSizes::new(vec![0, 4]);
    mover.prepare_for_step(6.0 * HOUR, 0.0, HOUR, true, &sets).unwrap();

    let le = surface_le(-72.5, 41.25, 0.03);
    for i in 0..4 {
        let forecast = mover.displacement(6.0 * HOUR, HOUR, 1, i, &le, LeKind::Forecast);
        let uncertain = mover.displacement(6.0 * HOUR, HOUR, 1, i, &le, LeKind::Uncertainty);
        assert_ne!(forecast, uncertain);
        assert_eq!(forecast.z, uncertain.z);
    }
}

#[test]
fn test_uncertainty_member_without_store_matches_forecast() {
    // 不确定性关闭时，不确定性成员退化为确定性位移
    let mut mover = WindMover::new(seeded(14), WindField::constant(8.0, 3.0)).unwrap();
    mover
        .prepare_for_step(HOUR, 0.0, HOUR, false, &LeSetSizes::new(vec![4]))
        .unwrap();

    let le = surface_le(0.0, 10.0, 0.03);
    let forecast = mover.displacement(HOUR, HOUR, 0, 2, &le, LeKind::Forecast);
    let uncertain = mover.displacement(HOUR, HOUR, 0, 2, &le, LeKind::Uncertainty);
    assert_eq!(forecast, uncertain);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let run = || {
        let mut mover = WindMover::new(seeded(15), WindField::constant(6.0, -2.0)).unwrap();
        let sets = LeSetSizes::new(vec![6]);
        mover.prepare_for_step(4.0 * HOUR, 0.0, HOUR, true, &sets).unwrap();
        let le = surface_le(10.0, 50.0, 0.03);
        (0..6)
            .map(|i| mover.displacement(4.0 * HOUR, HOUR, 0, i, &le, LeKind::Uncertainty))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

// ============================================================
// 批量移动
// ============================================================

#[test]
fn test_move_particles_matches_single_calls() {
    let mut mover = WindMover::new(seeded(16), WindField::constant(7.0, 2.0)).unwrap();
    let sets = LeSetSizes::new(vec![64]);
    mover.prepare_for_step(2.0 * HOUR, 0.0, 900.0, true, &sets).unwrap();

    let mut records: Vec<LeRecord> = (0..64)
        .map(|i| surface_le(-70.0 + i as f64 * 0.01, 40.0, 0.03))
        .collect();
    let expected: Vec<WorldPoint3D> = records
        .iter()
        .enumerate()
        .map(|(i, le)| {
            le.position + mover.displacement(2.0 * HOUR, 900.0, 0, i, le, LeKind::Uncertainty)
        })
        .collect();

    let moved = mover
        .move_particles(2.0 * HOUR, 900.0, 0, &mut records, LeKind::Uncertainty)
        .unwrap();
    assert_eq!(moved, 64);
    for (le, want) in records.iter().zip(&expected) {
        assert_eq!(le.position, *want);
    }
}

#[test]
fn test_move_particles_skips_inactive() {
    let mover = WindMover::new(seeded(17), WindField::constant(7.0, 2.0)).unwrap();
    let mut records = vec![
        surface_le(0.0, 0.0, 0.03),
        surface_le(0.0, 0.0, 0.03).with_dispersion(DispersionStatus::HaveDispersed),
    ];
    let before = records[1].position;
    let moved = mover
        .move_particles(0.0, 900.0, 0, &mut records, LeKind::Forecast)
        .unwrap();
    assert_eq!(moved, 1);
    assert_eq!(records[1].position, before);
}

#[test]
fn test_sets_never_share_random_terms() {
    let mut mover = WindMover::new(seeded(18), WindField::constant(8.0, 3.0)).unwrap();
    let sets = LeSetSizes::new(vec![2, 3]);
    mover.prepare_for_step(6.0 * HOUR, 0.0, HOUR, true, &sets).unwrap();

    let le = surface_le(-72.5, 41.25, 0.03);
    let forecast = mover.displacement(6.0 * HOUR, HOUR, 0, 2, &le, LeKind::Forecast);
    let past_end = mover.displacement(6.0 * HOUR, HOUR, 0, 2, &le, LeKind::Uncertainty);
    let next_set = mover.displacement(6.0 * HOUR, HOUR, 1, 0, &le, LeKind::Uncertainty);

    // 超出子集范围的序号没有扰动项，退化为确定性位移
    assert_eq!(past_end, forecast);
    assert_ne!(past_end, next_set);

    let mut records = vec![le; 3];
    assert!(mover
        .move_particles(6.0 * HOUR, HOUR, 0, &mut records, LeKind::Uncertainty)
        .is_err());
}
