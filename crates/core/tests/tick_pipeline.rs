//! End-to-end tick pipeline: ingest → health → flight-mode ceiling → fusion

use quadfc_core::fusion::{FusionAlgorithm, InsConfig};
use quadfc_core::ins::Ins;
use quadfc_core::math::{Vec3, GRAVITY};
use quadfc_core::mode::FlightMode;
use quadfc_core::parameters::{HealthParams, InsParams, ParamValue, ParameterStore};
use quadfc_core::sensors::{ErrorLevel, GpsReading, SensorBank, SensorId};
use quadfc_core::traits::{MockTime, TimeSource};

/// Live, slightly varying samples for every gated sensor
fn feed_all(bank: &mut SensorBank<&MockTime>, i: u64) {
    let jitter = (i % 11) as f64 * 1e-4;
    bank.update_accelerometer(Vec3::new(jitter, 0.0, GRAVITY));
    bank.update_gyroscope(Vec3::new(0.0, jitter, 0.0));
    bank.update_magnetometer(Vec3::new(20.0, jitter, -40.0));
    bank.update_barometer(120.0 + jitter, 1.0, 21.0);
    bank.update_gps(GpsReading::default());
    bank.update_battery(11.4, 3);
}

#[test]
fn stale_accelerometer_caps_at_rate() {
    let clock = MockTime::new();
    let mut bank = SensorBank::new(&clock);
    feed_all(&mut bank, 1);
    assert_eq!(bank.check_errors(), 0);

    clock.advance(150_000);
    bank.update_gyroscope(Vec3::new(0.0, 0.5, 0.0));
    bank.update_magnetometer(Vec3::new(21.0, 0.0, -40.0));
    bank.update_barometer(121.0, 1.0, 21.0);
    bank.update_gps(GpsReading::default());

    assert_eq!(bank.check_errors(), 1);
    assert_eq!(
        bank.health(SensorId::Accelerometer).error_level(),
        ErrorLevel::Critical
    );
    assert_eq!(bank.highest_flight_mode(ErrorLevel::Warning), FlightMode::Rate);

    // Level-triggered: one fresh sample clears it
    bank.update_accelerometer(Vec3::new(0.1, 0.0, GRAVITY));
    assert_eq!(bank.check_errors(), 0);
    assert_eq!(
        bank.highest_flight_mode(ErrorLevel::Warning),
        FlightMode::HIGHEST
    );
}

#[test]
fn hundred_identical_samples_mark_imu_stuck() {
    let clock = MockTime::new();
    let mut bank = SensorBank::new(&clock);
    let sample = Vec3::new(0.01, -0.02, GRAVITY);
    bank.update_accelerometer(sample);

    for _ in 0..99 {
        bank.update_accelerometer(sample);
    }
    assert_eq!(bank.accelerometer().repeat_count(), 99);
    bank.check_errors();
    assert!(!bank.health(SensorId::Accelerometer).is_error());

    bank.update_accelerometer(sample);
    bank.check_errors();
    assert!(bank.health(SensorId::Accelerometer).is_error());

    // Counter saturates and resets on the next distinct sample
    for _ in 0..50 {
        bank.update_accelerometer(sample);
    }
    assert_eq!(bank.accelerometer().repeat_count(), 100);
    bank.update_accelerometer(Vec3::new(0.02, -0.02, GRAVITY));
    assert_eq!(bank.accelerometer().repeat_count(), 0);
    assert_eq!(bank.check_errors(), 0);
}

#[test]
fn barometer_stuck_after_thousand_repeats() {
    let clock = MockTime::new();
    let mut bank = SensorBank::new(&clock);
    bank.update_barometer(35.0, 1.01, 18.0);

    for _ in 0..999 {
        bank.update_barometer(35.0, 1.01, 18.0);
    }
    bank.check_errors();
    assert!(!bank.health(SensorId::Barometer).is_error());

    bank.update_barometer(35.0, 1.02, 18.5);
    assert_eq!(bank.check_errors(), 1);
    assert!(bank.health(SensorId::Barometer).is_error());
    assert_eq!(bank.highest_flight_mode(ErrorLevel::Warning), FlightMode::Level);
}

#[test]
fn barometer_never_times_out() {
    let clock = MockTime::new();
    let mut bank = SensorBank::new(&clock);
    bank.update_barometer(35.0, 1.01, 18.0);
    clock.advance(60_000_000);
    bank.check_errors();
    assert!(!bank.health(SensorId::Barometer).is_error());
    assert!(!bank.health(SensorId::Battery).is_error());
}

#[test]
fn gps_times_out_after_two_seconds() {
    let clock = MockTime::new();
    let mut bank = SensorBank::new(&clock);
    feed_all(&mut bank, 0);

    let mut i = 1;
    while clock.now_us() < 2_000_000 {
        clock.advance(10_000);
        bank.update_accelerometer(Vec3::new(i as f64 * 1e-4, 0.0, GRAVITY));
        bank.update_gyroscope(Vec3::new(0.0, i as f64 * 1e-4, 0.0));
        bank.update_magnetometer(Vec3::new(20.0, i as f64 * 1e-4, -40.0));
        i += 1;
    }
    assert_eq!(clock.now_us(), 2_000_000);
    assert_eq!(bank.check_errors(), 0);

    clock.advance(1);
    assert_eq!(bank.check_errors(), 1);
    assert!(bank.health(SensorId::Gps).is_error());
    assert_eq!(
        bank.highest_flight_mode(ErrorLevel::Warning),
        FlightMode::AltitudeHold
    );
}

#[test]
fn gyro_failure_grounds_the_vehicle() {
    let clock = MockTime::new();
    let mut ins = Ins::new(SensorBank::new(&clock), InsConfig::default());
    ins.tick(|bank| feed_all(bank, 0));
    ins.begin();

    clock.advance(10_000);
    let report = ins.tick(|bank| feed_all(bank, 1));
    assert_eq!(report.highest_flight_mode, FlightMode::GpsHold);

    // Gyroscope and magnetometer stop, everything else keeps streaming
    for i in 2..30 {
        clock.advance(10_000);
        ins.tick(|bank| {
            let jitter = i as f64 * 1e-4;
            bank.update_accelerometer(Vec3::new(jitter, 0.0, GRAVITY));
            bank.update_barometer(120.0 + jitter, 1.0, 21.0);
            bank.update_gps(GpsReading::default());
        });
    }
    let report = ins.tick(|_| {});
    assert_eq!(report.critical_sensors, 2);
    assert!(ins.sensors().health(SensorId::Gyroscope).is_error());
    assert_eq!(report.highest_flight_mode, FlightMode::Dreaming);

    // Attitude holds still without gyro integration
    assert!(ins.is_angle_smaller_than_deg(1.0));
}

#[test]
fn parameters_configure_health_and_fusion() {
    let mut store = ParameterStore::new();
    HealthParams::register_defaults(&mut store).unwrap();
    InsParams::register_defaults(&mut store).unwrap();
    store.set("SENS_IMU_TMO", ParamValue::Int(50)).unwrap();
    store.set("INS_FUSION", ParamValue::Int(1)).unwrap();
    store.set("INS_USE_MAG", ParamValue::Bool(false)).unwrap();

    let health = HealthParams::from_store(&store).to_config().unwrap();
    let config = InsParams::from_store(&store).to_config().unwrap();

    let clock = MockTime::new();
    let mut ins = Ins::new(SensorBank::with_config(&clock, health), config);
    assert_eq!(ins.fusion_algorithm(), FusionAlgorithm::Madgwick);
    assert!(!ins.config().use_mag);

    ins.tick(|bank| feed_all(bank, 0));
    ins.begin();
    for i in 1..200 {
        clock.advance(5_000);
        let report = ins.tick(|bank| feed_all(bank, i));
        assert_eq!(report.critical_sensors, 0);
    }
    assert!(ins.is_angle_smaller_than_deg(2.0));

    // 50 ms timeout from the store, not the 100 ms default
    clock.advance(60_000);
    let report = ins.tick(|bank| bank.update_gps(GpsReading::default()));
    assert_eq!(report.critical_sensors, 3);
    assert_eq!(report.highest_flight_mode, FlightMode::Dreaming);
}

#[test]
fn switching_strategy_keeps_tick_running() {
    let clock = MockTime::new();
    let mut ins = Ins::new(SensorBank::new(&clock), InsConfig::default());
    ins.tick(|bank| feed_all(bank, 0));
    ins.begin();

    for i in 1..100 {
        clock.advance(5_000);
        ins.tick(|bank| feed_all(bank, i));
        if i == 50 {
            ins.set_fusion_algorithm(FusionAlgorithm::Madgwick);
        }
    }
    assert_eq!(ins.fusion_algorithm(), FusionAlgorithm::Madgwick);
    assert!(ins.is_angle_smaller_than_deg(2.0));
    assert!((ins.g_force() - GRAVITY).abs() < 1e-2);
    assert_eq!(ins.highest_flight_mode(), FlightMode::HIGHEST);
}
