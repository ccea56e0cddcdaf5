//! End-to-end tests of complete simulation runs.

use acc_sim::{
    params, DiscreteMode, LeadProfile, Phase, Simulation, SimulationParams, VehicleState,
};

fn run(params: SimulationParams) -> acc_sim::History {
    Simulation::new(params).expect("valid params").run()
}

/// The lead slows from 20 to 10 m/s and back while the ego follows it.
#[test]
fn reference_scenario_stays_safe() {
    for seed in 0..3 {
        let history = run(SimulationParams {
            seed,
            ..Default::default()
        });
        let summary = history.summary();

        assert_eq!(summary.steps, 6000);
        assert_eq!(summary.violations, 0);
        assert!(summary.min_distance > 25.0, "{}", summary.min_distance);
        assert!(history.visited(DiscreteMode::Follow));
        assert!(history.visited(DiscreteMode::Cruise));
        assert!(!history.visited(DiscreteMode::EmergencyBrake));
    }
}

fn hard_braking() -> SimulationParams {
    SimulationParams {
        duration: 10.0,
        lead: VehicleState {
            position: 20.0,
            velocity: 20.0,
            acceleration: 0.0,
        },
        ego: VehicleState {
            position: 0.0,
            velocity: 25.0,
            acceleration: 0.0,
        },
        profile: LeadProfile {
            phases: vec![
                Phase {
                    until: 1.0,
                    acceleration: 0.0,
                },
                Phase {
                    until: 3.5,
                    acceleration: -8.0,
                },
            ],
            final_acceleration: 0.0,
        },
        ..Default::default()
    }
}

/// The lead brakes harder than the ego can, so the gap is breached.
#[test]
fn hard_braking_triggers_emergency() {
    let history = run(hard_braking());
    let summary = history.summary();

    assert!(history.visited(DiscreteMode::EmergencyBrake));
    assert!(summary.violations > 0);
    assert!(summary.violations < history.len());
    assert!(summary.min_distance < 10.0);

    // Following engages before the emergency does.
    let first_emergency = history
        .mode
        .iter()
        .position(|m| *m == DiscreteMode::EmergencyBrake)
        .unwrap();
    assert!(history.mode[..first_emergency].contains(&DiscreteMode::Follow));

    // Emergency braking holds the full braking command.
    let braking = history.mode.iter().zip(&history.ego_acceleration);
    for (mode, acc) in braking.skip(first_emergency + 20).take(50) {
        if *mode == DiscreteMode::EmergencyBrake {
            assert_eq!(*acc, -5.0);
        }
    }

    for violation in &history.violations {
        assert!(violation.distance < 10.0);
    }
}

#[test]
fn same_seed_same_run() {
    let a = run(hard_braking());
    let b = run(hard_braking());
    assert_eq!(a, b);

    let a = run(SimulationParams {
        seed: 17,
        duration: 20.0,
        ..Default::default()
    });
    let b = run(SimulationParams {
        seed: 17,
        duration: 20.0,
        ..Default::default()
    });
    assert_eq!(a, b);
}

#[test]
fn monitor_matches_history() {
    let mut sim = Simulation::new(hard_braking()).unwrap();
    while sim.time() < 6.0 {
        sim.step();
    }
    assert_eq!(sim.monitor().violations(), &sim.history().violations[..]);
    assert_eq!(sim.history().distance.last().copied(), Some(sim.distance()));
}

#[test]
fn example_params_file() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/params/hard_braking.toml");
    let loaded = params::load(path).unwrap();
    assert_eq!(
        loaded,
        SimulationParams {
            seed: 1,
            ..hard_braking()
        }
    );
}
