//! Searches executed on the local simulator.

use std::time::Duration;

use grover_adapter_sim::SimulatorBackend;
use grover_core::{
    ExecutionMode, GroverError, GroverSearch, PollPolicy, QubitAllocator, RecordingSleeper,
};
use grover_hal::{HalError, device_profile};
use grover_ir::QubitId;

#[tokio::test]
async fn two_qubit_search_finds_marked_item() {
    let backend = SimulatorBackend::new().with_seed(2024);
    let mut search = GroverSearch::new(QubitAllocator::default(), &backend).with_trials(1000);

    let report = search.run(2, 3, ExecutionMode::Noiseless).await.unwrap();
    assert_eq!(report.qubits, 2);
    assert_eq!(report.repeats, 1);
    assert_eq!(report.trials, 1000);
    assert_eq!(report.accuracy.total(), 1000);
    assert!(report.accuracy.value() > 0.25);
    // One round is exact for four items.
    assert_eq!(report.accuracy.hits(), 1000);
    assert_eq!(report.most_frequent, Some(3));
    assert_eq!(
        report.physical_qubits,
        vec![QubitId(11), QubitId(6), QubitId(16)]
    );
}

#[tokio::test]
async fn every_marked_index_is_amplified() {
    let backend = SimulatorBackend::new().with_seed(7);
    let mut search = GroverSearch::new(QubitAllocator::default(), &backend).with_trials(400);

    for n in 2..=4 {
        for s in [0, (1u64 << n) - 1, 1u64 << (n - 1)] {
            let report = search.run(n, s, ExecutionMode::Noiseless).await.unwrap();
            assert!(
                report.accuracy.value() > 0.8,
                "n={n} s={s}: {}",
                report.accuracy
            );
            assert_eq!(report.most_frequent, Some(s));
        }
    }
}

#[tokio::test]
async fn single_qubit_search_is_a_coin_flip() {
    let backend = SimulatorBackend::new().with_seed(99);
    let mut search = GroverSearch::new(QubitAllocator::default(), &backend).with_trials(2000);

    let report = search.run(1, 1, ExecutionMode::Noiseless).await.unwrap();
    assert_eq!(report.repeats, 1);
    let value = report.accuracy.value();
    assert!((0.4..0.6).contains(&value), "accuracy {value}");
}

#[tokio::test]
async fn noisy_search_polls_until_complete() {
    let device = device_profile("19q-acorn").unwrap();
    let backend = SimulatorBackend::from_device(&device)
        .unwrap()
        .with_seed(11)
        .with_pending_polls(3);
    let mut search = GroverSearch::new(QubitAllocator::default(), &backend)
        .with_trials(500)
        .with_policy(PollPolicy::new(Duration::from_millis(100), 10))
        .with_sleeper(RecordingSleeper::new());

    let report = search.run(2, 1, ExecutionMode::Noisy).await.unwrap();
    assert_eq!(report.mode, ExecutionMode::Noisy);
    assert_eq!(report.accuracy.total(), 500);
    assert!(report.accuracy.value() > 0.25, "{}", report.accuracy);
    assert!(report.accuracy.value() < 1.0, "noise should cost some trials");
}

#[tokio::test]
async fn noisy_search_times_out() {
    let backend = SimulatorBackend::new().with_pending_polls(50);
    let mut search = GroverSearch::new(QubitAllocator::default(), &backend)
        .with_trials(10)
        .with_policy(PollPolicy::new(Duration::from_millis(100), 4))
        .with_sleeper(RecordingSleeper::new());

    let err = search.run(2, 0, ExecutionMode::Noisy).await.unwrap_err();
    assert!(matches!(err, GroverError::ExecutionTimeout { polls: 4, .. }));
}

#[tokio::test]
async fn invalid_requests_abort_before_execution() {
    let backend = SimulatorBackend::new();
    let mut search = GroverSearch::new(QubitAllocator::default(), &backend).with_trials(10);

    assert!(matches!(
        search.run(10, 0, ExecutionMode::Noiseless).await,
        Err(GroverError::QubitRange {
            requested: 11,
            available: 10
        })
    ));
    assert!(matches!(
        search.run(3, 8, ExecutionMode::Noiseless).await,
        Err(GroverError::MarkedIndexRange { .. })
    ));
    assert!(matches!(
        search.run(0, 0, ExecutionMode::Noiseless).await,
        Err(GroverError::NoDataQubits)
    ));
}

#[tokio::test]
async fn backend_errors_propagate() {
    // Three qubits do not fit a two-qubit simulator.
    let backend = SimulatorBackend::with_max_qubits(2);
    let mut search = GroverSearch::new(QubitAllocator::default(), &backend).with_trials(10);

    let err = search.run(2, 1, ExecutionMode::Noiseless).await.unwrap_err();
    assert!(matches!(
        err,
        GroverError::Backend(HalError::CircuitTooLarge(_))
    ));
}
