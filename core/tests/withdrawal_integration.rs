//! Integration tests for the withdrawal auto-processor.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use backoffice_core::mocks::MockPaymentProvider;
use backoffice_core::stores::MemoryWithdrawalStore;
use backoffice_core::{
    PaymentOperator, WithdrawalConfig, WithdrawalProcessor, WithdrawalService, WithdrawalStatus,
};
use chrono::Utc;
use tokio::sync::watch;

fn processor(
    config: WithdrawalConfig,
) -> (
    WithdrawalProcessor<MemoryWithdrawalStore, MockPaymentProvider>,
    MockPaymentProvider,
) {
    let payment = MockPaymentProvider::new();
    let service = WithdrawalService::new(MemoryWithdrawalStore::new(), payment.clone(), config.clone());
    (WithdrawalProcessor::new(service, &config), payment)
}

#[tokio::test]
async fn manual_tick_processes_due_records_only() {
    let (processor, payment) = processor(WithdrawalConfig::default());
    let now = Utc::now();

    let due = processor
        .service()
        .schedule(150.0, "+221770000010", PaymentOperator::Wave, Some(now))
        .await
        .unwrap();
    processor
        .service()
        .schedule(
            200.0,
            "+221770000011",
            PaymentOperator::MtnMomo,
            Some(now + chrono::Duration::seconds(10)),
        )
        .await
        .unwrap();

    let report = processor.tick_now().await.unwrap().unwrap();
    assert_eq!(report.processed, vec![due.id]);
    assert_eq!(payment.debit_count_for("+221770000010"), 1);
    assert_eq!(payment.debit_count_for("+221770000011"), 0);
}

#[tokio::test]
async fn back_to_back_ticks_never_double_debit() {
    let (processor, payment) = processor(WithdrawalConfig::default());
    let now = Utc::now();

    processor
        .service()
        .schedule(80.0, "+221770000020", PaymentOperator::OrangeMoney, Some(now))
        .await
        .unwrap();

    processor.tick_now().await.unwrap();
    processor.tick_now().await.unwrap();
    processor.tick_now().await.unwrap();

    assert_eq!(payment.debit_count_for("+221770000020"), 1);
}

#[tokio::test]
async fn collaborator_failure_marks_record_failed_not_batch() {
    let (processor, payment) = processor(WithdrawalConfig::default());
    let now = Utc::now();

    let failing = processor
        .service()
        .schedule(10.0, "+221770000030", PaymentOperator::Wave, Some(now))
        .await
        .unwrap();
    payment.set_failing(true);

    let report = processor.tick_now().await.unwrap().unwrap();
    assert_eq!(report.failed, vec![failing.id]);
    assert!(report.processed.is_empty());

    let stored = processor.service().get(failing.id).await.unwrap();
    assert_eq!(stored.status, WithdrawalStatus::Failed);
    assert!(!stored.debited);
}

#[tokio::test]
async fn background_loop_processes_and_shuts_down() {
    let config = WithdrawalConfig::default().with_tick_interval(Duration::from_millis(20));
    let (processor, payment) = processor(config);

    processor
        .service()
        .schedule(60.0, "+221770000040", PaymentOperator::Wave, Some(Utc::now()))
        .await
        .unwrap();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let runner = {
        let processor = processor.clone();
        tokio::spawn(async move { processor.run(shutdown_rx).await })
    };

    // Give the loop a few ticks.
    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown_tx.send(true).unwrap();
    runner.await.unwrap();

    assert_eq!(payment.debit_count_for("+221770000040"), 1);
}
