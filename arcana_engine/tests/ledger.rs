use arcana_common::Cents;
use arcana_engine::{
    db_types::*,
    test_utils::{
        prepare_env::{prepare_test_env, random_db_path},
        seed,
    },
    LedgerApi,
    NewOrderRequest,
    OrderFlowApi,
    SqliteDatabase,
    traits::LedgerError,
};
use tokio::runtime::Runtime;

struct TestRig {
    db: SqliteDatabase,
    orders: OrderFlowApi<SqliteDatabase>,
    ledger: LedgerApi<SqliteDatabase>,
    client: Profile,
    reader: Profile,
}

/// Seeds a reader with one R$100.00 gig and a client ready to buy it.
async fn new_test_rig() -> TestRig {
    let url = random_db_path();
    prepare_test_env(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database");
    let client = seed::seed_client(&db, "cli_alice").await;
    let reader = seed::seed_reader(&db, "rdr_bruna").await;
    seed::seed_gig(&db, "gig_spread", "rdr_bruna", 10_000).await;
    seed::set_order_caps(&db, "rdr_bruna", 100, 100).await;
    TestRig { db: db.clone(), orders: OrderFlowApi::new(db.clone()), ledger: LedgerApi::new(db), client, reader }
}

impl TestRig {
    /// Places and settles one order, returning it in the `Paid` state.
    async fn paid_order(&self, payment_id: &str) -> Order {
        let request = NewOrderRequest {
            gig_id: "gig_spread".to_string(),
            selected_addons: Vec::new(),
            requirements_answers: serde_json::Value::Null,
        };
        let order = self.orders.place_order(&self.client, request).await.unwrap();
        self.orders.attach_payment_id(&order.id, payment_id).await.unwrap();
        match self.orders.settle_by_payment_id(payment_id).await.unwrap() {
            SettlementOutcome::Settled { order, .. } => order,
            SettlementOutcome::AlreadySettled(_) => panic!("Fresh order cannot be already settled"),
        }
    }
}

#[test]
fn balances_are_derived_from_the_ledger() {
    let sys = Runtime::new().unwrap();
    sys.block_on(async {
        let rig = new_test_rig().await;

        // No wallet yet: all balances are zero rather than an error.
        let balances = rig.ledger.balances_for_user(&rig.reader.id).await.unwrap();
        assert_eq!(balances, WalletBalances::default());

        // Settlement credits the net amount as pending.
        let order = rig.paid_order("pix_char_001").await;
        let balances = rig.ledger.balances_for_user(&rig.reader.id).await.unwrap();
        assert_eq!(balances.total_earnings, Cents::from(8_500));
        assert_eq!(balances.pending_balance, Cents::from(8_500));
        assert_eq!(balances.available_balance, Cents::from(0));

        // Completion moves the credit from pending to available.
        let content = DeliveryContent::Physical { tracking_code: "BR123456789XX".to_string(), carrier: None };
        rig.orders.deliver_order(&rig.reader, &order.id, content).await.unwrap();
        rig.orders.complete_order(&rig.client, &order.id).await.unwrap();
        let balances = rig.ledger.balances_for_user(&rig.reader.id).await.unwrap();
        assert_eq!(balances.total_earnings, Cents::from(8_500));
        assert_eq!(balances.pending_balance, Cents::from(0));
        assert_eq!(balances.available_balance, Cents::from(8_500));
    });
}

#[test]
fn withdrawals_reserve_funds_immediately() {
    let sys = Runtime::new().unwrap();
    sys.block_on(async {
        let rig = new_test_rig().await;
        let order = rig.paid_order("pix_char_001").await;
        let content = DeliveryContent::Digital {
            cards: vec!["The Moon".to_string()],
            interpretation: "Trust your intuition.".to_string(),
        };
        rig.orders.deliver_order(&rig.reader, &order.id, content).await.unwrap();
        rig.orders.complete_order(&rig.client, &order.id).await.unwrap();

        let entry = rig.ledger.request_withdrawal(&rig.reader, Cents::from(3_000)).await.unwrap();
        assert_eq!(entry.entry_type, EntryType::Withdrawal);
        assert_eq!(entry.status, EntryStatus::Pending);
        assert_eq!(entry.amount, Cents::from(-3_000));
        // The payout destination is snapshotted on the entry.
        assert_eq!(entry.external_id.as_deref(), rig.reader.pix_key.as_deref());

        // The pending withdrawal already reduces the available balance, so the same funds
        // cannot be requested twice.
        let balances = rig.ledger.balances_for_user(&rig.reader.id).await.unwrap();
        assert_eq!(balances.available_balance, Cents::from(5_500));
        assert_eq!(balances.total_earnings, Cents::from(8_500));

        let err = rig.ledger.request_withdrawal(&rig.reader, Cents::from(6_000)).await.unwrap_err();
        assert!(
            matches!(err, LedgerError::InsufficientBalance { available, .. } if available == Cents::from(5_500)),
            "got {err}"
        );
    });
}

#[test]
fn withdrawal_guards() {
    let sys = Runtime::new().unwrap();
    sys.block_on(async {
        let rig = new_test_rig().await;

        // Zero and negative amounts are rejected outright.
        let err = rig.ledger.request_withdrawal(&rig.reader, Cents::from(0)).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount), "got {err}");
        let err = rig.ledger.request_withdrawal(&rig.reader, Cents::from(-100)).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount), "got {err}");

        // No wallet means a zero balance, not a panic.
        let err = rig.ledger.request_withdrawal(&rig.reader, Cents::from(100)).await.unwrap_err();
        assert!(
            matches!(err, LedgerError::InsufficientBalance { available, .. } if available == Cents::from(0)),
            "got {err}"
        );

        // Pending credits are not withdrawable.
        rig.paid_order("pix_char_001").await;
        let err = rig.ledger.request_withdrawal(&rig.reader, Cents::from(100)).await.unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }), "got {err}");

        // A profile without a PIX key cannot withdraw no matter the balance.
        let keyless = seed::seed_client(&rig.db, "cli_keyless").await;
        let err = rig.ledger.request_withdrawal(&keyless, Cents::from(100)).await.unwrap_err();
        assert!(matches!(err, LedgerError::MissingPixKey), "got {err}");
    });
}

#[test]
fn failed_withdrawals_return_funds() {
    let sys = Runtime::new().unwrap();
    sys.block_on(async {
        let rig = new_test_rig().await;
        let order = rig.paid_order("pix_char_001").await;
        let content = DeliveryContent::Digital {
            cards: vec!["Justice".to_string()],
            interpretation: "The scales balance.".to_string(),
        };
        rig.orders.deliver_order(&rig.reader, &order.id, content).await.unwrap();
        rig.orders.complete_order(&rig.client, &order.id).await.unwrap();

        let entry = rig.ledger.request_withdrawal(&rig.reader, Cents::from(8_500)).await.unwrap();
        let balances = rig.ledger.balances_for_user(&rig.reader.id).await.unwrap();
        assert_eq!(balances.available_balance, Cents::from(0));

        // The payout bounced. Marking the entry failed restores the balance; no compensating
        // entry is written.
        let mut conn = rig.db.pool().acquire().await.unwrap();
        arcana_engine::sqlite::db::transactions::set_entry_status(&entry.id, EntryStatus::Failed, &mut conn)
            .await
            .unwrap()
            .unwrap();
        drop(conn);
        let balances = rig.ledger.balances_for_user(&rig.reader.id).await.unwrap();
        assert_eq!(balances.available_balance, Cents::from(8_500));
        assert_eq!(balances.total_earnings, Cents::from(8_500));

        // The ledger itself keeps the failed entry for the audit trail.
        let entries = rig.ledger.entries_for_user(&rig.reader.id).await.unwrap();
        assert_eq!(entries.len(), 2);
    });
}
