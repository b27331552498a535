mod common;

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use common::{ScriptedClock, parse_date, test_service, test_service_with_clock};
use tally::application::{AppError, LedgerService};
use tally::domain::{MAX_CENTS, TransactionKind};
use tempfile::TempDir;

#[tokio::test]
async fn test_deposit_and_withdraw_scenario() -> Result<()> {
    let (service, _temp) = test_service().await?;

    assert_eq!(service.get_balance().await?, 0);

    let deposit = service.deposit(None, Some(10000)).await?;
    assert_eq!(deposit.kind, TransactionKind::Credit);
    assert_eq!(deposit.amount, 10000);
    assert_eq!(deposit.description, "Deposit");
    assert_eq!(service.get_balance().await?, 10000);

    let result = service.withdraw(None, Some(15000)).await;
    assert!(matches!(
        result,
        Err(AppError::InsufficientFunds {
            balance: 10000,
            required: 15000
        })
    ));

    let withdrawal = service.withdraw(None, Some(4000)).await?;
    assert_eq!(withdrawal.kind, TransactionKind::Debit);
    assert_eq!(withdrawal.description, "Withdrawal");
    assert_eq!(service.get_balance().await?, 6000);

    let transactions = service.list_transactions().await?;
    assert_eq!(transactions, vec![withdrawal, deposit]);

    Ok(())
}

#[tokio::test]
async fn test_balance_is_deposits_minus_withdrawals() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let deposits = [5000, 1250, 99, 30000];
    let withdrawals = [1000, 99, 25000];

    for amount in deposits {
        service.deposit(None, Some(amount)).await?;
    }
    for amount in withdrawals {
        service.withdraw(None, Some(amount)).await?;
    }

    let expected: i64 = deposits.iter().sum::<i64>() - withdrawals.iter().sum::<i64>();
    assert_eq!(service.get_balance().await?, expected);
    assert_eq!(service.list_transactions().await?.len(), 7);

    Ok(())
}

#[tokio::test]
async fn test_withdraw_entire_balance() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.deposit(None, Some(2500)).await?;
    service.withdraw(Some("Everything".into()), Some(2500)).await?;

    assert_eq!(service.get_balance().await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_invalid_deposit_amounts_are_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    for amount in [None, Some(0), Some(-100)] {
        let result = service.deposit(Some("Bad".into()), amount).await;
        assert!(
            matches!(result, Err(AppError::InvalidAmount(_))),
            "amount {:?} should be rejected",
            amount
        );
    }

    assert!(service.list_transactions().await?.is_empty());
    assert_eq!(service.get_balance().await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_invalid_withdrawal_amounts_are_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;
    service.deposit(None, Some(1000)).await?;

    for amount in [None, Some(0), Some(-1)] {
        let result = service.withdraw(None, amount).await;
        assert!(matches!(result, Err(AppError::InvalidAmount(_))));
    }

    assert_eq!(service.list_transactions().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_overdraft_does_not_append() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let result = service.withdraw(None, Some(1)).await;
    assert!(matches!(result, Err(AppError::InsufficientFunds { .. })));

    service.deposit(None, Some(500)).await?;
    let result = service.withdraw(None, Some(501)).await;
    assert!(matches!(result, Err(AppError::InsufficientFunds { .. })));

    assert_eq!(service.list_transactions().await?.len(), 1);
    assert_eq!(service.get_balance().await?, 500);
    Ok(())
}

#[tokio::test]
async fn test_amounts_past_the_limit_are_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    for amount in [MAX_CENTS + 1, i64::MAX] {
        let result = service.deposit(None, Some(amount)).await;
        assert!(matches!(result, Err(AppError::InvalidAmount(_))));
        let result = service.withdraw(None, Some(amount)).await;
        assert!(matches!(result, Err(AppError::InvalidAmount(_))));
    }

    assert!(service.list_transactions().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_deposit_cannot_take_balance_past_the_limit() -> Result<()> {
    let (service, _temp) = test_service().await?;
    service.deposit(None, Some(MAX_CENTS - 100)).await?;

    let result = service.deposit(None, Some(101)).await;
    assert!(matches!(result, Err(AppError::InvalidAmount(_))));
    assert_eq!(service.list_transactions().await?.len(), 1);

    service.deposit(None, Some(100)).await?;
    assert_eq!(service.get_balance().await?, MAX_CENTS);

    service.withdraw(None, Some(MAX_CENTS)).await?;
    assert_eq!(service.get_balance().await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_descriptions() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let salary = service.deposit(Some("Salary".into()), Some(100)).await?;
    assert_eq!(salary.description, "Salary");

    let empty = service.deposit(Some(String::new()), Some(100)).await?;
    assert_eq!(empty.description, "Deposit");

    let rent = service.withdraw(Some("Rent".into()), Some(100)).await?;
    assert_eq!(rent.description, "Rent");

    let empty = service.withdraw(Some(String::new()), Some(100)).await?;
    assert_eq!(empty.description, "Withdrawal");

    Ok(())
}

#[tokio::test]
async fn test_list_is_sorted_regardless_of_insertion_order() -> Result<()> {
    let clock = ScriptedClock::new([
        parse_date("2024-03-10"),
        parse_date("2024-01-05"),
        parse_date("2024-05-20"),
        parse_date("2024-02-01"),
    ]);
    let (service, _temp) = test_service_with_clock(Arc::new(clock)).await?;

    service.deposit(Some("march".into()), Some(1000)).await?;
    service.deposit(Some("january".into()), Some(1000)).await?;
    service.withdraw(Some("may".into()), Some(500)).await?;
    service.deposit(Some("february".into()), Some(1000)).await?;

    let transactions = service.list_transactions().await?;
    let descriptions: Vec<&str> = transactions
        .iter()
        .map(|t| t.description.as_str())
        .collect();
    assert_eq!(descriptions, vec!["may", "march", "february", "january"]);

    assert!(
        transactions
            .windows(2)
            .all(|pair| pair[0].timestamp >= pair[1].timestamp)
    );
    Ok(())
}

#[tokio::test]
async fn test_same_timestamp_lists_latest_first() -> Result<()> {
    let instant = parse_date("2024-06-01");
    let clock = ScriptedClock::new([instant, instant]);
    let (service, _temp) = test_service_with_clock(Arc::new(clock)).await?;

    let deposit = service.deposit(None, Some(10000)).await?;
    let withdrawal = service.withdraw(None, Some(4000)).await?;

    assert_eq!(
        service.list_transactions().await?,
        vec![withdrawal, deposit]
    );
    Ok(())
}

#[tokio::test]
async fn test_reads_are_idempotent() -> Result<()> {
    let (service, _temp) = test_service().await?;
    service.deposit(None, Some(700)).await?;
    service.withdraw(None, Some(200)).await?;

    assert_eq!(service.get_balance().await?, service.get_balance().await?);
    assert_eq!(
        service.list_transactions().await?,
        service.list_transactions().await?
    );
    Ok(())
}

#[tokio::test]
async fn test_ids_are_unique() -> Result<()> {
    let temp = TempDir::new()?;
    let service = LedgerService::init(temp.path().join("data.json")).await?;

    for _ in 0..20 {
        service.deposit(None, Some(100)).await?;
        service.withdraw(None, Some(50)).await?;
    }

    let transactions = service.list_transactions().await?;
    let ids: HashSet<&str> = transactions.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids.len(), 40);
    Ok(())
}

#[tokio::test]
async fn test_ledger_survives_reopening() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("data.json");

    let first = LedgerService::init(&path).await?;
    let tx = first.deposit(Some("Opening".into()), Some(4250)).await?;

    let second = LedgerService::init(&path).await?;
    assert_eq!(second.get_balance().await?, 4250);
    assert_eq!(second.list_transactions().await?, vec![tx]);
    Ok(())
}

#[tokio::test]
async fn test_large_odd_amounts_survive_reopening() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("data.json");

    let first = LedgerService::init(&path).await?;
    let big = first.deposit(None, Some(900_719_925_474_099)).await?;
    let odd = first.deposit(None, Some(1_234_567_890_123)).await?;
    let out = first.withdraw(None, Some(1)).await?;

    let second = LedgerService::init(&path).await?;
    assert_eq!(
        second.get_balance().await?,
        900_719_925_474_099 + 1_234_567_890_123 - 1
    );
    let mut reread = second.list_transactions().await?;
    reread.sort_by(|a, b| a.id.cmp(&b.id));
    let mut written = vec![big, odd, out];
    written.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(reread, written);
    Ok(())
}

#[tokio::test]
async fn test_persisted_document_layout() -> Result<()> {
    let (service, temp) = test_service().await?;
    service.deposit(Some("Salary".into()), Some(10050)).await?;

    let raw = std::fs::read_to_string(temp.path().join("data.json"))?;
    let document: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(
        document,
        serde_json::json!({
            "transactions": [{
                "id": "tx-1",
                "description": "Salary",
                "kind": "CREDIT",
                "amount": 100.5,
                "timestamp": "2024-01-01T00:00:00.000Z"
            }]
        })
    );
    Ok(())
}

#[tokio::test]
async fn test_reads_existing_file_written_elsewhere() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("data.json");
    std::fs::write(
        &path,
        r#"{
  "transactions": [
    {"id": "a", "description": "Deposit", "kind": "CREDIT", "amount": 100, "timestamp": "2024-01-01T10:00:00.000Z"},
    {"id": "b", "description": "Withdrawal", "kind": "DEBIT", "amount": 40, "timestamp": "2024-01-01T11:00:00.000Z"}
  ]
}"#,
    )?;

    let service = LedgerService::init(&path).await?;
    assert_eq!(service.get_balance().await?, 6000);

    let ids: Vec<String> = service
        .list_transactions()
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec!["b", "a"]);
    Ok(())
}

#[tokio::test]
async fn test_malformed_file_surfaces_storage_error() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("data.json");
    std::fs::write(&path, "{ definitely not json")?;

    let service = LedgerService::init(&path).await?;
    assert!(matches!(
        service.get_balance().await,
        Err(AppError::Storage(_))
    ));
    assert!(matches!(
        service.deposit(None, Some(100)).await,
        Err(AppError::Storage(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_file_summing_past_the_limit_is_a_storage_error() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("data.json");
    let entry = |id: &str| {
        format!(
            r#"{{"id": "{}", "description": "Deposit", "kind": "CREDIT", "amount": 9999999999999.99, "timestamp": "2024-01-01T10:00:00.000Z"}}"#,
            id
        )
    };
    let entries: Vec<String> = (0..9300).map(|i| entry(&format!("t{}", i))).collect();
    std::fs::write(
        &path,
        format!(r#"{{"transactions": [{}]}}"#, entries.join(",")),
    )?;

    let service = LedgerService::init(&path).await?;
    assert!(matches!(
        service.get_balance().await,
        Err(AppError::Storage(_))
    ));
    assert!(matches!(
        service.deposit(None, Some(1)).await,
        Err(AppError::Storage(_))
    ));
    assert!(matches!(
        service.withdraw(None, Some(1)).await,
        Err(AppError::Storage(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_file_with_an_amount_past_the_limit_is_a_storage_error() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("data.json");
    std::fs::write(
        &path,
        r#"{"transactions": [{"id": "a", "description": "Deposit", "kind": "CREDIT", "amount": 92233720368547758.07, "timestamp": "2024-01-01T10:00:00.000Z"}]}"#,
    )?;

    let service = LedgerService::init(&path).await?;
    assert!(matches!(
        service.get_balance().await,
        Err(AppError::Storage(_))
    ));
    Ok(())
}
