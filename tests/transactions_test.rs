mod common;

use anyhow::Result;
use common::test_service;
use tally::application::{AppError, ErrorKind};
use tally::domain::TransactionKind;

#[tokio::test]
async fn test_income_increases_balance() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .create_transaction(
            "Salary".to_string(),
            TransactionKind::Income,
            500000,
            "Salary".to_string(),
        )
        .await?;

    let balance = service.get_balance().await?;
    assert_eq!(balance.income, 500000);
    assert_eq!(balance.outcome, 0);
    assert_eq!(balance.total, 500000);

    Ok(())
}

#[tokio::test]
async fn test_outcome_decreases_balance() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .create_transaction(
            "Salary".to_string(),
            TransactionKind::Income,
            10000,
            "Salary".to_string(),
        )
        .await?;
    service
        .create_transaction(
            "Groceries".to_string(),
            TransactionKind::Outcome,
            2500,
            "Food".to_string(),
        )
        .await?;

    let balance = service.get_balance().await?;
    assert_eq!(balance.income, 10000);
    assert_eq!(balance.outcome, 2500);
    assert_eq!(balance.total, 7500);

    Ok(())
}

#[tokio::test]
async fn test_outcome_exceeding_balance_is_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .create_transaction(
            "Salary".to_string(),
            TransactionKind::Income,
            10000,
            "Salary".to_string(),
        )
        .await?;

    let err = service
        .create_transaction(
            "TV".to_string(),
            TransactionKind::Outcome,
            15000,
            "Shopping".to_string(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::InsufficientBalance {
            balance: 10000,
            requested: 15000
        }
    ));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("cannot spend more than available"));

    // No transaction row was added and the balance is unchanged
    assert_eq!(service.list_transactions().await?.len(), 1);
    assert_eq!(service.get_balance().await?.total, 10000);

    Ok(())
}

#[tokio::test]
async fn test_outcome_equal_to_balance_succeeds() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .create_transaction(
            "Salary".to_string(),
            TransactionKind::Income,
            10000,
            "Salary".to_string(),
        )
        .await?;
    service
        .create_transaction(
            "Rent".to_string(),
            TransactionKind::Outcome,
            10000,
            "Housing".to_string(),
        )
        .await?;

    let balance = service.get_balance().await?;
    assert_eq!(balance.total, 0);
    assert_eq!(service.list_transactions().await?.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_rejected_outcome_still_creates_category() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // The category is resolved before the balance check, so a rejected
    // transaction can leave a fresh category behind.
    let result = service
        .create_transaction(
            "TV".to_string(),
            TransactionKind::Outcome,
            15000,
            "Shopping".to_string(),
        )
        .await;
    assert!(result.is_err());

    let categories = service.list_categories().await?;
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].title, "Shopping");
    assert!(service.list_transactions().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_category_created_once_and_reused() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let first = service
        .create_transaction(
            "Salary".to_string(),
            TransactionKind::Income,
            500000,
            "Work".to_string(),
        )
        .await?;
    let second = service
        .create_transaction(
            "Freelance".to_string(),
            TransactionKind::Income,
            200000,
            "Work".to_string(),
        )
        .await?;

    assert_eq!(first.category.id, second.category.id);
    assert_eq!(service.list_categories().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_distinct_titles_create_distinct_categories() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .create_transaction(
            "Salary".to_string(),
            TransactionKind::Income,
            500000,
            "Work".to_string(),
        )
        .await?;
    service
        .create_transaction(
            "Groceries".to_string(),
            TransactionKind::Outcome,
            8500,
            "Food".to_string(),
        )
        .await?;

    let categories = service.list_categories().await?;
    let titles: Vec<&str> = categories.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Food", "Work"]); // ordered by title

    Ok(())
}

#[tokio::test]
async fn test_non_positive_value_is_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service
        .create_transaction(
            "Nothing".to_string(),
            TransactionKind::Income,
            0,
            "Misc".to_string(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidValue(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(service.list_transactions().await?.is_empty());
    assert!(service.list_categories().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_balance_of_empty_database_is_zero() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let balance = service.get_balance().await?;
    assert_eq!(balance.income, 0);
    assert_eq!(balance.outcome, 0);
    assert_eq!(balance.total, 0);

    Ok(())
}

#[tokio::test]
async fn test_transactions_listed_in_insertion_order() -> Result<()> {
    let (service, _temp) = test_service().await?;

    for title in ["First", "Second", "Third"] {
        service
            .create_transaction(
                title.to_string(),
                TransactionKind::Income,
                1000,
                "Misc".to_string(),
            )
            .await?;
    }

    let transactions = service.list_transactions().await?;
    let titles: Vec<&str> = transactions.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);
    assert!(transactions[0].sequence < transactions[1].sequence);
    assert!(transactions[1].sequence < transactions[2].sequence);

    Ok(())
}
