//! Account ledger - products, deposits and withdrawals
//!
//! Every balance change and its transaction record are written in one
//! database transaction. Withdrawals rely on a conditional update, so the
//! non-negative balance holds under concurrent callers without any
//! in-process lock.

use crate::error::{BusinessError, BusinessResult};
use crate::services::{BalanceCheck, ServiceContext};
use banca_core::money::from_minor_units;
use banca_core::product::generate_account_number;
use banca_core::validation;
use banca_core::{Amount, NewProduct, Product, Transaction, TransactionKind};
use banca_persistence::{ProductRepo, ProductRow, TransactionRepo, TransactionRow};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Ledger Service - all operations scoped to the calling client
pub struct LedgerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LedgerService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Open a product with a zero balance and a fresh account number.
    ///
    /// `currency` defaults to COP.
    pub async fn create_product(
        &self,
        client_id: &str,
        product_type: &str,
        alias: Option<&str>,
        currency: Option<&str>,
    ) -> BusinessResult<Product> {
        let input = NewProduct::new(product_type, alias, currency)?;
        let config = self.ctx.config();

        for attempt in 1..=config.account_number_attempts {
            let row = ProductRow {
                id: Uuid::new_v4().to_string(),
                client_id: client_id.to_string(),
                product_type: input.product_type.clone(),
                alias: input.alias.clone(),
                account_number: generate_account_number(&config.account_prefix),
                currency: input.currency.as_str().to_string(),
                balance_minor: 0,
                created_at: Utc::now(),
            };

            match ProductRepo::insert(self.ctx.pool(), &row).await {
                Ok(()) => {
                    info!(
                        client_id,
                        product_id = %row.id,
                        account_number = %row.account_number,
                        "product created"
                    );
                    return Ok(Product::try_from(row)?);
                }
                Err(e) if is_account_number_collision(&e) => {
                    debug!(attempt, account_number = %row.account_number, "account number taken, retrying");
                }
                Err(e) if e.is_foreign_key_violation() => {
                    return Err(BusinessError::NotFound("Client"));
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(BusinessError::internal(format!(
            "no free account number after {} attempts",
            config.account_number_attempts
        )))
    }

    /// Owned products, most recent first
    pub async fn list_products(&self, client_id: &str) -> BusinessResult<Vec<Product>> {
        let rows = ProductRepo::list_by_client(self.ctx.pool(), client_id).await?;
        let products = rows
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(products)
    }

    /// A product the client owns. Missing and foreign products both yield `NotFound`.
    pub async fn get_product(&self, client_id: &str, product_id: &str) -> BusinessResult<Product> {
        let row = ProductRepo::find_owned(self.ctx.pool(), client_id, product_id)
            .await?
            .ok_or(BusinessError::NotFound("Product"))?;
        Ok(Product::try_from(row)?)
    }

    /// Credit an owned product and record a DEPOSIT
    pub async fn deposit(
        &self,
        client_id: &str,
        product_id: &str,
        amount: Decimal,
        description: Option<&str>,
    ) -> BusinessResult<Product> {
        let amount = Amount::new(amount)?;
        let description = validation::validate_description(description)?;

        let mut tx = self.ctx.pool().begin().await?;

        let Some(row) = ProductRepo::credit(&mut *tx, client_id, product_id, amount.minor()).await?
        else {
            return Err(BusinessError::NotFound("Product"));
        };

        let entry = TransactionRow::record(product_id, TransactionKind::Deposit, amount, description);
        TransactionRepo::insert(&mut *tx, &entry).await?;

        tx.commit().await?;

        info!(
            client_id,
            product_id,
            transaction_id = %entry.id,
            amount = %amount,
            "deposit recorded"
        );
        Ok(Product::try_from(row)?)
    }

    /// Debit an owned product only if the balance covers `amount`, and record
    /// a WITHDRAW.
    pub async fn withdraw(
        &self,
        client_id: &str,
        product_id: &str,
        amount: Decimal,
        description: Option<&str>,
    ) -> BusinessResult<Product> {
        let amount = Amount::new(amount)?;
        let description = validation::validate_description(description)?;

        let mut tx = self.ctx.pool().begin().await?;

        let Some(row) =
            ProductRepo::debit_if_covered(&mut *tx, client_id, product_id, amount.minor()).await?
        else {
            warn!(client_id, product_id, amount = %amount, "withdraw rejected");
            return Err(BusinessError::InsufficientFundsOrNotFound);
        };

        let entry = TransactionRow::record(product_id, TransactionKind::Withdraw, amount, description);
        TransactionRepo::insert(&mut *tx, &entry).await?;

        tx.commit().await?;

        info!(
            client_id,
            product_id,
            transaction_id = %entry.id,
            amount = %amount,
            "withdraw recorded"
        );
        Ok(Product::try_from(row)?)
    }

    /// Latest transactions of a product, newest first.
    ///
    /// No ownership check; use [`LedgerService::history`] for caller-facing reads.
    pub async fn transactions(
        &self,
        product_id: &str,
        limit: Option<u32>,
    ) -> BusinessResult<Vec<Transaction>> {
        let limit = limit.unwrap_or(self.ctx.config().transactions_page);
        let rows = TransactionRepo::recent_by_product(self.ctx.pool(), product_id, limit).await?;
        let transactions = rows
            .into_iter()
            .map(Transaction::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    /// Ownership-checked transaction listing
    pub async fn history(
        &self,
        client_id: &str,
        product_id: &str,
        limit: Option<u32>,
    ) -> BusinessResult<Vec<Transaction>> {
        let product = self.get_product(client_id, product_id).await?;
        self.transactions(&product.id, limit).await
    }

    /// Compare an owned product's balance with the sum of its ledger
    pub async fn verify_balance(
        &self,
        client_id: &str,
        product_id: &str,
    ) -> BusinessResult<BalanceCheck> {
        let product = self.get_product(client_id, product_id).await?;
        let net = TransactionRepo::net_effect_minor(self.ctx.pool(), &product.id).await?;

        Ok(BalanceCheck {
            product_id: product.id,
            balance: product.balance,
            ledger_total: from_minor_units(net),
        })
    }
}

fn is_account_number_collision(err: &banca_persistence::PersistenceError) -> bool {
    err.is_unique_violation()
        && err
            .violated_constraint()
            .is_some_and(|message| message.contains("account_number"))
}
