//! Product and ledger commands

use anyhow::Result;
use banca_business::ServiceContext;

use super::{authenticated_client, failure, print_json};
use crate::ProductAction;

/// Handle product subcommands for the token's client
pub async fn handle(ctx: &ServiceContext, token: Option<&str>, action: ProductAction) -> Result<()> {
    let client_id = authenticated_client(ctx, token)?;
    let ledger = ctx.ledger();

    match action {
        ProductAction::Create {
            product_type,
            alias,
            currency,
        } => {
            let product = ledger
                .create_product(&client_id, &product_type, alias.as_deref(), currency.as_deref())
                .await
                .map_err(failure)?;
            print_json(&product)
        }
        ProductAction::List => {
            let products = ledger.list_products(&client_id).await.map_err(failure)?;
            print_json(&products)
        }
        ProductAction::Show { product_id } => {
            let product = ledger
                .get_product(&client_id, &product_id)
                .await
                .map_err(failure)?;
            print_json(&product)
        }
        ProductAction::Deposit {
            product_id,
            amount,
            description,
        } => {
            let product = ledger
                .deposit(&client_id, &product_id, amount, description.as_deref())
                .await
                .map_err(failure)?;
            print_json(&product)
        }
        ProductAction::Withdraw {
            product_id,
            amount,
            description,
        } => {
            let product = ledger
                .withdraw(&client_id, &product_id, amount, description.as_deref())
                .await
                .map_err(failure)?;
            print_json(&product)
        }
        ProductAction::Transactions { product_id, limit } => {
            let transactions = ledger
                .history(&client_id, &product_id, limit)
                .await
                .map_err(failure)?;
            print_json(&transactions)
        }
        ProductAction::Verify { product_id } => {
            let check = ledger
                .verify_balance(&client_id, &product_id)
                .await
                .map_err(failure)?;
            print_json(&check)
        }
    }
}
