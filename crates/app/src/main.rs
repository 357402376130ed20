use anyhow::Context;

use stockflow_app::{AppConfig, Session};
use stockflow_core::{CompanyId, UserId};
use stockflow_identity::StaticIdentity;

/// Smoke client: list the purchase orders visible to the configured
/// identity. Useful for checking connectivity and credentials against a
/// deployment.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockflow_observability::init();

    let config = AppConfig::from_env();
    let identity = identity_from_env()?;
    let mut session = Session::new(&config, identity);

    let filter = session.company_filter();
    let orders = session.load_orders(filter).await?;
    tracing::info!(count = orders.len(), "purchase orders");
    for order in orders {
        tracing::info!(
            po_number = %order.po_number,
            status = order.status.as_str(),
            total = %order.total_amount,
            supplier = %order.supplier,
            "order"
        );
    }

    Ok(())
}

fn identity_from_env() -> anyhow::Result<StaticIdentity> {
    let user_id: i64 = std::env::var("STOCKFLOW_USER_ID")
        .context("STOCKFLOW_USER_ID not set")?
        .parse()
        .context("STOCKFLOW_USER_ID is not a number")?;
    let company_id: i64 = std::env::var("STOCKFLOW_COMPANY_ID")
        .context("STOCKFLOW_COMPANY_ID not set")?
        .parse()
        .context("STOCKFLOW_COMPANY_ID is not a number")?;

    Ok(StaticIdentity {
        user_id: UserId::new(user_id),
        company_id: CompanyId::new(company_id),
    })
}
