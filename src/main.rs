use clap::Parser;
use folio_settle::application::orchestrator::SettlementOrchestrator;
use folio_settle::application::registry::ProviderRegistry;
use folio_settle::config::Config;
use folio_settle::domain::customer::{Customer, LoyaltyTiers};
use folio_settle::domain::folio::{Folio, FolioId};
use folio_settle::domain::ports::{CustomerStoreBox, FolioStoreBox};
use folio_settle::domain::transaction::TransactionId;
use folio_settle::error::{Result as SettleResult, SettlementError};
use folio_settle::infrastructure::in_memory::{
    InMemoryCustomerStore, InMemoryFolioStore, InMemoryTransactionRecordStore,
};
use folio_settle::infrastructure::providers::{self, GatewaySandbox};
use folio_settle::interfaces::csv::event_reader::{Action, Event, EventReader};
use folio_settle::interfaces::csv::folio_reader::FolioReader;
use folio_settle::interfaces::csv::report_writer::ReportWriter;
use folio_settle::logging;
use miette::{IntoDiagnostic, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settlement events CSV file (action, folio, provider, transaction)
    events: PathBuf,

    /// Folios CSV file (folio, customer, amount, opened_on)
    #[arg(long)]
    folios: PathBuf,

    /// TOML configuration file. Sandbox defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set. Overrides the config file.
    #[arg(long)]
    log_level: Option<String>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

/// Two handles per store: one owned by the orchestrator, one kept for
/// seeding and reporting. Both share the same underlying state.
struct BillingStores {
    folios: (FolioStoreBox, FolioStoreBox),
    customers: (CustomerStoreBox, CustomerStoreBox),
}

fn in_memory_stores(tiers: LoyaltyTiers) -> BillingStores {
    let folios = InMemoryFolioStore::new();
    let customers = InMemoryCustomerStore::new(tiers);
    BillingStores {
        folios: (Box::new(folios.clone()), Box::new(folios)),
        customers: (Box::new(customers.clone()), Box::new(customers)),
    }
}

#[cfg(feature = "storage-rocksdb")]
fn open_stores(db_path: Option<PathBuf>, tiers: LoyaltyTiers) -> SettleResult<BillingStores> {
    use folio_settle::infrastructure::rocksdb::RocksDBStore;

    match db_path {
        Some(path) => {
            let store = RocksDBStore::open(path, tiers)?;
            Ok(BillingStores {
                folios: (Box::new(store.clone()), Box::new(store.clone())),
                customers: (Box::new(store.clone()), Box::new(store)),
            })
        }
        None => Ok(in_memory_stores(tiers)),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_stores(db_path: Option<PathBuf>, tiers: LoyaltyTiers) -> SettleResult<BillingStores> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(in_memory_stores(tiers))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path).into_diagnostic()?,
        None => Config::default(),
    };
    logging::init(cli.log_level.as_deref().unwrap_or(&config.log_level));

    let built = providers::build(&config.vnpay, &config.zalopay);
    let registry = ProviderRegistry::new(built.providers).into_diagnostic()?;
    info!(providers = ?registry.list_providers(), "Providers registered");

    let BillingStores { folios, customers } =
        open_stores(cli.db_path, config.loyalty.tiers()).into_diagnostic()?;
    let (folio_store, folio_view) = folios;
    let (customer_store, customer_view) = customers;

    // Seed folios and register their owners
    let file = File::open(&cli.folios).into_diagnostic()?;
    for folio_result in FolioReader::new(file).folios() {
        match folio_result {
            Ok(folio) => {
                seed(&folio_view, &customer_view, folio)
                    .await
                    .into_diagnostic()?;
            }
            Err(e) => {
                eprintln!("Error reading folio: {}", e);
            }
        }
    }

    let orchestrator = SettlementOrchestrator::new(
        registry,
        folio_store,
        customer_store,
        Box::new(InMemoryTransactionRecordStore::new()),
    );

    // Process events
    let file = File::open(&cli.events).into_diagnostic()?;
    for event_result in EventReader::new(file).events() {
        match event_result {
            Ok(event) => {
                if let Err(e) = apply(&orchestrator, &built.sandboxes, &event).await {
                    eprintln!("Error processing event: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading event: {}", e);
            }
        }
    }

    // Output final state
    let folios = folio_view.get_all().await.into_diagnostic()?;
    let customers = customer_view.get_all().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    writer.write_folios(&folios).into_diagnostic()?;
    writer.write_customers(&customers).into_diagnostic()?;

    Ok(())
}

async fn seed(
    folios: &FolioStoreBox,
    customers: &CustomerStoreBox,
    folio: Folio,
) -> SettleResult<()> {
    if let Some(owner) = folio.owner
        && customers.get(owner).await?.is_none()
    {
        let mut customer = Customer::new(owner);
        customer.tier = customers.highest_tier_at_or_below(0).await?;
        customers.store(customer).await?;
    }
    // A persistent store keeps settled folios across runs.
    if folios.get(folio.id).await?.is_none() {
        folios.store(folio).await?;
    }
    Ok(())
}

async fn apply(
    orchestrator: &SettlementOrchestrator,
    sandboxes: &HashMap<String, GatewaySandbox>,
    event: &Event,
) -> SettleResult<()> {
    let sandbox = || {
        sandboxes
            .get(&event.provider.to_lowercase())
            .ok_or_else(|| SettlementError::UnsupportedProvider(event.provider.clone()))
    };

    match event.action {
        Action::Initiate => {
            let folio = FolioId(event.folio()?);
            let payment_target = orchestrator.initiate_payment(folio, &event.provider).await?;
            info!(folio = %folio, %payment_target, "Payment target issued");
        }
        Action::Pay => {
            let folio = FolioId(event.folio()?);
            let transaction_id = orchestrator
                .transaction_id_for(folio, &event.provider)
                .await?;
            sandbox()?.mark_paid(transaction_id).await;
        }
        Action::Verify => {
            let folio = FolioId(event.folio()?);
            let outcome = orchestrator
                .verify_and_update_payment(folio, &event.provider)
                .await?;
            info!(folio = %folio, ?outcome, "Verification finished");
        }
        Action::VerifyTxn => {
            let transaction_id = TransactionId::new(event.transaction()?);
            let outcome = orchestrator
                .verify_and_update_payment_by_transaction(&transaction_id, &event.provider)
                .await?;
            info!(transaction = %transaction_id, ?outcome, "Verification finished");
        }
        Action::Outage => sandbox()?.set_outage(true),
        Action::Restore => sandbox()?.set_outage(false),
    }
    Ok(())
}
