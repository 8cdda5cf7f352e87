use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use clap::Subcommand;
use log::error;
use profitstars_ach::{
    GatewayConfig, ReferenceNumber, Transaction, TransactionClient, TransactionSession,
    TransactionState,
};
use rust_decimal::Decimal;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ping the gateway
    TestConnection,
    /// Check the configured credentials
    TestCredentials,
    /// Authorize an ACH debit
    Authorize {
        #[arg(long)]
        routing_number: String,
        #[arg(long)]
        account_number: String,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        transaction_number: String,
        #[arg(long)]
        name_on_account: String,
        /// Effective date as YYYY-MM-DD, defaults to today
        #[arg(long)]
        effective_date: Option<NaiveDate>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Capture an authorized transaction
    Capture {
        #[arg(long)]
        reference: String,
        #[arg(long)]
        amount: Decimal,
    },
    /// Void a transaction that has not settled
    Void {
        #[arg(long)]
        reference: String,
    },
    /// Refund a settled transaction
    Refund {
        #[arg(long)]
        reference: String,
    },
}

fn reference(value: &str) -> anyhow::Result<ReferenceNumber> {
    ReferenceNumber::new(value).context("reference number must not be blank")
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = GatewayConfig::from_env().context("loading gateway configuration")?;
    let client = TransactionClient::connect(&config).context("creating gateway client")?;
    let mut session = TransactionSession::new(client);

    let ok = match cli.command {
        Command::TestConnection => session.test_connection(),
        Command::TestCredentials => session.test_credentials(),
        Command::Authorize {
            routing_number,
            account_number,
            amount,
            transaction_number,
            name_on_account,
            effective_date,
            description,
        } => {
            let effective_date =
                effective_date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let transaction = Transaction::builder()
                .routing_number(routing_number)
                .account_number(account_number)
                .total_amount(amount)
                .transaction_number(transaction_number)
                .name_on_account(name_on_account)
                .effective_date(effective_date)
                .description(description.unwrap_or_default())
                .build();
            session.authorize_transaction(&transaction)
        }
        Command::Capture {
            reference: r,
            amount,
        } => {
            session.resume(reference(&r)?, TransactionState::Authorized);
            session.capture_transaction(amount)
        }
        Command::Void { reference: r } => {
            session.resume(reference(&r)?, TransactionState::Authorized);
            session.void_transaction()
        }
        Command::Refund { reference: r } => {
            session.set_reference_number(reference(&r)?);
            session.refund_transaction()
        }
    };

    if let Some(reference) = session.reference_number() {
        println!("reference: {}", reference);
    }
    println!("{}", session.response_message());
    if !ok {
        if let Some(e) = session.last_error() {
            error!("{}", e);
        }
        std::process::exit(1);
    }
    Ok(())
}
