use anyhow::{Context, Result, anyhow, bail};
use book_ledger_gateway::gateway::{classify, validate_raw};
use book_ledger_gateway::{
    ConnectionContext, GatewayConfig, OutcomeRecord, RawBorrowInput, RawDuration,
    TransactionGateway, present,
};
use std::env;
use std::sync::Arc;

enum Command {
    Borrow(RawBorrowInput),
    BookCount,
    Book(u64),
    History(String),
}

fn usage() -> anyhow::Error {
    anyhow!(
        "Usage: book-ledger-gateway <TITLE> [DURATION_DAYS]\n       \
         book-ledger-gateway --book-count | --book <ID> | --history <CRITERIA>"
    )
}

fn parse_args() -> Result<Command> {
    let args: Vec<String> = env::args().skip(1).collect();
    let first = args.first().ok_or_else(usage)?;

    match first.as_str() {
        "--book-count" => Ok(Command::BookCount),
        "--book" => {
            let id = args.get(1).ok_or_else(|| anyhow!("--book requires an id"))?;
            Ok(Command::Book(id.parse().context("Failed to parse book id")?))
        }
        "--history" => {
            let criteria = args
                .get(1)
                .ok_or_else(|| anyhow!("--history requires search criteria"))?;
            Ok(Command::History(criteria.clone()))
        }
        "-h" | "--help" => Err(usage()),
        flag if flag.starts_with("--") => bail!("unknown flag {}", flag),
        title => {
            let duration = match args.get(1) {
                Some(days) => RawDuration::Text(days.clone()),
                None => RawDuration::Unset,
            };
            Ok(Command::Borrow(RawBorrowInput::new(title, duration)))
        }
    }
}

/// Borrow input that fails validation is reported without touching the node.
fn rejected_locally(command: &Command) -> Option<OutcomeRecord> {
    match command {
        Command::Borrow(input) => validate_raw(input)
            .err()
            .map(|reason| OutcomeRecord::ValidationFailure { reason }),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let command = parse_args()?;
    if let Some(outcome) = rejected_locally(&command) {
        println!("{}", present(&outcome).text);
        std::process::exit(1);
    }

    let config = GatewayConfig::from_env().context("invalid gateway configuration")?;
    let binding = Arc::new(
        config
            .binding()
            .context("refusing to start with a broken endpoint binding")?,
    );

    let context = match ConnectionContext::connect(&config.node_url, config.identity).await {
        Ok(context) => Arc::new(context),
        Err(err) => {
            let message = present(&classify(err));
            println!("{}", message.text);
            std::process::exit(1);
        }
    };

    let gateway =
        TransactionGateway::new(binding, context).with_submit_timeout(config.submit_timeout);

    match command {
        Command::Borrow(input) => {
            let submission = gateway.submit(input).await;
            let message = present(&submission.outcome);
            println!("{}", message.text);
            log::info!(
                "submission finished in state {:?} (started {})",
                submission.state,
                submission.submitted_at.to_rfc3339()
            );
            if !submission.outcome.is_success() {
                std::process::exit(1);
            }
        }
        Command::BookCount => {
            let count = gateway.book_count().await?;
            println!("Books in catalogue: {}", count);
        }
        Command::Book(id) => {
            let book = gateway.book(id).await?;
            println!(
                "#{} \"{}\" by {} ({})",
                book.id,
                book.title,
                book.author,
                if book.available { "available" } else { "borrowed" }
            );
        }
        Command::History(criteria) => {
            let records = gateway.search_borrow_history(&criteria).await?;
            if records.is_empty() {
                println!("No borrow history for \"{}\"", criteria);
            }
            for record in records {
                println!(
                    "borrowed={} borrowTimestamp={} returnTimestamp={}",
                    record.borrowed, record.borrowTimestamp, record.returnTimestamp
                );
            }
        }
    }

    Ok(())
}
