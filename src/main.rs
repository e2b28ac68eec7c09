use clap::Parser;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tx_fetcher::utils::logging;
use tx_fetcher::{FetchError, FetcherConfig, PeriodFetcher, PeriodQuery};

/// Fetch a wallet's normal, ERC20 and internal transactions for a date range.
///
/// Dates are `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS` in local time. Anything
/// not given on the command line is prompted for.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Wallet address to analyze
    #[arg(short, long)]
    address: Option<String>,

    /// Period start
    #[arg(short, long)]
    start: Option<String>,

    /// Period end
    #[arg(short, long)]
    end: Option<String>,

    /// ethereum or bsc
    #[arg(short, long, default_value = "ethereum")]
    network: String,

    /// Explorer API key (falls back to ETHERSCAN_API_KEY)
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Print the full transaction lists as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let fetch_error = err.downcast_ref::<FetchError>();
            let message = fetch_error.map(|e| e.message.clone()).unwrap_or_else(|| err.to_string());
            eprintln!("An error occurred: {}", message);
            match fetch_error {
                Some(e) if e.is_validation() => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = FetcherConfig::from_env()?;
    if config.debug {
        logging::enable_debug();
    }

    let mut input = io::stdin().lock();
    let address = arg_or_prompt(cli.address, "Enter wallet address: ", &mut input)?;
    let start = arg_or_prompt(cli.start, "Enter start date (YYYY-MM-DD or YYYY-MM-DD HH:MM:SS): ", &mut input)?;
    let end = arg_or_prompt(cli.end, "Enter end date (YYYY-MM-DD or YYYY-MM-DD HH:MM:SS): ", &mut input)?;
    let api_key = match cli.api_key.or_else(|| std::env::var("ETHERSCAN_API_KEY").ok()) {
        Some(key) => key,
        None => prompt("Enter your API key: ", &mut input)?,
    };

    let query = PeriodQuery::new(address, start, end, cli.network, Some(api_key));
    let fetcher = PeriodFetcher::from_config(&config)?;

    eprintln!("Fetching transactions...");
    let transactions = fetcher.get_transactions_for_period(&query)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&transactions)?);
    } else {
        println!("Fetched {} normal transactions.", transactions.normal.len());
        println!("Fetched {} ERC20 transactions.", transactions.erc20.len());
        println!("Fetched {} internal transactions.", transactions.internal.len());
    }

    Ok(())
}

fn arg_or_prompt(value: Option<String>, label: &str, input: &mut impl BufRead) -> io::Result<String> {
    match value {
        Some(v) => Ok(v),
        None => prompt(label, input),
    }
}

fn prompt(label: &str, input: &mut impl BufRead) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
