use anyhow::{Context, Result};
use cashflow::{
    Ledger,
    classify::classify,
    config::Settings,
    entry::raw,
    money::Money,
    report::{Detail, Json},
    schedule::Window,
};
use chrono::{Local, NaiveDate};
use clap::{Arg, ArgMatches, Command};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn window_args() -> [Arg<'static>; 2] {
    [
        Arg::new("from")
            .short('f')
            .long("from")
            .help("First day of the forecast, defaults to today")
            .value_name("DATE")
            .takes_value(true),
        Arg::new("days")
            .short('d')
            .long("days")
            .help("Number of days to forecast")
            .value_name("N")
            .takes_value(true),
    ]
}

/// Flags win over the config file, which wins over the defaults.
fn window(args: &ArgMatches, settings: &Settings) -> Result<Window> {
    let from = args
        .value_of("from")
        .map(|s| {
            s.parse::<NaiveDate>()
                .with_context(|| format!("Invalid --from date '{}'", s))
        })
        .transpose()?
        .or(settings.from)
        .unwrap_or_else(|| Local::now().date_naive());
    let days = args
        .value_of("days")
        .map(|s| {
            s.parse::<u32>()
                .with_context(|| format!("Invalid --days '{}'", s))
        })
        .transpose()?
        .unwrap_or(settings.horizon_days);
    Window::new(from, days)
}

#[async_std::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "cashflow=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("cashflow")
        .version("0.1.0")
        .about("Running cash flow forecasts")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("entries")
                .short('e')
                .long("entries")
                .help("Sets directory or file of entries or '-' for stdin")
                .value_name("PATH")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Settings file")
                .value_name("FILE")
                .takes_value(true)
                .global(true),
        )
        .subcommand(
            Command::new("forecast")
                .about("Projects the running balance day by day")
                .args(window_args())
                .arg(
                    Arg::new("opening")
                        .short('o')
                        .long("opening")
                        .help("Opening balance")
                        .value_name("AMOUNT")
                        .takes_value(true)
                        .allow_hyphen_values(true),
                )
                .arg(
                    Arg::new("detail")
                        .long("detail")
                        .help("List the entries behind each day"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the projection as json")
                        .conflicts_with("detail"),
                ),
        )
        .subcommand(
            Command::new("expand")
                .about("Prints the dated entries falling in the forecast window")
                .args(window_args()),
        )
        .subcommand(
            Command::new("classify")
                .about("Shows the tier of a balance")
                .arg(
                    Arg::new("amount")
                        .help("Balance to classify")
                        .value_name("AMOUNT")
                        .required(true)
                        .allow_hyphen_values(true),
                ),
        )
        .get_matches();

    let settings = match matches.value_of("config") {
        Some(file) => Settings::from_file(file).await?,
        None => Settings::default(),
    };
    debug!(?settings, "loaded settings");
    let entries = matches
        .value_of("entries")
        .map(String::from)
        .or_else(|| settings.entries.clone())
        .unwrap_or_else(|| "./".to_string());
    let ledger = if entries == "-" {
        Ledger::new(None)
    } else {
        Ledger::new(Some(&entries))
    };

    if let Some(forecast) = matches.subcommand_matches("forecast") {
        let window = window(forecast, &settings)?;
        let opening = forecast
            .value_of("opening")
            .map(|s| s.parse::<Money>())
            .transpose()?
            .unwrap_or(settings.opening_balance);
        let projection = ledger.forecast(&window, opening).await?;
        if forecast.is_present("json") {
            println!("{}", serde_json::to_string_pretty(&Json::from(&projection))?);
        } else if forecast.is_present("detail") {
            print!("{}", Detail(&projection));
        } else {
            print!("{}", projection);
        }
    } else if let Some(expand) = matches.subcommand_matches("expand") {
        let window = window(expand, &settings)?;
        for entry in ledger.occurrences(&window).await? {
            let raw: raw::Entry = (&entry).into();
            print!("---\n{}", serde_yaml::to_string(&raw)?);
        }
    } else if let Some(args) = matches.subcommand_matches("classify") {
        let amount = args.value_of("amount").unwrap(); // required
        let balance: Money = amount.parse()?;
        println!("{}", classify(balance));
    }
    Ok(())
}
