//! Finview main entry point

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use finview_client::{ApiClient, RecordId, Session};
use finview_config::{Config, ConfigError};
use finview_core::{
    ListController, NavState, PageItem, QueryState, SortConfig, SortDirection,
    ROWS_PER_PAGE_CHOICES,
};
use finview_utils::{format_amount, format_number};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Parser, Debug)]
#[command(name = "finview")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight terminal client for personal-finance REST APIs", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// API token (falls back to the FINVIEW_TOKEN environment variable)
    #[arg(long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange login credentials for an API token
    Login(LoginArgs),
    /// Invalidate the current API token
    Logout,
    /// Show the authenticated user
    Whoami,
    /// Browse the combined income/expense transaction list
    Transactions(TransactionsArgs),
    /// List accounts
    Accounts,
    /// List account types
    AccountTypes,
    /// List banks
    Banks,
    /// List income and expense categories
    Categories,
    /// List currencies
    Currencies,
    /// List budgets with spending totals
    Budgets,
    /// Balance history of one account over a date range
    BalanceHistory(BalanceHistoryArgs),
}

#[derive(Args, Debug)]
struct LoginArgs {
    /// Email, overriding the configured credentials
    #[arg(long)]
    email: Option<String>,

    /// Password, overriding the configured credentials
    #[arg(long)]
    password: Option<String>,
}

#[derive(Args, Debug)]
struct TransactionsArgs {
    /// Page to open (1-based)
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Rows per page: 15, 30, 50 or 100
    #[arg(long)]
    rows: Option<u32>,

    /// Sort key (date, time, amount, currency, category, account)
    #[arg(long)]
    sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long)]
    desc: bool,

    /// Filter as FIELD=VALUE; may be repeated
    #[arg(long = "filter", value_name = "FIELD=VALUE")]
    filters: Vec<String>,

    /// Print the raw JSON page instead of a table
    #[arg(long)]
    json: bool,

    /// Keep the view open and accept paging commands on stdin
    #[arg(short, long)]
    interactive: bool,
}

#[derive(Args, Debug)]
struct BalanceHistoryArgs {
    /// Account id
    #[arg(long)]
    account: RecordId,

    /// Range start (YYYY-MM-DD)
    #[arg(long)]
    from: String,

    /// Range end (YYYY-MM-DD)
    #[arg(long)]
    to: String,

    /// Print raw JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = match Config::load(&cli.config) {
        Ok(config) => Some(config),
        Err(ConfigError::FileNotFound { .. }) => None,
        Err(err) => return Err(err.into()),
    };
    let config_missing = loaded.is_none();
    let config = loaded.unwrap_or_default();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.logging.level),
    )
    .init();
    if config_missing {
        log::info!("no config file at {}, using defaults", cli.config.display());
    }

    match &cli.command {
        Command::Login(args) => run_login(&config, args),
        Command::Logout => {
            api(&cli, &config)?.logout()?;
            println!("session token invalidated");
            Ok(())
        }
        Command::Whoami => run_whoami(&*api(&cli, &config)?),
        Command::Transactions(args) => run_transactions(&config, api(&cli, &config)?, args),
        Command::Accounts => run_accounts(&*api(&cli, &config)?),
        Command::AccountTypes => run_account_types(&*api(&cli, &config)?),
        Command::Banks => run_banks(&*api(&cli, &config)?),
        Command::Categories => run_categories(&*api(&cli, &config)?),
        Command::Currencies => run_currencies(&*api(&cli, &config)?),
        Command::Budgets => run_budgets(&*api(&cli, &config)?),
        Command::BalanceHistory(args) => run_balance_history(&*api(&cli, &config)?, args),
    }
}

/// Build an authenticated client for the configured API host
fn api(cli: &Cli, config: &Config) -> anyhow::Result<Arc<ApiClient>> {
    let token = match &cli.token {
        Some(token) => token.clone(),
        None => match std::env::var("FINVIEW_TOKEN") {
            Ok(token) if !token.is_empty() => token,
            _ => bail!("no API token: pass --token or set FINVIEW_TOKEN (see 'finview login')"),
        },
    };
    Ok(Arc::new(ApiClient::new(
        config.api.base_url.clone(),
        Session::new(token),
    )))
}

fn run_login(config: &Config, args: &LoginArgs) -> anyhow::Result<()> {
    let auth = config.auth.as_ref();
    let email = args
        .email
        .clone()
        .or_else(|| auth.map(|a| a.email.clone()))
        .context("no email: pass --email or add an auth section to the config")?;
    let password = args
        .password
        .clone()
        .or_else(|| auth.map(|a| a.password.clone()))
        .context("no password: pass --password or add an auth section to the config")?;

    let session = ApiClient::login(&config.api.base_url, &email, &password)?;
    println!("export FINVIEW_TOKEN={}", session.token());
    Ok(())
}

fn run_whoami(client: &ApiClient) -> anyhow::Result<()> {
    let user = client.current_user()?;
    println!("id:       {}", user.id);
    println!("username: {}", user.username);
    println!("email:    {}", user.email);
    if let Some(locale) = &user.locale {
        println!("locale:   {}", locale);
    }
    println!("accounts: {}", user.accounts.len());
    Ok(())
}

// ==================== Transaction List View ====================

/// Reference data used to turn record ids into display names
struct Lookups {
    currencies: HashMap<RecordId, String>,
    categories: HashMap<RecordId, String>,
    accounts: HashMap<RecordId, String>,
}

impl Lookups {
    fn load(client: &ApiClient) -> anyhow::Result<Self> {
        let currencies = client
            .currencies()?
            .into_iter()
            .map(|c| (c.id, c.code))
            .collect();
        let categories = client
            .categories()?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        let accounts = client
            .accounts()?
            .into_iter()
            .map(|a| (a.id, a.name))
            .collect();
        Ok(Self {
            currencies,
            categories,
            accounts,
        })
    }

    fn name(map: &HashMap<RecordId, String>, id: RecordId) -> String {
        map.get(&id).cloned().unwrap_or_else(|| id.to_string())
    }
}

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Currency")]
    currency: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Type")]
    kind: String,
}

fn run_transactions(
    config: &Config,
    client: Arc<ApiClient>,
    args: &TransactionsArgs,
) -> anyhow::Result<()> {
    let lookups = Lookups::load(&client)?;

    let mut state = QueryState::default();
    state.set_rows_per_page(args.rows.unwrap_or(config.display.rows_per_page));
    state.set_page(args.page);
    if let Some(key) = &args.sort {
        state.sort = SortConfig {
            key: key.clone(),
            direction: if args.desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            },
        };
    }
    for spec in &args.filters {
        let (field, value) = spec
            .split_once('=')
            .with_context(|| format!("filter '{}' is not FIELD=VALUE", spec))?;
        state.add_filter();
        let index = state.filters.len() - 1;
        state.set_filter_field(index, field)?;
        state.set_filter_value(index, value)?;
    }

    let mut controller = ListController::with_state(state, client);
    controller.refresh()?;

    if args.json {
        if let Some(page) = controller.result() {
            println!("{}", serde_json::to_string_pretty(page)?);
        }
        return Ok(());
    }

    render_transactions(&controller, &lookups);
    if args.interactive {
        interactive_loop(&mut controller, &lookups)?;
    }
    Ok(())
}

fn render_transactions(controller: &ListController, lookups: &Lookups) {
    let Some(page) = controller.result() else {
        println!("No data.");
        return;
    };

    let rows: Vec<TransactionRow> = page
        .results
        .iter()
        .map(|tx| {
            let local = tx.date.with_timezone(&chrono::Local);
            TransactionRow {
                date: local.format("%Y-%m-%d").to_string(),
                time: local.format("%H:%M:%S").to_string(),
                amount: format!("{:.2}", tx.amount),
                currency: Lookups::name(&lookups.currencies, tx.currency),
                category: Lookups::name(&lookups.categories, tx.category),
                account: Lookups::name(&lookups.accounts, tx.account),
                description: tx.description.clone().unwrap_or_default(),
                kind: tx.transaction_type.to_string(),
            }
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));

    let state = controller.state();
    println!(
        "pages: {}",
        render_window(&controller.window(), state.page.current_page)
    );
    println!(
        "page {} of {}, {} transactions, {} rows per page",
        state.page.current_page,
        state.page.total_pages().max(1),
        format_number(state.page.total_count),
        state.page.rows_per_page
    );
    render_filters(controller);
}

fn render_window(items: &[PageItem], current: u32) -> String {
    items
        .iter()
        .map(|item| match item {
            PageItem::Number(n) if *n == current => format!("[{}]", n),
            PageItem::Number(n) => n.to_string(),
            PageItem::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_filters(controller: &ListController) {
    let state = controller.state();
    if state.filters.is_empty() {
        return;
    }
    println!("filters:");
    for (index, filter) in state.filters.iter().enumerate() {
        let label = state
            .catalog()
            .describe(&filter.field)
            .map(|field| field.label)
            .unwrap_or("?");
        println!("  [{}] {} = \"{}\"", index, label, filter.value);
    }
}

fn print_interactive_help() {
    println!("commands:");
    println!("  n / p / f / l     next, previous, first, last page");
    println!("  g <page>          go to page");
    println!("  s <key>           sort by key (repeat to flip direction)");
    println!("  r <rows>          rows per page (15, 30, 50, 100)");
    println!("  af                add a filter");
    println!("  ff <idx> <field>  set a filter's field");
    println!("  fv <idx> <value>  set a filter's value");
    println!("  rf <idx>          remove a filter");
    println!("  h / q             help, quit");
}

/// Stdin-driven pager: every accepted command is one state mutation
/// followed by one refetch
fn interactive_loop(controller: &mut ListController, lookups: &Lookups) -> anyhow::Result<()> {
    print_interactive_help();
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };

        let nav: NavState = controller.nav();
        let current = controller.state().page.current_page;
        let last = controller.state().page.total_pages().max(1);

        let outcome = match command {
            "q" | "quit" => break,
            "h" | "help" => {
                print_interactive_help();
                continue;
            }
            "n" | "next" => {
                if !nav.next {
                    println!("already on the last page");
                    continue;
                }
                controller.go_to_page(current + 1)
            }
            "p" | "prev" => {
                if !nav.previous {
                    println!("already on the first page");
                    continue;
                }
                controller.go_to_page(current - 1)
            }
            "f" | "first" => {
                if !nav.first {
                    println!("already on the first page");
                    continue;
                }
                controller.go_to_page(1)
            }
            "l" | "last" => {
                if !nav.last {
                    println!("already on the last page");
                    continue;
                }
                controller.go_to_page(last)
            }
            "g" | "goto" => match parts.next().and_then(|n| n.parse::<u32>().ok()) {
                Some(n) => controller.go_to_page(n.clamp(1, last)),
                None => {
                    println!("usage: g <page>");
                    continue;
                }
            },
            "s" | "sort" => match parts.next() {
                Some(key) => controller.sort_by(key),
                None => {
                    println!("usage: s <key>");
                    continue;
                }
            },
            "r" | "rows" => match parts.next().and_then(|n| n.parse::<u32>().ok()) {
                Some(n) if ROWS_PER_PAGE_CHOICES.contains(&n) => controller.set_rows_per_page(n),
                _ => {
                    println!("rows per page must be one of {:?}", ROWS_PER_PAGE_CHOICES);
                    continue;
                }
            },
            "af" => controller.add_filter(),
            "ff" => {
                let index = parts.next().and_then(|n| n.parse::<usize>().ok());
                match (index, parts.next()) {
                    (Some(index), Some(field)) => controller.set_filter_field(index, field),
                    _ => {
                        println!("usage: ff <idx> <field>");
                        continue;
                    }
                }
            }
            "fv" => match parts.next().and_then(|n| n.parse::<usize>().ok()) {
                Some(index) => {
                    let value = parts.collect::<Vec<_>>().join(" ");
                    controller.set_filter_value(index, &value)
                }
                None => {
                    println!("usage: fv <idx> <value>");
                    continue;
                }
            },
            "rf" => match parts.next().and_then(|n| n.parse::<usize>().ok()) {
                Some(index) => controller.remove_filter(index),
                None => {
                    println!("usage: rf <idx>");
                    continue;
                }
            },
            _ => {
                println!("unknown command, h for help");
                continue;
            }
        };

        // A failed fetch keeps the previous page on screen
        if let Err(err) = outcome {
            println!("error: {}", err);
        }
        render_transactions(controller, lookups);
    }
    Ok(())
}

// ==================== Reference Tables ====================

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "Id")]
    id: RecordId,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    account_type: String,
    #[tabled(rename = "Bank")]
    bank: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

fn run_accounts(client: &ApiClient) -> anyhow::Result<()> {
    let account_types: HashMap<RecordId, String> = client
        .account_types()?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();
    let banks: HashMap<RecordId, String> =
        client.banks()?.into_iter().map(|b| (b.id, b.name)).collect();
    let currencies: HashMap<RecordId, String> = client
        .currencies()?
        .into_iter()
        .map(|c| (c.id, c.code))
        .collect();

    let rows: Vec<AccountRow> = client
        .accounts()?
        .into_iter()
        .map(|account| AccountRow {
            id: account.id,
            name: account.name,
            account_type: Lookups::name(&account_types, account.account_type),
            bank: Lookups::name(&banks, account.bank),
            balance: format_amount(
                &account.balance,
                &Lookups::name(&currencies, account.currency),
            ),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

#[derive(Tabled)]
struct AccountTypeRow {
    #[tabled(rename = "Id")]
    id: RecordId,
    #[tabled(rename = "Name")]
    name: String,
}

fn run_account_types(client: &ApiClient) -> anyhow::Result<()> {
    let rows: Vec<AccountTypeRow> = client
        .account_types()?
        .into_iter()
        .map(|t| AccountTypeRow {
            id: t.id,
            name: t.name,
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

#[derive(Tabled)]
struct BankRow {
    #[tabled(rename = "Id")]
    id: RecordId,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Country")]
    country: String,
}

fn run_banks(client: &ApiClient) -> anyhow::Result<()> {
    let rows: Vec<BankRow> = client
        .banks()?
        .into_iter()
        .map(|b| BankRow {
            id: b.id,
            name: b.name,
            country: b.country,
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Id")]
    id: RecordId,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Description")]
    description: String,
}

fn run_categories(client: &ApiClient) -> anyhow::Result<()> {
    let mut rows = Vec::new();
    for (kind, categories) in [
        ("income", client.income_categories()?),
        ("expense", client.expense_categories()?),
    ] {
        rows.extend(categories.into_iter().map(|category| CategoryRow {
            id: category.id,
            name: category.name,
            kind: kind.to_string(),
            description: category.description.unwrap_or_default(),
        }));
    }
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

#[derive(Tabled)]
struct CurrencyRow {
    #[tabled(rename = "Id")]
    id: RecordId,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Symbol")]
    symbol: String,
}

fn run_currencies(client: &ApiClient) -> anyhow::Result<()> {
    let rows: Vec<CurrencyRow> = client
        .currencies()?
        .into_iter()
        .map(|c| CurrencyRow {
            id: c.id,
            code: c.code,
            name: c.name,
            symbol: c.symbol,
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "Id")]
    id: RecordId,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "From")]
    start_date: String,
    #[tabled(rename = "To")]
    end_date: String,
}

fn run_budgets(client: &ApiClient) -> anyhow::Result<()> {
    let rows: Vec<BudgetRow> = client
        .budgets()?
        .into_iter()
        .map(|budget| BudgetRow {
            id: budget.id,
            name: budget.name,
            total: format!("{:.2}", budget.total_amount),
            spent: format!("{:.2}", budget.total_spent),
            start_date: budget.start_date.to_string(),
            end_date: budget.end_date.to_string(),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

#[derive(Tabled)]
struct BalanceRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

fn run_balance_history(client: &ApiClient, args: &BalanceHistoryArgs) -> anyhow::Result<()> {
    let points = client.balance_history(args.account, &args.from, &args.to)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }
    let rows: Vec<BalanceRow> = points
        .into_iter()
        .map(|point| BalanceRow {
            date: point.date.to_string(),
            balance: format!("{:.2}", point.balance),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}
