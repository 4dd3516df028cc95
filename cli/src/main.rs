use std::path::PathBuf;

use bookvault::auth::{Decision, Route, Session, guard, nav_links};
use bookvault::config::{ClientConfig, ConfigError};
use bookvault::domains::BuildError;
use bookvault::error::ErrorCode;
use bookvault::net::types::{Book, EmailMessage, NewLoan};
use bookvault::{Backend, ClientError, Page, PageRequest};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("[{}] {source}", .source.error_code())]
    Client {
        #[from]
        source: ClientError,
    },
    #[error("unknown route `{0}`")]
    UnknownRoute(String),
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "bookvault", about = "BookVault library platform CLI")]
struct Cli {
    /// Gateway address shared by every domain.
    #[arg(long, env = "BOOKVAULT_API_URL")]
    api_url: Option<String>,

    /// Where the session token is kept between invocations.
    #[arg(long, env = "BOOKVAULT_TOKEN_PATH")]
    token_path: Option<PathBuf>,

    /// Log requests and session transitions to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        username: String,
        #[arg(long, env = "BOOKVAULT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "BOOKVAULT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Print the current session.
    Whoami,
    /// Print the guard decision for a route path such as `/admin/users`.
    Guard { path: String },
    /// Print the navigation links visible to the current session.
    Nav,
    Me {
        #[arg(long)]
        username: Option<String>,
    },
    /// Apply a JSON object to the signed-in account.
    UpdateMe { data: String },
    Users(PageArgs),
    Books(BookCommand),
    Search {
        query: String,
        #[command(flatten)]
        page: PageArgs,
    },
    Loans(LoanCommand),
    Notifications(NotificationCommand),
    Stats,
    Upload {
        file: PathBuf,
        #[arg(long)]
        content_type: Option<String>,
    },
}

#[derive(Args, Debug, Clone, Copy)]
struct PageArgs {
    #[arg(long, default_value_t = 0)]
    page: u32,
    #[arg(long, default_value_t = bookvault::config::DEFAULT_PAGE_SIZE)]
    size: u32,
}

impl From<PageArgs> for PageRequest {
    fn from(args: PageArgs) -> Self {
        PageRequest::new(args.page, args.size)
    }
}

#[derive(Args, Debug)]
struct BookFields {
    #[arg(long)]
    title: String,
    #[arg(long)]
    author: String,
    #[arg(long, default_value = "")]
    isbn: String,
    #[arg(long, default_value_t = 1)]
    quantity: i32,
}

impl From<BookFields> for Book {
    fn from(fields: BookFields) -> Self {
        Book::new(fields.title, fields.author, fields.isbn, fields.quantity)
    }
}

#[derive(Args, Debug)]
struct BookCommand {
    #[command(subcommand)]
    command: BookSubcommand,
}

#[derive(Subcommand, Debug)]
enum BookSubcommand {
    List,
    Paged(PageArgs),
    Get { id: i64 },
    Create(BookFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: BookFields,
    },
    Delete { id: i64 },
    /// Add (or with a negative value, remove) copies.
    Quantity {
        id: i64,
        #[arg(allow_hyphen_values = true)]
        change: i32,
    },
}

#[derive(Args, Debug)]
struct LoanCommand {
    #[command(subcommand)]
    command: LoanSubcommand,
}

#[derive(Subcommand, Debug)]
enum LoanSubcommand {
    List(PageArgs),
    Get { id: i64 },
    Create {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        book: i64,
        #[arg(long, default_value_t = 1)]
        quantity: i32,
    },
    Return { id: i64 },
    User {
        user_id: i64,
        #[arg(long)]
        active: bool,
    },
    Book { book_id: i64 },
    Overdue,
    Count { book_id: i64 },
}

#[derive(Args, Debug)]
struct NotificationCommand {
    #[command(subcommand)]
    command: NotificationSubcommand,
}

#[derive(Subcommand, Debug)]
enum NotificationSubcommand {
    List,
    /// Email a recipient and record the notification.
    Send {
        #[arg(long)]
        to: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        body: String,
    },
    Delete { id: String },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt().with_writer(std::io::stderr).with_max_level(level).init();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli)?;
    let backend = Backend::open(&config)?;
    let result = dispatch(&backend, cli.command).await;
    backend.shutdown();
    result
}

/// Environment config with the command-line flags taking precedence.
fn load_config(cli: &Cli) -> Result<ClientConfig, ConfigError> {
    ClientConfig::from_lookup(|key| match key {
        "BOOKVAULT_API_URL" if cli.api_url.is_some() => cli.api_url.clone(),
        "BOOKVAULT_TOKEN_PATH" if cli.token_path.is_some() => {
            cli.token_path.as_ref().map(|path| path.display().to_string())
        }
        _ => std::env::var(key).ok(),
    })
}

async fn dispatch(backend: &Backend, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login { username, password } => {
            let session = backend.login(&username, &password).await?;
            print_json(&session_json(&session))
        }
        Command::Register { username, email, password } => {
            let session = backend.register(&username, &email, &password).await?;
            print_json(&session_json(&session))
        }
        Command::Logout => {
            backend.logout();
            print_json(&session_json(&Session::Anonymous))
        }
        Command::Whoami => print_json(&session_json(&backend.current_session())),
        Command::Guard { path } => {
            let route = Route::parse(&path).ok_or(CliError::UnknownRoute(path))?;
            print_json(&decision_json(route, guard(route, &backend.current_session())))
        }
        Command::Nav => {
            let links: Vec<String> = nav_links(&backend.current_session()).into_iter().map(Route::path).collect();
            print_json(&json!(links))
        }
        Command::Me { username } => print_serialized(&backend.identity().me(username.as_deref()).await?),
        Command::UpdateMe { data } => {
            let payload = serde_json::from_str::<Value>(&data)?;
            print_serialized(&backend.identity().update_me(&payload).await?)
        }
        Command::Users(page) => print_json(&page_json(&backend.identity().list_users(page.into()).await?)?),
        Command::Books(books) => run_books(backend, books.command).await,
        Command::Search { query, page } => {
            print_json(&page_json(&backend.search().search(&query, page.into()).await?)?)
        }
        Command::Loans(loans) => run_loans(backend, loans.command).await,
        Command::Notifications(notifications) => run_notifications(backend, notifications.command).await,
        Command::Stats => print_serialized(&backend.admin().stats().await?),
        Command::Upload { file, content_type } => {
            let bytes = std::fs::read(&file).map_err(|source| CliError::ReadFile { path: file.clone(), source })?;
            let name = file.file_name().map_or_else(|| "upload".to_owned(), |n| n.to_string_lossy().into_owned());
            let stored = backend.media().upload(&name, bytes, content_type.as_deref()).await?;
            print_json(&json!({ "name": stored, "url": backend.media().file_url(&stored) }))
        }
    }
}

async fn run_books(backend: &Backend, command: BookSubcommand) -> Result<(), CliError> {
    let catalog = backend.catalog();
    match command {
        BookSubcommand::List => print_serialized(&catalog.list_books().await?),
        BookSubcommand::Paged(page) => print_json(&page_json(&catalog.list_books_paged(page.into()).await?)?),
        BookSubcommand::Get { id } => print_serialized(&catalog.get_book(id).await?),
        BookSubcommand::Create(fields) => print_serialized(&catalog.create_book(&fields.into()).await?),
        BookSubcommand::Update { id, fields } => print_serialized(&catalog.update_book(id, &fields.into()).await?),
        BookSubcommand::Delete { id } => {
            catalog.delete_book(id).await?;
            print_json(&json!({ "deleted": id }))
        }
        BookSubcommand::Quantity { id, change } => print_serialized(&catalog.adjust_quantity(id, change).await?),
    }
}

async fn run_loans(backend: &Backend, command: LoanSubcommand) -> Result<(), CliError> {
    let borrowing = backend.borrowing();
    match command {
        LoanSubcommand::List(page) => print_json(&page_json(&borrowing.list_loans(page.into()).await?)?),
        LoanSubcommand::Get { id } => print_serialized(&borrowing.get_loan(id).await?),
        LoanSubcommand::Create { user, book, quantity } => {
            let loan = NewLoan { user_id: user, book_id: book, quantity };
            print_serialized(&borrowing.create_loan(&loan).await?)
        }
        LoanSubcommand::Return { id } => {
            borrowing.return_loan(id).await?;
            print_json(&json!({ "returned": id }))
        }
        LoanSubcommand::User { user_id, active: false } => print_serialized(&borrowing.user_loans(user_id).await?),
        LoanSubcommand::User { user_id, active: true } => {
            print_serialized(&borrowing.user_active_loans(user_id).await?)
        }
        LoanSubcommand::Book { book_id } => print_serialized(&borrowing.book_loans(book_id).await?),
        LoanSubcommand::Overdue => print_serialized(&borrowing.overdue_loans().await?),
        LoanSubcommand::Count { book_id } => {
            let count = borrowing.borrowed_count(book_id).await?;
            print_json(&json!({ "bookId": book_id, "borrowedCount": count }))
        }
    }
}

async fn run_notifications(backend: &Backend, command: NotificationSubcommand) -> Result<(), CliError> {
    let notification = backend.notification();
    match command {
        NotificationSubcommand::List => print_serialized(&notification.list().await?),
        NotificationSubcommand::Send { to, subject, body } => {
            let message = EmailMessage { to, subject, body };
            print_serialized(&notification.send_notification(&message).await?)
        }
        NotificationSubcommand::Delete { id } => {
            notification.delete(&id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

fn session_json(session: &Session) -> Value {
    let roles: Vec<&str> = session.roles().iter().map(|role| role.as_str()).collect();
    json!({
        "authenticated": session.is_authenticated(),
        "subject": session.subject(),
        "roles": roles,
    })
}

fn decision_json(route: Route, decision: Decision) -> Value {
    match decision {
        Decision::Allow => json!({ "route": route.path(), "decision": "allow" }),
        Decision::Redirect(target) => {
            json!({ "route": route.path(), "decision": "redirect", "target": target.path() })
        }
    }
}

fn page_json<T: Serialize>(page: &Page<T>) -> Result<Value, CliError> {
    Ok(json!({
        "content": serde_json::to_value(&page.content)?,
        "page": page.page_index,
        "size": page.page_size,
        "totalElements": page.total_elements,
        "totalPages": page.total_pages,
    }))
}

fn print_serialized<T: Serialize>(value: &T) -> Result<(), CliError> {
    print_json(&serde_json::to_value(value)?)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
