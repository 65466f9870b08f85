//! Sigil CLI - create, view, reply to and delete self-destructing tickets
//!
//! A thin front end over [`sigil_client::TicketServiceClient`]:
//! - Collects input and runs it through the ticket policy before sending
//! - Renders service responses, including the reply tree, as text or JSON
//! - Runs the periodic API usage dashboard
//!
//! Diagnostics go to stderr; results go to stdout.

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use sigil_client::{ClientError, Config, Dashboard, DashboardState, TicketServiceClient};
use sigil_core::format::{access_window_summary, format_date, window_duration};
use sigil_core::{
    adapter, metrics, ApiUsageMetric, ConversationNode, EncryptionAlgo, MetricsSummary,
    PostReplyRequest, TicketCreationResponse, TicketDraft, TicketType, Timestamp,
    UnifiedViewRequest, ViewTicketResponse,
};
use std::process::ExitCode;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

/// Exit code for input rejected before anything was sent.
const EXIT_INVALID_INPUT: u8 = 2;

/// Width of the distribution bars in metrics output.
const BAR_WIDTH: usize = 30;

#[derive(Parser)]
#[command(name = "sigil", version)]
#[command(about = "Client for Sigil Scrolls self-destructing tickets", long_about = None)]
struct Cli {
    /// Service base URL (overrides SIGIL_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log requests to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new ticket
    Create(CreateArgs),

    /// View a ticket and its conversation
    View {
        /// Ticket number (e.g. THD-1A2B3C)
        ticket_number: String,

        /// Passkey, in order; repeat for multi-key tickets
        #[arg(short, long = "passkey", required = true)]
        passkeys: Vec<String>,
    },

    /// Reply to a ticket or to one of its replies
    Reply {
        ticket_number: String,

        /// Reply text
        #[arg(short, long)]
        content: String,

        /// Reply to this reply instead of the ticket
        #[arg(long)]
        parent: Option<String>,

        #[arg(short, long = "passkey", required = true)]
        passkeys: Vec<String>,
    },

    /// Permanently delete a ticket
    Delete {
        /// Ticket ID (UUID)
        ticket_id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show API usage metrics once
    Metrics,

    /// Refresh API usage metrics until interrupted
    Dashboard {
        /// Refresh interval (overrides SIGIL_METRICS_REFRESH_MS)
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Stop after this many refreshes
        #[arg(long)]
        ticks: Option<u64>,
    },
}

#[derive(Args)]
struct CreateArgs {
    /// Message to seal in the ticket
    #[arg(short, long)]
    message: String,

    /// SINGLE, SECURE_SINGLE, THREAD, BROADCAST or GROUP
    #[arg(short = 't', long = "type", default_value = "GROUP", value_parser = parse_ticket_type)]
    ticket_type: TicketType,

    /// AES_256, CHACHA20 or TWOFISH
    #[arg(short, long, default_value = "AES_256", value_parser = parse_algo)]
    algo: EncryptionAlgo,

    /// Passkey; repeat for multi-key tickets (1 to 10)
    #[arg(short, long = "passkey", required = true)]
    passkeys: Vec<String>,

    /// View limit; ignored for SINGLE and SECURE_SINGLE
    #[arg(long)]
    max_views: Option<String>,

    #[arg(long)]
    salt: Option<String>,

    /// RFC 3339 or YYYY-MM-DDTHH:MM (UTC)
    #[arg(long, value_parser = parse_ts)]
    expires_at: Option<Timestamp>,

    #[arg(long, value_parser = parse_ts)]
    open_from: Option<Timestamp>,

    #[arg(long, value_parser = parse_ts)]
    open_until: Option<Timestamp>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::from_env();
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url);
    }

    let client = match TicketServiceClient::new(config) {
        Ok(client) => client,
        Err(err) => return report(&err),
    };

    match run(&client, cli.command, cli.json).await {
        Ok(code) => code,
        Err(err) => report(&err),
    }
}

/// Initialize tracing on stderr with environment-based log levels.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose {
        "sigil_client=debug,sigil=debug"
    } else {
        "sigil_client=warn,sigil=warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

fn report(err: &ClientError) -> ExitCode {
    match err.status() {
        Some(status) => eprintln!("error ({status}): {err}"),
        None => eprintln!("error: {err}"),
    }
    if err.is_local() {
        ExitCode::from(EXIT_INVALID_INPUT)
    } else {
        ExitCode::FAILURE
    }
}

async fn run(client: &TicketServiceClient, command: Command, json: bool) -> Result<ExitCode, ClientError> {
    match command {
        Command::Create(args) => {
            let created = client.create_ticket(&build_request(args)?).await?;
            emit(json, &created, render_created);
        }
        Command::View {
            ticket_number,
            passkeys,
        } => {
            let request = UnifiedViewRequest::from_raw_passkeys(ticket_number, passkeys);
            let view = client.view_ticket(&request).await?;
            emit(json, &view, render_view);
        }
        Command::Reply {
            ticket_number,
            content,
            parent,
            passkeys,
        } => {
            let request = PostReplyRequest {
                ticket_number: ticket_number.into(),
                content,
                parent_reply_id: parent.filter(|p| !p.trim().is_empty()),
                passkeys: sigil_core::PasskeyEntry::sequence(passkeys),
            };
            let reply = client.post_reply(&request).await?;
            emit(json, &reply, |r| {
                println!("Reply {} ({})", r.reply_id, r.status);
            });
        }
        Command::Delete { ticket_id, yes } => {
            let id = sigil_core::validate_ticket_id(&ticket_id)?;
            if !yes && !confirm_delete(&id.to_string()).await {
                eprintln!("Aborted.");
                return Ok(ExitCode::FAILURE);
            }
            let outcome = client.delete_ticket(&id.to_string()).await?;
            emit(json, &outcome, |o| println!("{}", o.message));
            if !outcome.success {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Metrics => {
            let metrics = client.fetch_api_usage_metrics().await?;
            emit(json, &metrics, |m| render_metrics(m, &MetricsSummary::from_metrics(m)));
        }
        Command::Dashboard { interval_ms, ticks } => {
            let interval = interval_ms
                .filter(|ms| *ms > 0)
                .map_or(client.config().metrics_refresh, Duration::from_millis);
            run_dashboard(client.clone(), interval, ticks, json).await;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Feed the arguments through a draft so type-derived settings apply.
fn build_request(args: CreateArgs) -> Result<sigil_core::TicketCreationRequest, ClientError> {
    let mut draft = TicketDraft::new(args.ticket_type);
    draft.message_content = args.message;
    draft.encryption_algo = args.algo;
    draft.passkeys = args.passkeys;
    draft.salt = args.salt.filter(|s| !s.trim().is_empty());
    draft.expires_at = args.expires_at;
    draft.open_from = args.open_from;
    draft.open_until = args.open_until;
    if let Some(input) = args.max_views {
        draft.set_max_views_input(&input);
    }
    Ok(draft.to_request()?)
}

async fn confirm_delete(ticket_id: &str) -> bool {
    let mut stderr = tokio::io::stderr();
    let prompt = format!("Permanently delete ticket {ticket_id}? This cannot be undone. Type 'yes' to confirm: ");
    if stderr.write_all(prompt.as_bytes()).await.is_err() || stderr.flush().await.is_err() {
        return false;
    }

    let mut line = String::new();
    match BufReader::new(tokio::io::stdin()).read_line(&mut line).await {
        Ok(_) => matches!(line.trim().to_ascii_lowercase().as_str(), "yes" | "y"),
        Err(_) => false,
    }
}

async fn run_dashboard(client: TicketServiceClient, interval: Duration, ticks: Option<u64>, json: bool) {
    let dashboard = Dashboard::start(client, interval);
    let mut updates = dashboard.subscribe();
    let mut shown: u64 = 0;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                render_dashboard(&state, json);
                shown += 1;
                if ticks.is_some_and(|limit| shown >= limit) {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
        }
    }

    dashboard.shutdown();
}

// === Rendering ===

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T)) {
    if !json {
        text(value);
        return;
    }
    match serde_json::to_string_pretty(value) {
        Ok(out) => println!("{out}"),
        Err(err) => eprintln!("error: failed to encode output: {err}"),
    }
}

fn render_created(created: &TicketCreationResponse) {
    println!("Ticket created");
    println!("  Number:      {}", created.ticket_number);
    println!("  ID:          {}", created.ticket_id);
    println!("  Type:        {}", created.ticket_type.label());
    println!("  Status:      {}", created.ticket_status.label());
    println!("  Encryption:  {}", created.encryption_algo);
    println!("  Replies:     {}", if created.allow_replies { "allowed" } else { "not allowed" });
    println!("  Created:     {}", format_date(created.created_at.as_ref()));
    println!(
        "  {}",
        access_window_summary(
            created.expires_at.as_ref(),
            created.open_from.as_ref(),
            created.open_until.as_ref()
        )
    );
    if created.open_from.is_some() && created.open_until.is_some() {
        println!(
            "  Window:      {}",
            window_duration(created.open_from.as_ref(), created.open_until.as_ref())
        );
    }
    if let Some(views) = created.count_views {
        println!("  Views:       {views}");
    }
    for passkey in &created.passkeys {
        let shown = passkey.value.as_deref().or(passkey.hash.as_deref()).unwrap_or("-");
        println!("  Passkey {}:   {shown}", passkey.order);
    }
}

fn render_view(view: &ViewTicketResponse) {
    println!("Ticket {} [{}]", view.ticket_number, view.ticket_status.label());
    if let Some(warning) = &view.security_warning {
        println!("  Warning: {warning}");
    }
    match (view.max_views, view.remaining_views) {
        (Some(max), Some(remaining)) => println!("  Views left: {remaining} of {max}"),
        (None, Some(remaining)) => println!("  Views left: {remaining}"),
        _ => {}
    }
    if let Some(read_at) = &view.read_at {
        println!("  Read at: {}", format_date(Some(read_at)));
    }
    if view.open_from.is_some() || view.open_until.is_some() {
        println!(
            "  {}",
            access_window_summary(None, view.open_from.as_ref(), view.open_until.as_ref())
        );
    }
    match &view.decrypted_content {
        Some(content) => println!("\n{content}\n"),
        None => println!("\n(no content available)\n"),
    }

    if view.conversation.is_empty() {
        return;
    }
    let total: usize = view.conversation.iter().map(ConversationNode::count).sum();
    println!("Conversation ({total} replies)");
    // Depth-first, in sibling order; trees can be 1000 levels deep.
    let mut stack: Vec<(&ConversationNode, usize)> =
        view.conversation.iter().rev().map(|node| (node, 1)).collect();
    while let Some((node, level)) = stack.pop() {
        let indent = "  ".repeat(level);
        println!(
            "{indent}- [{}] {} ({})",
            node.reply_id,
            node.decrypted_content,
            adapter::format_timestamp(&node.created_at)
        );
        stack.extend(node.replies.iter().rev().map(|child| (child, level + 1)));
    }
}

fn render_metrics(metrics: &[ApiUsageMetric], summary: &MetricsSummary) {
    let top = metrics::top_endpoint(metrics);
    println!("Endpoints:      {}", summary.endpoint_count);
    println!("Total hits:     {}", summary.total_hits);
    println!("Top endpoint:   {}", top.label());
    println!("Activity index: {}%", summary.activity_index);
    let methods: Vec<&str> = summary.methods.iter().map(|m| m.as_str()).collect();
    println!("Methods:        {}", methods.join(", "));

    if metrics.is_empty() {
        return;
    }

    println!("\nBy endpoint");
    for m in metrics {
        println!(
            "  {:<6} {:<45} {:<14} {:>8}  {}",
            m.http_method,
            m.api_endpoint,
            m.ticket_type,
            m.hit_count,
            bar(metrics::share_of_max(m, metrics))
        );
    }

    println!("\nBy ticket type");
    for share in &summary.by_ticket_type {
        println!(
            "  {:<14} {:>8}  {:>5.1}%",
            share.key.label(),
            share.hit_count,
            share.share * 100.0
        );
    }
}

fn render_dashboard(state: &DashboardState, json: bool) {
    if let Some(err) = &state.last_error {
        eprintln!("refresh #{} failed: {err}", state.sequence);
        return;
    }
    let Some(snapshot) = &state.snapshot else {
        return;
    };
    if json {
        emit(true, &snapshot.metrics, |_| {});
        return;
    }
    println!(
        "\n=== API usage (refresh #{}, {}) ===",
        snapshot.sequence,
        format_date(Some(&snapshot.fetched_at))
    );
    render_metrics(&snapshot.metrics, &snapshot.summary);
}

fn bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

// === Argument parsing ===

fn normalize_token(s: &str) -> String {
    s.trim().to_ascii_uppercase().replace('-', "_")
}

fn parse_ticket_type(s: &str) -> Result<TicketType, String> {
    normalize_token(s).parse().map_err(|e: sigil_core::ticket::UnknownVariant| e.to_string())
}

fn parse_algo(s: &str) -> Result<EncryptionAlgo, String> {
    let token = match normalize_token(s).as_str() {
        "AES256" | "AES" => "AES_256".to_string(),
        "CHACHA" | "CHACHA_20" => "CHACHA20".to_string(),
        other => other.to_string(),
    };
    token.parse().map_err(|e: sigil_core::ticket::UnknownVariant| e.to_string())
}

fn parse_ts(s: &str) -> Result<Timestamp, String> {
    adapter::parse_timestamp("timestamp", s.trim()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn enum_arguments_are_forgiving() {
        assert_eq!(parse_ticket_type("secure-single"), Ok(TicketType::SecureSingle));
        assert_eq!(parse_ticket_type(" thread "), Ok(TicketType::Thread));
        assert!(parse_ticket_type("private").is_err());
        assert_eq!(parse_algo("aes256"), Ok(EncryptionAlgo::Aes256));
        assert_eq!(parse_algo("chacha20"), Ok(EncryptionAlgo::ChaCha20));
        assert_eq!(parse_algo("TWOFISH"), Ok(EncryptionAlgo::Twofish));
    }

    #[test]
    fn create_args_go_through_policy() {
        let cli = Cli::try_parse_from([
            "sigil", "create", "-m", "hi", "--type", "SINGLE", "-p", "k1", "--max-views", "99",
        ])
        .unwrap();
        let Command::Create(args) = cli.command else {
            panic!("expected create");
        };
        let request = build_request(args).unwrap();
        assert_eq!(request.max_views, Some(5));
        assert!(!request.allow_replies);
    }

    #[test]
    fn blank_passkey_is_rejected_before_sending() {
        let cli = Cli::try_parse_from(["sigil", "create", "-m", "hi", "-p", "k1", "-p", " "]).unwrap();
        let Command::Create(args) = cli.command else {
            panic!("expected create");
        };
        let err = build_request(args).unwrap_err();
        assert!(err.is_local());
    }

    #[test]
    fn bar_is_bounded() {
        assert_eq!(bar(0.0), ".".repeat(BAR_WIDTH));
        assert_eq!(bar(1.0), "#".repeat(BAR_WIDTH));
        assert_eq!(bar(f64::NAN).len(), BAR_WIDTH);
    }
}
