use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use admintable::api::{AdminClient, ResourceApi, RestResource};
use admintable::config::Config;
use admintable::logging::init_tracing;
use admintable::notify::{AlertLevel, ConfirmRequest, Confirmation, Notifier};
use admintable::request::RequestClient;
use admintable::table::{
    ActionOutcome, Filter, FilterOp, Order, OrderOp, Record, RecordId, TableController,
    TableOptions,
};
use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(name = "admintable", version, about = "Query and edit admin objects from the terminal")]
struct Cli {
    /// Config file (default: ~/.config/admintable/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Server address, overrides server.base_url
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Admin route prefix, overrides server.prefix
    #[arg(long, global = true)]
    prefix: Option<String>,

    /// Answer yes to delete confirmations
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the registered admin objects
    Objects,
    /// Show the fields and capabilities of an object
    Info { name: String },
    /// Print one page of an object's records as JSON lines
    Query {
        name: String,
        #[arg(long)]
        keyword: Option<String>,
        /// FIELD:OP:VALUE, e.g. age:>=:18 (VALUE is JSON or plain text)
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<Filter>,
        /// FIELD[:asc|desc]
        #[arg(long = "order", value_parser = parse_order)]
        orders: Vec<Order>,
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long)]
        limit: Option<u64>,
        /// Query a named view of the object
        #[arg(long)]
        view: Option<String>,
    },
    /// Create a record from a JSON object
    Add {
        name: String,
        #[arg(long)]
        json: String,
    },
    /// Update a record from a JSON object that includes its primary key
    Edit {
        name: String,
        #[arg(long)]
        json: String,
    },
    /// Delete one record
    Delete { name: String, id: String },
    /// Delete several records
    BatchDelete {
        name: String,
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

fn parse_filter(raw: &str) -> Result<Filter, String> {
    let mut parts = raw.splitn(3, ':');
    let (Some(field), Some(op), Some(value)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected FIELD:OP:VALUE, got '{}'", raw));
    };
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok(Filter {
        field: field.to_string(),
        op: op.parse::<FilterOp>()?,
        value,
    })
}

fn parse_order(raw: &str) -> Result<Order, String> {
    let (field, op) = match raw.split_once(':') {
        Some((field, op)) => (field, op.parse::<OrderOp>()?),
        None => (raw, OrderOp::Asc),
    };
    Ok(Order {
        field: field.to_string(),
        op,
    })
}

fn parse_id(raw: &str) -> RecordId {
    raw.parse::<i64>()
        .map(RecordId::Int)
        .unwrap_or_else(|_| RecordId::Str(raw.to_string()))
}

/// Alerts on stderr, confirmations read from stdin.
struct TerminalNotifier {
    assume_yes: bool,
}

#[async_trait]
impl Notifier for TerminalNotifier {
    fn alert(&self, level: AlertLevel, message: &str) {
        eprintln!("[{}] {}", level, message);
    }

    async fn confirm(&self, request: ConfirmRequest) -> Confirmation {
        if self.assume_yes {
            return Confirmation::Positive;
        }
        eprint!("{}: {} [y/N] ", request.title, request.content);

        let mut line = String::new();
        let mut stdin = BufReader::new(tokio::io::stdin());
        match stdin.read_line(&mut line).await {
            Ok(_) if matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes") => {
                Confirmation::Positive
            }
            _ => Confirmation::Negative,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(base_url) = cli.base_url {
        config.server.base_url = base_url;
    }
    if let Some(prefix) = cli.prefix {
        config.server.prefix = prefix;
    }
    config.validate()?;

    let client = RequestClient::new(config.server.api_base())?;
    let admin = AdminClient::new(client);
    let notifier = Arc::new(TerminalNotifier {
        assume_yes: cli.yes,
    });

    let outcome = match cli.command {
        Command::Objects => {
            for name in admin.object_names().await? {
                println!("{}", name);
            }
            return Ok(ExitCode::SUCCESS);
        }
        Command::Info { name } => {
            let info = admin.object_info(&name).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
            return Ok(ExitCode::SUCCESS);
        }
        Command::Query {
            name,
            keyword,
            filters,
            orders,
            page,
            limit,
            view,
        } => {
            let mut resource = bind_resource(&admin, &name, &config).await;
            if let Some(view) = view {
                resource = resource.with_view(view);
            }
            let table = controller(resource, notifier, &config);
            if let Some(keyword) = keyword {
                table.set_keyword(keyword);
            }
            if let Some(limit) = limit {
                table.set_limit(limit);
            }
            for filter in filters {
                table.set_filter(filter);
            }
            for order in orders {
                table.set_order(order);
            }
            table.set_page(page);

            let outcome = table.query().await;
            if outcome.is_done() {
                let state = table.state();
                for item in &state.items {
                    println!("{}", item);
                }
                eprintln!(
                    "page {}/{} ({} total)",
                    state.current_page(),
                    state.total_pages(),
                    state.total
                );
            }
            outcome
        }
        Command::Add { name, json } => {
            let form: Record = serde_json::from_str(&json).context("--json must be an object")?;
            let table = controller(bind_resource(&admin, &name, &config).await, notifier, &config);
            table.show_add();
            table.set_form(form);
            table.add().await
        }
        Command::Edit { name, json } => {
            let item: Record = serde_json::from_str(&json).context("--json must be an object")?;
            let table = controller(bind_resource(&admin, &name, &config).await, notifier, &config);
            table.show_edit(&item);
            table.edit(item).await
        }
        Command::Delete { name, id } => {
            let table = controller(bind_resource(&admin, &name, &config).await, notifier, &config);
            table.delete(parse_id(&id)).await
        }
        Command::BatchDelete { name, ids } => {
            let table = controller(bind_resource(&admin, &name, &config).await, notifier, &config);
            table
                .batch(ids.iter().map(String::as_str).map(parse_id).collect())
                .await
        }
    };

    Ok(match outcome {
        ActionOutcome::Done => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

/// Resource binding for `name`, using the primary key the server reports
/// when its admin metadata is available.
async fn bind_resource(admin: &AdminClient, name: &str, config: &Config) -> RestResource {
    let resource = match admin.resource(name).await {
        Ok(resource) => resource,
        Err(err) => {
            tracing::warn!(%name, error = %err, "object metadata unavailable, assuming 'id' key");
            RestResource::new(admin.client().clone(), name)
        }
    };
    resource.with_query_method(config.server.query_method)
}

fn controller(
    resource: RestResource,
    notifier: Arc<TerminalNotifier>,
    config: &Config,
) -> TableController {
    let api: Arc<dyn ResourceApi> = Arc::new(resource);
    TableController::new(api, notifier, TableOptions::from(&config.table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_filter_reads_json_values() {
        let filter = parse_filter("age:>=:18").unwrap();
        assert_eq!(filter.field, "age");
        assert_eq!(filter.op, FilterOp::Ge);
        assert_eq!(filter.value, serde_json::json!(18));
    }

    #[test]
    fn parse_filter_keeps_plain_text() {
        let filter = parse_filter("name:=:bob:smith").unwrap();
        assert_eq!(filter.value, serde_json::json!("bob:smith"));
    }

    #[test]
    fn parse_filter_rejects_bad_input() {
        assert!(parse_filter("age").is_err());
        assert!(parse_filter("age:~:1").is_err());
    }

    #[test]
    fn parse_order_defaults_to_ascending() {
        assert_eq!(parse_order("name").unwrap().op, OrderOp::Asc);
        assert_eq!(parse_order("name:DESC").unwrap().op, OrderOp::Desc);
        assert!(parse_order("name:up").is_err());
    }

    #[test]
    fn parse_id_prefers_integers() {
        assert_eq!(parse_id("42"), RecordId::Int(42));
        assert_eq!(parse_id("a-1"), RecordId::Str("a-1".to_string()));
    }
}
