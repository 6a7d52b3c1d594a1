use clap::{Args, Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "config-admin-cli")]
#[command(about = "Management CLI for the configuration admin service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[arg(short, long, default_value = "CHANGE_ME_IN_PRODUCTION")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service status
    Status,
    /// Manage multipliers
    #[command(subcommand)]
    Multipliers(MultiplierCommand),
    /// Manage operators
    #[command(subcommand)]
    Operators(OperatorCommand),
    /// Forward a JSON object to the notification function
    Notify {
        /// Payload, e.g. '{"user":"pilot-7","new_rank":"Major"}'
        payload: String,
    },
}

#[derive(Subcommand)]
enum MultiplierCommand {
    /// List multipliers by value
    List,
    /// Add a multiplier
    Add(MultiplierFields),
    /// Replace a multiplier's fields
    Update {
        id: String,
        #[command(flatten)]
        fields: MultiplierFields,
    },
    /// Delete a multiplier
    Delete { id: String },
    /// Flip the active flag, given the value currently shown
    Toggle {
        id: String,
        #[arg(long)]
        active: bool,
    },
}

#[derive(Args)]
struct MultiplierFields {
    #[arg(long)]
    name: String,
    /// Passed through as text; the service substitutes 1 for bad input
    #[arg(long, default_value = "1")]
    value: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    inactive: bool,
}

#[derive(Subcommand)]
enum OperatorCommand {
    /// List operators by order index, then name
    List,
    /// Add an operator
    Add(OperatorFields),
    /// Replace an operator's fields
    Update {
        id: String,
        #[command(flatten)]
        fields: OperatorFields,
    },
    /// Delete an operator
    Delete { id: String },
    /// Flip the active flag, given the value currently shown
    Toggle {
        id: String,
        #[arg(long)]
        active: bool,
    },
}

#[derive(Args)]
struct OperatorFields {
    #[arg(long)]
    name: String,
    /// Passed through as text; the service substitutes 0 for bad input
    #[arg(long, default_value = "0")]
    order_index: String,
    #[arg(long)]
    inactive: bool,
}

impl MultiplierFields {
    fn body(&self) -> Value {
        json!({
            "name": self.name,
            "value": self.value,
            "description": self.description,
            "is_active": !self.inactive,
        })
    }
}

impl OperatorFields {
    fn body(&self) -> Value {
        json!({
            "name": self.name,
            "order_index": self.order_index,
            "is_active": !self.inactive,
        })
    }
}

/// One admin API call: method, path, optional JSON body.
type Call = (Method, String, Option<Value>);

fn multiplier_call(command: MultiplierCommand) -> Call {
    table_call("multipliers", match command {
        MultiplierCommand::List => TableAction::List,
        MultiplierCommand::Add(fields) => TableAction::Add(fields.body()),
        MultiplierCommand::Update { id, fields } => TableAction::Update(id, fields.body()),
        MultiplierCommand::Delete { id } => TableAction::Delete(id),
        MultiplierCommand::Toggle { id, active } => TableAction::Toggle(id, active),
    })
}

fn operator_call(command: OperatorCommand) -> Call {
    table_call("operators", match command {
        OperatorCommand::List => TableAction::List,
        OperatorCommand::Add(fields) => TableAction::Add(fields.body()),
        OperatorCommand::Update { id, fields } => TableAction::Update(id, fields.body()),
        OperatorCommand::Delete { id } => TableAction::Delete(id),
        OperatorCommand::Toggle { id, active } => TableAction::Toggle(id, active),
    })
}

enum TableAction {
    List,
    Add(Value),
    Update(String, Value),
    Delete(String),
    Toggle(String, bool),
}

fn table_call(table: &str, action: TableAction) -> Call {
    let base = format!("/admin/{}", table);
    match action {
        TableAction::List => (Method::GET, base, None),
        TableAction::Add(body) => (Method::POST, base, Some(body)),
        TableAction::Update(id, body) => (Method::PUT, format!("{}/{}", base, id), Some(body)),
        TableAction::Delete(id) => (Method::DELETE, format!("{}/{}", base, id), None),
        TableAction::Toggle(id, active) => (
            Method::POST,
            format!("{}/{}/toggle", base, id),
            Some(json!({ "is_active": active })),
        ),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    let (method, path, body) = match cli.command {
        Commands::Status => (Method::GET, "/admin/status".to_string(), None),
        Commands::Multipliers(command) => multiplier_call(command),
        Commands::Operators(command) => operator_call(command),
        Commands::Notify { payload } => {
            let payload: Value = serde_json::from_str(&payload)?;
            if !payload.is_object() {
                return Err("notification payload must be a JSON object".into());
            }
            (Method::POST, "/admin/notifications".to_string(), Some(payload))
        }
    };

    let mut request = client
        .request(method, format!("{}{}", cli.url.trim_end_matches('/'), path))
        .headers(headers);
    if let Some(body) = body {
        request = request.json(&body);
    }

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        return Err(status_error(status).into());
    }

    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}

fn status_error(status: reqwest::StatusCode) -> String {
    format!("Admin API returned status {}", status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_sends_current_flag() {
        let (method, path, body) = multiplier_call(MultiplierCommand::Toggle {
            id: "m1".to_string(),
            active: true,
        });
        assert_eq!(method, Method::POST);
        assert_eq!(path, "/admin/multipliers/m1/toggle");
        assert_eq!(body, Some(json!({"is_active": true})));
    }

    #[test]
    fn test_operator_fields_pass_text_through() {
        let cli = Cli::parse_from([
            "config-admin-cli",
            "operators",
            "add",
            "--name",
            "Emirates",
            "--order-index",
            "abc",
        ]);
        let Commands::Operators(command) = cli.command else {
            panic!("expected operators command");
        };
        let (_, path, body) = operator_call(command);
        assert_eq!(path, "/admin/operators");
        assert_eq!(body, Some(json!({"name": "Emirates", "order_index": "abc", "is_active": true})));
    }

    #[tokio::test]
    async fn test_failed_call_is_an_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let app = axum::Router::new().fallback(|| async {
                (axum::http::StatusCode::BAD_GATEWAY, r#"{"level":"error","message":"Failed to save multiplier"}"#)
            });
            axum::serve(listener, app).await.unwrap();
        });

        let res = Client::new().get(format!("http://{}/admin/multipliers", addr)).send().await.unwrap();
        let err = print_response(res).await.unwrap_err();
        assert_eq!(err.to_string(), "Admin API returned status 502 Bad Gateway");
    }
}
