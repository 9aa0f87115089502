//! Order Desk Console
//!
//! Line-oriented client that drives the order form and table against a
//! running server.
//!
//! # Usage
//!
//! ```bash
//! ORDER_DESK_URL=http://localhost:3000 cargo run --bin order-console
//! ```
//!
//! Type `help` at the prompt for the command list.

use std::io::Write as _;
use std::sync::Arc;

use anyhow::Context;
use order_desk::infrastructure::config::{AppConfig, load_dotenv};
use order_desk::infrastructure::telemetry;
use order_desk::presentation::form::{BannerKind, FormField};
use order_desk::{HttpOrderApi, Instrument, OrderForm, OrderSide, OrderStore, OrderTable, OrderType, SubmitOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  show                    show the form
  set <field> <value>     fields: symbol, type, quantity, price, stop, side
  unset <field>           blank a field
  submit                  submit the form
  list                    reload orders from the server
  clear                   clear all orders
  instruments             list instruments, order types and sides
  help                    this text
  quit                    exit";

/// One console command.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Show,
    Set(FormField, String),
    Unset(FormField),
    Submit,
    List,
    Clear,
    Instruments,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Ok(None);
        };
        let command = match verb.to_ascii_lowercase().as_str() {
            "show" => Self::Show,
            "set" => {
                let field = parse_field(parts.next())?;
                let value = parts.collect::<Vec<_>>().join(" ");
                if value.is_empty() {
                    return Err(format!("missing value for {field}"));
                }
                Self::Set(field, value)
            }
            "unset" => Self::Unset(parse_field(parts.next())?),
            "submit" => Self::Submit,
            "list" | "refresh" => Self::List,
            "clear" => Self::Clear,
            "instruments" => Self::Instruments,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command: {other} (try `help`)")),
        };
        Ok(Some(command))
    }
}

fn parse_field(name: Option<&str>) -> Result<FormField, String> {
    let name = name.ok_or_else(|| "missing field name".to_string())?;
    match name.to_ascii_lowercase().as_str() {
        "symbol" => Ok(FormField::Symbol),
        "type" | "ordertype" => Ok(FormField::OrderType),
        "quantity" | "qty" => Ok(FormField::Quantity),
        "price" => Ok(FormField::Price),
        "stop" | "stopprice" => Ok(FormField::StopPrice),
        "side" => Ok(FormField::Side),
        other => Err(format!("unknown field: {other}")),
    }
}

fn apply_set(form: &mut OrderForm<HttpOrderApi>, field: FormField, value: String) -> Result<(), String> {
    match field {
        FormField::Symbol => match value.parse::<Instrument>() {
            Ok(instrument) => form.select_instrument(instrument),
            Err(_) => form.set_symbol(value),
        },
        FormField::OrderType => form.set_order_type(value.parse::<OrderType>()?),
        FormField::Quantity => form.set_quantity(value),
        FormField::Price => form.set_price(value),
        FormField::StopPrice => form.set_stop_price(value),
        FormField::Side => form.set_side(value.parse::<OrderSide>()?),
    }
    Ok(())
}

fn choices() -> String {
    let instruments: Vec<_> = Instrument::ALL.iter().map(Instrument::as_str).collect();
    let types: Vec<_> = OrderType::ALL.iter().map(OrderType::as_str).collect();
    let sides: Vec<_> = OrderSide::ALL.iter().map(OrderSide::as_str).collect();
    format!(
        "Instruments: {}\nOrder types: {}\nSides:       {}",
        instruments.join(", "),
        types.join(", "),
        sides.join(", ")
    )
}

fn print_form(form: &OrderForm<HttpOrderApi>) {
    if let Some(banner) = form.banner() {
        let tag = match banner.kind {
            BannerKind::Success => "OK",
            BannerKind::Failure => "ERROR",
        };
        println!("[{tag}] {}", banner.message);
    }
    for field in form.visible_fields() {
        let value = match field {
            FormField::Symbol => form.symbol().to_string(),
            FormField::OrderType => form.order_type().map(|t| t.to_string()).unwrap_or_default(),
            FormField::Quantity => form.quantity().to_string(),
            FormField::Price => form.price().to_string(),
            FormField::StopPrice => form.stop_price().to_string(),
            FormField::Side => form.side().map(|s| s.to_string()).unwrap_or_default(),
        };
        match form.errors().get(field) {
            Some(error) => println!("  {:<11} {value:<12} <- {error}", field.label()),
            None => println!("  {:<11} {value}", field.label()),
        }
    }
    let control = form.submit_control();
    println!("  [{}]{}", control.label, if control.disabled { " (disabled)" } else { "" });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    let config = AppConfig::from_env().context("invalid configuration")?;
    telemetry::init(config.run_mode);

    let api = Arc::new(HttpOrderApi::new(&config.api_url).context("failed to build HTTP client")?);
    let store = Arc::new(OrderStore::new(api));
    let mut form = OrderForm::new(Arc::clone(&store));
    let table = OrderTable::new(Arc::clone(&store));

    println!("Order Desk console, server {}", config.api_url);
    if let Err(e) = store.fetch_all().await {
        println!("Could not load orders: {e}");
    }
    println!("{}", table.render_text());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().context("failed to write prompt")?;

        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            Command::Show => print_form(&form),
            Command::Set(field, value) => match apply_set(&mut form, field, value) {
                Ok(()) => print_form(&form),
                Err(message) => println!("{message}"),
            },
            Command::Unset(field) => {
                form.clear_field(field);
                print_form(&form);
            }
            Command::Submit => {
                match form.submit().await {
                    SubmitOutcome::Busy => println!("A request is already in flight"),
                    SubmitOutcome::Invalid(_) => print_form(&form),
                    SubmitOutcome::Submitted(_) | SubmitOutcome::Failed(_) => {
                        print_form(&form);
                        println!("{}", table.render_text());
                    }
                }
            }
            Command::List => {
                if let Err(e) = store.fetch_all().await {
                    println!("{e}");
                }
                println!("{}", table.render_text());
            }
            Command::Clear => {
                match table.clear().await {
                    Ok(message) => println!("{message}"),
                    Err(e) => println!("{e}"),
                }
                println!("{}", table.render_text());
            }
            Command::Instruments => println!("{}", choices()),
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_is_ignored() {
        assert_eq!(Command::parse("   "), Ok(None));
    }

    #[test]
    fn set_keeps_multi_word_values() {
        assert_eq!(
            Command::parse("set type stop limit"),
            Ok(Some(Command::Set(FormField::OrderType, "stop limit".to_string())))
        );
    }

    #[test]
    fn set_without_value_is_rejected() {
        assert!(Command::parse("set price").is_err());
    }

    #[test]
    fn field_aliases() {
        assert_eq!(Command::parse("unset stop"), Ok(Some(Command::Unset(FormField::StopPrice))));
        assert_eq!(Command::parse("UNSET qty"), Ok(Some(Command::Unset(FormField::Quantity))));
    }

    #[test]
    fn choices_list_every_option() {
        let text = choices();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Instruments: NIFTY"));
        assert_eq!(lines[1], "Order types: Market, Limit, Stop Limit");
        assert_eq!(lines[2], "Sides:       Buy, Sell");
    }

    #[test]
    fn unknown_command_is_reported() {
        let err = Command::parse("buy 10 nifty").unwrap_err();
        assert!(err.contains("unknown command"));
    }
}
