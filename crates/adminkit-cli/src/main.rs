//! `adminkit`: inspect admin widget data blocks and option endpoints

mod commands;

use adminkit_widgets::AdminkitConfig;
use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use commands::{Endpoint, FormKind};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("adminkit")
        .version(adminkit_widgets::VERSION)
        .about("Admin form widget state from the command line")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print results and logs as JSON"),
        )
        .subcommand(
            Command::new("scopes")
                .about("List the scopes offered for a component")
                .arg(
                    Arg::new("blocks")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON file of the page's data blocks"),
                )
                .arg(Arg::new("component").required(true).help("Component value, e.g. zrc")),
        )
        .subcommand(
            Command::new("submission")
                .about("Mount a formset and print what it would post")
                .arg(
                    Arg::new("blocks")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON file of the page's data blocks"),
                )
                .arg(
                    Arg::new("add")
                        .long("add")
                        .default_value("0")
                        .value_parser(value_parser!(usize))
                        .help("Blank rows to append before encoding"),
                )
                .arg(
                    Arg::new("form")
                        .long("form")
                        .default_value("authorizations")
                        .value_parser(["authorizations", "services"])
                        .help("Formset on the page"),
                ),
        )
        .subcommand(
            Command::new("options")
                .about("Fetch selection list options for a key")
                .arg(
                    Arg::new("endpoint")
                        .required(true)
                        .value_parser(["procestypen", "resultaten"]),
                )
                .arg(Arg::new("key").required(true).help("Year or zaaktype id")),
        )
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("adminkit=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn required<'a>(args: &'a ArgMatches, id: &str) -> Result<&'a String> {
    args.get_one::<String>(id)
        .with_context(|| format!("missing argument: {id}"))
}

fn required_path<'a>(args: &'a ArgMatches, id: &str) -> Result<&'a PathBuf> {
    args.get_one::<PathBuf>(id)
        .with_context(|| format!("missing argument: {id}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    let json = matches.get_flag("json");
    init_tracing(json);

    let env: HashMap<String, String> = std::env::vars().collect();
    let config = AdminkitConfig::load(
        matches.get_one::<PathBuf>("config").map(PathBuf::as_path),
        &env,
    )
    .context("failed to load configuration")?;

    let output = match matches.subcommand() {
        Some(("scopes", args)) => {
            let blocks = commands::read_blocks(required_path(args, "blocks")?)?;
            let choices = commands::scopes(&blocks, required(args, "component")?)?;
            commands::render_choices(&choices, json)?
        }
        Some(("submission", args)) => {
            let blocks = commands::read_blocks(required_path(args, "blocks")?)?;
            let kind = FormKind::parse(required(args, "form")?)?;
            let add = args.get_one::<usize>("add").copied().unwrap_or_default();
            let submission = commands::submission(&blocks, kind, add)?;
            commands::render_submission(&submission, json)?
        }
        Some(("options", args)) => {
            let endpoint = Endpoint::parse(required(args, "endpoint")?)?;
            let key = required(args, "key")?;
            tracing::info!(?endpoint, key = %key, base_url = %config.base_url, "fetching options");
            let state = commands::options(&config, endpoint, key).await?;
            commands::render_choices(&state.options, json)?
        }
        _ => anyhow::bail!("no subcommand given"),
    };

    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let matches = cli()
            .try_get_matches_from(["adminkit", "submission", "page.json", "--add", "2", "--json"])
            .unwrap();
        assert!(matches.get_flag("json"));
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "submission");
        assert_eq!(args.get_one::<usize>("add"), Some(&2));
        assert_eq!(required(args, "form").unwrap(), "authorizations");
    }

    #[test]
    fn unknown_endpoint_is_rejected() {
        assert!(cli()
            .try_get_matches_from(["adminkit", "options", "zaaktypen", "1"])
            .is_err());
    }
}
