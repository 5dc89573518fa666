// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::{CONFIG_PATH_ENV, Config, SESSION_COOKIE_ENV};
use roomdesk_api::{Client, Session};
use roomdesk_app::RoomsState;
use roomdesk_testkit::MemoryBackend;
use runtime::ApiRuntime;
use std::env;
use std::path::PathBuf;
use tracing::info;

const DEMO_SEED: u64 = 2026;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `roomdesk --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;
    let timeout = config.api_timeout()?;

    if options.demo {
        if options.check_only {
            return Ok(());
        }
        start_logging(&config)?;
        info!("starting in demo mode");
        let mut backend = MemoryBackend::demo(DEMO_SEED);
        return roomdesk_tui::run_app(&mut RoomsState::default(), &mut backend);
    }

    let cookie = config.session_cookie().ok_or_else(|| {
        anyhow!(
            "no session cookie; set [session].cookie in {} or {SESSION_COOKIE_ENV}, or run with --demo",
            options.config_path.display()
        )
    })?;
    let session = Session::new(config.api_base_url(), &cookie).with_context(|| {
        format!(
            "invalid [api] or [session] config in {}",
            options.config_path.display()
        )
    })?;
    let client = Client::new(session, timeout)?;
    if options.check_only {
        return Ok(());
    }

    start_logging(&config)?;
    info!(base_url = %client.session().base_url(), "starting");
    let mut runtime = ApiRuntime::new(client);
    roomdesk_tui::run_app(&mut RoomsState::default(), &mut runtime)
}

fn start_logging(config: &Config) -> Result<()> {
    match config.log_file() {
        Some(path) => logging::init(&path, config.log_level()),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => options.print_config_path = true,
            "--print-example-config" => options.print_example = true,
            "--demo" => options.demo = true,
            "--check" => options.check_only = true,
            "--help" | "-h" => options.show_help = true,
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    // Print flags exit early and would silently skip --demo or --check.
    if !options.show_help && (options.print_config_path || options.print_example) {
        if options.print_config_path && options.print_example {
            bail!("--print-config-path and --print-example-config cannot be combined");
        }
        if options.demo || options.check_only {
            bail!("print flags cannot be combined with --demo or --check");
        }
    }

    Ok(options)
}

fn help_text() -> String {
    format!(
        "roomdesk: list, edit and delete the rooms you rent out\n\
         \n\
         usage: roomdesk [--config <path>] [--demo] [--check]\n\
         \n\
         \x20 --config <path>          Config file (default: {CONFIG_PATH_ENV} or the platform config dir)\n\
         \x20 --demo                   Manage generated rooms in memory, no server or cookie needed\n\
         \x20 --check                  Validate config and session cookie, then exit\n\
         \x20 --print-config-path      Print the resolved config path and exit\n\
         \x20 --print-example-config   Print a v1 config template and exit\n\
         \x20 -h, --help               Show this help\n\
         \n\
         The session cookie comes from [session].cookie or {SESSION_COOKIE_ENV}.\n"
    )
}

fn print_help() {
    print!("{}", help_text());
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, help_text, parse_cli_args};
    use crate::config::{CONFIG_PATH_ENV, SESSION_COOKIE_ENV};
    use anyhow::Result;
    use std::path::PathBuf;

    fn fallback_path() -> PathBuf {
        PathBuf::from("/tmp/roomdesk-config.toml")
    }

    #[test]
    fn no_arguments_opens_the_live_screen_with_fallback_config() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), fallback_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: fallback_path(),
                print_config_path: false,
                demo: false,
                print_example: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn config_flag_overrides_fallback_path() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/srv/landlord/roomdesk.toml", "--demo"],
            fallback_path(),
        )?;
        assert_eq!(
            options.config_path,
            PathBuf::from("/srv/landlord/roomdesk.toml")
        );
        assert!(options.demo);
        Ok(())
    }

    #[test]
    fn config_flag_without_path_is_rejected() {
        let error = parse_cli_args(vec!["--config"], fallback_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));
    }

    #[test]
    fn unknown_flag_points_to_help() {
        let error = parse_cli_args(vec!["--cookie"], fallback_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument \"--cookie\""));
        assert!(message.contains("--help"));
    }

    #[test]
    fn demo_and_check_combine_for_a_dry_run() -> Result<()> {
        let options = parse_cli_args(vec!["--check", "--demo"], fallback_path())?;
        assert!(options.demo);
        assert!(options.check_only);
        assert!(!options.print_config_path);
        assert!(!options.print_example);
        Ok(())
    }

    #[test]
    fn print_flags_stand_alone() -> Result<()> {
        assert!(parse_cli_args(vec!["--print-config-path"], fallback_path())?.print_config_path);
        assert!(parse_cli_args(vec!["--print-example-config"], fallback_path())?.print_example);

        let both = parse_cli_args(
            vec!["--print-config-path", "--print-example-config"],
            fallback_path(),
        )
        .expect_err("two print flags should fail");
        assert!(both.to_string().contains("cannot be combined"));

        let with_demo = parse_cli_args(vec!["--demo", "--print-config-path"], fallback_path())
            .expect_err("print flag with --demo should fail");
        assert!(with_demo.to_string().contains("--demo or --check"));
        Ok(())
    }

    #[test]
    fn help_wins_over_conflicting_flags() -> Result<()> {
        let long = parse_cli_args(
            vec!["--print-config-path", "--check", "--help"],
            fallback_path(),
        )?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], fallback_path())?;
        assert!(short.show_help);
        Ok(())
    }

    #[test]
    fn help_names_session_sources_and_demo_mode() {
        let help = help_text();
        assert!(help.starts_with("roomdesk: list, edit and delete the rooms you rent out"));
        assert!(help.contains(SESSION_COOKIE_ENV));
        assert!(help.contains(CONFIG_PATH_ENV));
        assert!(help.contains("--demo"));
        assert!(help.contains("no server or cookie needed"));
    }
}
