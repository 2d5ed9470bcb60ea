// src/cli.rs
use std::{env, path::PathBuf};

use crate::config::options::AppOptions;
use crate::error::{Result, ScrapeError};
use crate::progress::ConsoleProgress;
use crate::runner;

const HELP: &str = include_str!("cli_help.txt");

pub enum Command {
    Run(AppOptions),
    Help,
}

/// Entry point of the binary: environment, then flags, then run.
pub fn run() -> Result<()> {
    match parse_args(env::args().skip(1), AppOptions::from_env())? {
        Command::Help => {
            eprintln!("{HELP}");
            Ok(())
        }
        Command::Run(opts) => {
            let mut progress = ConsoleProgress::default();
            let summary = runner::run(&opts, Some(&mut progress))?;
            println!("{}", summary.out_path.display());
            Ok(())
        }
    }
}

/// Overlay command-line flags on `opts`.
pub fn parse_args<I>(args: I, mut opts: AppOptions) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    while let Some(a) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ScrapeError::Config(format!("Missing value for {flag}")))
        };
        match a.as_str() {
            "--url" => opts.fetch.landing_url = value("--url")?,
            "--fallback-url" => opts.fetch.fallback_url = value("--fallback-url")?,
            "--input" | "-i" => opts.input = Some(PathBuf::from(value("--input")?)),
            "-o" | "--out" => opts.export.out_path = PathBuf::from(value("--out")?),
            "--timeout" => {
                let v = value("--timeout")?;
                opts.fetch.timeout_secs = match v.parse::<f64>() {
                    Ok(secs) if secs.is_finite() && secs > 0.0 => secs,
                    _ => return Err(ScrapeError::Config(format!("Invalid timeout: {v}"))),
                };
            }
            "--retries" => {
                let v = value("--retries")?;
                let n: u32 = v
                    .parse()
                    .map_err(|_| ScrapeError::Config(format!("Invalid retry count: {v}")))?;
                opts.fetch.retries = n.max(1);
            }
            "--user-agent" => opts.fetch.user_agent = value("--user-agent")?,
            "--compact" => opts.export.pretty = false,
            "-h" | "--help" => return Ok(Command::Help),
            _ => return Err(ScrapeError::Config(format!("Unknown arg: {a}"))),
        }
    }
    Ok(Command::Run(opts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command> {
        parse_args(args.iter().map(|a| a.to_string()), AppOptions::default())
    }

    fn opts(args: &[&str]) -> AppOptions {
        match parse(args) {
            Ok(Command::Run(o)) => o,
            Ok(Command::Help) => panic!("unexpected help"),
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn no_args_keeps_defaults() {
        assert_eq!(opts(&[]), AppOptions::default());
    }

    #[test]
    fn flags_override_options() {
        let o = opts(&[
            "--url", "https://a.example/", "--fallback-url", "https://b.example/",
            "--input", "saved.html", "-o", "tmp/plan.json",
            "--timeout", "2.5", "--retries", "0", "--user-agent", "ua", "--compact",
        ]);
        assert_eq!(o.fetch.landing_url, "https://a.example/");
        assert_eq!(o.fetch.fallback_url, "https://b.example/");
        assert_eq!(o.input, Some(PathBuf::from("saved.html")));
        assert_eq!(o.export.out_path, PathBuf::from("tmp/plan.json"));
        assert_eq!(o.fetch.timeout_secs, 2.5);
        assert_eq!(o.fetch.retries, 1);
        assert_eq!(o.fetch.user_agent, "ua");
        assert!(!o.export.pretty);
    }

    #[test]
    fn help_wins() {
        assert!(matches!(parse(&["--compact", "-h"]), Ok(Command::Help)));
    }

    #[test]
    fn bad_input_is_a_config_error() {
        for args in [&["--bogus"][..], &["--out"], &["--timeout", "-1"], &["--retries", "many"]] {
            assert!(matches!(parse(args), Err(ScrapeError::Config(_))), "{args:?}");
        }
    }
}
