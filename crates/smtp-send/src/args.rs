//! Command-line arguments.

use crate::config::DEFAULT_CONFIG_PATH;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Long flags that may also be spelled with a single dash (`-to`).
const LONG_FLAGS: &[&str] = &["config", "to", "subject", "help", "version"];

/// Long flags that take a value.
const VALUE_FLAGS: &[&str] = &["config", "to", "subject"];

/// Relay a message read from standard input to one recipient.
///
/// The body is sent after `From:`, `To:` and `Subject:` header lines.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "smtp-send", version)]
pub struct Args {
    /// Config file to use
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Address to send mail to
    #[arg(long, value_name = "ADDRESS", value_parser = parse_recipient)]
    pub to: String,

    /// Subject of the email
    #[arg(long, value_name = "TEXT", default_value = "")]
    pub subject: String,
}

impl Args {
    /// Parses arguments, accepting `-flag` wherever `--flag` is meant.
    ///
    /// # Errors
    ///
    /// Returns a clap error for help/version requests and usage errors.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }
}

fn parse_recipient(value: &str) -> Result<String, String> {
    if value.is_empty() {
        Err("must specify to (-to)".to_string())
    } else {
        Ok(value.to_string())
    }
}

/// Rewrites single-dash long flags (`-to b@y.com`, `-config=/x`) to their
/// double-dash form. Values of flags and everything after `--` are left
/// alone, as is the first element (the program name).
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut out: Vec<OsString> = args.next().into_iter().collect();

    while let Some(arg) = args.next() {
        let Some(text) = arg.to_str() else {
            out.push(arg);
            continue;
        };
        if text == "--" {
            out.push(arg);
            out.extend(args);
            break;
        }

        let (single_dash, body) = if let Some(body) = text.strip_prefix("--") {
            (false, body)
        } else if let Some(body) = text.strip_prefix('-') {
            (true, body)
        } else {
            out.push(arg);
            continue;
        };

        let (name, inline_value) = body
            .split_once('=')
            .map_or((body, false), |(name, _)| (name, true));
        if !LONG_FLAGS.contains(&name) {
            out.push(arg);
            continue;
        }

        let takes_value = !inline_value && VALUE_FLAGS.contains(&name);
        let rewritten = single_dash.then(|| OsString::from(format!("-{text}")));
        out.push(rewritten.unwrap_or(arg));

        if takes_value && let Some(value) = args.next() {
            out.push(value);
        }
    }

    out
}
