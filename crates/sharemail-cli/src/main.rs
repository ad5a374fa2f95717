use anyhow::{Context, Result, bail};
use chrono::{Local, SecondsFormat};
use sharemail_config::{Config, DEFAULT_MAX_TEXT_SIZE};
use sharemail_engine::{ExtraFields, RequestContext, compose};
use std::io::Read;
use std::{env, fs, process};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut subject_only = false;
    let mut input_path: Option<String> = None;
    for arg in &args[1..] {
        match arg.as_str() {
            "--subject-only" => subject_only = true,
            "-h" | "--help" => {
                print_usage(&args[0]);
                return Ok(());
            }
            path if !path.starts_with('-') => input_path = Some(path.to_string()),
            other => bail!("unknown option: {other}"),
        }
    }

    let text = match &input_path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let max_text_size = match Config::load() {
        Ok(Some(config)) => config.max_text_size,
        Ok(None) => DEFAULT_MAX_TEXT_SIZE,
        Err(err) => {
            eprintln!("Warning: {err}");
            DEFAULT_MAX_TEXT_SIZE
        }
    };
    if text.len() > max_text_size {
        bail!(
            "payload too large: {} bytes (limit {max_text_size})",
            text.len()
        );
    }

    let ctx = RequestContext::new(
        Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
        "127.0.0.1",
        "sharemail-cli",
    );

    let email = compose(&text, &ctx, &ExtraFields::new());

    if subject_only {
        println!("{}", email.subject);
    } else {
        eprintln!("Subject: {}", email.subject);
        println!("{}", email.html);
    }

    Ok(())
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} [--subject-only] [input-file]");
    eprintln!("Reads the input file (or stdin) and writes the rendered HTML to stdout.");
}
