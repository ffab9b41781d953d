//! Copilot CLI stand-in for integration tests
//!
//! This binary mimics the external Copilot CLI's process contract: it
//! reads the prompt from stdin, honors `--version` and `--help` probes,
//! and produces scripted stdout/stderr/exit behavior. It is used
//! exclusively by integration tests so the executor can be exercised
//! without a real Copilot installation.
//!
//! # Behavior selection
//!
//! The executor appends caller-supplied extra arguments verbatim, so tests
//! select behavior with `--stub-mode=<mode>`:
//!
//! - `echo` (default) -- write the stdin prompt back to stdout.
//! - `fixed` -- write `--stub-output=<text>` (default `4`) to stdout.
//! - `partial-hang` -- write `partial` to stdout, then sleep forever.
//! - `hang` -- consume stdin, produce nothing, sleep forever.
//! - `auth` -- no stdout, `please authenticate` on stderr, exit 1.
//! - `silent` -- consume stdin, produce nothing, exit 0.
//! - `stderr-only` -- no stdout, a warning line on stderr, exit 0.
//! - `dump-args` -- echo the received argument vector to stdout.
//!
//! The `--help` text can be overridden with the `COPILOT_STUB_HELP`
//! environment variable for fallback-path tests.

use std::env;
use std::io::{self, Read, Write};
use std::thread;
use std::time::Duration;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.iter().any(|a| a == "--version") {
        println!("copilot version 1.0.0 (stub)");
        return;
    }

    if args.iter().any(|a| a == "--help") {
        let help = env::var("COPILOT_STUB_HELP").unwrap_or_else(|_| {
            "Usage: copilot [options]\n\nUse gpt-5.1 or Claude models with --model.".to_string()
        });
        println!("{help}");
        return;
    }

    let mode = args
        .iter()
        .find_map(|a| a.strip_prefix("--stub-mode="))
        .unwrap_or("echo")
        .to_string();

    match mode.as_str() {
        "echo" => {
            let prompt = read_stdin();
            print!("{prompt}");
        }
        "fixed" => {
            let _ = read_stdin();
            let output = args
                .iter()
                .find_map(|a| a.strip_prefix("--stub-output="))
                .unwrap_or("4");
            print!("{output}");
        }
        "partial-hang" => {
            print!("partial");
            let _ = io::stdout().flush();
            let _ = read_stdin();
            sleep_forever();
        }
        "hang" => {
            let _ = read_stdin();
            sleep_forever();
        }
        "auth" => {
            let _ = read_stdin();
            eprint!("please authenticate");
            std::process::exit(1);
        }
        "silent" => {
            let _ = read_stdin();
        }
        "stderr-only" => {
            let _ = read_stdin();
            eprint!("stub running in degraded mode");
        }
        "dump-args" => {
            let _ = read_stdin();
            println!("{}", args.join(" "));
        }
        other => {
            eprintln!("unknown stub mode: {other}");
            std::process::exit(2);
        }
    }
}

fn read_stdin() -> String {
    let mut buf = String::new();
    let _ = io::stdin().read_to_string(&mut buf);
    buf
}

fn sleep_forever() -> ! {
    loop {
        thread::sleep(Duration::from_secs(3600));
    }
}
