#![forbid(unsafe_code)]

//! `exec-relay-cli` — line-mode client companion for `exec-relay`.
//!
//! Connects to the relay over TCP, issues one `EXEC` request, and drives
//! the exchange interactively: informational lines go to stdout, error
//! lines to stderr, and each credit-grant acknowledgement (`+ OK`) is
//! answered with one line read from this process's own stdin.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::process::ExitCode;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "exec-relay-cli",
    about = "Line-mode client for exec-relay",
    version,
    long_about = None
)]
struct Cli {
    /// Server address to connect to.
    #[arg(long, default_value = "127.0.0.1:7035")]
    addr: String,

    /// Subcommand to execute.
    subcommand: String,

    /// Extra argument tokens appended to the backend invocation.
    args: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(success) => {
            if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("exec-relay-cli: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Drive one exchange; returns whether the terminal reply was `OK`.
fn run(cli: &Cli) -> std::io::Result<bool> {
    let stream = TcpStream::connect(&cli.addr)?;
    let mut writer = stream.try_clone()?;
    let mut reader = BufReader::new(stream);

    // Greeting.
    let mut greeting = String::new();
    reader.read_line(&mut greeting)?;
    eprintln!("{}", greeting.trim_end());

    let mut request = format!("EXEC {}", cli.subcommand);
    for arg in &cli.args {
        request.push(' ');
        request.push_str(arg);
    }
    request.push('\n');
    writer.write_all(request.as_bytes())?;
    writer.flush()?;

    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "server closed the connection before the terminal reply",
            ));
        }
        let reply = line.trim_end_matches(['\r', '\n']);

        if reply == "+ OK" {
            // Credit granted — supply one line of input.
            let mut input = String::new();
            if stdin.lock().read_line(&mut input)? == 0 {
                // Our own stdin is exhausted; send an empty line to keep
                // the exchange moving.
                input.clear();
            }
            let trimmed = input.trim_end_matches(['\r', '\n']);
            writer.write_all(trimmed.as_bytes())?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        } else if let Some(text) = reply.strip_prefix("* OK ") {
            println!("{text}");
        } else if let Some(text) = reply.strip_prefix("* NO ") {
            eprintln!("{text}");
        } else if let Some(text) = reply.strip_prefix("OK ") {
            eprintln!("{text}");
            return Ok(true);
        } else if let Some(text) = reply.strip_prefix("NO ") {
            eprintln!("{text}");
            return Ok(false);
        } else {
            eprintln!("unrecognized reply: {reply}");
        }
    }
}
