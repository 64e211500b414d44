//! Atelier CLI - Test harness for the tool-call execution engine
//!
//! Reads a JSON-lines stream of tool calls, applies them in order to a
//! fresh in-memory tree, prints each completed invocation, and finishes
//! with the serialized file map.
//!
//! Usage:
//!   atelier calls.jsonl     Replay tool calls from a file
//!   atelier                 Read tool calls from stdin
//!
//! Each input line is one call:
//!   {"tool": "str_replace_editor", "args": {"command": "create", "path": "/App.jsx", "file_text": "x"}}

use std::io::{self, Read};

use atelier::{Badge, ChatSession, ToolArgs};
use serde::Deserialize;

/// One line of the input stream.
#[derive(Debug, Deserialize)]
struct ToolCallLine {
    tool: String,
    #[serde(default)]
    args: ToolArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args: Vec<String> = std::env::args().collect();

    let input = if args.len() >= 2 {
        match std::fs::read_to_string(&args[1]) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("atelier: {}: {}", args[1], e);
                std::process::exit(1);
            }
        }
    } else {
        let mut input = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut input) {
            eprintln!("atelier: failed to read stdin: {}", e);
            std::process::exit(1);
        }
        input
    };

    let session = ChatSession::new();
    let mut failures = 0usize;

    for (number, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let call: ToolCallLine = match serde_json::from_str(line) {
            Ok(call) => call,
            Err(e) => {
                eprintln!("atelier: line {}: invalid tool call: {}", number + 1, e);
                failures += 1;
                continue;
            }
        };

        let invocation = session.apply(&call.tool, call.args).await;
        let badge = Badge::for_invocation(&invocation);
        match serde_json::to_string(&invocation.result) {
            Ok(result) => println!("{}  {}", badge.text, result),
            Err(e) => eprintln!("atelier: line {}: {}", number + 1, e),
        }
        if !invocation.result.as_ref().is_some_and(|r| r.is_ok()) {
            failures += 1;
        }
    }

    let snapshot = session.snapshot().await;
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("atelier: failed to serialize file map: {}", e);
            std::process::exit(1);
        }
    }

    std::process::exit(if failures > 0 { 1 } else { 0 });
}
