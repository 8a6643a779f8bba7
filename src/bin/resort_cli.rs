//! CLI tool for resort - groups the columns of a JSON matrix and outputs JSON
//!
//! The input document looks like
//! `{"matrix": [[...], ...], "config": {...}, "groupBy": [0, "label"]}`;
//! `config` and `groupBy` are optional.
//!
//! Usage:
//!   resort_cli <input.json>              # Output JSON to stdout
//!   resort_cli <input.json> -o out.json  # Output JSON to file

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use resort::{BarRect, GroupExtent, LayoutConfig, ResortEngine, RowRef};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Request {
    matrix: serde_json::Value,
    #[serde(default)]
    config: LayoutConfig,
    #[serde(default)]
    group_by: Vec<RowRef>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Response {
    column_order: Vec<usize>,
    group_membership: Vec<Option<usize>>,
    group_extents: Vec<GroupExtent>,
    bars: Vec<BarRect>,
    plot_width: f64,
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: resort_cli <input.json> [-o output.json]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = if args.len() > 3 && args[2] == "-o" {
        Some(&args[3])
    } else {
        None
    };

    // Read input file
    let data = match fs::read_to_string(input_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    let request: Request = match serde_json::from_str(&data) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error parsing request: {}", e);
            std::process::exit(1);
        }
    };

    let mut engine = match ResortEngine::new(request.config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = engine.load_value(&request.matrix) {
        eprintln!("Error loading matrix: {}", e);
        std::process::exit(1);
    }
    if !request.group_by.is_empty() {
        if let Err(e) = engine.group_by_rows(&request.group_by) {
            eprintln!("Error grouping columns: {}", e);
            std::process::exit(1);
        }
    }

    let response = Response {
        column_order: engine.column_order().to_vec(),
        group_membership: engine.group_membership().to_vec(),
        group_extents: engine.group_extents().to_vec(),
        bars: engine.bar_rects(),
        plot_width: engine.plot_width(),
    };

    // Serialize to JSON
    let json = match serde_json::to_string_pretty(&response) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
