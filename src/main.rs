// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wfst_suggest::binary::{read_varint, FstFooter, FstHeader};
use wfst_suggest::{AnalyzingSuggester, KeywordAnalyzer, Result, SuggesterConfig};

mod cli;
use cli::display::*;
use cli::input::read_entries;
use cli::{Cli, CliConfig, Commands, InputFormat};

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let outcome = match cli.command {
        Commands::Build {
            input,
            output,
            format,
            config,
            fuzzy,
        } => run_build(&input, &output, format, config.as_deref(), fuzzy),
        Commands::Lookup {
            file,
            query,
            num,
            config,
            fuzzy,
            json,
        } => run_lookup(&file, &query, num, config.as_deref(), fuzzy, json),
        Commands::Inspect { file } => run_inspect(&file),
    };

    if let Err(e) = outcome {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn run_build(
    input: &Path,
    output: &Path,
    format: Option<InputFormat>,
    config: Option<&Path>,
    fuzzy: bool,
) -> Result<()> {
    let config = CliConfig::load(config, fuzzy)?;
    let format = format.unwrap_or_else(|| InputFormat::guess(input));
    let entries = read_entries(BufReader::new(File::open(input)?), format)?;
    info!(entries = entries.len(), input = %input.display(), "read entries");

    let mut suggester = config.suggester()?;
    suggester.build(entries)?;

    let mut writer = BufWriter::new(File::create(output)?);
    suggester.store(&mut writer)?;
    writer.flush()?;

    info!(
        output = %output.display(),
        bytes = fs::metadata(output)?.len(),
        ram_bytes = suggester.ram_bytes_used(),
        "wrote suggester"
    );
    Ok(())
}

fn open_suggester(file: &Path, config: &CliConfig) -> Result<AnalyzingSuggester> {
    let mut suggester = config.suggester()?;
    suggester.load(&mut BufReader::new(File::open(file)?))?;
    Ok(suggester)
}

fn run_lookup(
    file: &Path,
    query: &str,
    num: usize,
    config: Option<&Path>,
    fuzzy: bool,
    json: bool,
) -> Result<()> {
    let config = CliConfig::load(config, fuzzy)?;
    let suggester = open_suggester(file, &config)?;

    let started = Instant::now();
    let results = suggester.lookup(query, num)?;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    section_top(&format!("\"{}\"", query));
    if results.is_empty() {
        row(&format!("  {}", paint(Color::Gray, "no suggestions")));
    }
    for (rank, result) in results.iter().enumerate() {
        let payload = result
            .payload
            .as_deref()
            .map(|p| paint(Color::Gray, &format!("  [{}]", String::from_utf8_lossy(p))))
            .unwrap_or_default();
        row(&format!(
            "  {} {} {}{}",
            pad(&(rank + 1).to_string(), 3, Align::Right),
            pad(&paint(Color::Yellow, &result.weight.to_string()), 11, Align::Right),
            suggestion(&result.key, result.key == query),
            payload
        ));
    }
    section_bot();
    println!(
        "{} suggestions in {}",
        results.len(),
        timing_ms(elapsed_ms)
    );
    Ok(())
}

fn run_inspect(file: &Path) -> Result<()> {
    let bytes = fs::read(file)?;

    // Analysis settings are not part of the file; a keyword analyzer is
    // enough to load and describe it.
    let mut suggester = AnalyzingSuggester::new(
        Arc::new(KeywordAnalyzer),
        Arc::new(KeywordAnalyzer),
        SuggesterConfig::default(),
    )?;
    suggester.load(&mut &bytes[..])?;

    // The FST header sits right after the leading entry count.
    let mut cursor = &bytes[..];
    read_varint(&mut cursor)?;
    let fst_start = bytes.len() - cursor.len();
    let header = FstHeader::read(&mut cursor)?;
    let body_start = fst_start + FstHeader::SIZE;
    let body_end = body_start + header.body_len as usize;
    let crc_ok = match (bytes.get(fst_start..body_start), bytes.get(body_start..body_end)) {
        (Some(head), Some(body)) => {
            let mut footer_bytes = bytes.get(body_end..).unwrap_or_default();
            FstFooter::read(&mut footer_bytes)
                .map(|footer| footer.crc32 == FstFooter::compute_crc32(head, body))
                .unwrap_or(false)
        }
        _ => false,
    };

    section_top(&file.display().to_string());
    field("file size", &format_size(bytes.len() as u64));
    field("format version", &header.version.to_string());
    field("entries", &suggester.count().to_string());
    if let Some(fst) = suggester.fst() {
        field("fst keys", &fst.len().to_string());
        field("fst nodes", &fst.num_nodes().to_string());
        field("fst arcs", &fst.num_arcs().to_string());
    }
    field("fst body", &format_size(header.body_len));
    field("in memory", &format_size(suggester.ram_bytes_used() as u64));
    field("max paths / entry", &suggester.max_analyzed_paths().to_string());
    field("payloads", if suggester.has_payloads() { "yes" } else { "no" });
    field("crc32", &check_mark(crc_ok));
    section_bot();
    Ok(())
}
