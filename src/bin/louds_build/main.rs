//! Builds both dictionary variants from a gzip-compressed, newline-delimited
//! UTF-8 title list.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use flate2::read::GzDecoder;
use serde::Serialize;

use louds_dict::binary::{save_dict, save_dict_with_term_ids};
use louds_dict::codeunit::{encode_str, CodeUnit};
use louds_dict::encoder::encode;
use louds_dict::text::utf8::validate_utf8;
use louds_dict::trie::Trie;

#[derive(Debug, Parser)]
#[command(name = "louds_build")]
#[command(about = "Build a LOUDS trie dictionary from a gzip-compressed title list")]
#[command(version)]
struct Args {
    /// Gzip-compressed, newline-delimited UTF-8 input file.
    #[arg(long)]
    input: PathBuf,

    /// Output directory, created if missing.
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// Output filename prefix.
    #[arg(long, default_value = "dict")]
    prefix: String,

    /// Cap on inserted keys (0 = unlimited).
    #[arg(long, default_value_t = 0)]
    limit: u64,

    /// Code unit width.
    #[arg(long, value_enum, default_value_t = CodeUnitArg::U16)]
    code_unit: CodeUnitArg,

    /// Select sample rate forwarded to the succinct index.
    #[arg(long, default_value_t = 256)]
    select_sample_rate: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CodeUnitArg {
    U16,
    U32,
}

#[derive(Serialize)]
struct Metrics {
    word_count: u64,
    char_count: u64,
    input_gz_bytes: u64,
    input_utf8_bytes_total: u64,
    seconds_total: f64,
    /// Time to BFS-encode the trie into LOUDS arrays, shared by both output files.
    seconds_convert_louds: f64,
    /// Time to serialize the term-id variant from the already-encoded arrays.
    seconds_convert_louds_with_term_id: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    match args.code_unit {
        CodeUnitArg::U16 => run::<u16>(&args),
        CodeUnitArg::U32 => run::<u32>(&args),
    }
}

fn run<Cu: CodeUnit>(args: &Args) -> Result<()> {
    let t_begin = Instant::now();

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating output directory {:?}", args.out_dir))?;

    let input_gz_bytes = fs::metadata(&args.input).map(|m| m.len()).unwrap_or(0);

    let file = File::open(&args.input).with_context(|| format!("opening {:?}", args.input))?;
    let decoder = GzDecoder::new(file);
    let reader = BufReader::new(decoder);

    // One trie feeds both output variants: every inserted key already carries a
    // term-id (`Trie::insert` always assigns one), so a single `encode()` pass
    // produces an `Encoded<Cu>` that serves `save_dict` (term ids discarded) and
    // `save_dict_with_term_ids` (term ids kept) alike. No need to build or encode
    // a second trie just for the term-id variant.
    let mut trie: Trie<Cu> = Trie::new();
    let mut word_count: u64 = 0;
    let mut char_count: u64 = 0;
    let mut input_utf8_bytes_total: u64 = 0;

    log::info!("reading keys from {:?}", args.input);
    for line in reader.lines() {
        if args.limit != 0 && word_count >= args.limit {
            break;
        }
        let line = line.context("reading input line")?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        if let Err(e) = validate_utf8(line.as_bytes()) {
            log::warn!("skipping line with invalid UTF-8 at offset {}: {:?}", e.offset, e.kind);
            continue;
        }

        input_utf8_bytes_total += line.len() as u64;
        let units = encode_str::<Cu>(line);
        char_count += units.len() as u64;
        word_count += 1;

        trie.insert(&units);
    }
    log::info!("built trie: {word_count} keys, {char_count} code units");

    let t1 = Instant::now();
    let encoded = encode(&trie);
    let seconds_convert_louds = t1.elapsed().as_secs_f64();
    log::info!("encoded LOUDS arrays in {seconds_convert_louds:.3}s (shared by both dictionary variants)");

    let out_louds = args.out_dir.join(format!("{}.louds.bin", args.prefix));
    let out_louds_termid = args.out_dir.join(format!("{}.louds_termid.bin", args.prefix));
    let out_metrics = args.out_dir.join("metrics.json");

    fs::write(&out_louds, save_dict(&encoded)).with_context(|| format!("writing {out_louds:?}"))?;

    let t2 = Instant::now();
    let with_term_id_bytes = save_dict_with_term_ids(&encoded);
    let seconds_convert_louds_with_term_id = t2.elapsed().as_secs_f64();
    fs::write(&out_louds_termid, with_term_id_bytes)
        .with_context(|| format!("writing {out_louds_termid:?}"))?;
    log::info!("wrote {out_louds:?} and {out_louds_termid:?}");

    let seconds_total = t_begin.elapsed().as_secs_f64();
    let metrics = Metrics {
        word_count,
        char_count,
        input_gz_bytes,
        input_utf8_bytes_total,
        seconds_total,
        seconds_convert_louds,
        seconds_convert_louds_with_term_id,
    };
    let mut metrics_file = File::create(&out_metrics).with_context(|| format!("creating {out_metrics:?}"))?;
    metrics_file.write_all(serde_json::to_string_pretty(&metrics)?.as_bytes())?;
    metrics_file.write_all(b"\n")?;

    println!("word_count={word_count}");
    println!("char_count={char_count}");
    println!("out_louds={out_louds:?}");
    println!("out_louds_termid={out_louds_termid:?}");
    println!("out_metrics={out_metrics:?}");

    Ok(())
}
