//! Looks up every stored prefix of a query string in a serialized LOUDS dictionary.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use louds_dict::binary::{load_dict, load_dict_with_term_ids};
use louds_dict::codeunit::CodeUnit;

const FLAG_HAS_TERM_IDS: u32 = 1 << 0;
const FLAG_CODE_UNIT_U32: u32 = 1 << 1;

#[derive(Debug, Parser)]
#[command(name = "louds_query")]
#[command(about = "Common-prefix-search a serialized LOUDS dictionary")]
#[command(version)]
struct Args {
    /// Print each hit's stored term-id alongside it.
    #[arg(long)]
    term_id: bool,

    /// Select sample rate used to reopen the succinct index.
    #[arg(long, default_value_t = 256)]
    select_sample_rate: u32,

    /// Path to a `.louds.bin` or `.louds_termid.bin` file.
    dict_path: PathBuf,

    /// UTF-8 query string.
    query: String,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let bytes = fs::read(&args.dict_path).with_context(|| format!("reading {:?}", args.dict_path))?;
    let flags = peek_flags(&bytes).with_context(|| format!("parsing header of {:?}", args.dict_path))?;

    if args.term_id && flags & FLAG_HAS_TERM_IDS == 0 {
        anyhow::bail!("{:?} has no term-id table but --term-id was requested", args.dict_path);
    }

    println!("dict={}", args.dict_path.display());
    println!("query={}", args.query);

    if flags & FLAG_CODE_UNIT_U32 != 0 {
        query::<u32>(args, &bytes, flags)
    } else {
        query::<u16>(args, &bytes, flags)
    }
}

fn query<Cu: CodeUnit>(args: &Args, bytes: &[u8], flags: u32) -> Result<()> {
    if flags & FLAG_HAS_TERM_IDS != 0 {
        let dict = load_dict_with_term_ids::<Cu>(bytes, args.select_sample_rate)
            .with_context(|| format!("loading {:?}", args.dict_path))?;
        let hits = dict.common_prefix_search_str(&args.query);
        println!("hit={}", hits.len());
        for hit in &hits {
            if args.term_id {
                let units = louds_dict::codeunit::encode_str::<Cu>(hit);
                let idx = dict.node_index(&units);
                let term_id = idx.map(|i| dict.term_id(i)).unwrap_or(-1);
                println!("{hit}\tterm_id={term_id}");
            } else {
                println!("{hit}");
            }
        }
    } else {
        let dict = load_dict::<Cu>(bytes, args.select_sample_rate)
            .with_context(|| format!("loading {:?}", args.dict_path))?;
        let hits = dict.common_prefix_search_str(&args.query);
        println!("hit={}", hits.len());
        for hit in &hits {
            println!("{hit}");
        }
    }
    Ok(())
}

/// Read the flags word directly out of the header, ahead of picking which
/// generic `Cu`/variant to load the body as.
fn peek_flags(bytes: &[u8]) -> Result<u32> {
    const MAGIC: [u8; 8] = *b"LOUDSv1\0";
    if bytes.len() < 16 {
        anyhow::bail!("file too short to contain a dictionary header");
    }
    if bytes[0..8] != MAGIC {
        anyhow::bail!("bad magic bytes in dictionary header");
    }
    Ok(u32::from_le_bytes(bytes[12..16].try_into().unwrap()))
}
