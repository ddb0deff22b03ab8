//! A trivial player that places stones uniformly at random. Useful as a
//! cheap opponent when smoke-testing the arbiter and protocol.

use std::io::{BufRead, Write};

use clap::Parser;
use flexi_logger::{AdaptiveFormat, Logger, WriteMode};
use lib_blackhole::board;
use lib_blackhole::game::MAX_VALUE;
use lib_blackhole::utils::prelude::*;

#[derive(Clone, Debug, Parser)]
struct RandomPlayerOptions {
    #[arg(long)]
    log_level: Option<String>,

    #[arg(long)]
    seed: Option<u64>,
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut buf = String::new();
    let n = input.read_line(&mut buf)?;
    if n == 0 {
        return Ok(None);
    }
    let trimmed = buf.trim_end_matches(['\n', '\r']).to_string();
    if trimmed == "Quit" {
        return Ok(None);
    }
    Ok(Some(trimmed))
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let options = RandomPlayerOptions::parse();
    let _logger = Logger::try_with_env_or_str(options.log_level.clone().unwrap_or_else(|| "info".into()))?
        .write_mode(WriteMode::BufferAndFlush)
        .log_to_stderr()
        .adaptive_format_for_stderr(match cfg!(debug_assertions) {
            true => AdaptiveFormat::WithThread,
            false => AdaptiveFormat::Default,
        })
        .start()?;

    let rng = match options.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let stdout = std::io::stdout();
    let mut output = stdout.lock();

    let mut fields: Vec<usize> = (0..board::NUM_FIELDS).collect();
    let mut values: [Vec<i32>; 2] = [(1..=MAX_VALUE).collect(), (1..=MAX_VALUE).collect()];

    for _ in 0..5 {
        let line = read_line(&mut input)?.ok_or_else(|| anyhow!("EOF while reading initial stones"))?;
        let field = board::parse_field_name(&line)?;
        remove(&mut fields, &field)?;
    }

    let mut my_player = 0usize;
    let line = read_line(&mut input)?.ok_or_else(|| anyhow!("EOF waiting for Start"))?;
    if line != "Start" {
        my_player = 1;
        apply_opponent_move(&line, &mut fields, &mut values[my_player])?;
    }

    while fields.len() > 1 {
        let field_idx = rng.usize(0..fields.len());
        let field = fields.swap_remove(field_idx);
        let value_idx = rng.usize(0..values[my_player].len());
        let value = values[my_player].swap_remove(value_idx);
        writeln!(output, "{}={value}", board::field_name(field))?;
        output.flush()?;

        if fields.len() > 1 {
            let line = read_line(&mut input)?.ok_or_else(|| anyhow!("EOF mid-game"))?;
            let opponent = 1 - my_player;
            apply_opponent_move(&line, &mut fields, &mut values[opponent])?;
        }
    }

    log::info!("exiting");
    Ok(())
}

fn remove(fields: &mut Vec<usize>, field: &usize) -> Result<()> {
    let pos = fields
        .iter()
        .position(|f| f == field)
        .ok_or_else(|| anyhow!("field {field} already taken"))?;
    fields.remove(pos);
    Ok(())
}

fn apply_opponent_move(line: &str, fields: &mut Vec<usize>, opponent_values: &mut Vec<i32>) -> Result<()> {
    let (field, value) = lib_blackhole::game::parse_move_line(line)?;
    remove(fields, &field)?;
    let pos = opponent_values
        .iter()
        .position(|&v| v == value)
        .ok_or_else(|| anyhow!("value {value} already used"))?;
    opponent_values.remove(pos);
    Ok(())
}
