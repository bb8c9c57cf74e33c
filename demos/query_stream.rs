//! Reads `n`, `n` keys, `q`, `q` queries (whitespace separated) from stdin and
//! prints `Yes` or `No` for every query.

use fks_fixed_set::FixedSet;
use std::error::Error;
use std::io::{self, BufWriter, Read, Write};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let mut tokens = input.split_ascii_whitespace();

    let keys = read_sequence(&mut tokens)?;
    let queries = read_sequence(&mut tokens)?;

    let mut set = FixedSet::new();
    set.initialize(keys)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for q in queries {
        writeln!(out, "{}", if set.contains(q) { "Yes" } else { "No" })?;
    }
    out.flush()?;
    Ok(())
}

fn read_sequence<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<Vec<i64>, Box<dyn Error>> {
    let len: usize = tokens.next().ok_or("missing sequence length")?.parse()?;
    let mut values = Vec::with_capacity(len);
    for _ in 0..len {
        values.push(tokens.next().ok_or("sequence ended early")?.parse()?);
    }
    Ok(values)
}
