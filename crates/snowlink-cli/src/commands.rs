use crate::config::{Command, Config};
use anyhow::{Context, anyhow, bail};
use snowlink::{Base62Ext, SkewPolicy, SnowflakeGenerator, SnowflakeId, WallClock, decode, encode};
use std::{io::Write, thread::scope, time::Instant};

pub fn run(config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    match &config.command {
        Command::Mint { count, threads } => mint(config, *count, *threads, out),
        Command::Parse { id } => parse(config.clock, SnowflakeId::from_raw(*id), out),
        Command::Encode { value } => {
            writeln!(out, "{}", encode(*value))?;
            Ok(())
        }
        Command::Decode { token, parse: false } => {
            let value = decode::<u64>(token).with_context(|| format!("invalid token {token:?}"))?;
            writeln!(out, "{value}")?;
            Ok(())
        }
        Command::Decode { token, parse: true } => {
            let id =
                SnowflakeId::decode(token).with_context(|| format!("invalid token {token:?}"))?;
            parse(config.clock, id, out)
        }
    }
}

/// Mints `count` IDs from one generator shared by `threads` threads and
/// prints them in ID order.
fn mint(config: &Config, count: usize, threads: usize, out: &mut impl Write) -> anyhow::Result<()> {
    let generator = SnowflakeGenerator::new(config.node_id, config.clock);
    tracing::info!(
        node_id = config.node_id.get(),
        node_source = ?config.node_source,
        count,
        threads,
        "minting"
    );

    let start = Instant::now();
    let mut ids = if threads == 1 {
        mint_batch(&generator, &config.policy, count)?
    } else {
        let per_thread = count / threads;
        let remainder = count % threads;
        let batches = scope(|s| {
            let handles: Vec<_> = (0..threads)
                .map(|i| {
                    let n = per_thread + usize::from(i < remainder);
                    let generator = &generator;
                    let policy = &config.policy;
                    s.spawn(move || mint_batch(generator, policy, n))
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(batch) => batch,
                    Err(_) => Err(anyhow!("minting thread panicked")),
                })
                .collect::<anyhow::Result<Vec<_>>>()
        })?;
        batches.into_iter().flatten().collect::<Vec<_>>()
    };
    let elapsed = start.elapsed();

    ids.sort_unstable();
    let mut buf = SnowflakeId::buf();
    for id in &ids {
        writeln!(out, "{id} {}", id.encode_to_buf(&mut buf))?;
    }

    let secs = elapsed.as_secs_f64();
    let ids_per_sec = if secs > 0.0 {
        ids.len() as f64 / secs
    } else {
        0.0
    };
    tracing::info!(
        minted = ids.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        ids_per_sec,
        "done"
    );
    Ok(())
}

fn mint_batch(
    generator: &SnowflakeGenerator<WallClock>,
    policy: &SkewPolicy,
    n: usize,
) -> anyhow::Result<Vec<SnowflakeId>> {
    let mut ids = Vec::with_capacity(n);
    for _ in 0..n {
        ids.push(policy.next_id(generator).context("failed to mint id")?);
    }
    Ok(ids)
}

fn parse(clock: WallClock, id: SnowflakeId, out: &mut impl Write) -> anyhow::Result<()> {
    if !id.is_valid() {
        bail!("{id} sets the reserved bit and was not minted by a generator");
    }
    let components = id.parse();
    writeln!(out, "id        {id}")?;
    writeln!(out, "token     {}", id.encode())?;
    writeln!(out, "timestamp {}", components.timestamp)?;
    writeln!(out, "unix_ms   {}", clock.unix_millis(components.timestamp))?;
    writeln!(out, "node_id   {}", components.node_id)?;
    writeln!(out, "sequence  {}", components.sequence)?;
    Ok(())
}
