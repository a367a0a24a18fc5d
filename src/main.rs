use pokemon_battle_advisor::{run, CliOptions, Command};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn usage() -> ! {
    eprintln!(
        "Usage: pokemon-battle-advisor [--chart chart.json] <command>\n\
Commands:\n  \
matchup --types FIRE[,FLYING] [--against WATER,ROCK] [--label NAME]\n  \
matrix [--output matchups.csv]\n  \
decide --state snapshot.json [--reply reply.txt] [--journal turns.jsonl] [--seed SEED]"
    );
    std::process::exit(1);
}

fn split_types(val: &str) -> Vec<String> {
    val.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_args() -> anyhow::Result<CliOptions> {
    let mut chart_path = None;
    let mut command_name: Option<String> = None;
    let mut types = Vec::new();
    let mut against = None;
    let mut label = None;
    let mut output_path = PathBuf::from("matchups.csv");
    let mut state_path = None;
    let mut reply_path = None;
    let mut journal_path = None;
    let mut seed = 0u64;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--chart" => {
                chart_path = Some(args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--chart requires a path (e.g. --chart chart.json)")
                })?);
            }
            "--types" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--types requires one or two types"))?;
                types = split_types(&val);
            }
            "--against" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--against requires a type list"))?;
                against = Some(split_types(&val));
            }
            "--label" => {
                label = Some(
                    args.next()
                        .ok_or_else(|| anyhow::anyhow!("--label requires a name"))?,
                );
            }
            "--output" => {
                output_path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--output requires a path (e.g. --output matchups.csv)")
                })?;
            }
            "--state" => {
                state_path = Some(args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--state requires a path (e.g. --state snapshot.json)")
                })?);
            }
            "--reply" => {
                reply_path = Some(
                    args.next()
                        .map(PathBuf::from)
                        .ok_or_else(|| anyhow::anyhow!("--reply requires a path"))?,
                );
            }
            "--journal" => {
                journal_path = Some(
                    args.next()
                        .map(PathBuf::from)
                        .ok_or_else(|| anyhow::anyhow!("--journal requires a path"))?,
                );
            }
            "--seed" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed requires a number"))?;
                seed = val.parse()?;
            }
            "--help" | "-h" => usage(),
            "matchup" | "matrix" | "decide" if command_name.is_none() => {
                command_name = Some(arg.clone());
            }
            other => return Err(anyhow::anyhow!("Unknown argument {other}")),
        }
    }

    let command = match command_name.as_deref() {
        Some("matchup") => {
            if types.is_empty() {
                anyhow::bail!("matchup requires --types");
            }
            let label = label.unwrap_or_else(|| types.join("/"));
            Command::Matchup {
                defender: types,
                against,
                label,
            }
        }
        Some("matrix") => Command::Matrix { output_path },
        Some("decide") => Command::Decide {
            state_path: state_path
                .ok_or_else(|| anyhow::anyhow!("decide requires --state"))?,
            reply_path,
            journal_path,
            seed,
        },
        _ => usage(),
    };

    Ok(CliOptions {
        chart_path,
        command,
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pokemon_battle_advisor=info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let opts = parse_args()?;
    run(opts)
}
