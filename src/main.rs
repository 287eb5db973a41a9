//! tetrate - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rug::Complex;
use tetration::{
    cli::{Args, Commands, Config, Verbosity},
    numeric::{self, MAX_DISPLAY_DIGITS},
    report::{render_sweep_table, sweep_rows, NumberFormat, PowerReport, TetrationReport},
    solver::Tetrator,
    sweep::{heights_between, Sweeper},
    TetrationError,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let verbosity = args.verbosity();
    init_tracing(verbosity);

    let config = Config::load(args.config.clone()).context("loading configuration")?;
    if !config.output.color_output {
        colored::control::set_override(false);
    }

    match &args.command {
        Commands::Solve {
            base,
            height,
            bits,
            digits,
            format,
            json,
        } => {
            let format = format.unwrap_or(config.output.format);
            run_solve(&config, verbosity, base, height, *bits, *digits, format, *json).await?;
        }
        Commands::Pow {
            base,
            exp,
            prec,
            digits,
            out,
            json,
        } => {
            run_pow(&config, base, exp, *prec, *digits, *out, *json)?;
        }
        Commands::Sweep {
            base,
            from,
            to,
            steps,
            bits,
            digits,
            parallel,
            json,
        } => {
            let request = SweepRequest {
                base,
                from,
                to,
                steps: *steps,
                bits: *bits,
                digits: *digits,
                parallel: parallel.unwrap_or(config.output.max_parallel),
                json: *json,
            };
            run_sweep(&config, verbosity, request).await?;
        }
        Commands::Config => {
            show_config(&args, &config)?;
        }
    }

    Ok(())
}

fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print an error the way the CLI reports failures and exit
///
/// Input problems exit with 2, solver failures with 1.
fn fail(context: &str, err: &TetrationError) -> ! {
    eprintln!("{} {}: {}", "error:".red().bold(), context, err);
    let code = match err {
        TetrationError::Parse { .. } | TetrationError::InvalidPrecision(_) => 2,
        _ => 1,
    };
    std::process::exit(code);
}

fn parse_or_exit(what: &str, literal: &str, bits: u32) -> Complex {
    match numeric::check_precision(bits).and_then(|bits| numeric::parse_complex(literal, bits)) {
        Ok(z) => z,
        Err(e) => fail(&format!("parse {}", what), &e),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

#[allow(clippy::too_many_arguments)]
async fn run_solve(
    config: &Config,
    verbosity: Verbosity,
    base: &str,
    height: &str,
    bits: u32,
    digits: Option<usize>,
    format: NumberFormat,
    json: bool,
) -> Result<()> {
    let b = parse_or_exit("base", base, bits);
    let h = parse_or_exit("height", height, bits);

    let pb = (verbosity.show_progress() && !json).then(|| spinner("Solving..."));

    let solver = Tetrator::new(config.solver.clone()).context("invalid solver configuration")?;
    let (worker_b, worker_h) = (b.clone(), h.clone());
    let outcome = tokio::task::spawn_blocking(move || solver.solve(&worker_b, &worker_h, bits))
        .await
        .context("solver worker failed")?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let tetration = match outcome {
        Ok(t) => t,
        Err(e) => fail("tetrate", &e),
    };

    let digits = config.output.digits_for(digits, bits);
    let report = TetrationReport::new(&tetration, &b, &h, digits, format);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text(verbosity.show_diagnostics()));
    }
    Ok(())
}

fn run_pow(
    config: &Config,
    base: &str,
    exp: &str,
    prec: u32,
    digits: Option<usize>,
    out: NumberFormat,
    json: bool,
) -> Result<()> {
    let z = parse_or_exit("base", base, prec);
    let n = parse_or_exit("exponent", exp, prec);

    let digits = config.output.digits_for(digits, prec);
    let report = PowerReport::new(&z, &n, prec, digits, out);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}

struct SweepRequest<'a> {
    base: &'a str,
    from: &'a str,
    to: &'a str,
    steps: usize,
    bits: u32,
    digits: Option<usize>,
    parallel: usize,
    json: bool,
}

async fn run_sweep(config: &Config, verbosity: Verbosity, request: SweepRequest<'_>) -> Result<()> {
    let bits = request.bits;
    let base = parse_or_exit("base", request.base, bits);
    let from = parse_or_exit("from", request.from, bits);
    let to = parse_or_exit("to", request.to, bits);
    let heights = heights_between(&from, &to, request.steps, bits);

    let progress = (verbosity.show_progress() && !request.json).then(|| {
        let pb = ProgressBar::new(heights.len() as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} heights")
        {
            pb.set_style(style.progress_chars("=>-"));
        }
        pb
    });

    let solver = Tetrator::new(config.solver.clone()).context("invalid solver configuration")?;
    let sweeper = Sweeper::new(solver, request.parallel);
    let entries = sweeper.run(&base, heights, bits, progress.clone()).await;
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let digits = request
        .digits
        .or(Some(config.output.digits).filter(|d| *d > 0))
        .unwrap_or(12)
        .min(MAX_DISPLAY_DIGITS);
    let format = config.output.format;
    if request.json {
        let rows = sweep_rows(&entries, digits, format);
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", render_sweep_table(&entries, digits, format));
    }

    let failed = entries.iter().filter(|e| e.outcome.is_err()).count();
    if failed > 0 && verbosity.show_progress() {
        eprintln!(
            "{}",
            format!("{} of {} heights failed", failed, entries.len()).yellow()
        );
    }
    Ok(())
}

fn show_config(args: &Args, config: &Config) -> Result<()> {
    println!("{}", "tetrate configuration".bold());
    let source = match (&args.config, Config::default_path()) {
        (Some(path), _) => path.display().to_string(),
        (None, Some(path)) if path.exists() => path.display().to_string(),
        _ => "built-in defaults".to_string(),
    };
    println!("Source: {}", source);
    println!("Verbosity: {}", args.verbosity().as_str());
    println!();
    print!("{}", config.to_toml()?);
    Ok(())
}
