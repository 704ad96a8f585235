// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses arguments with clap, picks the tensor backend and
// hands off to Layer 2. The only layer that prints.
//
//   1. `banish`  - scale + encode + persist a CSV table
//   2. `summon`  - reload encoders and encode one row
//   3. `inspect` - show a banished table's column statistics
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use burn::{
    backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, NdArray, Wgpu},
    prelude::Backend,
};
use clap::Parser;
use commands::{BackendKind, BanishArgs, Commands, InspectArgs, SummonArgs};

use crate::application::{
    banish_use_case::{BanishUseCase, Manifest},
    summon_use_case::{inspect, SummonUseCase},
};

#[derive(Parser, Debug)]
#[command(
    name = "summon",
    version,
    about = "Banish tabular columns into normalized, model-backed encodings."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Banish(args)  => run_banish(args),
            Commands::Summon(args)  => run_summon(args),
            Commands::Inspect(args) => run_inspect(args),
        }
    }
}

fn run_banish(args: BanishArgs) -> Result<()> {
    tracing::info!("Banishing '{}' on {:?}", args.input, args.backend);

    let backend  = args.backend;
    let use_case = BanishUseCase::new(args.into());
    let manifest = match backend {
        BackendKind::Ndarray => use_case.execute::<NdArray>(&NdArrayDevice::default())?,
        BackendKind::Wgpu    => use_case.execute::<Wgpu>(&WgpuDevice::default())?,
    };

    println!(
        "Banished {} rows x {} columns into '{}'.",
        manifest.shape.rows, manifest.shape.columns, manifest.config.out_dir
    );
    if !manifest.skipped.is_empty() {
        println!("Skipped free text: {}", manifest.skipped.join(", "));
    }
    Ok(())
}

fn run_summon(args: SummonArgs) -> Result<()> {
    match args.backend {
        BackendKind::Ndarray => summon_with::<NdArray>(&args, NdArrayDevice::default()),
        BackendKind::Wgpu    => summon_with::<Wgpu>(&args, WgpuDevice::default()),
    }
}

fn summon_with<B: Backend>(args: &SummonArgs, device: B::Device) -> Result<()> {
    let use_case = SummonUseCase::<B>::new(&args.dir, device)?;
    let summoned = use_case.summon(args.row)?;

    println!("Summoned from '{}'", use_case.manifest().source);
    let embedding: Vec<String> = summoned.embedding.iter().map(|v| format!("{v:.4}")).collect();
    println!("Row {} embedding: [{}]", summoned.row, embedding.join(", "));
    for (name, value) in &summoned.cells {
        println!("  {name:<24} {value}");
    }
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let manifest = inspect(&args.dir)?;
    print_manifest(&manifest);
    Ok(())
}

fn print_manifest(m: &Manifest) {
    println!("Source: {}", m.source);
    println!("Shape:  {} rows x {} columns", m.shape.rows, m.shape.columns);
    println!("Row encoder hidden width: {}", m.plan.row.hidden);
    println!();
    println!("{:<24} {:<12} {:>12} {:>12}", "column", "kind", "min", "max");
    for c in &m.columns {
        println!(
            "{:<24} {:<12} {:>12.4} {:>12.4}",
            c.name, c.kind.as_str(), c.bounds.min, c.bounds.max
        );
    }
    if !m.skipped.is_empty() {
        println!();
        println!("Skipped free text: {}", m.skipped.join(", "));
    }
}
