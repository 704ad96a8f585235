// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Three subcommands: `banish`, `summon` and `inspect`.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::banish_use_case::BanishConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scale a CSV table, build its encoders and persist everything
    Banish(BanishArgs),

    /// Re-run the persisted encoders for one row
    Summon(SummonArgs),

    /// Print the column statistics of a banished table
    Inspect(InspectArgs),
}

/// Tensor backend to run the encoders on
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// CPU
    #[default]
    Ndarray,
    /// GPU through WGPU
    Wgpu,
}

#[derive(Args, Debug)]
pub struct BanishArgs {
    /// CSV file with a header row
    #[arg(long)]
    pub input: String,

    /// Directory for the manifest, encoder records and CSV outputs
    #[arg(long, default_value = "banished")]
    pub out_dir: String,

    #[arg(long, value_enum, default_value_t = BackendKind::Ndarray)]
    pub backend: BackendKind,

    /// Rows per forward pass
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Seed for encoder initialisation
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Most distinct values a column may have to count as categorical
    #[arg(long, default_value_t = 32)]
    pub categorical_limit: usize,

    /// Hidden width of every per-type encoder
    #[arg(long, default_value_t = 10)]
    pub numeric_hidden: usize,

    /// Hidden width of the row encoder (default: rows × columns)
    #[arg(long)]
    pub row_hidden: Option<usize>,
}

impl From<BanishArgs> for BanishConfig {
    fn from(a: BanishArgs) -> Self {
        BanishConfig {
            input:             a.input,
            out_dir:           a.out_dir,
            batch_size:        a.batch_size,
            seed:              a.seed,
            categorical_limit: a.categorical_limit,
            numeric_hidden:    a.numeric_hidden,
            row_hidden:        a.row_hidden,
        }
    }
}

#[derive(Args, Debug)]
pub struct SummonArgs {
    /// Directory written by `banish`
    #[arg(long, default_value = "banished")]
    pub dir: String,

    /// Row to summon (0-based)
    #[arg(long)]
    pub row: usize,

    #[arg(long, value_enum, default_value_t = BackendKind::Ndarray)]
    pub backend: BackendKind,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Directory written by `banish`
    #[arg(long, default_value = "banished")]
    pub dir: String,
}
