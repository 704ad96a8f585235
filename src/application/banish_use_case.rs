// ============================================================
// Layer 2 - BanishUseCase
// ============================================================
// Runs the banish pipeline in order:
//
//   Step 1: Load the CSV table             (Layer 4 - data)
//   Step 2: Drop free text columns         (Layer 3 - domain)
//   Step 3: Plan and build encoders        (Layer 5 - ml)
//   Step 4: Scale every column             (Layer 4/5)
//   Step 5: Encode every row               (Layer 5 - ml)
//   Step 6: Persist manifest, records, CSV (Layer 6 - infra)

use anyhow::{bail, Result};
use burn::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::{
    loader::{CsvLoader, DEFAULT_CATEGORICAL_LIMIT},
    scaler::ScaledColumn,
};
use crate::domain::{
    column::ColumnKind,
    stats::ColumnStats,
    table::{Table, TableShape},
    traits::{Fixed, HiddenSizePolicy, TableProduct, TableSource},
};
use crate::infra::checkpoint::ArtifactStore;
use crate::ml::{
    inferencer::encode_table,
    registry::{banish_column, EncoderPlan, EncoderRegistry},
};

// ─── Configuration ───────────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BanishConfig {
    pub input:             String,
    pub out_dir:           String,
    pub batch_size:        usize,
    pub seed:              u64,
    pub categorical_limit: usize,
    /// Hidden width of every per-type encoder
    pub numeric_hidden:    usize,
    /// Hidden width of the row encoder; rows × columns when unset
    pub row_hidden:        Option<usize>,
}

impl Default for BanishConfig {
    fn default() -> Self {
        Self {
            input:             "data/table.csv".to_string(),
            out_dir:           "banished".to_string(),
            batch_size:        64,
            seed:              42,
            categorical_limit: DEFAULT_CATEGORICAL_LIMIT,
            numeric_hidden:    10,
            row_hidden:        None,
        }
    }
}

impl BanishConfig {
    fn row_policy(&self) -> Box<dyn HiddenSizePolicy> {
        match self.row_hidden {
            Some(n) => Box::new(Fixed(n)),
            None    => Box::new(TableProduct),
        }
    }

    fn kind_policy(&self) -> Box<dyn HiddenSizePolicy> {
        Box::new(Fixed(self.numeric_hidden))
    }
}

// ─── Manifest ────────────────────────────────────────────────────────────────
/// Everything needed to rebuild the encoders and decode their output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub config:  BanishConfig,
    pub source:  String,
    pub shape:   TableShape,
    pub columns: Vec<ColumnStats>,
    /// Columns left out because no encoder exists for their kind
    pub skipped: Vec<String>,
    pub plan:    EncoderPlan,
}

impl Manifest {
    pub fn column(&self, name: &str) -> Option<&ColumnStats> {
        self.columns.iter().find(|c| c.name == name)
    }
}

// ─── BanishUseCase ───────────────────────────────────────────────────────────
pub struct BanishUseCase {
    config: BanishConfig,
}

impl BanishUseCase {
    pub fn new(config: BanishConfig) -> Self {
        Self { config }
    }

    pub fn execute<B: Backend>(&self, device: &B::Device) -> Result<Manifest> {
        let cfg = &self.config;

        // ── Step 1: Load the table ───────────────────────────────────────────
        let table = CsvLoader::new(&cfg.input)
            .with_categorical_limit(cfg.categorical_limit)
            .load()?;

        self.banish_table::<B>(table, device)
    }

    /// Banish an already loaded table.
    pub fn banish_table<B: Backend>(&self, table: Table, device: &B::Device) -> Result<Manifest> {
        let cfg = &self.config;

        // ── Step 2: Free text has no encoder ─────────────────────────────────
        let skipped: Vec<String> = table
            .columns_of(ColumnKind::FreeText)
            .map(|c| c.name.clone())
            .collect();
        for name in &skipped {
            tracing::warn!("Skipping free text column '{}'", name);
        }

        let shape = table.shape();
        if shape.columns == 0 {
            bail!("'{}' has no numeric, boolean or categorical columns", table.source);
        }

        // ── Step 3: Plan and build the encoders ──────────────────────────────
        B::seed(cfg.seed);
        let plan     = EncoderPlan::new(&table, cfg.row_policy().as_ref(), cfg.kind_policy().as_ref());
        let registry = EncoderRegistry::<B>::init(&plan, device)?;
        tracing::info!(
            "Built {} encoders for a {} x {} table",
            plan.kinds.len() + 1, shape.rows, shape.columns
        );

        // ── Step 4: Scale every encodable column ─────────────────────────────
        let mut scaled = Vec::with_capacity(shape.columns);
        for column in table.encodable() {
            let banished = banish_column(column, shape, &registry)?;
            tracing::debug!(
                "Banished '{}' into the {} encoder ({} params)",
                banished.stats.name, banished.stats.kind, banished.model.num_params()
            );
            scaled.push(ScaledColumn { stats: banished.stats, values: banished.scaled });
        }

        // ── Step 5: Encode every row ─────────────────────────────────────────
        let encodings = encode_table(&registry, shape, cfg.batch_size, device)?;

        // ── Step 6: Persist ──────────────────────────────────────────────────
        let manifest = Manifest {
            config:  cfg.clone(),
            source:  table.source.clone(),
            shape,
            columns: scaled.iter().map(|c| c.stats.clone()).collect(),
            skipped,
            plan,
        };

        let store = ArtifactStore::create(&cfg.out_dir)?;
        store.save_manifest(&manifest)?;
        store.save_registry(&registry)?;
        store.write_scaled(&scaled)?;
        store.write_encodings(&encodings)?;

        tracing::info!("Banished '{}' into '{}'", manifest.source, store.dir().display());
        Ok(manifest)
    }
}
