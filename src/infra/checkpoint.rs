// ============================================================
// Layer 6 - Artifact Store
// ============================================================
// Everything a banish run leaves behind, in one directory:
//
//   banished/
//     manifest.json               ← config, shape, column stats, encoder plan
//     row_encoder.mpk.gz          ← row encoder parameters
//     encoder_<kind>.mpk.gz       ← one per registered column kind
//     scaled.csv                  ← the table mapped into [0, 1]
//     row_embeddings.csv          ← row encoder output per row
//     <kind>_encodings.csv        ← per-kind encoder output per row
//
// Parameter records go through Burn's NamedMpkGzFileRecorder
// (MessagePack + gzip) at full precision, so summoned encoders
// reproduce the banished outputs exactly. Loading fails if the
// architecture in the manifest does not match the record.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use std::{fs, path::{Path, PathBuf}};

use anyhow::{bail, Context, Result};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder},
};

use crate::application::banish_use_case::Manifest;
use crate::data::scaler::ScaledColumn;
use crate::domain::column::ColumnKind;
use crate::ml::inferencer::Encodings;
use crate::ml::registry::EncoderRegistry;

const MANIFEST_FILE: &str = "manifest.json";
const ROW_ENCODER:   &str = "row_encoder";

pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Open a store for writing, creating the directory if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Open an existing store for reading.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.join(MANIFEST_FILE).exists() {
            bail!(
                "'{}' holds no manifest. Have you run 'banish' first?",
                dir.display()
            );
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // ── Manifest ─────────────────────────────────────────────────────────────

    pub fn save_manifest(&self, manifest: &Manifest) -> Result<()> {
        let path = self.dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(manifest)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write manifest to '{}'", path.display()))?;

        tracing::debug!("Saved manifest to '{}'", path.display());
        Ok(())
    }

    pub fn load_manifest(&self) -> Result<Manifest> {
        let path = self.dir.join(MANIFEST_FILE);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read manifest from '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed manifest '{}'", path.display()))
    }

    // ── Encoder records ──────────────────────────────────────────────────────

    pub fn save_registry<B: Backend>(&self, registry: &EncoderRegistry<B>) -> Result<()> {
        let recorder = NamedMpkGzFileRecorder::<FullPrecisionSettings>::new();

        let path = self.dir.join(ROW_ENCODER);
        registry.row.clone()
            .save_file(path.clone(), &recorder)
            .with_context(|| format!("Failed to save row encoder to '{}'", path.display()))?;

        for (kind, entry) in &registry.kinds {
            let path = self.dir.join(kind_record(*kind));
            entry.model.clone()
                .save_file(path.clone(), &recorder)
                .with_context(|| format!("Failed to save {kind} encoder to '{}'", path.display()))?;
        }

        tracing::debug!("Saved {} encoder records", registry.kinds.len() + 1);
        Ok(())
    }

    /// Restore parameters into a registry built from the same plan.
    pub fn load_registry<B: Backend>(
        &self,
        registry: EncoderRegistry<B>,
        device:   &B::Device,
    ) -> Result<EncoderRegistry<B>> {
        let recorder = NamedMpkGzFileRecorder::<FullPrecisionSettings>::new();
        let EncoderRegistry { row, mut kinds } = registry;

        let path = self.dir.join(ROW_ENCODER);
        let row = row
            .load_file(path.clone(), &recorder, device)
            .with_context(|| format!("Cannot load row encoder '{}'", path.display()))?;

        for (kind, entry) in kinds.iter_mut() {
            let path = self.dir.join(kind_record(*kind));
            entry.model = entry.model.clone()
                .load_file(path.clone(), &recorder, device)
                .with_context(|| format!("Cannot load {kind} encoder '{}'", path.display()))?;
        }

        tracing::info!("Encoders restored from '{}'", self.dir.display());
        Ok(EncoderRegistry { row, kinds })
    }

    // ── CSV outputs ──────────────────────────────────────────────────────────

    /// Write the scaled table, one column per banished column.
    pub fn write_scaled(&self, columns: &[ScaledColumn]) -> Result<()> {
        let path = self.dir.join("scaled.csv");
        let mut w = csv::Writer::from_path(&path)
            .with_context(|| format!("Cannot create '{}'", path.display()))?;

        let mut header = vec!["row".to_string()];
        header.extend(columns.iter().map(|c| c.stats.name.clone()));
        w.write_record(&header)?;

        let rows = columns.first().map(|c| c.values.len()).unwrap_or(0);
        for row in 0..rows {
            let mut record = vec![row.to_string()];
            record.extend(columns.iter().map(|c| format!("{:.6}", c.values[row])));
            w.write_record(&record)?;
        }
        w.flush()?;

        tracing::debug!("Wrote {} scaled rows to '{}'", rows, path.display());
        Ok(())
    }

    /// Write row embeddings and per-kind encodings.
    pub fn write_encodings(&self, encodings: &Encodings) -> Result<()> {
        write_matrix(&self.dir.join("row_embeddings.csv"), "e", &encodings.rows)?;
        for (kind, values) in &encodings.kinds {
            let path = self.dir.join(format!("{kind}_encodings.csv"));
            write_matrix(&path, "v", values)?;
        }
        Ok(())
    }
}

fn kind_record(kind: ColumnKind) -> String {
    format!("encoder_{kind}")
}

fn write_matrix(path: &Path, prefix: &str, rows: &[Vec<f32>]) -> Result<()> {
    let mut w = csv::Writer::from_path(path)
        .with_context(|| format!("Cannot create '{}'", path.display()))?;

    let width = rows.first().map(Vec::len).unwrap_or(0);
    let mut header = vec!["row".to_string()];
    header.extend((0..width).map(|i| format!("{prefix}{i}")));
    w.write_record(&header)?;

    for (row, values) in rows.iter().enumerate() {
        let mut record = vec![row.to_string()];
        record.extend(values.iter().map(|v| format!("{v:.6}")));
        w.write_record(&record)?;
    }
    w.flush()?;

    tracing::debug!("Wrote {} rows to '{}'", rows.len(), path.display());
    Ok(())
}
