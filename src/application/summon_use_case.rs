// ============================================================
// Layer 2 - SummonUseCase
// ============================================================
// Brings a banished table back:
//   1. Read the manifest                 (Layer 6 - infra)
//   2. Rebuild the encoders from its plan (Layer 5 - ml)
//   3. Restore their parameters          (Layer 6 - infra)
//   4. Encode a row and decode the per-type outputs through the
//      column statistics
//
// Encoders are built in inference mode only; nothing here updates
// a parameter.

use anyhow::{Context, Result};
use burn::prelude::*;

use crate::application::banish_use_case::Manifest;
use crate::domain::stats::CellValue;
use crate::infra::checkpoint::ArtifactStore;
use crate::ml::{inferencer::encode_row, registry::EncoderRegistry};

/// One summoned row
#[derive(Debug, Clone, PartialEq)]
pub struct SummonedRow {
    pub row:       usize,
    /// Row encoder output
    pub embedding: Vec<f32>,
    /// Per-type encoder output decoded per column, in registry order
    pub cells:     Vec<(String, CellValue)>,
}

pub struct SummonUseCase<B: Backend> {
    manifest: Manifest,
    registry: EncoderRegistry<B>,
    device:   B::Device,
}

impl<B: Backend> SummonUseCase<B> {
    pub fn new(dir: &str, device: B::Device) -> Result<Self> {
        let store    = ArtifactStore::open(dir)?;
        let manifest = store.load_manifest()?;
        let registry = EncoderRegistry::<B>::init(&manifest.plan, &device)?;
        let registry = store.load_registry(registry, &device)?;
        Ok(Self { manifest, registry, device })
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn summon(&self, row: usize) -> Result<SummonedRow> {
        let encoded = encode_row(&self.registry, self.manifest.shape, row, &self.device)?;

        let mut cells = Vec::new();
        for (kind, entry) in self.registry.kinds() {
            let values = encoded
                .kinds
                .get(&kind)
                .and_then(|rows| rows.first())
                .with_context(|| format!("No {kind} output for row {row}"))?;

            for (name, &value) in entry.columns.iter().zip(values) {
                let stats = self
                    .manifest
                    .column(name)
                    .with_context(|| format!("Manifest has no statistics for '{name}'"))?;
                cells.push((name.clone(), stats.decode(value as f64)));
            }
        }

        let embedding = encoded.rows.into_iter().next().unwrap_or_default();
        tracing::debug!("Summoned row {} ({} cells)", row, cells.len());
        Ok(SummonedRow { row, embedding, cells })
    }
}

/// Read a banished directory's manifest without building encoders.
pub fn inspect(dir: &str) -> Result<Manifest> {
    ArtifactStore::open(dir)?.load_manifest()
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    use crate::application::banish_use_case::{BanishConfig, BanishUseCase};
    use crate::data::loader::parse_table;
    use crate::testing::scratch_dir;

    type TestBackend = NdArray;

    const CSV: &str = "\
height,weight,member,tier
1.60,55,true,gold
1.75,80,false,silver
1.82,92,true,gold
1.68,61,true,bronze
";

    fn banish(dir: &str) {
        let cfg = BanishConfig { out_dir: dir.to_string(), ..BanishConfig::default() };
        let table = parse_table("mem".into(), CSV.as_bytes(), cfg.categorical_limit).unwrap();
        BanishUseCase::new(cfg)
            .banish_table::<TestBackend>(table, &Default::default())
            .unwrap();
    }

    fn embeddings_csv_row(dir: &str, row: usize) -> Vec<f32> {
        let path = std::path::Path::new(dir).join("row_embeddings.csv");
        let mut rdr = csv::Reader::from_path(path).unwrap();
        let record = rdr.records().nth(row).unwrap().unwrap();
        record.iter().skip(1).map(|v| v.parse().unwrap()).collect()
    }

    #[test]
    fn test_summoned_embedding_matches_banished_output() {
        let dir = scratch_dir("summon_roundtrip");
        banish(&dir);

        let summoner = SummonUseCase::<TestBackend>::new(&dir, Default::default()).unwrap();
        let summoned = summoner.summon(2).unwrap();
        let written  = embeddings_csv_row(&dir, 2);

        assert_eq!(summoned.embedding.len(), 4);
        for (a, b) in summoned.embedding.iter().zip(&written) {
            // csv holds six decimals
            assert!((a - b).abs() < 1e-5, "{a} vs {b}");
        }
    }

    #[test]
    fn test_summon_decodes_every_column_by_kind() {
        let dir = scratch_dir("summon_cells");
        banish(&dir);

        let summoner = SummonUseCase::<TestBackend>::new(&dir, Default::default()).unwrap();
        let summoned = summoner.summon(0).unwrap();

        let names: Vec<_> = summoned.cells.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["height", "weight", "member", "tier"]);
        assert!(matches!(summoned.cells[0].1, CellValue::Number(_)));
        assert!(matches!(summoned.cells[2].1, CellValue::Flag(_)));
        match &summoned.cells[3].1 {
            CellValue::Label(l) => assert!(["bronze", "gold", "silver"].contains(&l.as_str())),
            other => panic!("expected a label, got {other:?}"),
        }
    }

    #[test]
    fn test_summon_is_repeatable() {
        let dir = scratch_dir("summon_repeat");
        banish(&dir);

        let summoner = SummonUseCase::<TestBackend>::new(&dir, Default::default()).unwrap();
        assert_eq!(summoner.summon(1).unwrap(), summoner.summon(1).unwrap());
    }

    #[test]
    fn test_summon_rejects_unknown_rows_and_dirs() {
        let dir = scratch_dir("summon_errors");
        banish(&dir);

        let summoner = SummonUseCase::<TestBackend>::new(&dir, Default::default()).unwrap();
        assert!(summoner.summon(4).is_err());

        let empty = scratch_dir("summon_empty");
        assert!(SummonUseCase::<TestBackend>::new(&empty, Default::default()).is_err());
        assert!(inspect(&empty).is_err());
    }

    #[test]
    fn test_inspect_reads_manifest() {
        let dir = scratch_dir("summon_inspect");
        banish(&dir);

        let manifest = inspect(&dir).unwrap();
        assert_eq!(manifest.shape.rows, 4);
        assert_eq!(manifest.columns.len(), 4);
        assert!(manifest.skipped.is_empty());
    }
}
