// ============================================================
// Layer 5 - Encoder Registry
// ============================================================
// One owner for every encoder of a banished table:
//
//   row encoder          - one per table
//   numeric encoder      - one per column kind present
//
// The registry is built from an EncoderPlan (plain serialisable
// configs) when a use case starts and dropped when it ends.
// Free text never gets an entry.

use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Context, Result};
use burn::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::scaler::scale_column;
use crate::domain::column::{Column, ColumnKind};
use crate::domain::stats::ColumnStats;
use crate::domain::table::{Table, TableShape};
use crate::domain::traits::HiddenSizePolicy;
use crate::ml::model::{NumericEncoder, NumericEncoderConfig, RowEncoder, RowEncoderConfig};

// ─── Plan ─────────────────────────────────────────────────────────────────────
/// Architecture of every encoder, enough to rebuild the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderPlan {
    pub row:   RowEncoderConfig,
    pub kinds: Vec<KindPlan>,
}

/// The encoder of one column kind and the columns it reconstructs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindPlan {
    pub kind:    ColumnKind,
    pub columns: Vec<String>,
    pub encoder: NumericEncoderConfig,
}

impl EncoderPlan {
    /// Size the row encoder from the whole encodable table and one
    /// encoder per kind from that kind's columns.
    pub fn new(
        table:       &Table,
        row_policy:  &dyn HiddenSizePolicy,
        kind_policy: &dyn HiddenSizePolicy,
    ) -> Self {
        let shape = table.shape();
        let row   = RowEncoderConfig::new(shape.rows, shape.columns, row_policy.hidden_size(shape));

        let kinds = ColumnKind::ALL
            .into_iter()
            .filter(|kind| kind.is_encodable())
            .filter_map(|kind| {
                let names: Vec<String> = table.columns_of(kind).map(|c| c.name.clone()).collect();
                if names.is_empty() {
                    return None;
                }
                let kind_shape = TableShape::new(shape.rows, names.len());
                let encoder = NumericEncoderConfig::new(names.len())
                    .with_hidden(kind_policy.hidden_size(kind_shape));
                Some(KindPlan { kind, columns: names, encoder })
            })
            .collect();

        Self { row, kinds }
    }

    pub fn shape(&self) -> TableShape {
        TableShape::new(self.row.rows, self.row.columns)
    }
}

// ─── Registry ─────────────────────────────────────────────────────────────────
/// An initialised encoder for one column kind
#[derive(Debug)]
pub struct KindEncoder<B: Backend> {
    pub columns: Vec<String>,
    pub model:   NumericEncoder<B>,
}

#[derive(Debug)]
pub struct EncoderRegistry<B: Backend> {
    pub(crate) row:   RowEncoder<B>,
    pub(crate) kinds: BTreeMap<ColumnKind, KindEncoder<B>>,
}

impl<B: Backend> EncoderRegistry<B> {
    /// Initialise every encoder of the plan on `device`.
    pub fn init(plan: &EncoderPlan, device: &B::Device) -> Result<Self> {
        let shape = plan.shape();
        if shape.rows == 0 || shape.columns == 0 {
            bail!("Cannot build encoders for an empty table ({} x {})", shape.rows, shape.columns);
        }

        let params = plan.row.param_count();
        if params > 50_000_000 {
            tracing::warn!(
                "Row encoder holds {} parameters (hidden={}); consider --row-hidden",
                params, plan.row.hidden
            );
        }

        let row = plan.row.init(device);
        let mut kinds = BTreeMap::new();
        for entry in &plan.kinds {
            if !entry.kind.is_encodable() {
                bail!("No encoder exists for {} columns", entry.kind);
            }
            let model = entry.encoder.init(device);
            tracing::debug!(
                "Registered {} encoder: {} columns, hidden={}",
                entry.kind, entry.encoder.columns, entry.encoder.hidden
            );
            kinds.insert(entry.kind, KindEncoder { columns: entry.columns.clone(), model });
        }

        Ok(Self { row, kinds })
    }

    pub fn row(&self) -> &RowEncoder<B> {
        &self.row
    }

    pub fn get(&self, kind: ColumnKind) -> Option<&KindEncoder<B>> {
        self.kinds.get(&kind)
    }

    /// Registered kinds in registry order
    pub fn kinds(&self) -> impl Iterator<Item = (ColumnKind, &KindEncoder<B>)> {
        self.kinds.iter().map(|(k, v)| (*k, v))
    }
}

// ─── Banishing ────────────────────────────────────────────────────────────────
/// A scaled column together with the encoder that owns its kind.
#[derive(Debug)]
pub struct BanishedColumn<'r, B: Backend> {
    pub stats:  ColumnStats,
    pub scaled: Vec<f64>,
    pub model:  &'r NumericEncoder<B>,
}

/// Scale a column with its kind's policy and attach the registry's
/// encoder for that kind.
pub fn banish_column<'r, B: Backend>(
    column:   &Column,
    shape:    TableShape,
    registry: &'r EncoderRegistry<B>,
) -> Result<BanishedColumn<'r, B>> {
    let scaled = scale_column(column, shape)
        .with_context(|| format!("Cannot banish column '{}'", column.name))?;

    let model = registry
        .get(column.kind())
        .map(|entry| &entry.model)
        .ok_or_else(|| anyhow!("No {} encoder registered for '{}'", column.kind(), column.name))?;

    Ok(BanishedColumn { stats: scaled.stats, scaled: scaled.values, model })
}
