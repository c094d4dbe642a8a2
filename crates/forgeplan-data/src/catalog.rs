//! Block catalogs: resolve model definitions from data files into engine
//! [`BlockModel`]s and register them on top of the stock block library.

use forgeplan_core::fixed::{Fixed64, f64_to_fixed64};
use forgeplan_core::handle::{input_handle, output_handle};
use forgeplan_core::model::{BlockModel, Port};
use forgeplan_core::rate::RateUnit;
use forgeplan_core::registry::{ModelRegistry, ModelRegistryBuilder};
use std::path::Path;
use tracing::debug;

use crate::loader::{DataLoadError, deserialize_list, find_data_file};
use crate::schema::{BlockModelData, PortData};

/// Base name of the optional catalog file (`blocks.ron|json|toml`).
pub const CATALOG_FILE: &str = "blocks";

/// Load the block catalog from `dir`.
///
/// The stock block library is always registered. If `dir` holds a
/// `blocks.{ron,json,toml}` file, its models are added on top; a name that
/// clashes with a stock block or with another entry is rejected.
pub fn load_block_catalog(dir: &Path) -> Result<ModelRegistry, DataLoadError> {
    let mut builder = ModelRegistryBuilder::with_base_models();

    let Some(path) = find_data_file(dir, CATALOG_FILE)? else {
        debug!(dir = %dir.display(), "no block catalog, using stock blocks only");
        return Ok(builder.build());
    };

    let entries: Vec<BlockModelData> = deserialize_list(&path, CATALOG_FILE)?;
    for data in &entries {
        let model = resolve_block_model(data, &path)?;
        builder
            .register(&data.name, model)
            .map_err(|_| DataLoadError::DuplicateName {
                file: path.clone(),
                name: data.name.clone(),
            })?;
    }

    debug!(file = %path.display(), models = entries.len(), "loaded block catalog");
    Ok(builder.build())
}

/// Convert a model definition into an engine [`BlockModel`].
///
/// Port ids default to their positional handles. Rates must be finite.
pub fn resolve_block_model(data: &BlockModelData, file: &Path) -> Result<BlockModel, DataLoadError> {
    let inputs = data
        .inputs
        .iter()
        .enumerate()
        .map(|(i, p)| resolve_port(p, input_handle(i), file))
        .collect::<Result<Vec<_>, _>>()?;
    let outputs = data
        .outputs
        .iter()
        .enumerate()
        .map(|(i, p)| resolve_port(p, output_handle(i), file))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BlockModel {
        block_type: data.block_type,
        name: data.name.clone(),
        description: data.description.clone(),
        inputs,
        outputs,
        overclock_pct: data
            .overclock_pct
            .map(|v| finite(v, "overclock_pct", file))
            .transpose()?,
        power_estimate_mw: data
            .power_estimate_mw
            .map(|v| finite(v, "power_estimate_mw", file))
            .transpose()?,
        color: data.color.clone(),
        icon: data.icon.clone(),
    })
}

fn resolve_port(data: &PortData, handle: String, file: &Path) -> Result<Port, DataLoadError> {
    let unit = match data.unit.as_deref() {
        None => RateUnit::default(),
        Some(s) => s.parse().map_err(|e| DataLoadError::InvalidValue {
            file: file.to_path_buf(),
            field: "unit",
            detail: format!("{e}"),
        })?,
    };
    Ok(Port {
        id: data.id.clone().unwrap_or(handle),
        name: data.name.clone(),
        kind: data.kind,
        unit,
        rate: finite(data.rate, "rate", file)?,
    })
}

fn finite(v: f64, field: &'static str, file: &Path) -> Result<Fixed64, DataLoadError> {
    if !v.is_finite() {
        return Err(DataLoadError::InvalidValue {
            file: file.to_path_buf(),
            field,
            detail: format!("{v} is not a finite number"),
        });
    }
    Ok(f64_to_fixed64(v))
}

// ===========================================================================
// Tests
// ===========================================================================
