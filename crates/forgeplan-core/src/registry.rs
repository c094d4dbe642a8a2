//! Named block models available for placement, plus the stock block library.
//!
//! Two-phase lifecycle like any catalog built at startup: register models on
//! a [`ModelRegistryBuilder`], then freeze it into an immutable
//! [`ModelRegistry`].

use crate::fixed::{Fixed64, f64_to_fixed64};
use crate::handle::{input_handle, output_handle};
use crate::model::{BlockModel, BlockType, Port, PortKind};
use crate::rate::RateUnit;
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("model already registered: {0}")]
    DuplicateModel(String),
    #[error("model not found: {0}")]
    NotFound(String),
}

/// Builder for an immutable [`ModelRegistry`].
#[derive(Debug, Default)]
pub struct ModelRegistryBuilder {
    models: HashMap<String, BlockModel>,
}

impl ModelRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder pre-populated with [`base_models`], keyed by block type name.
    pub fn with_base_models() -> Self {
        let mut builder = Self::new();
        for (name, model) in base_models() {
            builder.models.insert(name.to_string(), model);
        }
        builder
    }

    /// Register a model under `name`. Names are unique.
    pub fn register(&mut self, name: &str, model: BlockModel) -> Result<(), RegistryError> {
        if self.models.contains_key(name) {
            return Err(RegistryError::DuplicateModel(name.to_string()));
        }
        self.models.insert(name.to_string(), model);
        Ok(())
    }

    /// Edit an already registered model in place.
    pub fn mutate<F>(&mut self, name: &str, f: F) -> Result<(), RegistryError>
    where
        F: FnOnce(&mut BlockModel),
    {
        let model = self
            .models
            .get_mut(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        f(model);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&BlockModel> {
        self.models.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn build(self) -> ModelRegistry {
        ModelRegistry {
            models: self.models,
        }
    }
}

/// Immutable catalog of block models. Frozen after `build()`.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: HashMap<String, BlockModel>,
}

impl ModelRegistry {
    pub fn get(&self, name: &str) -> Option<&BlockModel> {
        self.models.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.models.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

// ===========================================================================
// Stock block library
// ===========================================================================

fn item(name: &str, rate: f64) -> Port {
    Port {
        id: String::new(),
        name: name.to_string(),
        kind: PortKind::Item,
        unit: RateUnit::ItemsPerMin,
        rate: f64_to_fixed64(rate),
    }
}

#[allow(clippy::too_many_arguments)]
fn stock(
    block_type: BlockType,
    name: &str,
    description: &str,
    inputs: Vec<Port>,
    outputs: Vec<Port>,
    power_mw: f64,
    color: &str,
    icon: &str,
) -> BlockModel {
    let inputs = inputs
        .into_iter()
        .enumerate()
        .map(|(i, p)| Port {
            id: input_handle(i),
            ..p
        })
        .collect();
    let outputs = outputs
        .into_iter()
        .enumerate()
        .map(|(i, p)| Port {
            id: output_handle(i),
            ..p
        })
        .collect();
    BlockModel {
        block_type,
        name: name.to_string(),
        description: Some(description.to_string()),
        inputs,
        outputs,
        overclock_pct: Some(Fixed64::from_num(100)),
        power_estimate_mw: Some(f64_to_fixed64(power_mw)),
        color: Some(color.to_string()),
        icon: Some(icon.to_string()),
    }
}

/// The five stock blocks, keyed by block type name.
pub fn base_models() -> Vec<(&'static str, BlockModel)> {
    vec![
        (
            "Miner",
            stock(
                BlockType::Miner,
                "Miner Mk1",
                "Extracts ore from a resource node",
                vec![],
                vec![item("Iron ore", 60.0)],
                4.0,
                "#8B4513",
                "⛏️",
            ),
        ),
        (
            "Smelter",
            stock(
                BlockType::Smelter,
                "Smelter",
                "Smelts ore into ingots",
                vec![item("Iron ore", 30.0)],
                vec![item("Iron ingot", 30.0)],
                4.0,
                "#FF6B35",
                "🔥",
            ),
        ),
        (
            "Foundry",
            stock(
                BlockType::Foundry,
                "Foundry",
                "Combines metals into alloys",
                vec![item("Iron ingot", 45.0), item("Copper ingot", 15.0)],
                vec![item("Steel", 45.0)],
                16.0,
                "#C0C0C0",
                "🏭",
            ),
        ),
        (
            "Assembler",
            stock(
                BlockType::Assembler,
                "Assembler",
                "Assembles components into complex parts",
                vec![item("Iron plate", 22.5), item("Screw", 45.0)],
                vec![item("Reinforced plate", 5.0)],
                15.0,
                "#4A90E2",
                "⚙️",
            ),
        ),
        (
            "TrainFreight",
            stock(
                BlockType::TrainFreight,
                "Train Freight",
                "Moves goods by rail",
                vec![item("Goods", 1200.0)],
                vec![item("Goods", 1200.0)],
                25.0,
                "#8B4513",
                "🚂",
            ),
        ),
    ]
}
