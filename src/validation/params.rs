use crate::model::{CustomCalculationParams, NodeType};
use ahash::{AHashMap, AHashSet};

/// Validates the params block of one node type.
///
/// Field-level business rules live in implementations supplied by the host
/// application; the core only calls them.
pub trait ParamsValidator: Send + Sync {
    fn node_type(&self) -> NodeType;
    fn validate(&self, params: &serde_json::Value) -> Result<(), String>;
}

/// Checks that a custom calculation's rows parse and that row ids are unique,
/// since row ids become port handles.
pub struct CustomCalculationValidator;

impl ParamsValidator for CustomCalculationValidator {
    fn node_type(&self) -> NodeType {
        NodeType::CustomCalculation
    }

    fn validate(&self, params: &serde_json::Value) -> Result<(), String> {
        let view = CustomCalculationParams::from_params(params).map_err(|e| e.to_string())?;
        let mut seen = AHashSet::new();
        for row in view.inputs.iter().chain(view.outputs.iter()) {
            if row.id.is_empty() {
                return Err(format!("row '{}' has an empty id", row.name));
            }
            if !seen.insert(row.id.as_str()) {
                return Err(format!("duplicate row id '{}'", row.id));
            }
        }
        Ok(())
    }
}

/// Per-node-type validators, dispatched by node type.
pub struct ValidatorRegistry {
    validators: AHashMap<NodeType, Box<dyn ParamsValidator>>,
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        let mut registry = Self {
            validators: AHashMap::new(),
        };
        registry.register(Box::new(CustomCalculationValidator));
        registry
    }
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a validator, replacing any previous one for the same node type.
    pub fn register(&mut self, validator: Box<dyn ParamsValidator>) {
        self.validators.insert(validator.node_type(), validator);
    }

    /// Node types without a registered validator accept any params.
    pub fn validate(&self, node_type: NodeType, params: &serde_json::Value) -> Result<(), String> {
        match self.validators.get(&node_type) {
            Some(validator) => validator.validate(params),
            None => Ok(()),
        }
    }
}
