use crate::core::inputs;
use crate::core::registry::EntityRegistry;
use crate::domain::model::{EntityDef, EntityTestTask, MethodDef};
use crate::utils::combos::{combination_list, exclude_names, map_field_inputs, product_list};
use crate::utils::error::{Result, RizzaError};
use std::collections::BTreeMap;

/// Generates brute-force test tasks for one entity.
pub struct EntityTester {
    entity: EntityDef,
    fields: Vec<String>,
    methods: Vec<MethodDef>,
}

impl EntityTester {
    pub fn new(registry: &EntityRegistry, name: &str) -> Result<Self> {
        let entity = registry
            .get(name)
            .cloned()
            .ok_or_else(|| RizzaError::UnknownEntityError {
                name: name.to_string(),
            })?;
        Ok(Self::from_def(entity))
    }

    pub fn from_def(entity: EntityDef) -> Self {
        let fields = entity.field_names();
        let methods = entity.methods.clone();
        Self {
            entity,
            fields,
            methods,
        }
    }

    /// 套用欄位與方法排除條件
    pub fn prep(&mut self, field_exclude: Option<&[String]>, method_exclude: Option<&[String]>) {
        self.fields = exclude_names(self.entity.field_names(), field_exclude);
        let kept: Vec<String> = exclude_names(
            self.entity.methods.iter().map(|m| m.name.clone()).collect(),
            method_exclude,
        );
        self.methods = self
            .entity
            .methods
            .iter()
            .filter(|m| kept.contains(&m.name))
            .cloned()
            .collect();
    }

    pub fn entity_name(&self) -> &str {
        &self.entity.name
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn methods(&self) -> &[MethodDef] {
        &self.methods
    }

    /// Lazily yields every task permutation: field combinations (sizes up
    /// to `max_fields`) crossed with input assignments (product width up
    /// to `max_inputs`, clamped to the combination size) crossed with each
    /// method's argument assignments. The stream is never materialized;
    /// the space is exponential by design.
    pub fn brute_force(
        &self,
        max_fields: Option<usize>,
        max_inputs: Option<usize>,
    ) -> impl Iterator<Item = EntityTestTask> {
        let entity_name = self.entity.name.clone();
        let long = ["long".to_string()];
        let input_names = inputs::input_names(Some(&long));
        let max_inputs = max_inputs.unwrap_or(input_names.len());

        // 參數數量小，先行展開每個方法的參數組合
        let method_combos: Vec<(String, Vec<BTreeMap<String, String>>)> = self
            .methods
            .iter()
            .map(|m| {
                let repeat = max_inputs.min(m.args.len());
                let combos: Vec<Vec<String>> = product_list(&input_names, repeat).collect();
                let dicts: Vec<BTreeMap<String, String>> =
                    map_field_inputs(m.args.clone(), combos).collect();
                (m.name.clone(), dicts)
            })
            .collect();

        let field_combos = combination_list(&self.fields, max_fields);

        field_combos.into_iter().flat_map(move |combo| {
            let repeat = max_inputs.min(combo.len());
            let field_inputs = map_field_inputs(combo, product_list(&input_names, repeat));
            let method_combos = method_combos.clone();
            let entity_name = entity_name.clone();
            field_inputs.flat_map(move |field_dict| {
                let method_combos = method_combos.clone();
                let entity_name = entity_name.clone();
                method_combos.into_iter().flat_map(move |(method, arg_dicts)| {
                    let entity_name = entity_name.clone();
                    let field_dict = field_dict.clone();
                    arg_dicts.into_iter().map(move |arg_dict| EntityTestTask {
                        entity: entity_name.clone(),
                        method: method.clone(),
                        field_dict: field_dict.clone(),
                        arg_dict,
                    })
                })
            })
        })
    }
}
