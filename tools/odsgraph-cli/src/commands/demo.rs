//! Demo command implementation.
//!
//! Builds a small test hierarchy the way a file converter would: schema
//! first, then instances, then edges.

use odsgraph_cache::schema::{AttributeDef, RelationDef};
use odsgraph_cache::{CacheResult, ModelCache, ModelState};
use odsgraph_core::{InstanceId, RelationId, RelationRange, TypeId, Value};

use crate::error::Result;
use crate::output::{emit, render, EdgeRow, TypeCountRow};
use crate::OutputFormat;

/// Run the demo command.
pub fn run(format: OutputFormat) -> Result<()> {
    let cache = ModelCache::new();
    cache.write(build)?;

    let (counts, edges) = cache.read(|s| Ok((type_counts(s)?, edge_rows(s)?)))?;
    tracing::info!(types = counts.len(), edges = edges.len(), "demo model built");
    match format {
        OutputFormat::Table => {
            emit(&render(&counts, format, "(no types)")?)?;
            emit(&render(&edges, format, "(no edges)")?)?;
        }
        OutputFormat::Json => {
            let doc = serde_json::json!({ "types": counts, "edges": edges });
            emit(&serde_json::to_string_pretty(&doc)?)?;
        }
    }
    Ok(())
}

/// Add a relation and its inverse, both derived from the same-named base relations.
fn pair(
    state: &mut ModelState,
    (source, name, range): (TypeId, &str, RelationRange),
    (target, inverse, inverse_range): (TypeId, &str, RelationRange),
) -> CacheResult<RelationId> {
    let forward = state
        .add_relation(RelationDef::new(name, inverse, source).with_target(target).with_range(range).with_base(name))?;
    state.add_relation(
        RelationDef::new(inverse, name, target).with_target(source).with_range(inverse_range).with_base(inverse),
    )?;
    Ok(forward)
}

fn named_type(state: &mut ModelState, name: &str, base: &str) -> CacheResult<TypeId> {
    let id = state.register_type(name, base)?;
    state.add_attribute(id, AttributeDef::new("name").with_base("name"))?;
    Ok(id)
}

fn named_instance(state: &mut ModelState, type_id: TypeId, name: &str) -> CacheResult<InstanceId> {
    let id = state.insert(type_id)?;
    state.set_value(type_id, id, "name", name)?;
    Ok(id)
}

/// Populate the sample model.
pub fn build(state: &mut ModelState) -> CacheResult<()> {
    let many = RelationRange::MANY;
    let one = RelationRange::EXACTLY_ONE;

    let env = named_type(state, "Environment", "AoEnvironment")?;
    let test = named_type(state, "Test", "AoTest")?;
    let sub = named_type(state, "SubTest", "AoSubTest")?;
    let meas = named_type(state, "Measurement", "AoMeasurement")?;
    let mq = named_type(state, "Channel", "AoMeasurementQuantity")?;
    let sm = named_type(state, "Submatrix", "AoSubmatrix")?;
    let lc = named_type(state, "Column", "AoLocalColumn")?;
    let unit = named_type(state, "Unit", "AoUnit")?;

    state.add_attribute(sm, AttributeDef::new("rows").with_base("number_of_rows"))?;
    state.add_attribute(lc, AttributeDef::new("values").with_base("values"))?;
    state.add_attribute(unit, AttributeDef::new("factor").with_base("factor"))?;
    state.add_attribute(unit, AttributeDef::new("offset").with_base("offset"))?;

    let children = pair(state, (test, "children", many), (sub, "parent_test", one))?;
    let measurements = pair(state, (sub, "children", many), (meas, "test", one))?;
    let channels = pair(state, (meas, "measurement_quantities", many), (mq, "measurement", one))?;
    let submatrices = pair(state, (meas, "submatrices", many), (sm, "measurement", one))?;
    let columns = pair(state, (sm, "local_columns", many), (lc, "submatrix", one))?;
    let mq_columns = pair(state, (mq, "local_columns", many), (lc, "measurement_quantity", one))?;
    let unit_of = pair(state, (mq, "unit", RelationRange::OPTIONAL), (unit, "measurement_quantities", many))?;
    state.validate_relations()?;

    named_instance(state, env, "demo environment")?;
    let t = named_instance(state, test, "endurance")?;
    let s = named_instance(state, sub, "day 1")?;
    let m = named_instance(state, meas, "run 1")?;
    let seconds = named_instance(state, unit, "s")?;
    state.set_value(unit, seconds, "factor", 1.0f64)?;
    state.set_value(unit, seconds, "offset", 0.0f64)?;
    let block = named_instance(state, sm, "block 1")?;
    state.set_value(sm, block, "rows", 3i32)?;

    state.connect(test, t, children, s)?;
    state.connect(sub, s, measurements, m)?;
    state.connect(meas, m, submatrices, block)?;

    for (channel, samples) in [("time", vec![0.0, 0.5, 1.0]), ("speed", vec![12.5, 13.0, 13.4])] {
        let c = named_instance(state, mq, channel)?;
        state.connect(meas, m, channels, c)?;

        let col = named_instance(state, lc, channel)?;
        state.set_value(lc, col, "values", Value::from(samples))?;
        state.connect(sm, block, columns, col)?;
        state.connect(mq, c, mq_columns, col)?;
        if channel == "time" {
            state.connect(mq, c, unit_of, seconds)?;
        }
    }
    Ok(())
}

fn type_counts(state: &ModelState) -> CacheResult<Vec<TypeCountRow>> {
    state
        .list_types()
        .into_iter()
        .map(|t| -> CacheResult<TypeCountRow> {
            Ok(TypeCountRow {
                name: state.type_name(t)?.to_string(),
                base_type: state.base_type_of(t)?.to_string(),
                instances: state.instance_count(t)?,
            })
        })
        .collect()
}

fn edge_rows(state: &ModelState) -> CacheResult<Vec<EdgeRow>> {
    let mut rows = Vec::new();
    for relation in state.list_all_relations() {
        let source = relation.source();
        let source_name = state.type_name(source)?;
        for id in state.list_ids(source)? {
            let targets = state.query(source, id, relation.id())?;
            if targets.is_empty() {
                continue;
            }
            let targets: Vec<_> = targets.iter().map(ToString::to_string).collect();
            rows.push(EdgeRow {
                source: format!("{source_name}#{id}"),
                relation: relation.name().to_string(),
                targets: targets.join(", "),
            });
        }
    }
    Ok(rows)
}
