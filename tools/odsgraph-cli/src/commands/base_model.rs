//! Base model command implementation.

use odsgraph_core::base::BaseModel;

use crate::error::Result;
use crate::output::{emit, render, BaseAttributeRow, BaseElementRow, BaseRelationRow};
use crate::OutputFormat;

/// Run the base-model command.
pub fn run(element: Option<&str>, format: OutputFormat) -> Result<()> {
    let model = BaseModel::standard();

    let Some(name) = element else {
        let rows: Vec<_> = model
            .elements()
            .map(|e| BaseElementRow {
                name: e.name.to_string(),
                attributes: e.attributes().count(),
                relations: e.relations().count(),
            })
            .collect();
        emit(&render(&rows, format, "(no base elements)")?)?;
        return Ok(());
    };

    let element = model.require_element(name)?;
    let attributes: Vec<_> = element
        .attributes()
        .map(|a| BaseAttributeRow {
            name: a.name.to_string(),
            data_type: a.data_type.map_or_else(|| "(from quantity)".to_string(), |dt| dt.to_string()),
            unique: a.unique,
            obligatory: model.is_obligatory(a.name, element.name),
            enumeration: a.enum_type.unwrap_or_default().to_string(),
        })
        .collect();
    let relations: Vec<_> = element
        .relations()
        .map(|r| BaseRelationRow { name: r.name.to_string(), target: r.target.to_string(), range: r.range.to_string() })
        .collect();

    match format {
        OutputFormat::Table => {
            emit(&element.name)?;
            emit(&render(&attributes, format, "(no attributes)")?)?;
            emit(&render(&relations, format, "(no relations)")?)?;
        }
        OutputFormat::Json => {
            let doc = serde_json::json!({
                "element": element.name,
                "attributes": attributes,
                "relations": relations,
            });
            emit(&serde_json::to_string_pretty(&doc)?)?;
        }
    }
    Ok(())
}
