//! Form and detail views: the focused record as a list of formatted fields.

use dataview_fields::{FieldSchema, FieldType, Record};
use dataview_views::ViewState;
use serde::Serialize;
use serde_json::Value;

use crate::query::QueryResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailField {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub value: Value,
    pub display: String,
    pub required: bool,
    pub readonly: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailLayout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    pub fields: Vec<DetailField>,
}

/// The first selected record in display order, else the first visible one.
pub fn focused<'a>(result: &QueryResult<'a>, state: &ViewState) -> Option<&'a Record> {
    result
        .ordered
        .iter()
        .copied()
        .find(|r| state.selected_ids.contains(&r.id))
        .or_else(|| result.ordered.first().copied())
}

pub fn layout(result: &QueryResult<'_>, state: &ViewState, schema: &FieldSchema) -> DetailLayout {
    let Some(record) = focused(result, state) else {
        return DetailLayout {
            record_id: None,
            fields: Vec::new(),
        };
    };

    let fields = schema
        .visible_fields()
        .map(|field| {
            let value = record.get(&field.key);
            DetailField {
                key: field.key.clone(),
                label: field.label.clone(),
                field_type: field.type_,
                value: value.cloned().unwrap_or(Value::Null),
                display: field.display_value(value),
                required: field.required,
                readonly: field.readonly,
            }
        })
        .collect();

    DetailLayout {
        record_id: Some(record.id.clone()),
        fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::evaluate;
    use dataview_fields::FieldConfig;
    use serde_json::json;

    fn schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldConfig::new("title", "Title", FieldType::Text).required(),
            FieldConfig::new("done", "Done", FieldType::Boolean),
            FieldConfig::new("notes", "Notes", FieldType::Text).hidden(),
        ])
        .unwrap()
    }

    #[test]
    fn focuses_first_selected_in_display_order() {
        let records = vec![
            Record::new("b").with("title", "Second").with("done", true),
            Record::new("a").with("title", "First"),
        ];
        let schema = schema();
        let mut state = ViewState::default();
        let result = evaluate(&records, &schema, &state).unwrap();

        let detail = layout(&result, &state, &schema);
        assert_eq!(detail.record_id.as_deref(), Some("b"));
        assert_eq!(detail.fields.len(), 2);
        assert_eq!(detail.fields[1].display, "Yes");
        assert!(detail.fields[0].required);

        state.selected_ids.insert("a".into());
        let detail = layout(&result, &state, &schema);
        assert_eq!(detail.record_id.as_deref(), Some("a"));
        assert_eq!(detail.fields[0].value, json!("First"));
        assert_eq!(detail.fields[1].value, Value::Null);
        assert_eq!(detail.fields[1].display, "");
    }

    #[test]
    fn empty_result_has_no_focus() {
        let records: Vec<Record> = Vec::new();
        let schema = schema();
        let state = ViewState::default();
        let result = evaluate(&records, &schema, &state).unwrap();
        let detail = layout(&result, &state, &schema);
        assert!(detail.record_id.is_none());
        assert!(detail.fields.is_empty());
    }
}
