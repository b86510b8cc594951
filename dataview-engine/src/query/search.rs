//! Free-text search over searchable fields.

use dataview_fields::value::to_text;
use dataview_fields::{FieldSchema, Record};

/// True when any searchable field's text contains `needle`.
///
/// `needle` must already be lowercased.
pub fn matches(record: &Record, schema: &FieldSchema, needle: &str) -> bool {
    schema.searchable_fields().any(|field| {
        record
            .get(&field.key)
            .is_some_and(|v| to_text(v).to_lowercase().contains(needle))
    })
}

/// Keep records matching `query`. An empty or blank query keeps everything.
pub fn apply<'a>(records: Vec<&'a Record>, schema: &FieldSchema, query: &str) -> Vec<&'a Record> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| matches(r, schema, &needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataview_fields::{FieldConfig, FieldType};

    fn schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldConfig::new("title", "Title", FieldType::Text),
            FieldConfig::new("code", "Code", FieldType::Number),
            FieldConfig::new("secret", "Secret", FieldType::Text).searchable(false),
        ])
        .unwrap()
    }

    #[test]
    fn search_is_case_insensitive_and_limited_to_searchable_fields() {
        let records = vec![
            Record::new("1").with("title", "Fix Login bug").with("code", 42),
            Record::new("2").with("title", "Write docs").with("secret", "login"),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        let hits = apply(refs.clone(), &schema(), "  LOGIN ");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");

        // numbers are not searchable by default
        assert!(apply(refs.clone(), &schema(), "42").is_empty());
        assert_eq!(apply(refs, &schema(), "").len(), 2);
    }
}
