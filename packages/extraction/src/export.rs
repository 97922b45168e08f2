//! JSON and CSV export of batch results.

use serde::Serialize;
use serde_json::Value;

use crate::batch::BatchItem;
use crate::types::field::Field;
use crate::types::outcome::ExtractionResult;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportRecord<'a> {
    file_name: &'a str,
    sha256: &'a str,
    extracted_data: &'a ExtractionResult,
}

/// JSON array of `{fileName, sha256, extractedData}` for items with results.
pub fn export_json(items: &[BatchItem]) -> serde_json::Result<String> {
    let records: Vec<ExportRecord<'_>> = items
        .iter()
        .filter_map(|item| {
            item.result.as_ref().map(|result| ExportRecord {
                file_name: &item.file_name,
                sha256: &item.sha256,
                extracted_data: result,
            })
        })
        .collect();

    serde_json::to_string_pretty(&records)
}

/// CSV with a `File Name, SHA256, <labels>` header and one row per item with results.
pub fn export_csv(items: &[BatchItem], fields: &[Field]) -> String {
    let mut lines = Vec::with_capacity(items.len() + 1);

    let header: Vec<String> = ["File Name", "SHA256"]
        .into_iter()
        .chain(fields.iter().map(|f| f.label.as_str()))
        .map(quote)
        .collect();
    lines.push(header.join(","));

    for item in items {
        let Some(result) = &item.result else { continue };

        let mut row = vec![quote(&item.file_name), quote(&item.sha256)];
        row.extend(
            fields
                .iter()
                .map(|f| quote(&cell_text(result.get(&f.key).unwrap_or(&Value::Null)))),
        );
        lines.push(row.join(","));
    }

    let mut csv = lines.join("\n");
    csv.push('\n');
    csv
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(cell_text).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::field::ValueKind;
    use serde_json::json;

    fn fields() -> Vec<Field> {
        vec![
            Field::new("title", "Title", ValueKind::Text),
            Field::new("holes", "Hole \u{d8}", ValueKind::NumberList),
            Field::new("approved", "Approved", ValueKind::Boolean),
        ]
    }

    fn completed(name: &str, values: Value) -> BatchItem {
        let mut item = BatchItem::new(name, "abc123", crate::DocumentPayload::from_bytes(vec![], "image/png"));
        item.result = serde_json::from_value(values).ok();
        item
    }

    #[test]
    fn test_csv_quotes_and_joins() {
        let items = vec![
            completed(
                "plate.pdf",
                json!({"title": "Plate \"A\"", "holes": [6, 8.5], "approved": true}),
            ),
            completed("blank.png", json!({"title": null, "holes": null, "approved": null})),
            BatchItem::new("failed.png", "def", crate::DocumentPayload::from_bytes(vec![], "image/png")),
        ];

        let csv = export_csv(&items, &fields());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "\"File Name\",\"SHA256\",\"Title\",\"Hole \u{d8}\",\"Approved\"");
        assert_eq!(lines[1], "\"plate.pdf\",\"abc123\",\"Plate \"\"A\"\"\",\"6, 8.5\",\"true\"");
        assert_eq!(lines[2], "\"blank.png\",\"abc123\",\"\",\"\",\"\"");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_json_export_shape() {
        let items = vec![completed("plate.pdf", json!({"title": "Plate"}))];
        let exported: Value = serde_json::from_str(&export_json(&items).unwrap()).unwrap();

        assert_eq!(
            exported,
            json!([{"fileName": "plate.pdf", "sha256": "abc123", "extractedData": {"title": "Plate"}}])
        );
    }

    #[test]
    fn test_json_export_skips_items_without_results() {
        let items = vec![BatchItem::new("x.png", "0", crate::DocumentPayload::from_bytes(vec![], "image/png"))];
        assert_eq!(export_json(&items).unwrap(), "[]");
    }
}
