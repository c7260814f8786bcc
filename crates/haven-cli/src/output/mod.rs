use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(&serde_json::to_value(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table(value: &Value) -> anyhow::Result<String> {
    let options = table_options();
    match value {
        Value::Array(items) => Ok(render_rows(items, options)),
        Value::Object(map) => {
            // Arrays of records get their own table under a heading.
            let mut scalars = Vec::new();
            let mut sections = Vec::new();
            for (key, value) in map {
                match value {
                    Value::Array(items) if items.iter().all(Value::is_object) => {
                        sections.push(format!("{key}:\n{}", render_rows(items, options)));
                    }
                    other => scalars.push(vec![key.clone(), value_to_cell(other)]),
                }
            }
            scalars.sort();

            let mut blocks = Vec::new();
            if !scalars.is_empty() {
                blocks.push(table::render(&["key", "value"], &scalars, options));
            }
            blocks.extend(sections);
            Ok(blocks.join("\n\n"))
        }
        scalar => Ok(table::render(&["value"], &[vec![value_to_cell(scalar)]], options)),
    }
}

fn render_rows(items: &[Value], options: table::TableOptions) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    if headers.is_empty() {
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return table::render(&["value"], &rows, options);
    }

    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .map(|item| {
            headers
                .iter()
                .map(|header| {
                    item.get(header)
                        .map_or_else(|| String::from("-"), value_to_cell)
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    table::render(&header_refs, &rows, options)
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;
    use serde_json::json;

    use super::*;

    #[derive(Serialize)]
    struct Status {
        authenticated: bool,
        user: Option<String>,
    }

    #[test]
    fn json_is_pretty_and_raw_is_compact() {
        let status = Status {
            authenticated: true,
            user: Some("sam".into()),
        };
        assert_eq!(
            render(&status, OutputFormat::Raw).unwrap(),
            r#"{"authenticated":true,"user":"sam"}"#
        );
        assert!(render(&status, OutputFormat::Json).unwrap().contains('\n'));
    }

    #[test]
    fn object_renders_as_sorted_key_value_rows() {
        let status = Status {
            authenticated: false,
            user: None,
        };
        let rendered = render(&status, OutputFormat::Table).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].starts_with("key"));
        assert!(lines[2].starts_with("authenticated"));
        assert!(lines[3].starts_with("user"));
        assert!(lines[3].trim_end().ends_with('-'));
    }

    #[test]
    fn record_arrays_render_as_sections() {
        let value = json!({
            "threshold": 5,
            "low": [{"item": "rice", "stock": 2}]
        });
        let rendered = render_table(&value).unwrap();
        assert!(rendered.contains("low:\n"));
        assert!(rendered.contains("rice"));
    }

    #[test]
    fn empty_array_says_so() {
        assert_eq!(render_table(&json!([])).unwrap(), "(no rows)");
    }
}
