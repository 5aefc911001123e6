use colored::*;
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

fn cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{}{}", text, " ".repeat(fill))
}

/// Print records as aligned columns, headers taken from the first record.
pub fn print_table(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        println!("{}", "No records.".dimmed());
        return;
    };
    // id leads; the rest keep serde_json's key order
    let headers: Vec<&String> = first
        .keys()
        .filter(|k| k.as_str() == "id")
        .chain(first.keys().filter(|k| k.as_str() != "id"))
        .collect();

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|h| row.get(h.as_str()).map(cell).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .map(|r| UnicodeWidthStr::width(r[i].as_str()))
                .chain(std::iter::once(UnicodeWidthStr::width(h.as_str())))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(h, *w))
        .collect();
    println!("{}", header_line.join("  ").bold());

    for row in cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (c, w))| {
                if i == 0 {
                    pad(c, *w).cyan().to_string()
                } else {
                    pad(c, *w)
                }
            })
            .collect();
        println!("{}", line.join("  "));
    }
}

pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", value),
    }
}

pub fn print_success(message: &str) {
    println!("{}", message.green());
}

pub fn print_info(message: &str) {
    println!("{}", message.dimmed());
}
