//! Result rendering as a bordered table or JSON.

use gitrank::RankedEntry;
use unicode_width::UnicodeWidthStr;

/// Pretty-printed JSON array of `{"Key": ..., "Value": ...}` objects
pub fn render_json(entries: &[RankedEntry]) -> serde_json::Result<String> {
  serde_json::to_string_pretty(entries)
}

/// Two-column table with upper-cased headers, counts right-aligned.
pub fn render_table(entries: &[RankedEntry], headers: [&str; 2]) -> String {
  let key_header = headers[0].to_uppercase();
  let value_header = headers[1].to_uppercase();
  let values: Vec<String> = entries.iter().map(|e| e.value.to_string()).collect();

  let key_width = entries
    .iter()
    .map(|e| e.key.width())
    .chain(std::iter::once(key_header.width()))
    .max()
    .unwrap_or(0);
  let value_width = values
    .iter()
    .map(|v| v.len())
    .chain(std::iter::once(value_header.width()))
    .max()
    .unwrap_or(0);

  let border = format!("+{}+{}+\n", "-".repeat(key_width + 2), "-".repeat(value_width + 2));
  let mut out = String::new();

  out.push_str(&border);
  out.push_str(&format!(
    "| {} | {} |\n",
    pad_right(&key_header, key_width),
    pad_right(&value_header, value_width)
  ));
  out.push_str(&border);
  for (entry, value) in entries.iter().zip(&values) {
    out.push_str(&format!(
      "| {} | {:>width$} |\n",
      pad_right(&entry.key, key_width),
      value,
      width = value_width
    ));
  }
  if !entries.is_empty() {
    out.push_str(&border);
  }
  out
}

/// Pad by display width; `format!` pads by chars, which misaligns wide glyphs
fn pad_right(s: &str, width: usize) -> String {
  let fill = width.saturating_sub(s.width());
  format!("{}{}", s, " ".repeat(fill))
}
