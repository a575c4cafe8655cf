//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Round to one decimal place, half away from zero.
pub fn round1(x: f64) -> f64 {
  (x * 10.0).round() / 10.0
}

/// Greedy word wrap on character counts. Words longer than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
  let width = width.max(1);
  let mut lines = Vec::new();
  for para in text.lines() {
    let mut line = String::new();
    for word in para.split_whitespace() {
      let mut word: Vec<char> = word.chars().collect();
      while word.len() > width {
        if !line.is_empty() {
          lines.push(std::mem::take(&mut line));
        }
        lines.push(word.drain(..width).collect());
      }
      let word: String = word.into_iter().collect();
      if word.is_empty() {
        continue;
      }
      let needed = if line.is_empty() { word.chars().count() } else { line.chars().count() + 1 + word.chars().count() };
      if needed > width {
        lines.push(std::mem::take(&mut line));
      }
      if !line.is_empty() {
        line.push(' ');
      }
      line.push_str(&word);
    }
    lines.push(line);
  }
  if lines.is_empty() {
    lines.push(String::new());
  }
  lines
}
