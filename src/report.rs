//! PDF scorecard rendering (A4, built-in Helvetica, wrapped lines, automatic page breaks).

use printpdf::{
  BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
  Point, Rgb,
};
use thiserror::Error;
use tracing::{info, instrument};

use crate::domain::Session;
use crate::util::wrap_text;

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;
const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH: f32 = 0.5;

pub const REPORT_TITLE: &str = "AI Interview Prep Buddy - Report";

#[derive(Debug, Error)]
pub enum ReportError {
  #[error("pdf error: {0}")]
  Pdf(String),
}

/// Built-in fonts only cover ASCII reliably; map common typography and replace the rest.
/// Line breaks survive for the wrapper; carriage returns are dropped.
fn pdf_safe(s: &str) -> String {
  s.chars()
    .filter(|&c| c != '\r')
    .map(|c| match c {
      '\u{2018}' | '\u{2019}' => '\'',
      '\u{201C}' | '\u{201D}' => '"',
      '\u{2013}' | '\u{2014}' => '-',
      '\t' => ' ',
      '\n' => '\n',
      c if c.is_ascii() && !c.is_ascii_control() => c,
      _ => '?',
    })
    .collect()
}

struct Shade(f32, f32, f32);

const BLACK: Shade = Shade(0.0, 0.0, 0.0);
const INK: Shade = Shade(0.067, 0.067, 0.067);
const DARK: Shade = Shade(0.2, 0.2, 0.2);
const MUTED: Shade = Shade(0.333, 0.333, 0.333);
const FAINT: Shade = Shade(0.4, 0.4, 0.4);

struct ReportWriter {
  doc: PdfDocumentReference,
  layer: PdfLayerReference,
  regular: IndirectFontRef,
  bold: IndirectFontRef,
  y: f32,
  pages: usize,
}

impl ReportWriter {
  fn new(title: &str) -> Result<Self, ReportError> {
    let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(|e| ReportError::Pdf(e.to_string()))?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(|e| ReportError::Pdf(e.to_string()))?;
    let layer = doc.get_page(page).get_layer(layer);
    Ok(Self { doc, layer, regular, bold, y: PAGE_H - MARGIN, pages: 1 })
  }

  fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * 1.35
  }

  fn wrap_width(size: f32) -> usize {
    let usable_pt = (PAGE_W - 2.0 * MARGIN) / PT_TO_MM;
    (usable_pt / (size * AVG_GLYPH)) as usize
  }

  fn new_page(&mut self) {
    let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
    self.layer = self.doc.get_page(page).get_layer(layer);
    self.y = PAGE_H - MARGIN;
    self.pages += 1;
  }

  fn ensure_space(&mut self, needed: f32) {
    if self.y - needed < MARGIN {
      self.new_page();
    }
  }

  fn set_color(&self, c: &Shade) {
    self.layer.set_fill_color(Color::Rgb(Rgb::new(c.0, c.1, c.2, None)));
  }

  /// Left-aligned paragraph, wrapped and paginated line by line.
  fn paragraph(&mut self, text: &str, size: f32, color: &Shade, bold: bool) {
    let lh = Self::line_height(size);
    for line in wrap_text(&pdf_safe(text), Self::wrap_width(size)) {
      self.ensure_space(lh);
      self.y -= lh;
      self.set_color(color);
      let font = if bold { &self.bold } else { &self.regular };
      self.layer.use_text(line, size, Mm(MARGIN), Mm(self.y), font);
    }
  }

  fn centered(&mut self, text: &str, size: f32, color: &Shade, bold: bool) {
    let text = pdf_safe(text).replace('\n', " ");
    let lh = Self::line_height(size);
    self.ensure_space(lh);
    self.y -= lh;
    let width = text.chars().count() as f32 * size * AVG_GLYPH * PT_TO_MM;
    let x = ((PAGE_W - width) / 2.0).max(MARGIN);
    self.set_color(color);
    let font = if bold { &self.bold } else { &self.regular };
    self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
  }

  fn gap(&mut self, mm: f32) {
    self.y -= mm;
  }

  fn rule(&mut self) {
    self.ensure_space(2.0);
    self.y -= 1.0;
    let line = Line {
      points: vec![
        (Point::new(Mm(MARGIN), Mm(self.y)), false),
        (Point::new(Mm(PAGE_W - MARGIN), Mm(self.y)), false),
      ],
      is_closed: false,
    };
    self.layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    self.layer.set_outline_thickness(0.5);
    self.layer.add_line(line);
    self.y -= 1.0;
  }

  fn finish(self) -> Result<Vec<u8>, ReportError> {
    self.doc.save_to_bytes().map_err(|e| ReportError::Pdf(e.to_string()))
  }
}

fn answer_text(session: &Session, index: usize) -> &str {
  session.answers.get(index).map(String::as_str).filter(|a| !a.is_empty()).unwrap_or("(empty)")
}

fn layout(session: &Session) -> Result<ReportWriter, ReportError> {
  let mut w = ReportWriter::new(REPORT_TITLE)?;

  w.centered(REPORT_TITLE, 20.0, &BLACK, true);
  w.gap(2.0);
  w.centered(&session.timestamp.format("%a %b %d %Y %H:%M:%S UTC").to_string(), 10.0, &FAINT, false);
  w.gap(4.0);
  w.paragraph(&format!("Role: {}", session.role.as_str()), 12.0, &BLACK, false);
  w.paragraph(&format!("Difficulty: {}", session.difficulty.as_str()), 12.0, &BLACK, false);
  w.paragraph(
    &format!(
      "Overall: {:.1}/5 (Clarity {:.1}/5, Confidence {:.1}/5, Keywords {:.1}/5)",
      session.overall, session.avg_clarity, session.avg_confidence, session.avg_keywords
    ),
    12.0,
    &BLACK,
    false,
  );
  w.gap(2.0);
  w.rule();
  w.gap(2.0);

  for (i, question) in session.questions.iter().enumerate() {
    w.paragraph(&format!("{}. {}", i + 1, question), 11.0, &INK, true);
    w.gap(0.8);
    let answer = answer_text(session, i);
    w.paragraph(&format!("Your Answer: {answer}"), 10.0, &DARK, false);
    match session.feedback.get(i) {
      Some(fb) => {
        w.paragraph(&format!("Feedback - C:{} Co:{} K:{}", fb.clarity, fb.confidence, fb.keywords), 10.0, &BLACK, false);
        if !fb.tip.is_empty() {
          w.paragraph(&format!("Tip: {}", fb.tip), 10.0, &MUTED, false);
        }
      }
      None => w.paragraph("Feedback - C:- Co:- K:-", 10.0, &BLACK, false),
    }
    w.gap(3.0);
  }
  Ok(w)
}

/// Render the session scorecard as PDF bytes.
#[instrument(level = "info", skip(session), fields(id = %session.id, questions = session.questions.len()))]
pub fn render_session_pdf(session: &Session) -> Result<Vec<u8>, ReportError> {
  let w = layout(session)?;
  let pages = w.pages;
  let bytes = w.finish()?;
  info!(target: "interview_backend", pages, bytes = bytes.len(), "Report rendered");
  Ok(bytes)
}

/// Download name used for reports fetched from history.
pub fn report_filename(session: &Session) -> String {
  format!("Interview_Report_{}.pdf", session.timestamp.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Difficulty, Feedback, Role};
  use crate::session::finalize;

  fn session_with(n: usize, answer: &str) -> Session {
    finalize(
      Role::Software,
      Difficulty::Medium,
      (0..n).map(|i| format!("Question number {i}?")).collect(),
      vec![answer.to_string(); n],
      vec![Feedback { clarity: 3, confidence: 2, keywords: 4, tip: "State decisions and justify trade-offs.".into() }; n],
    )
    .expect("session")
  }

  #[test]
  fn renders_a_pdf_document() {
    let bytes = render_session_pdf(&session_with(5, "We used a cache.")).expect("pdf");
    assert!(bytes.starts_with(b"%PDF"));
  }

  #[test]
  fn short_session_fits_one_page() {
    let w = layout(&session_with(5, "Short answer.")).expect("layout");
    assert_eq!(w.pages, 1);
  }

  #[test]
  fn long_answers_paginate() {
    let long = "threads and processes ".repeat(120);
    let w = layout(&session_with(5, &long)).expect("layout");
    assert!(w.pages > 1, "pages = {}", w.pages);
  }

  #[test]
  fn non_ascii_text_is_made_safe() {
    assert_eq!(pdf_safe("a \u{2014} \u{201C}b\u{201D} caf\u{e9}"), "a - \"b\" caf?");
    let bytes = render_session_pdf(&session_with(5, "na\u{ef}ve \u{2014} answer")).expect("pdf");
    assert!(!bytes.is_empty());
  }

  #[test]
  fn multi_line_answers_keep_their_breaks() {
    assert_eq!(pdf_safe("line one\r\nline two"), "line one\nline two");
    let width = ReportWriter::wrap_width(10.0);
    assert_eq!(
      wrap_text(&pdf_safe("Your Answer: line one\nline two"), width),
      vec!["Your Answer: line one", "line two"]
    );

    let one_line = layout(&session_with(5, "line one line two")).expect("layout");
    let two_lines = layout(&session_with(5, "line one\nline two")).expect("layout");
    assert!(two_lines.y < one_line.y, "{} vs {}", two_lines.y, one_line.y);
  }

  #[test]
  fn only_missing_answers_print_as_empty() {
    assert_eq!(answer_text(&session_with(5, ""), 0), "(empty)");
    assert_eq!(answer_text(&session_with(5, "   "), 0), "   ");
    assert_eq!(answer_text(&session_with(5, "a"), 7), "(empty)");
  }

  #[test]
  fn filename_uses_session_date() {
    let s = session_with(5, "a");
    assert_eq!(report_filename(&s), format!("Interview_Report_{}.pdf", s.timestamp.format("%Y-%m-%d")));
  }
}
