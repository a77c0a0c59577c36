//! Greedy word wrapping and pagination of plain text.
//!
//! [`TextFlow`] is a lazy iterator of [`FlowEvent`]s. It never touches a
//! document: the caller decides what a line or a page break means. The flow
//! is cheap to clone and can be restarted, so the same text can be laid out
//! twice (e.g. once to count pages, once to draw).
//!
//! Text is split into paragraphs at blank lines (`"\n\n"`) and into source
//! lines at single newlines. Every source line is wrapped independently and
//! styled by a caller supplied predicate.

use std::str::{Split, SplitWhitespace};

use serde_derive::{Deserialize, Serialize};

use crate::font::BuiltinFont;
use crate::units::Pt;

/// Font, size and line advance of one source line
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font: BuiltinFont,
    pub size: Pt,
    /// Distance the cursor moves down after each wrapped line
    pub leading: Pt,
}

impl TextStyle {
    pub fn new(font: BuiltinFont, size: Pt, leading: Pt) -> Self {
        Self { font, size, leading }
    }
}

/// Measures the advance width of a run of text
pub trait TextMeasure {
    fn text_width(&self, text: &str, style: &TextStyle) -> Pt;
}

/// Page frame the text is poured into. `top` and `bottom` are baselines:
/// the first line of a page is drawn at `top`, no line is drawn below `bottom`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowLayout {
    pub left: Pt,
    pub top: Pt,
    pub bottom: Pt,
    pub max_width: Pt,
    /// Extra space after every paragraph
    pub paragraph_gap: Pt,
    /// Extra space after every source line, drawn or blank
    pub line_gap: Pt,
}

/// A wrapped line ready to be drawn
#[derive(Debug, Clone, PartialEq)]
pub struct FlowLine {
    pub text: String,
    pub x: Pt,
    pub baseline: Pt,
    pub style: TextStyle,
    /// Index of the originating line in `text.split('\n')`
    pub source_line: usize,
    /// Zero based page number relative to the start of the flow
    pub page: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    /// Start a new page; the cursor is back at `layout.top`
    PageBreak,
    Line(FlowLine),
}

#[derive(Clone)]
struct CurrentLine<'a> {
    words: SplitWhitespace<'a>,
    /// Word that overflowed the previous row
    carry: Option<&'a str>,
    style: TextStyle,
    source_line: usize,
}

/// Lazy, restartable word-wrap / pagination iterator
#[derive(Clone)]
pub struct TextFlow<'a, M, S> {
    text: &'a str,
    layout: FlowLayout,
    measure: &'a M,
    style: S,

    paragraphs: Split<'a, &'static str>,
    lines: Option<Split<'a, char>>,
    current: Option<CurrentLine<'a>>,
    next_source_line: usize,
    started_paragraph: bool,
    cursor_y: Pt,
    page: usize,
    pending_line: Option<FlowLine>,
}

impl<'a, M, S> TextFlow<'a, M, S>
where
    M: TextMeasure,
    S: Fn(&str) -> TextStyle,
{
    pub fn new(text: &'a str, layout: FlowLayout, measure: &'a M, style: S) -> Self {
        Self {
            text,
            layout,
            measure,
            style,
            paragraphs: text.split("\n\n"),
            lines: None,
            current: None,
            next_source_line: 0,
            started_paragraph: false,
            cursor_y: layout.top,
            page: 0,
            pending_line: None,
        }
    }

    /// Rewinds the flow to the first line of the first page
    pub fn restart(&mut self) {
        self.paragraphs = self.text.split("\n\n");
        self.lines = None;
        self.current = None;
        self.next_source_line = 0;
        self.started_paragraph = false;
        self.cursor_y = self.layout.top;
        self.page = 0;
        self.pending_line = None;
    }

    pub fn layout(&self) -> &FlowLayout {
        &self.layout
    }

    /// Greedily fills the next row of the current source line
    fn next_row(&mut self) -> Option<(String, TextStyle, usize)> {
        let measure = self.measure;
        let max_width = self.layout.max_width;
        let current = self.current.as_mut()?;

        let first = current.carry.take().or_else(|| current.words.next())?;
        let mut row = first.to_string();

        for word in current.words.by_ref() {
            let candidate = format!("{row} {word}");
            if measure.text_width(&candidate, &current.style) > max_width {
                current.carry = Some(word);
                break;
            }
            row = candidate;
        }

        Some((row, current.style, current.source_line))
    }

    /// Moves to the next source line, crossing paragraph boundaries.
    /// Returns `false` once the text is exhausted.
    fn advance_line(&mut self) -> bool {
        loop {
            if let Some(line) = self.lines.as_mut().and_then(|l| l.next()) {
                let source_line = self.next_source_line;
                self.next_source_line += 1;
                self.current = Some(CurrentLine {
                    words: line.split_whitespace(),
                    carry: None,
                    style: (self.style)(line),
                    source_line,
                });
                return true;
            }

            if self.lines.is_some() {
                self.cursor_y -= self.layout.paragraph_gap;
            }

            match self.paragraphs.next() {
                Some(paragraph) => {
                    if self.started_paragraph {
                        // the "\n\n" separator spans one extra source line
                        self.next_source_line += 1;
                    }
                    self.started_paragraph = true;
                    self.lines = Some(paragraph.split('\n'));
                }
                None => {
                    self.lines = None;
                    return false;
                }
            }
        }
    }
}

impl<'a, M, S> Iterator for TextFlow<'a, M, S>
where
    M: TextMeasure,
    S: Fn(&str) -> TextStyle,
{
    type Item = FlowEvent;

    fn next(&mut self) -> Option<FlowEvent> {
        if let Some(line) = self.pending_line.take() {
            return Some(FlowEvent::Line(line));
        }

        loop {
            if let Some((text, style, source_line)) = self.next_row() {
                let needs_break = self.cursor_y < self.layout.bottom;
                if needs_break {
                    self.page += 1;
                    self.cursor_y = self.layout.top;
                }

                let line = FlowLine {
                    text,
                    x: self.layout.left,
                    baseline: self.cursor_y,
                    style,
                    source_line,
                    page: self.page,
                };
                self.cursor_y -= style.leading;

                if needs_break {
                    self.pending_line = Some(line);
                    return Some(FlowEvent::PageBreak);
                }
                return Some(FlowEvent::Line(line));
            }

            if self.current.take().is_some() {
                self.cursor_y -= self.layout.line_gap;
            }

            if !self.advance_line() {
                return None;
            }
        }
    }
}
