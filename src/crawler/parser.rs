//! Leaderboard markup parser
//!
//! This module turns one fetched leaderboard page into timed results:
//! - A small state machine walks the page's tags and text in document order
//! - Each completed row is handed to a [`ResultSink`]
//! - Elapsed time strings are parsed from `SS`, `MM:SS` or `HH:MM:SS`
//!
//! The parser is tied to the scraped site's table layout. A row starts at a cell
//! carrying the row marker class, the athlete name is the text of the next link,
//! and the elapsed time is the text of the next cell carrying the time marker class.

use crate::config::MarkupMarkers;
use crate::ParseError;
use scraper::node::Element;
use scraper::{Html, Node};

/// One leaderboard row: an athlete and their elapsed time in seconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedResult {
    pub name: String,
    pub seconds: u64,
}

impl TimedResult {
    pub fn new(name: impl Into<String>, seconds: u64) -> Self {
        Self {
            name: name.into(),
            seconds,
        }
    }
}

/// Receives each row emitted by a [`TimeParser`]
pub trait ResultSink {
    fn accept(&mut self, result: TimedResult);
}

impl<F> ResultSink for F
where
    F: FnMut(TimedResult),
{
    fn accept(&mut self, result: TimedResult) {
        self(result)
    }
}

/// Produces a fresh parser for every fetched page
pub trait ParserFactory {
    fn new_parser(&self) -> TimeParser;
}

impl ParserFactory for MarkupMarkers {
    fn new_parser(&self) -> TimeParser {
        TimeParser::new(self.clone())
    }
}

/// Position of the parser within the current row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Initial,
    FoundRowMarker,
    FoundPersonLink,
    PersonCaptured,
    FoundTimeCell,
}

/// Markup state machine extracting (athlete, seconds) rows from one page
#[derive(Debug)]
pub struct TimeParser {
    markers: MarkupMarkers,
    row_classes: Vec<String>,
    state: ParserState,
    pending_name: Option<String>,
    count: usize,
}

impl TimeParser {
    pub fn new(markers: MarkupMarkers) -> Self {
        let row_classes = markers
            .row_class
            .split_whitespace()
            .map(str::to_string)
            .collect();

        Self {
            markers,
            row_classes,
            state: ParserState::Initial,
            pending_name: None,
            count: 0,
        }
    }

    /// Number of rows emitted so far
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Feeds a whole page body, emitting each row into `sink`
    ///
    /// Returns the number of rows found on this page.
    ///
    /// # Errors
    ///
    /// Fails with [`ParseError`] when a time cell holds text that is not a valid
    /// elapsed time. Rows emitted before the failure have already reached the sink.
    pub fn feed(&mut self, html: &str, sink: &mut dyn ResultSink) -> Result<usize, ParseError> {
        let document = Html::parse_document(html);
        let before = self.count;

        for node in document.tree.root().descendants() {
            match node.value() {
                Node::Element(element) => self.handle_start_tag(element),
                Node::Text(text) => self.handle_text(text, sink)?,
                _ => {}
            }
        }

        Ok(self.count - before)
    }

    fn handle_start_tag(&mut self, element: &Element) {
        match self.state {
            ParserState::Initial => {
                if element.name() == self.markers.cell_tag && self.is_row_marker(element) {
                    self.state = ParserState::FoundRowMarker;
                }
            }
            ParserState::FoundRowMarker => {
                if element.name() == self.markers.link_tag {
                    self.state = ParserState::FoundPersonLink;
                }
            }
            ParserState::PersonCaptured => {
                if element.name() == self.markers.cell_tag
                    && element.classes().any(|c| c == self.markers.time_class)
                {
                    self.state = ParserState::FoundTimeCell;
                }
            }
            ParserState::FoundPersonLink | ParserState::FoundTimeCell => {}
        }
    }

    fn handle_text(&mut self, text: &str, sink: &mut dyn ResultSink) -> Result<(), ParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        match self.state {
            ParserState::FoundPersonLink => {
                self.pending_name = Some(text.to_string());
                self.state = ParserState::PersonCaptured;
            }
            ParserState::FoundTimeCell => {
                let seconds = parse_elapsed(text)?;
                let name = self.pending_name.take().unwrap_or_default();
                sink.accept(TimedResult { name, seconds });
                self.count += 1;
                self.state = ParserState::Initial;
            }
            _ => {}
        }

        Ok(())
    }

    fn is_row_marker(&self, element: &Element) -> bool {
        !self.row_classes.is_empty()
            && self
                .row_classes
                .iter()
                .all(|wanted| element.classes().any(|c| c == wanted.as_str()))
    }
}

/// Parses an elapsed time in `SS`, `MM:SS` or `HH:MM:SS` form into seconds
///
/// # Example
///
/// ```
/// use segment_leaderboard::crawler::parse_elapsed;
///
/// assert_eq!(parse_elapsed("42").unwrap(), 42);
/// assert_eq!(parse_elapsed("5:07").unwrap(), 307);
/// assert_eq!(parse_elapsed("1:02:03").unwrap(), 3723);
/// ```
pub fn parse_elapsed(text: &str) -> Result<u64, ParseError> {
    let text = text.trim();
    let parts = text
        .split(':')
        .map(|part| parse_component(part, text))
        .collect::<Result<Vec<u64>, ParseError>>()?;

    let seconds = match parts.as_slice() {
        [ss] => Some(*ss),
        [mm, ss] => mm.checked_mul(60).and_then(|m| m.checked_add(*ss)),
        [hh, mm, ss] => hh
            .checked_mul(3600)
            .and_then(|h| mm.checked_mul(60).and_then(|m| h.checked_add(m)))
            .and_then(|hm| hm.checked_add(*ss)),
        _ => {
            return Err(ParseError::UnsupportedTimeFormat {
                text: text.to_string(),
            })
        }
    };

    // Out-of-range components must not wrap into a plausible time
    seconds.ok_or_else(|| ParseError::InvalidTime {
        text: text.to_string(),
    })
}

fn parse_component(part: &str, text: &str) -> Result<u64, ParseError> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidTime {
            text: text.to_string(),
        });
    }

    part.parse().map_err(|_| ParseError::InvalidTime {
        text: text.to_string(),
    })
}

/// Renders seconds in canonical `HH:MM:SS` form (hours are not capped)
pub fn format_elapsed(seconds: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}
