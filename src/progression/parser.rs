// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Line-oriented progression text parser.
//!
//! One bar per line. Symbols on a line share the bar: with `n` symbols and a
//! bar of `len` quarters each symbol gets `len / n`, and the first
//! `len % n` symbols get one more. Lines starting with `@` are ignored,
//! `#` lines become annotations, and `*`/`**` lines become section markers.

use tracing::warn;

use super::{ParseWarning, Progression, ProgressionItem, SECTION_DEFINITION};
use crate::music::Chord;

const IGNORE_MARKER: char = '@';
const ANNOTATION_MARKER: char = '#';

/// Parse progression text into raw items
pub fn parse(text: &str, bar_length: u32) -> Progression {
    let bar_length = bar_length.max(1);
    let mut items = Vec::new();
    let mut warnings = Vec::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with(IGNORE_MARKER) {
            continue;
        }

        if let Some(annotation) = line.strip_prefix(ANNOTATION_MARKER) {
            items.push(ProgressionItem::event(annotation.trim()));
            continue;
        }

        // both definition and reference markers keep the full line
        if line.starts_with(SECTION_DEFINITION) {
            items.push(ProgressionItem::event(line));
            continue;
        }

        let symbols: Vec<&str> = line.split_whitespace().collect();
        for (symbol, duration) in symbols.iter().zip(split_bar(bar_length, symbols.len())) {
            match Chord::parse(symbol) {
                Ok(chord) => items.push(ProgressionItem::chord(chord, duration)),
                Err(e) => {
                    warn!(line = index + 1, symbol, "chord parse error: {}; using a rest", e);
                    warnings.push(ParseWarning {
                        line: index + 1,
                        symbol: symbol.to_string(),
                        message: e.to_string(),
                    });
                    items.push(ProgressionItem::rest(duration));
                }
            }
        }
    }

    Progression::with_warnings(items, warnings)
}

/// Quarter durations for `symbols` chords sharing one bar
pub fn split_bar(bar_length: u32, symbols: usize) -> Vec<u32> {
    if symbols == 0 {
        return Vec::new();
    }
    let n = symbols as u32;
    let base = bar_length / n;
    let remainder = bar_length % n;
    (0..n).map(|i| if i < remainder { base + 1 } else { base }).collect()
}
