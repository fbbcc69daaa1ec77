//! SeriesCatalog: the fixed, ordered set of series and their colors.

use std::fmt;

use egui::Color32;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StreamgraphError};

/// Identifier of one series (a language-model name such as `"GPT-4"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesId(pub String);

impl SeriesId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SeriesId {
    fn from(s: String) -> Self {
        SeriesId(s)
    }
}

impl From<&str> for SeriesId {
    fn from(s: &str) -> Self {
        SeriesId(s.to_string())
    }
}

/// One catalog entry: the id plus its display color.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesEntry {
    pub id: SeriesId,
    pub color: Color32,
}

/// Process-wide default catalog of the five compared models.
static DEFAULT_CATALOG: Lazy<SeriesCatalog> = Lazy::new(|| SeriesCatalog {
    entries: vec![
        SeriesEntry {
            id: SeriesId::from("GPT-4"),
            color: Color32::from_rgb(0xe4, 0x1a, 0x1c),
        },
        SeriesEntry {
            id: SeriesId::from("Gemini"),
            color: Color32::from_rgb(0x37, 0x7e, 0xb8),
        },
        SeriesEntry {
            id: SeriesId::from("PaLM-2"),
            color: Color32::from_rgb(0x4d, 0xaf, 0x4a),
        },
        SeriesEntry {
            id: SeriesId::from("Claude"),
            color: Color32::from_rgb(0x98, 0x4e, 0xa3),
        },
        SeriesEntry {
            id: SeriesId::from("LLaMA-3.1"),
            color: Color32::from_rgb(0xff, 0x7f, 0x00),
        },
    ],
});

/// Ordered list of series with an injective id -> color mapping.
///
/// The order is the legend/display order. It never depends on data; the
/// stacking order is derived separately (see [`crate::data::stack`]).
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesCatalog {
    entries: Vec<SeriesEntry>,
}

impl Default for SeriesCatalog {
    fn default() -> Self {
        DEFAULT_CATALOG.clone()
    }
}

impl SeriesCatalog {
    /// Build a catalog from `(id, color)` pairs, rejecting empty or duplicate ids.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Color32)>,
        S: Into<String>,
    {
        let mut out: Vec<SeriesEntry> = Vec::new();
        for (id, color) in entries {
            let id = SeriesId(id.into());
            if out.iter().any(|e| e.id == id) {
                return Err(StreamgraphError::DuplicateSeries(id.0));
            }
            out.push(SeriesEntry { id, color });
        }
        if out.is_empty() {
            return Err(StreamgraphError::EmptyCatalog);
        }
        Ok(Self { entries: out })
    }

    /// Build a catalog from ids only, allocating colors from the default palette.
    ///
    /// ```
    /// # use streamgraph::data::catalog::SeriesCatalog;
    /// let c = SeriesCatalog::from_ids(["a", "b"]).unwrap();
    /// assert_eq!(c.len(), 2);
    /// assert_ne!(c.color_of(&"a".into()), c.color_of(&"b".into()));
    /// ```
    pub fn from_ids<I, S>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            ids.into_iter()
                .enumerate()
                .map(|(i, id)| (id, Self::alloc_color(i))),
        )
    }

    /// Allocate a distinct color for the given series index.
    pub fn alloc_color(index: usize) -> Color32 {
        const PALETTE: [Color32; 9] = [
            Color32::from_rgb(0xe4, 0x1a, 0x1c),
            Color32::from_rgb(0x37, 0x7e, 0xb8),
            Color32::from_rgb(0x4d, 0xaf, 0x4a),
            Color32::from_rgb(0x98, 0x4e, 0xa3),
            Color32::from_rgb(0xff, 0x7f, 0x00),
            Color32::from_rgb(0xff, 0xff, 0x33),
            Color32::from_rgb(0xa6, 0x56, 0x28),
            Color32::from_rgb(0xf7, 0x81, 0xbf),
            Color32::from_rgb(0x99, 0x99, 0x99),
        ];
        PALETTE[index % PALETTE.len()]
    }

    pub fn entries(&self) -> &[SeriesEntry] {
        &self.entries
    }

    pub fn ids(&self) -> impl Iterator<Item = &SeriesId> {
        self.entries.iter().map(|e| &e.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn color_of(&self, id: &SeriesId) -> Option<Color32> {
        self.entries.iter().find(|e| &e.id == id).map(|e| e.color)
    }
}
