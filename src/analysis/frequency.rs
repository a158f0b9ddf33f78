//! Word-frequency weights and the word-cloud artifact.
//!
//! Weights are counts normalized by the most frequent word, so the top word
//! always weighs 1.0. The artifact is an SVG canvas with words laid out in
//! rows, largest first, font size proportional to weight.

use crate::analysis::tags::WordFilter;
use crate::config::PipelineConfig;
use crate::error::{ConfigError, EmptyCorpusVisualization};
use crate::models::Corpus;
use base64::Engine;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write;
use tracing::{debug, info, instrument, warn};

const MIN_FONT: f32 = 10.0;
const GLYPH_WIDTH: f32 = 0.6;
const LINE_HEIGHT: f32 = 1.15;
const PADDING: f32 = 8.0;
const PALETTE: &[&str] = &["#1f4e79", "#2e75b6", "#c55a11", "#548235", "#7030a0", "#bf8f00"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedTerm {
    pub word: String,
    pub count: u32,
    /// `count / max_count`, in `(0, 1]`.
    pub weight: f32,
}

/// Rendered cloud plus the ranked terms it was drawn from.
#[derive(Debug, Clone, Serialize)]
pub struct Visualization {
    pub width: u32,
    pub height: u32,
    pub svg: String,
    /// Up to `top_terms` words, heaviest first.
    pub top_terms: Vec<String>,
    pub weights: Vec<WeightedTerm>,
    /// Set only on the blank canvas substituted for an empty corpus.
    pub placeholder: bool,
}

impl Visualization {
    /// Blank canvas used when the corpus has no text.
    pub fn placeholder(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            svg: render_svg(&[], width, height),
            top_terms: Vec::new(),
            weights: Vec::new(),
            placeholder: true,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// `data:` URI for embedding the artifact in an `<img>` tag.
    pub fn data_uri(&self) -> String {
        format!(
            "data:image/svg+xml;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(self.svg.as_bytes())
        )
    }
}

#[derive(Debug, Clone)]
pub struct FrequencyVisualizer {
    filter: WordFilter,
    width: u32,
    height: u32,
    top_terms: usize,
}

impl FrequencyVisualizer {
    pub fn new(filter: WordFilter, width: u32, height: u32, top_terms: usize) -> Self {
        Self {
            filter,
            width,
            height,
            top_terms,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            WordFilter::from_config(config)?,
            config.canvas_width,
            config.canvas_height,
            config.top_terms,
        ))
    }

    /// Ranked weights for `text`, heaviest first, ties alphabetical.
    pub fn weigh(&self, text: &str) -> Vec<WeightedTerm> {
        let lowered = text.to_lowercase();
        let mut bag: HashMap<&str, u32> = HashMap::new();
        for word in self.filter.words(&lowered) {
            *bag.entry(word).or_insert(0) += 1;
        }
        let Some(max) = bag.values().copied().max() else {
            return Vec::new();
        };

        let mut counts: Vec<(&str, u32)> = bag.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        counts
            .into_iter()
            .map(|(word, count)| WeightedTerm {
                word: word.to_string(),
                count,
                weight: count as f32 / max as f32,
            })
            .collect()
    }

    /// Render the word cloud for the concatenated content of `corpus`.
    ///
    /// Posts with blank content are skipped. Words are counted across the
    /// whole corpus, ranked by count (ties alphabetical) and cut to the
    /// configured number of top terms before layout.
    ///
    /// # Arguments
    ///
    /// * `corpus` - The posts whose content feeds the cloud
    ///
    /// # Returns
    ///
    /// The rendered [`Visualization`], or [`EmptyCorpusVisualization`] when
    /// no post contributes a single counted word.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let viz = visualizer.visualize(&corpus)?;
    /// assert_eq!(viz.weights[0].weight, 1.0);
    /// let html = format!(r#"<img src="{}">"#, viz.data_uri());
    /// ```
    #[instrument(level = "info", skip_all, fields(posts = corpus.len()))]
    pub fn visualize(&self, corpus: &Corpus) -> Result<Visualization, EmptyCorpusVisualization> {
        let text = corpus
            .iter()
            .map(|p| p.content.as_str())
            .filter(|c| !c.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            return Err(EmptyCorpusVisualization);
        }

        let mut weights = self.weigh(&text);
        if weights.is_empty() {
            return Err(EmptyCorpusVisualization);
        }
        weights.truncate(self.top_terms);

        let svg = render_svg(&weights, self.width, self.height);
        let top_terms = weights.iter().map(|t| t.word.clone()).collect::<Vec<_>>();
        info!(
            terms = top_terms.len(),
            svg_bytes = svg.len(),
            "Built word cloud"
        );
        debug!(top = ?top_terms.iter().take(10).collect::<Vec<_>>(), "Top terms");

        Ok(Visualization {
            width: self.width,
            height: self.height,
            svg,
            top_terms,
            weights,
            placeholder: false,
        })
    }

    /// Like [`visualize`](Self::visualize), but an empty corpus yields a
    /// placeholder instead of an error.
    pub fn visualize_or_placeholder(&self, corpus: &Corpus) -> Visualization {
        match self.visualize(corpus) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Substituting placeholder word cloud");
                Visualization::placeholder(self.width, self.height)
            }
        }
    }
}

fn render_svg(terms: &[WeightedTerm], width: u32, height: u32) -> String {
    let (w, h) = (width as f32, height as f32);
    let max_font = (h / 5.0).max(MIN_FONT);
    let mut body = String::new();

    let mut x = PADDING;
    let mut baseline = PADDING;
    let mut row_height = 0.0f32;
    let mut placed = 0usize;

    for (i, term) in terms.iter().enumerate() {
        let size = MIN_FONT + (max_font - MIN_FONT) * term.weight;
        let text_width = term.word.chars().count() as f32 * size * GLYPH_WIDTH;
        if text_width > w - 2.0 * PADDING {
            continue;
        }
        if x + text_width > w - PADDING {
            x = PADDING;
            baseline += row_height;
            row_height = 0.0;
        }
        if row_height == 0.0 {
            if baseline + size * LINE_HEIGHT > h - PADDING {
                break;
            }
            row_height = size * LINE_HEIGHT;
        }

        let _ = writeln!(
            body,
            r#"  <text x="{:.1}" y="{:.1}" font-size="{:.1}" fill="{}">{}</text>"#,
            x,
            baseline + size,
            size,
            PALETTE[i % PALETTE.len()],
            quick_xml::escape::escape(term.word.as_str())
        );
        x += text_width + size * 0.5;
        placed += 1;
    }
    debug!(placed, total = terms.len(), "Laid out word cloud");

    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" font-family=\"sans-serif\">\n  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n{body}</svg>\n"
    )
}
