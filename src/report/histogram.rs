//! SVG histogram of missed-match scores.
//!
//! Bin width follows Scott's rule, `(24·√π / n)^(1/3) · σ`, over the range of
//! the scores.

use std::path::{Path, PathBuf};

use crate::matching::summary::MissedScores;
use crate::report::ReportError;

const MAX_BINS: usize = 1_000;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 60.0;

pub const TITLE: &str = "Scores of Missed Matches";
pub const X_LABEL: &str = "Score";
pub const Y_LABEL: &str = "Number of Missed Matches";

/// One histogram bar covering `[lower, upper)`; the last bar also includes `upper`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

#[allow(clippy::cast_precision_loss)]
fn as_f64(n: usize) -> f64 {
    n as f64
}

impl Histogram {
    /// Bin `scores` using Scott's rule. Returns `None` for no scores.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn scott(scores: &[u64]) -> Option<Self> {
        let values: Vec<f64> = scores.iter().map(|&s| s as f64).collect();
        let n = as_f64(values.len());
        let mut first = values.iter().copied().reduce(f64::min)?;
        let mut last = values.iter().copied().reduce(f64::max)?;

        if (last - first).abs() < f64::EPSILON {
            first -= 0.5;
            last += 0.5;
        }

        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let width = (24.0 * std::f64::consts::PI.sqrt() / n).cbrt() * variance.sqrt();

        let bin_count = if width > 0.0 {
            (((last - first) / width).ceil() as usize).clamp(1, MAX_BINS)
        } else {
            1
        };

        let step = (last - first) / as_f64(bin_count);
        let mut bins: Vec<Bin> = (0..bin_count)
            .map(|i| Bin {
                lower: first + step * as_f64(i),
                upper: first + step * as_f64(i + 1),
                count: 0,
            })
            .collect();

        for value in values {
            let index = (((value - first) / step) as usize).min(bin_count - 1);
            bins[index].count += 1;
        }

        Some(Self { bins })
    }

    #[must_use]
    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }

    /// Render as a standalone SVG document.
    #[must_use]
    pub fn to_svg(&self, title: &str, x_label: &str, y_label: &str) -> String {
        let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let max_count = as_f64(self.max_count().max(1));
        let bar_width = plot_width / as_f64(self.bins.len().max(1));
        let baseline = MARGIN_TOP + plot_height;

        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" viewBox=\"0 0 {WIDTH} {HEIGHT}\">\n"
        ));
        svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"16\">{}</text>\n",
            WIDTH / 2.0,
            MARGIN_TOP / 2.0 + 6.0,
            escape(title)
        ));

        for (i, bin) in self.bins.iter().enumerate() {
            let height = as_f64(bin.count) / max_count * plot_height;
            svg.push_str(&format!(
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"steelblue\" stroke=\"black\" stroke-width=\"0.5\"><title>{:.1}-{:.1}: {}</title></rect>\n",
                MARGIN_LEFT + bar_width * as_f64(i),
                baseline - height,
                bar_width,
                height,
                bin.lower,
                bin.upper,
                bin.count
            ));
        }

        // Axes
        svg.push_str(&format!(
            "<line x1=\"{MARGIN_LEFT}\" y1=\"{baseline}\" x2=\"{}\" y2=\"{baseline}\" stroke=\"black\"/>\n",
            MARGIN_LEFT + plot_width
        ));
        svg.push_str(&format!(
            "<line x1=\"{MARGIN_LEFT}\" y1=\"{MARGIN_TOP}\" x2=\"{MARGIN_LEFT}\" y2=\"{baseline}\" stroke=\"black\"/>\n"
        ));

        if let (Some(first), Some(last)) = (self.bins.first(), self.bins.last()) {
            let label_y = baseline + 18.0;
            svg.push_str(&format!(
                "<text x=\"{MARGIN_LEFT}\" y=\"{label_y}\" text-anchor=\"middle\" font-size=\"12\">{:.0}</text>\n",
                first.lower
            ));
            svg.push_str(&format!(
                "<text x=\"{}\" y=\"{label_y}\" text-anchor=\"middle\" font-size=\"12\">{:.0}</text>\n",
                MARGIN_LEFT + plot_width,
                last.upper
            ));
        }
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{MARGIN_TOP}\" text-anchor=\"end\" font-size=\"12\">{}</text>\n",
            MARGIN_LEFT - 6.0,
            self.max_count()
        ));
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"14\">{}</text>\n",
            MARGIN_LEFT + plot_width / 2.0,
            HEIGHT - 15.0,
            escape(x_label)
        ));
        svg.push_str(&format!(
            "<text x=\"20\" y=\"{0}\" text-anchor=\"middle\" font-size=\"14\" transform=\"rotate(-90 20 {0})\">{1}</text>\n",
            MARGIN_TOP + plot_height / 2.0,
            escape(y_label)
        ));
        svg.push_str("</svg>\n");
        svg
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// File name of the histogram for a dataset
#[must_use]
pub fn histogram_file_name(dataset: &str) -> String {
    format!("hist-{dataset}.svg")
}

/// Write the missed-score histogram for `dataset` into `dir`.
///
/// Returns `None` without writing anything when there are no missed scores.
///
/// # Errors
///
/// Returns `ReportError::Io` if the file cannot be written.
pub fn write_histogram(
    dir: &Path,
    dataset: &str,
    scores: &MissedScores,
) -> Result<Option<PathBuf>, ReportError> {
    let Some(histogram) = Histogram::scott(scores.descending()) else {
        return Ok(None);
    };

    let path = dir.join(histogram_file_name(dataset));
    std::fs::write(&path, histogram.to_svg(TITLE, X_LABEL, Y_LABEL)).map_err(|source| {
        ReportError::Io {
            path: path.clone(),
            source,
        }
    })?;
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scott_counts_every_score() {
        let scores = [181, 185, 190, 200, 210, 250, 300, 181, 182, 183];
        let histogram = Histogram::scott(&scores).unwrap();

        let total: usize = histogram.bins.iter().map(|b| b.count).sum();
        assert_eq!(total, scores.len());
        assert_eq!(histogram.bins.first().unwrap().lower, 181.0);
        assert!((histogram.bins.last().unwrap().upper - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_scott_single_value() {
        let histogram = Histogram::scott(&[200, 200, 200]).unwrap();
        assert_eq!(histogram.bins.len(), 1);
        assert_eq!(histogram.bins[0].count, 3);
        assert_eq!(histogram.bins[0].lower, 199.5);
        assert_eq!(histogram.bins[0].upper, 200.5);
    }

    #[test]
    fn test_scott_empty() {
        assert!(Histogram::scott(&[]).is_none());
    }

    #[test]
    fn test_svg_has_labels_and_bars() {
        let histogram = Histogram::scott(&[181, 190, 250]).unwrap();
        let svg = histogram.to_svg(TITLE, X_LABEL, "A < B");

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(TITLE));
        assert!(svg.contains("A &lt; B"));
        assert_eq!(svg.matches("fill=\"steelblue\"").count(), histogram.bins.len());
    }

    #[test]
    fn test_write_histogram() {
        let dir = tempfile::tempdir().unwrap();

        let written = write_histogram(dir.path(), "clusters", &MissedScores::new([181, 200])).unwrap();
        assert_eq!(written, Some(dir.path().join("hist-clusters.svg")));

        let skipped = write_histogram(dir.path(), "empty", &MissedScores::default()).unwrap();
        assert_eq!(skipped, None);
        assert!(!dir.path().join("hist-empty.svg").exists());
    }
}
