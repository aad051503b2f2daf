//! Horizontal ASCII bar charts.

/// Appearance of a bar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartStyle {
    /// Columns used by the longest bar.
    pub width: usize,
    /// Character the bars are drawn with.
    pub fill: char,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 40,
            fill: '#',
        }
    }
}

/// One row of a bar chart.
#[derive(Debug, Clone)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    /// Text printed after the bar.
    pub annotation: String,
}

/// Renders bars scaled so the largest value spans `style.width` columns.
///
/// Labels are right-aligned to the widest label. Zero and negative values
/// get an empty bar.
pub fn render_bar_chart(bars: &[Bar], style: &ChartStyle) -> String {
    let label_width = bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
    let max = bars.iter().map(|b| b.value).fold(0.0, f64::max);

    let mut out = String::new();
    for bar in bars {
        let len = bar_length(bar.value, max, style.width);
        let filled: String = std::iter::repeat(style.fill).take(len).collect();
        out.push_str(&format!(
            "{:>lw$} | {:<w$} {}\n",
            bar.label,
            filled,
            bar.annotation,
            lw = label_width,
            w = style.width,
        ));
    }
    out
}

fn bar_length(value: f64, max: f64, width: usize) -> usize {
    if max <= 0.0 || value <= 0.0 || !value.is_finite() {
        return 0;
    }
    ((value / max) * width as f64).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(label: &str, value: f64) -> Bar {
        Bar {
            label: label.to_string(),
            value,
            annotation: value.to_string(),
        }
    }

    #[test]
    fn test_bar_length_scaling() {
        assert_eq!(bar_length(10.0, 10.0, 40), 40);
        assert_eq!(bar_length(5.0, 10.0, 40), 20);
        assert_eq!(bar_length(0.0, 10.0, 40), 0);
        assert_eq!(bar_length(3.0, 0.0, 40), 0);
    }

    #[test]
    fn test_render_bar_chart() {
        let style = ChartStyle {
            width: 4,
            fill: '*',
        };
        let chart = render_bar_chart(&[bar("Heads", 2.0), bar("Tails", 4.0)], &style);
        let lines: Vec<&str> = chart.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Heads | **   2");
        assert_eq!(lines[1], "Tails | **** 4");
    }

    #[test]
    fn test_labels_right_aligned() {
        let chart = render_bar_chart(&[bar("1", 1.0), bar("10", 1.0)], &ChartStyle::default());
        assert!(chart.starts_with(" 1 | "));
    }

    #[test]
    fn test_empty_chart() {
        assert_eq!(render_bar_chart(&[], &ChartStyle::default()), "");
    }
}
