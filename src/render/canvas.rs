use image::{Rgb, RgbImage};

use super::histogram::Histogram;
use crate::color::Style;

// Plot area insets inside a panel, in pixels.
const MARGIN_LEFT: u32 = 60;
const MARGIN_RIGHT: u32 = 24;
const MARGIN_TOP: u32 = 30;
const MARGIN_BOTTOM: u32 = 44;
const GRID_LINES: u32 = 5;
const TICK_LEN: u32 = 6;

/// Axis-aligned pixel rectangle, `x1`/`y1` exclusive.
#[derive(Debug, Clone, Copy)]
struct Rect {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

fn fill(img: &mut RgbImage, r: Rect, color: Rgb<u8>) {
    let x1 = r.x1.min(img.width());
    let y1 = r.y1.min(img.height());
    for y in r.y0..y1 {
        for x in r.x0..x1 {
            img.put_pixel(x, y, color);
        }
    }
}

fn stroke(img: &mut RgbImage, r: Rect, color: Rgb<u8>) {
    if r.x1 <= r.x0 || r.y1 <= r.y0 {
        return;
    }
    fill(img, Rect { y1: r.y0 + 1, ..r }, color);
    fill(img, Rect { y0: r.y1 - 1, ..r }, color);
    fill(img, Rect { x1: r.x0 + 1, ..r }, color);
    fill(img, Rect { x0: r.x1 - 1, ..r }, color);
}

/// Draw one histogram panel with its top-left corner at `(0, top)`.
pub fn draw_panel(
    img: &mut RgbImage,
    top: u32,
    width: u32,
    height: u32,
    hist: &Histogram,
    style: &Style,
) {
    let plot = Rect {
        x0: MARGIN_LEFT,
        y0: top + MARGIN_TOP,
        x1: width.saturating_sub(MARGIN_RIGHT),
        y1: top + height.saturating_sub(MARGIN_BOTTOM),
    };
    let plot_w = plot.x1.saturating_sub(plot.x0);
    let plot_h = plot.y1.saturating_sub(plot.y0);
    if plot_w == 0 || plot_h == 0 {
        return;
    }

    // Horizontal grid behind the bars.
    for i in 1..GRID_LINES {
        let y = plot.y1 - plot_h * i / GRID_LINES;
        fill(img, Rect { y0: y, y1: y + 1, ..plot }, style.grid);
    }

    // Leave 5% headroom above the tallest bar.
    let y_max = (hist.max_count() as f64 * 1.05).max(1.0);
    let n = hist.counts.len() as u32;
    for (i, &count) in hist.counts.iter().enumerate() {
        let i = i as u32;
        let x0 = plot.x0 + plot_w * i / n;
        let x1 = plot.x0 + plot_w * (i + 1) / n;
        let bar_h = ((count as f64 / y_max) * plot_h as f64).round() as u32;
        if bar_h == 0 {
            continue;
        }
        let bar = Rect {
            x0,
            y0: plot.y1 - bar_h,
            x1: x1 + 1,
            y1: plot.y1,
        };
        fill(img, bar, style.bar_fill);
        stroke(img, bar, style.bar_edge);
    }

    stroke(img, plot, style.axis);

    // Ticks below the x axis at every fifth bin edge.
    for i in (0..=n).step_by(5) {
        let x = (plot.x0 + plot_w * i / n).min(plot.x1 - 1);
        fill(
            img,
            Rect {
                x0: x,
                y0: plot.y1,
                x1: x + 1,
                y1: plot.y1 + TICK_LEN,
            },
            style.axis,
        );
    }
}
