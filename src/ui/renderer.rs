//! Plain-text list renderer.
//!
//! Turns a [`ListViewModel`] into terminal lines. Name filter matches are
//! emphasised with ANSI bold when `color` is set, and left alone otherwise.
//!
//! ```text
//! ⟳ refreshing
//!   #4  mapo tofu        ¥8   XueYi     420 kcal  4.5 (2 reviews)
//!   #9  seaweed soup     ¥2   XueYi       0 kcal  No reviews
//! — end of results —
//! ```

use crate::ui::viewmodel::{DishRow, EmptyState, ListViewModel};
use std::fmt::Write;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Renders the view model to a newline-terminated string.
#[must_use]
pub fn render(vm: &ListViewModel, color: bool) -> String {
    let mut out = String::new();

    if vm.refreshing {
        out.push_str("⟳ refreshing\n");
    }

    if vm.show_loading_indicator {
        out.push_str("loading…\n");
        return out;
    }

    if let Some(empty) = &vm.empty_state {
        render_empty_state(&mut out, empty);
        return out;
    }

    for row in &vm.rows {
        render_row(&mut out, row, color);
    }

    if vm.end_of_results {
        out.push_str("— end of results —\n");
    }
    out
}

fn render_empty_state(out: &mut String, empty: &EmptyState) {
    let _ = writeln!(out, "{}", empty.message);
    let _ = writeln!(out, "  {}", empty.subtitle);
}

fn render_row(out: &mut String, row: &DishRow, color: bool) {
    let name = highlighted(&row.name, &row.highlight_indices, color);
    let padding = 16usize.saturating_sub(row.name.chars().count());
    let _ = writeln!(
        out,
        "  #{:<3} {name}{:padding$} {:>4}  {:<9} {:>8}  {}",
        row.id, "", row.price_label, row.canteen_label, row.calorie_label, row.rating_label,
    );
}

/// Wraps every character at one of `indices` in bold.
fn highlighted(text: &str, indices: &[usize], color: bool) -> String {
    if !color || indices.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + indices.len() * (BOLD.len() + RESET.len()));
    for (i, ch) in text.chars().enumerate() {
        if indices.binary_search(&i).is_ok() {
            out.push_str(BOLD);
            out.push(ch);
            out.push_str(RESET);
        } else {
            out.push(ch);
        }
    }
    out
}
