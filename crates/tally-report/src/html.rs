//! # HTML Report Rendering
//!
//! Builds the daily and monthly report documents as strings. Rendering is
//! pure: callers pass the full transaction history and the selected date,
//! and get back a complete `<html>` document with an inline stylesheet.
//!
//! ## Layout
//! Both reports share the same skeleton:
//! - centered title and date line
//! - a summary box with the headline figures
//! - a detail table with a bold total row at the bottom
//!
//! Multi-item transactions collapse into one row per sale: the product
//! column lists every line as `Name (2x)` joined with commas, and the
//! quantity column shows the line count rather than a unit count.
//!
//! Amounts in the tables are revenue figures and exclude tips; tips get
//! their own summary line (daily) or column (monthly).

use chrono::{Datelike, NaiveDate};
use tally_core::aggregate::{self, daily_stats};
use tally_core::{Money, Transaction};

/// Shared inline stylesheet for both report flavors.
const REPORT_STYLE: &str = "\
body { font-family: 'Helvetica Neue', Helvetica, Arial, sans-serif; padding: 20px; }
h1 { text-align: center; color: #333; }
.summary { margin-bottom: 30px; border: 1px solid #ddd; padding: 15px; border-radius: 8px; }
table { width: 100%; border-collapse: collapse; margin-top: 20px; }
th, td { border: 1px solid #ddd; padding: 12px; text-align: left; }
th { background-color: #f2f2f7; color: #333; }
.total-row { font-weight: bold; background-color: #f9f9f9; }";

// =============================================================================
// Public API
// =============================================================================

/// Renders the daily sales report for `date`.
///
/// Filters `transactions` down to the selected day internally; passing the
/// full history is fine. A day with no sales still renders, with zero
/// figures and an empty table body before the total row.
pub fn day_report(transactions: &[Transaction], date: NaiveDate) -> String {
    let day: Vec<&Transaction> = aggregate::for_date(transactions, date).collect();
    let revenue = aggregate::revenue_cents(day.iter().copied());
    let tips = aggregate::tips_cents(day.iter().copied());

    let mut rows = String::new();
    for t in &day {
        rows.push_str(&transaction_row(t));
    }

    format!(
        "<html>\n<head>\n<style>\n{style}\n</style>\n</head>\n<body>\n\
         <h1>Daily Sales Report</h1>\n\
         <p style=\"text-align: center; color: #666;\">{date}</p>\n\
         <div class=\"summary\">\n\
         <p><strong>Total Revenue:</strong> {revenue}</p>\n\
         <p><strong>Total Tips:</strong> {tips}</p>\n\
         <p><strong>Transactions:</strong> {count}</p>\n\
         </div>\n\
         <table>\n<thead>\n<tr>\n\
         <th>Time</th>\n<th>Product</th>\n<th>Qty</th>\n<th>Payment</th>\n<th>Amount</th>\n\
         </tr>\n</thead>\n<tbody>\n\
         {rows}\
         <tr class=\"total-row\">\n\
         <td colspan=\"4\" style=\"text-align: right;\">Total</td>\n\
         <td>{revenue}</td>\n\
         </tr>\n\
         </tbody>\n</table>\n</body>\n</html>\n",
        style = REPORT_STYLE,
        date = long_date(date),
        revenue = Money::from_cents(revenue),
        tips = Money::from_cents(tips),
        count = day.len(),
        rows = rows,
    )
}

/// Renders the monthly sales report for the month containing `selected`.
///
/// One table row per active day, ascending; quiet days are omitted.
pub fn month_report(transactions: &[Transaction], selected: NaiveDate) -> String {
    let stats = daily_stats(transactions, selected);
    let total_revenue: i64 = stats.values().map(|s| s.revenue_cents).sum();

    let mut rows = String::new();
    for (date, day) in &stats {
        rows.push_str(&format!(
            "<tr>\n<td>{}</td>\n<td>{}</td>\n<td>{}</td>\n<td>{}</td>\n</tr>\n",
            date.format("%b %d"),
            day.count,
            Money::from_cents(day.tips_cents),
            Money::from_cents(day.revenue_cents),
        ));
    }

    format!(
        "<html>\n<head>\n<style>\n{style}\n</style>\n</head>\n<body>\n\
         <h1>Monthly Sales Report</h1>\n\
         <p style=\"text-align: center; color: #666;\">{month}</p>\n\
         <div class=\"summary\">\n\
         <p><strong>Total Revenue:</strong> {revenue}</p>\n\
         <p><strong>Active Days:</strong> {active}</p>\n\
         </div>\n\
         <table>\n<thead>\n<tr>\n\
         <th>Date</th>\n<th>Transactions</th>\n<th>Tips</th>\n<th>Revenue</th>\n\
         </tr>\n</thead>\n<tbody>\n\
         {rows}\
         <tr class=\"total-row\">\n\
         <td colspan=\"3\" style=\"text-align: right;\">Total Revenue</td>\n\
         <td>{revenue}</td>\n\
         </tr>\n\
         </tbody>\n</table>\n</body>\n</html>\n",
        style = REPORT_STYLE,
        month = selected.format("%B %Y"),
        revenue = Money::from_cents(total_revenue),
        active = stats.len(),
        rows = rows,
    )
}

/// File name for a day report: `2026-08-30.html`.
pub fn day_report_filename(date: NaiveDate) -> String {
    format!("{date}.html")
}

/// File name for a month report: `August-2026.html`.
pub fn month_report_filename(selected: NaiveDate) -> String {
    format!("{}.html", selected.format("%B-%Y"))
}

// =============================================================================
// Row Rendering
// =============================================================================

fn transaction_row(t: &Transaction) -> String {
    let time = t.timestamp.format("%H:%M");
    let payment = t.payment_method.label();

    if !t.items.is_empty() {
        let products = t
            .items
            .iter()
            .map(|i| format!("{} ({}x)", escape(&i.product_name), i.quantity))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "<tr>\n<td>{}</td>\n<td>{}</td>\n<td>{} items</td>\n<td>{}</td>\n<td>{}</td>\n</tr>\n",
            time,
            products,
            t.items.len(),
            payment,
            Money::from_cents(t.revenue_cents()),
        )
    } else {
        format!(
            "<tr>\n<td>{}</td>\n<td>{}</td>\n<td>{}</td>\n<td>{}</td>\n<td>{}</td>\n</tr>\n",
            time,
            escape(t.legacy_product_name.as_deref().unwrap_or("")),
            t.legacy_quantity.unwrap_or(0),
            payment,
            Money::from_cents(t.revenue_cents()),
        )
    }
}

/// Date line for the daily report header: `Sunday, August 30th, 2026`.
fn long_date(date: NaiveDate) -> String {
    format!(
        "{}, {} {}{}, {}",
        date.format("%A"),
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year(),
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    match day {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}

/// Minimal HTML escaping for user-entered product names.
fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
