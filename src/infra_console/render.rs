use crate::application_port::SalesReport;
use crate::domain_model::*;
use std::fmt::Write;

// Plain fixed-width tables; the console has no styling layer.
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let line = |cells: &[String], out: &mut String| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect();
        let _ = writeln!(out, "{}", padded.join("  ").trim_end());
    };

    let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    line(&headers, &mut out);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    line(&rule, &mut out);
    for row in rows {
        line(row, &mut out);
    }
    out
}

pub fn render_categories(categories: &[Category]) -> String {
    let rows: Vec<Vec<String>> = categories
        .iter()
        .map(|c| vec![c.id.to_string(), c.name.clone()])
        .collect();
    table(&["ID", "NAME"], &rows)
}

pub fn render_products(products: &[Product]) -> String {
    let rows: Vec<Vec<String>> = products
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.name.clone(),
                format!("{:.2}", p.price),
                p.category_id.to_string(),
                p.colors.join(","),
                p.sizes.join(","),
            ]
        })
        .collect();
    table(&["ID", "NAME", "PRICE", "CATEGORY", "COLORS", "SIZES"], &rows)
}

pub fn render_users(users: &[User]) -> String {
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| {
            vec![
                u.id.to_string(),
                u.display_name(),
                u.email.clone(),
                u.role.to_string(),
            ]
        })
        .collect();
    table(&["ID", "NAME", "EMAIL", "ROLE"], &rows)
}

pub fn render_sales(report: &SalesReport) -> String {
    let rows: Vec<Vec<String>> = report
        .points
        .iter()
        .map(|p| vec![p.time_label.to_string(), p.value(report.metric).to_string()])
        .collect();
    let mut out = format!("{} / {}\n", report.range, report.metric.label());
    out.push_str(&table(&["PERIOD", "VALUE"], &rows));
    out.push('\n');
    for (metric, total) in &report.totals {
        let _ = writeln!(out, "{:<10} {} {}", metric.label(), total, metric.unit());
    }
    out
}
