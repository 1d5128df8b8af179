use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use dashboard::DashboardView;

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

/// Renders a dashboard view as terminal tables, one section per dashboard panel.
pub fn render_view(view: &DashboardView) -> String {
    let mut out = String::new();
    let query = &view.query;
    out.push_str(&format!(
        "Sales from {} to {} | Locations: {} | Categories: {}\n\n",
        query.start,
        query.end,
        query.locations.join(", "),
        query.categories.join(", ")
    ));

    let mut kpis = new_table(&["KPI", "Value"]);
    for (label, value) in view.kpis.labelled() {
        kpis.add_row(vec![label.to_string(), value.to_string()]);
    }
    out.push_str(&format!("{kpis}\n\n"));

    let mut summary = new_table(&[
        "Product",
        "Category",
        "Current Stock",
        "Reorder Level",
        "Profit",
        "Stock Status",
    ]);
    for row in &view.product_summary {
        summary.add_row(vec![
            row.product_name.clone(),
            row.category.clone(),
            row.current_stock.to_string(),
            row.reorder_level.to_string(),
            row.profit.round_dp(2).to_string(),
            row.stock_status.to_string(),
        ]);
    }
    out.push_str(&format!("Product Summary\n{summary}\n\n"));

    if view.stock_issues.is_empty() {
        out.push_str("No stock issues.\n\n");
    } else {
        let mut issues = new_table(&[
            "Product",
            "Category",
            "Current Stock",
            "Reorder Level",
            "Stock Status",
            "Suggested Reorder",
        ]);
        for row in &view.stock_issues {
            issues.add_row(vec![
                row.product_name.clone(),
                row.category.clone(),
                row.current_stock.to_string(),
                row.reorder_level.to_string(),
                row.stock_status.to_string(),
                row.suggested_reorder.to_string(),
            ]);
        }
        out.push_str(&format!("Stock Issues\n{issues}\n\n"));
    }

    out.push_str("Recommendations\n");
    for recommendation in &view.recommendations {
        out.push_str(&format!("- {}: {}\n", recommendation.title, recommendation.detail));
    }
    out
}
