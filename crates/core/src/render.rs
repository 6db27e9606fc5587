use crate::domain::scan::RegionDetail;
use indexmap::IndexMap;
use v_htmlescape::escape;

const GRID_OPEN: &str = r#"<div class="regions-grid" style="display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 15px; margin-top: 20px;">"#;

/// Dollar amount with exactly two fraction digits.
pub fn format_currency(amount: f64) -> String {
    format!("${amount:.2}")
}

/// One card per region, in the order the backend listed them.
pub fn region_summary_html(regions: &IndexMap<String, RegionDetail>) -> String {
    let mut html = String::from(GRID_OPEN);

    for (region, detail) in regions {
        let counts = detail.counts();
        html.push_str(&format!(
            r#"
            <div class="region-card" style="background: white; padding: 15px; border-radius: 10px; text-align: center;">
                <h4 style="color: #667eea; margin-bottom: 10px;">{}</h4>
                <p>EC2: {} | EBS: {} | RDS: {}</p>
            </div>
        "#,
            escape(region),
            counts.ec2,
            counts.ebs,
            counts.rds
        ));
    }

    html.push_str("</div>");
    html
}
