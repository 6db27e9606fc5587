use costwatch_core::domain::recommendation::RecommendationSummary;
use costwatch_core::render::format_currency;

/// Plain-text listing of the latest report, one numbered line per recommendation.
/// Each line carries the index, resource and action that `execute` expects.
pub fn recommendations_text(summary: &RecommendationSummary) -> String {
    let total = summary
        .savings()
        .map(format_currency)
        .unwrap_or_else(|| "-".to_string());
    let mut out = format!("Total potential savings: {total}/month\n");
    if let Some(ts) = &summary.timestamp {
        out.push_str(&format!("Report generated: {ts}\n"));
    }

    if summary.recommendations.is_empty() {
        out.push_str("No recommendations in the latest report.\n");
        return out;
    }

    for (index, rec) in summary.recommendations.iter().enumerate() {
        let savings = rec
            .monthly_savings
            .map(|s| format!("{}/mo", format_currency(s)))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "[{index}] {severity:<6} {kind:<18} {region:<15} {resource:<22} {action:<20} {savings}\n",
            severity = rec.severity,
            kind = rec.kind,
            region = rec.region,
            resource = rec.resource_id,
            action = rec.action,
        ));
        let description = rec.description();
        if !description.is_empty() {
            out.push_str(&format!("      {description}\n"));
        }
    }
    out
}
