//! Server-rendered dashboard pages.
//!
//! - `dashboard`: the metric cards, region summary, and scan controls, built
//!   from the element state the controller maintains.
//! - `recommendations`: the latest report as a table with execute buttons.
//!
//! Both pages reload themselves so timer-driven updates (periodic refresh,
//! status expiry) become visible without client-side script.

mod css;

use costwatch_core::controller::{IDLE_LABEL, VIEW_RECOMMENDATIONS_LABEL};
use costwatch_core::domain::recommendation::RecommendationSummary;
use costwatch_core::domain::reply::Reply;
use costwatch_core::render::format_currency;
use costwatch_core::view::{ElementId, MemoryView, View};
use v_htmlescape::escape;

const PLACEHOLDER: &str = "--";

pub fn dashboard(view: &MemoryView, refresh_secs: u64) -> String {
    let text = |id: ElementId, fallback: &str| {
        escape(view.text(id).filter(|s| !s.is_empty()).unwrap_or(fallback)).to_string()
    };

    let regions = view
        .html(ElementId::RegionsSummary)
        .map(str::to_string)
        .unwrap_or_else(|| text(ElementId::RegionsSummary, ""));

    let trigger_disabled = if view.is_disabled(ElementId::TriggerScan) {
        " disabled"
    } else {
        ""
    };

    let body = format!(
        r#"
    <div class="container">
        <header>
            <h1>AWS Cost Optimizer</h1>
            <div>
                <form method="post" action="/trigger-scan">
                    <button class="btn" type="submit" id="{trigger_id}"{trigger_disabled}>{trigger_label}</button>
                </form>
                <form method="get" action="/recommendations">
                    <button class="btn" type="submit" id="{recs_id}">{recs_label}</button>
                </form>
            </div>
        </header>

        {status}

        <div class="metrics">
            <div class="metric-card">
                <div class="metric-label">Total EC2 Instances</div>
                <div class="metric-value" id="{total_id}">{total}</div>
            </div>
            <div class="metric-card">
                <div class="metric-label">Idle EC2 Instances</div>
                <div class="metric-value" id="{idle_id}">{idle}</div>
            </div>
            <div class="metric-card">
                <div class="metric-label">Unattached EBS Volumes</div>
                <div class="metric-value" id="{ebs_id}">{ebs}</div>
            </div>
            <div class="metric-card">
                <div class="metric-label">Potential Monthly Savings</div>
                <div class="metric-value" id="{savings_id}">{savings}</div>
            </div>
        </div>

        <div class="scan-time" id="{scan_time_id}">{scan_time}</div>

        <div class="panel">
            <h3>Resources by Region</h3>
            <div id="{regions_id}">{regions}</div>
        </div>
    </div>
"#,
        trigger_id = ElementId::TriggerScan,
        trigger_label = text(ElementId::TriggerScan, IDLE_LABEL),
        recs_id = ElementId::ViewRecommendations,
        recs_label = text(ElementId::ViewRecommendations, VIEW_RECOMMENDATIONS_LABEL),
        status = status_banner(view),
        total_id = ElementId::TotalEc2,
        total = text(ElementId::TotalEc2, PLACEHOLDER),
        idle_id = ElementId::IdleEc2,
        idle = text(ElementId::IdleEc2, PLACEHOLDER),
        ebs_id = ElementId::UnattachedEbs,
        ebs = text(ElementId::UnattachedEbs, PLACEHOLDER),
        savings_id = ElementId::PotentialSavings,
        savings = text(ElementId::PotentialSavings, "$--"),
        scan_time_id = ElementId::ScanTime,
        scan_time = text(ElementId::ScanTime, "Last scan: --"),
        regions_id = ElementId::RegionsSummary,
    );

    layout("AWS Cost Optimizer", refresh_secs, &body)
}

/// The recommendations page. `Err` is a failure to reach the backend.
pub fn recommendations(
    latest: &anyhow::Result<Reply<RecommendationSummary>>,
    view: &MemoryView,
    refresh_secs: u64,
) -> String {
    let content = match latest {
        Ok(Reply::Ready(summary)) => recommendations_table(summary),
        Ok(Reply::Unavailable(reason)) => {
            format!(r#"<p class="empty">{}</p>"#, escape(reason))
        }
        Err(_) => r#"<p class="empty">Error loading recommendations</p>"#.to_string(),
    };

    let body = format!(
        r#"
    <div class="container">
        <header>
            <h1>Recommendations</h1>
            <form method="get" action="/">
                <button class="btn" type="submit">Back to Dashboard</button>
            </form>
        </header>

        {status}

        <div class="panel">
            {content}
        </div>
    </div>
"#,
        status = status_banner(view),
    );

    layout("Recommendations", refresh_secs, &body)
}

fn recommendations_table(summary: &RecommendationSummary) -> String {
    let total = summary
        .savings()
        .map(format_currency)
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let mut html = format!(
        r#"<h3>Total potential savings: <span id="total-potential-savings">{total}</span>/month</h3>"#
    );

    if summary.recommendations.is_empty() {
        html.push_str(r#"<p class="empty">No recommendations in the latest report.</p>"#);
        return html;
    }

    html.push_str(
        "<table><thead><tr><th>Type</th><th>Severity</th><th>Region</th><th>Resource</th>\
         <th>Issue</th><th>Action</th><th>Monthly Savings</th><th></th></tr></thead><tbody>",
    );
    for (index, rec) in summary.recommendations.iter().enumerate() {
        let savings = rec
            .monthly_savings
            .map(format_currency)
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        html.push_str(&format!(
            r#"<tr class="recommendation"><td>{kind}</td><td class="severity-{severity}">{severity}</td><td>{region}</td><td>{resource}</td><td>{issue}</td><td>{action}</td><td>{savings}</td><td><form method="post" action="/recommendations/execute"><input type="hidden" name="index" value="{index}"><input type="hidden" name="resource_id" value="{resource}"><input type="hidden" name="action" value="{action}"><button class="btn" type="submit">Execute</button></form></td></tr>"#,
            kind = escape(&rec.kind),
            severity = escape(&rec.severity),
            region = escape(&rec.region),
            resource = escape(&rec.resource_id),
            issue = escape(rec.description()),
            action = escape(&rec.action),
        ));
    }
    html.push_str("</tbody></table>");
    html
}

fn status_banner(view: &MemoryView) -> String {
    let class = view
        .class(ElementId::StatusMessage)
        .filter(|c| !c.is_empty())
        .unwrap_or("status");
    format!(
        r#"<div id="{id}" class="{class}">{text}</div>"#,
        id = ElementId::StatusMessage,
        class = escape(class),
        text = escape(view.text(ElementId::StatusMessage).unwrap_or("")),
    )
}

fn layout(title: &str, refresh_secs: u64, body: &str) -> String {
    let refresh = if refresh_secs > 0 {
        format!(r#"<meta http-equiv="refresh" content="{refresh_secs}">"#)
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    {refresh}
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
{body}
</body>
</html>"#,
        css = css::STYLES,
    )
}
