//! 终端渲染

use crate::dashboard::TopicReport;
use crate::session::{BriefingKind, BriefingStatus, SessionState};
use crate::types::GeoPoint;
use crate::utils::text::sentence_caps;

/// 单个话题的新闻报告
pub fn render_topic_report(report: &TopicReport) -> String {
    let bundle = &report.bundle;
    let mut lines = vec![format!("## {}", sentence_caps(&bundle.name))];

    if !bundle.country.is_empty() {
        lines.push(format!("Country: {}", bundle.country));
    }
    lines.push(format!("Cases: {}", bundle.cases));
    lines.push(format!("Deaths: {}", bundle.deaths));
    if bundle.outbreak {
        lines.push("⚠️ Potential outbreak".to_string());
    }
    if let Some(pct) = report.negative_coverage_pct {
        lines.push(format!("{}% negative coverage", pct));
    }
    if !bundle.description.is_empty() {
        lines.push(String::new());
        lines.push(bundle.description.clone());
    }
    if let Some(impact) = &report.impact {
        lines.push(String::new());
        lines.push(format!("Impacts: {}", impact));
    }

    lines.push(String::new());
    lines.push("Reported locations:".to_string());
    lines.extend(report.locations.iter().map(render_location));

    lines.join("\n")
}

fn render_location(point: &GeoPoint) -> String {
    match (point.latitude, point.longitude) {
        (Some(latitude), Some(longitude)) => format!(
            "  • ({:.4}, {:.4}) weight={}",
            latitude, longitude, point.weight
        ),
        _ => format!("  • (unresolved) weight={}", point.weight),
    }
}

/// 各上下文的当前状态
pub fn render_session(session: &SessionState) -> String {
    let mut lines = vec![format!(
        "Session {} (started {})",
        session.id,
        session.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    )];

    for kind in [
        BriefingKind::Country,
        BriefingKind::News,
        BriefingKind::Comparison,
    ] {
        let briefing = session.briefing(kind);
        let status = match (briefing.status(), briefing.error()) {
            (BriefingStatus::NotRequested, _) => "not requested".to_string(),
            (BriefingStatus::Pending, _) => "pending".to_string(),
            (BriefingStatus::Available(_), None) => "available".to_string(),
            (BriefingStatus::Available(_), Some(error)) => {
                format!("available (last refresh failed: {})", error)
            }
            (BriefingStatus::Failed(error), _) => format!("failed ({})", error),
        };
        let chat = if session.chat_enabled(kind) {
            "chat enabled"
        } else {
            "chat locked"
        };
        lines.push(format!("  {:<10} {} / {}", kind.to_string(), status, chat));
    }

    let comparison = if session.comparison_unlocked() {
        "unlocked"
    } else {
        "locked"
    };
    lines.push(format!("  historical comparison: {}", comparison));

    lines.join("\n")
}
