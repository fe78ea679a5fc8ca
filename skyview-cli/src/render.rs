use chrono::DateTime;
use skyview_core::{ConditionIcon, TemperatureUnit, Theme, WeatherSnapshot};

fn rule(theme: Theme) -> &'static str {
    match theme {
        Theme::Dark => "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━",
        Theme::Light => "────────────────────────────────────────",
    }
}

fn with_icon(condition: &str) -> String {
    format!("{} {}", ConditionIcon::from_description(condition).glyph(), condition)
}

/// Current conditions followed by the 5-day outlook.
pub fn snapshot(snapshot: &WeatherSnapshot, unit: TemperatureUnit, theme: Theme) -> String {
    let current = &snapshot.current;
    let mut lines = vec![
        current.location_label.to_string(),
        rule(theme).to_string(),
        format!("  {}", with_icon(&current.condition_text)),
        format!("  Temperature  {}", unit.format(current.temperature_c)),
        format!("  Humidity     {:.0}%", current.humidity_percent),
        format!("  Wind         {:.1} m/s", current.wind_speed_mps),
    ];

    let outlook = snapshot.outlook();
    if !outlook.is_empty() {
        lines.push(String::new());
        lines.push(format!("{}-day outlook", outlook.len()));
        lines.push(rule(theme).to_string());
        lines.extend(outlook.iter().map(|day| {
            let date = DateTime::from_timestamp(day.epoch_seconds, 0)
                .map(|d| d.format("%a %d %b").to_string())
                .unwrap_or_else(|| day.epoch_seconds.to_string());
            format!(
                "  {:<12} {:<32} {} / {}",
                date,
                with_icon(&day.condition_text),
                unit.format(day.temp_max_c),
                unit.format(day.temp_min_c),
            )
        }));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn history(entries: &[String]) -> String {
    if entries.is_empty() {
        return "No recent searches.\n".to_string();
    }

    entries
        .iter()
        .enumerate()
        .map(|(i, label)| format!("{:>2}. {}\n", i + 1, label))
        .collect()
}
