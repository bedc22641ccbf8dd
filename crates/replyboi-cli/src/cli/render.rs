//! # Rendering
//!
//! Every printer has a `format_*` twin that returns the text, so output can be
//! tested without a terminal. Styling goes through [`STYLES`]; `console`
//! drops the escape codes when stdout is not a terminal.

use super::styles::STYLES;
use replyboi::commands::{CmdMessage, MessageLevel};
use replyboi::display::DataView;
use replyboi::notify::{BroadcastReport, DeliveryOutcome};

const BAR_WIDTH: u32 = 20;

pub fn format_messages(messages: &[CmdMessage]) -> String {
    let mut out = String::new();
    for message in messages {
        let style = match message.level {
            MessageLevel::Info => &STYLES.muted,
            MessageLevel::Success => &STYLES.success,
            MessageLevel::Warning => &STYLES.warning,
            MessageLevel::Error => &STYLES.error,
        };
        out.push_str(&format!("{}\n", style.apply_to(&message.content)));
    }
    out
}

pub fn print_messages(messages: &[CmdMessage]) {
    print!("{}", format_messages(messages));
}

fn progress_bar(count: u32, goal: u32) -> String {
    let filled = if goal == 0 {
        BAR_WIDTH
    } else {
        (u64::from(count) * u64::from(BAR_WIDTH) / u64::from(goal)).min(u64::from(BAR_WIDTH)) as u32
    };
    format!(
        "{}{}",
        "█".repeat(filled as usize),
        "░".repeat((BAR_WIDTH - filled) as usize)
    )
}

pub fn format_status(view: &DataView, rollover_hour: u8) -> String {
    let count_style = if view.goal_met() {
        &STYLES.goal_met
    } else {
        &STYLES.count
    };
    let mut out = String::new();
    out.push_str(&format!(
        "{}  {}  {}\n",
        STYLES.label.apply_to("Today "),
        count_style.apply_to(format!("{}/{}", view.today, view.goal)),
        progress_bar(view.today, view.goal)
    ));
    if let Some(day) = view.date {
        out.push_str(&format!(
            "{}  {} {}\n",
            STYLES.label.apply_to("Day   "),
            day,
            STYLES
                .muted
                .apply_to(format!("(next day starts at {:02}:00)", rollover_hour))
        ));
    }
    let streak = view.streak();
    if streak > 0 {
        out.push_str(&format!(
            "{}  {} day{}\n",
            STYLES.label.apply_to("Streak"),
            streak,
            if streak == 1 { "" } else { "s" }
        ));
    }
    out
}

pub fn print_status(view: &DataView, rollover_hour: u8) {
    print!("{}", format_status(view, rollover_hour));
}

pub fn format_history(view: &DataView) -> String {
    if view.history.is_empty() {
        return format!("{}\n", STYLES.muted.apply_to("No history yet."));
    }
    let mut out = String::new();
    for entry in &view.history {
        let (style, mark) = if entry.met_goal {
            (&STYLES.goal_met, "✓")
        } else {
            (&STYLES.goal_missed, " ")
        };
        out.push_str(&format!(
            "{:<12} {:>9}  {}\n",
            entry.label,
            style.apply_to(format!("{}/{}", entry.count, entry.goal)),
            style.apply_to(mark)
        ));
    }
    out
}

pub fn print_history(view: &DataView) {
    print!("{}", format_history(view));
}

pub fn format_broadcast(report: &BroadcastReport) -> String {
    let mut out = String::new();
    for target in &report.outcomes {
        let (style, how) = match target.outcome {
            DeliveryOutcome::Delivered => (&STYLES.muted, "reset delivered"),
            DeliveryOutcome::FellBack => (&STYLES.muted, "not loaded, mirror zeroed directly"),
            DeliveryOutcome::Unreachable => (&STYLES.warning, "unreachable"),
        };
        out.push_str(&format!(
            "{}\n",
            style.apply_to(format!("mirror {}: {}", target.target, how))
        ));
    }
    out
}

pub fn print_broadcast(report: &BroadcastReport) {
    print!("{}", format_broadcast(report));
}
