//! # Rendering Module
//!
//! Turns a [`CmdResult`] into terminal output. Text mode prints aligned tables
//! (Unicode-aware widths) followed by colored messages; JSON mode prints the
//! whole result as one pretty-printed document.
//!
//! Rendering is split into `render_*` functions returning `String` and thin
//! `print_*` wrappers, so layout is testable without capturing stdout.

use chrono::NaiveDateTime;
use clinicapp::codec::encode_timestamp;
use clinicapp::commands::{CmdMessage, CmdResult, MessageLevel};
use clinicapp::error::{ClinicError, Result};
use clinicapp::model::{CaseFile, Center, ClinicalField, User};
use clinicapp::stats::CenterStats;
use colored::*;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::setup::OutputMode;

pub const NAME_WIDTH: usize = 28;
pub const TEXT_WIDTH: usize = 40;
const RULE: &str = "--------------------------------";

/// How case files in a result should be shown.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CaseView {
    Summary,
    Full,
}

pub fn print_result(result: &CmdResult, mode: OutputMode, view: CaseView) -> Result<()> {
    match mode {
        OutputMode::Json => println!("{}", render_json(result)?),
        OutputMode::Text => {
            let body = render_text(result, view);
            if !body.is_empty() {
                print!("{}", body);
            }
            print_messages(&result.messages);
        }
    }
    Ok(())
}

pub fn render_json(result: &CmdResult) -> Result<String> {
    serde_json::to_string_pretty(result).map_err(|e| ClinicError::Api(e.to_string()))
}

pub fn render_text(result: &CmdResult, view: CaseView) -> String {
    let mut out = String::new();
    if !result.centers.is_empty() {
        out.push_str(&render_centers(&result.centers));
    }
    if !result.users.is_empty() {
        out.push_str(&render_users(&result.users));
    }
    if !result.case_files.is_empty() {
        match view {
            CaseView::Summary => out.push_str(&render_case_list(&result.case_files)),
            CaseView::Full => {
                for (i, case) in result.case_files.iter().enumerate() {
                    if i > 0 {
                        out.push_str("\n================================\n\n");
                    }
                    out.push_str(&render_case_detail(case));
                }
            }
        }
    }
    if let Some(stats) = &result.stats {
        out.push_str(&render_stats(stats));
    }
    out
}

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

fn render_centers(centers: &[Center]) -> String {
    let mut out = String::new();
    for center in centers {
        out.push_str(&format!(
            "{} {} {}  {}{}\n",
            id_cell(center.id),
            fit(&center.name, NAME_WIDTH).bold(),
            fit(&center.address, TEXT_WIDTH),
            center.phone,
            archived_marker(center.active)
        ));
    }
    out
}

fn render_users(users: &[User]) -> String {
    let mut out = String::new();
    for user in users {
        out.push_str(&format!(
            "{} {} {} {:<13} center {}{}\n",
            id_cell(user.id),
            fit(&user.full_name(), NAME_WIDTH).bold(),
            fit(&user.email, NAME_WIDTH),
            user.role.to_string(),
            user.center_id,
            archived_marker(user.active)
        ));
    }
    out
}

fn render_case_list(cases: &[CaseFile]) -> String {
    let mut out = String::new();
    for case in cases {
        let diagnosis = if case.diagnosis.is_empty() {
            "[no diagnosis]".dimmed().to_string()
        } else {
            fit(&case.diagnosis, TEXT_WIDTH).bold().to_string()
        };
        out.push_str(&format!(
            "{} patient {:<5} doctor {:<5} {}  {}{}\n",
            id_cell(case.id),
            case.patient_id,
            case.doctor_id,
            diagnosis,
            timestamp(&case.created_at).dimmed(),
            archived_marker(case.active)
        ));
    }
    out
}

fn render_case_detail(case: &CaseFile) -> String {
    let mut out = format!(
        "{} {}{}\n",
        format!("Case file {}", case.id).yellow(),
        format!(
            "patient {} / doctor {} / center {}",
            case.patient_id, case.doctor_id, case.center_id
        )
        .bold(),
        archived_marker(case.active)
    );
    out.push_str(&format!(
        "{}\n",
        format!(
            "created {}  modified {}",
            timestamp(&case.created_at),
            timestamp(&case.modified_at)
        )
        .dimmed()
    ));
    out.push_str(RULE);
    out.push('\n');
    for field in ClinicalField::ALL {
        let value = case.field(field);
        out.push_str(&format!("{}:\n", field.label().bold()));
        if value.is_empty() {
            out.push_str(&format!("  {}\n", "[empty]".dimmed()));
        } else {
            out.push_str(&format!("  {}\n", value));
        }
    }
    out
}

fn render_stats(stats: &CenterStats) -> String {
    let title = format!("Center {} statistics", stats.center_id);
    let mut out = format!("{}\n{}\n", title.bold(), RULE);
    out.push_str(&format!("Users:          {}\n", stats.total_users));
    out.push_str(&format!("  Doctors:        {}\n", stats.doctors));
    out.push_str(&format!("  Patients:       {}\n", stats.patients));
    out.push_str(&format!("  Administrators: {}\n", stats.administrators));
    out.push_str(&format!("Case files:     {}\n", stats.case_files));
    out
}

fn id_cell(id: u64) -> ColoredString {
    format!("{:>4}.", id).yellow()
}

fn archived_marker(active: bool) -> String {
    if active {
        String::new()
    } else {
        format!("  {}", "(archived)".red())
    }
}

fn timestamp(ts: &NaiveDateTime) -> String {
    encode_timestamp(ts)
}

/// Pad or truncate `text` to exactly `width` display columns.
pub fn fit(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width <= width {
        return format!("{}{}", text, " ".repeat(width - text_width));
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width.saturating_sub(1) {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinicapp::model::Role;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn fit_pads_short_text() {
        assert_eq!(fit("abc", 5), "abc  ");
    }

    #[test]
    fn fit_truncates_with_ellipsis() {
        let out = fit("Clinica Central del Sur", 10);
        assert_eq!(out, "Clinica C…");
        assert_eq!(out.width(), 10);
    }

    #[test]
    fn fit_counts_wide_characters() {
        let out = fit("診療所診療所", 7);
        assert_eq!(out.width(), 7);
        assert!(out.contains('…'));
    }

    #[test]
    fn users_render_without_password() {
        plain();
        let mut user = User::new(
            "Ana".into(),
            "Lopez".into(),
            "a@x.com".into(),
            Role::Doctor,
            "hunter2".into(),
            1,
        );
        user.id = 7;
        let result = CmdResult::default().with_users(vec![user]);

        let text = render_text(&result, CaseView::Summary);
        assert!(text.contains("Ana Lopez"));
        assert!(text.contains("doctor"));
        assert!(!text.contains("hunter2"));

        let json = render_json(&result).unwrap();
        assert!(json.contains("\"email\": \"a@x.com\""));
        assert!(!json.contains("hunter2"));
    }

    #[test]
    fn full_case_view_lists_every_clinical_field() {
        plain();
        let mut case = CaseFile::new(9, 1, 1);
        case.id = 1;
        case.diagnosis = "Flu".into();
        let result = CmdResult::default().with_case_files(vec![case]);

        let text = render_text(&result, CaseView::Full);
        assert!(text.contains("Case file 1"));
        assert!(text.contains("Diagnosis:\n  Flu"));
        for field in ClinicalField::ALL {
            assert!(text.contains(field.label()));
        }
        assert_eq!(text.matches("[empty]").count(), 10);
    }

    #[test]
    fn archived_entities_are_marked() {
        plain();
        let mut center = Center::new("Sur".into(), "x".into(), "22223333".into());
        center.id = 2;
        center.active = false;
        let text = render_text(&CmdResult::default().with_centers(vec![center]), CaseView::Summary);
        assert!(text.contains("(archived)"));
    }

    #[test]
    fn stats_render_counts() {
        plain();
        let result = CmdResult {
            stats: Some(CenterStats {
                center_id: 3,
                total_users: 5,
                doctors: 2,
                patients: 2,
                administrators: 1,
                case_files: 4,
            }),
            ..Default::default()
        };
        let text = render_text(&result, CaseView::Summary);
        assert!(text.contains("Center 3 statistics"));
        assert!(text.contains("Case files:     4"));
    }

    #[test]
    fn json_omits_empty_sections() {
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::info("No centers registered."));
        let json = render_json(&result).unwrap();
        assert!(!json.contains("\"centers\""));
        assert!(json.contains("\"level\": \"info\""));
    }
}
