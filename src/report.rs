// src/report.rs
//! Text rendering of analysis and comparison results

use std::fmt::{self, Write};
use std::str::FromStr;

use crate::session::{AnalysisSnapshot, Session, Slot};
use crate::types::{AnalysisResult, ComparisonResult};
use crate::utils::{humanize_key, truncate_chars};

const BAR_WIDTH: usize = 30;
const SNIPPET_CHARS: usize = 400;
const TOP_WORDS_SHOWN: usize = 10;

// ===== Score bands =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl ScoreBand {
    /// Band for a 0-100 score: `>= 80`, `>= 60`, `>= 40`, else.
    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::Excellent
        } else if score >= 60.0 {
            ScoreBand::Good
        } else if score >= 40.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::NeedsImprovement
        }
    }

    /// Band for a per-skill confidence in `[0, 1]`.
    pub fn for_confidence(confidence: f64) -> Self {
        Self::for_score(clamp_percent(confidence * 100.0))
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::Fair => "Fair",
            ScoreBand::NeedsImprovement => "Needs Improvement",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "green",
            ScoreBand::Good => "amber",
            ScoreBand::Fair => "orange",
            ScoreBand::NeedsImprovement => "red",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ===== Tabs =====

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Overview,
    Skills,
    Ats,
    Content,
    Suggestions,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Overview,
        Tab::Skills,
        Tab::Ats,
        Tab::Content,
        Tab::Suggestions,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Skills => "Skills",
            Tab::Ats => "ATS",
            Tab::Content => "Content",
            Tab::Suggestions => "Suggestions",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "overview" => Ok(Tab::Overview),
            "skills" => Ok(Tab::Skills),
            "ats" => Ok(Tab::Ats),
            "content" => Ok(Tab::Content),
            "suggestions" => Ok(Tab::Suggestions),
            other => Err(format!(
                "unknown tab '{other}' (expected overview, skills, ats, content or suggestions)"
            )),
        }
    }
}

// ===== Primitives =====

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// `[#########---------------------]` for a 0-100 value. Out-of-range values
/// are clamped.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((clamp_percent(percent) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Bar, rounded value and band label on one line.
pub fn score_line(label: &str, score: f64) -> String {
    let band = ScoreBand::for_score(score);
    format!(
        "{:<14} {} {:>3}% {} ({})",
        label,
        progress_bar(score, BAR_WIDTH),
        clamp_percent(score).round() as i64,
        band.label(),
        band.color()
    )
}

// ===== Tabs =====

pub fn render_tab(result: &AnalysisResult, tab: Tab) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = match tab {
        Tab::Overview => write_overview(&mut out, result),
        Tab::Skills => write_skills(&mut out, result),
        Tab::Ats => write_ats(&mut out, result),
        Tab::Content => write_content(&mut out, result),
        Tab::Suggestions => write_suggestions(&mut out, result),
    };
    out
}

/// Every tab, each under its own heading
pub fn render_all(result: &AnalysisResult) -> String {
    Tab::ALL
        .iter()
        .map(|tab| format!("== {} ==\n{}", tab, render_tab(result, *tab)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_snapshot(snapshot: &AnalysisSnapshot, tab: Tab) -> String {
    format!(
        "{} (analyzed {})\n== {} ==\n{}",
        snapshot.file_name,
        snapshot.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        tab,
        render_tab(&snapshot.payload.result, tab)
    )
}

fn write_overview(out: &mut String, result: &AnalysisResult) -> fmt::Result {
    writeln!(out, "{}", score_line("Completeness", result.completeness))?;
    match result.ats_score {
        Some(score) => writeln!(out, "{}", score_line("ATS score", score))?,
        None => writeln!(out, "{:<14} n/a", "ATS score")?,
    }
    writeln!(out)?;
    writeln!(out, "Skills detected:   {}", result.skills_detected.len())?;
    writeln!(out, "Sections found:    {}", result.found_sections.len())?;
    writeln!(out, "Sections missing:  {}", result.missing_sections.len())?;
    writeln!(out, "Suggestions:       {}", result.suggestions.len())?;

    if !result.top_words.is_empty() {
        let words: Vec<String> = result
            .top_words
            .iter()
            .take(TOP_WORDS_SHOWN)
            .map(|(word, count)| format!("{word} ({count})"))
            .collect();
        writeln!(out, "Top words:         {}", words.join(", "))?;
    }

    writeln!(out)?;
    writeln!(out, "Text snippet:")?;
    if result.text_snippet.trim().is_empty() {
        writeln!(out, "  (empty)")?;
    } else {
        for line in truncate_chars(result.text_snippet.trim(), SNIPPET_CHARS).lines() {
            writeln!(out, "  {line}")?;
        }
    }
    Ok(())
}

fn write_skills(out: &mut String, result: &AnalysisResult) -> fmt::Result {
    writeln!(out, "Detected skills ({}):", result.skills_detected.len())?;
    write_list(out, &result.skills_detected)?;

    writeln!(out)?;
    writeln!(
        out,
        "Skills by category ({}):",
        result.categorized_skill_count()
    )?;
    if result.skills_by_category.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (category, skills) in &result.skills_by_category {
        writeln!(out, "  {category}")?;
        for skill in skills {
            let percent = clamp_percent(skill.confidence * 100.0);
            writeln!(
                out,
                "    {:<20} {} {:>3}% {}",
                skill.skill,
                progress_bar(percent, 20),
                percent.round() as i64,
                ScoreBand::for_confidence(skill.confidence).label()
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Sections found ({}):", result.found_sections.len())?;
    write_list(out, &result.found_sections)?;
    writeln!(out, "Sections missing ({}):", result.missing_sections.len())?;
    write_list(out, &result.missing_sections)
}

fn write_ats(out: &mut String, result: &AnalysisResult) -> fmt::Result {
    match result.ats_score {
        Some(score) => writeln!(out, "{}", score_line("ATS score", score))?,
        None => writeln!(out, "{:<14} n/a", "ATS score")?,
    }

    writeln!(out)?;
    writeln!(
        out,
        "Checks passed: {}/{}",
        result.ats_checks_passed(),
        result.ats_checks.len()
    )?;
    for (check, passed) in &result.ats_checks {
        let mark = if *passed { "pass" } else { "FAIL" };
        writeln!(out, "  [{mark}] {}", humanize_key(check))?;
    }

    writeln!(out)?;
    writeln!(out, "Keyword analysis ({}):", result.keyword_analysis.len())?;
    if result.keyword_analysis.is_empty() {
        writeln!(out, "  (none)")?;
    } else {
        writeln!(
            out,
            "  {:<20} {:>6} {:>9} {:>7}",
            "Keyword", "Count", "Density", "Score"
        )?;
        for (keyword, stat) in &result.keyword_analysis {
            writeln!(
                out,
                "  {:<20} {:>6} {:>8.2}% {:>6.0}/100",
                keyword,
                stat.count,
                stat.density,
                clamp_percent(stat.score)
            )?;
        }
    }
    Ok(())
}

fn write_content(out: &mut String, result: &AnalysisResult) -> fmt::Result {
    let content = result.content();
    writeln!(out, "Word count:          {}", content.word_count)?;
    writeln!(out, "Action verbs:        {}", content.action_verb_count)?;
    writeln!(out, "Quantifiable items:  {}", content.number_count)?;
    writeln!(out)?;
    writeln!(out, "Issues ({}):", content.issues.len())?;
    write_list(out, &content.issues)
}

fn write_suggestions(out: &mut String, result: &AnalysisResult) -> fmt::Result {
    writeln!(out, "Suggestions ({}):", result.suggestions.len())?;
    if result.suggestions.is_empty() {
        return writeln!(out, "  (none)");
    }
    for (i, suggestion) in result.suggestions.iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, suggestion)?;
    }
    Ok(())
}

fn write_list(out: &mut String, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return writeln!(out, "  (none)");
    }
    for item in items {
        writeln!(out, "  - {item}")?;
    }
    Ok(())
}

// ===== Comparison and status =====

pub fn render_comparison(result: &ComparisonResult) -> String {
    let mut out = String::new();
    if result.comparison.is_empty() {
        out.push_str("No resumes in comparison\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<30} {:>7} {:>9} {:>10}  {}",
        "File", "Skills", "Sections", "ATS", "Top skills"
    );
    for summary in &result.comparison {
        let ats = match summary.ats_score {
            Some(score) => format!("{:.0} {}", clamp_percent(score), ScoreBand::for_score(score).color()),
            None => "n/a".to_string(),
        };
        let _ = writeln!(
            out,
            "{:<30} {:>7} {:>9} {:>10}  {}",
            truncate_chars(&summary.filename, 29),
            summary.skills_count,
            summary.sections_count,
            ats,
            summary.skills.join(", ")
        );
    }

    if let Some(best) = result.best_by_ats() {
        let _ = writeln!(out, "\nHighest ATS score: {}", best.filename);
    }
    out
}

/// One-line summary of the session for the interactive shell.
pub fn render_status(session: &Session) -> String {
    let files: Vec<&str> = session
        .files()
        .iter()
        .map(|f| f.file_name.as_str())
        .collect();
    let busy = |slot| {
        session
            .busy_with(slot)
            .map(|action| action.name())
            .unwrap_or("idle")
    };

    format!(
        "mode={:?} tab={} files=[{}] loading={} downloading={} analysis={} comparison={}",
        session.mode(),
        session.active_tab(),
        files.join(", "),
        busy(Slot::Loading),
        busy(Slot::Downloading),
        session
            .analysis()
            .map(|a| a.file_name.as_str())
            .unwrap_or("none"),
        session
            .comparison()
            .map(|c| c.comparison.len().to_string())
            .unwrap_or_else(|| "none".to_string())
    )
}
