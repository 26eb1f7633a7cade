//! Output formatters: colored console text, JSON and Markdown

use crate::batch::BatchSummary;
use crate::catalog::PositionRequirement;
use crate::config::{OutputConfig, OutputFormat};
use crate::error::Result;
use crate::output::report::{Report, ReportContent};
use crate::planning::{ImprovementPlan, Priority, ReadinessLevel, SkillGapReport};
use crate::profile::ExtractedProfile;
use crate::scoring::{ModelStatus, PredictionResult, RuleVerdict, SuitabilityLabel};
use crate::taxonomy::SkillId;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

pub trait OutputFormatter {
    fn format_report(&self, report: &Report) -> Result<String>;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Picks the formatter for the configured output format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn join_skills(skills: &[SkillId]) -> String {
    skills.iter().map(SkillId::as_str).collect::<Vec<_>>().join(", ")
}

fn percent(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

fn format_money(amount: f64) -> String {
    format!("${:.0}", amount)
}

fn model_status_text(status: &ModelStatus) -> String {
    match status {
        ModelStatus::Available => "model scored".to_string(),
        ModelStatus::Unavailable(reason) => format!("model unavailable ({})", reason),
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_label_badge(&self, label: SuitabilityLabel) -> String {
        let (badge, color) = match label {
            SuitabilityLabel::Suitable => ("SUITABLE", Color::Green),
            SuitabilityLabel::NotSuitable => ("NOT SUITABLE", Color::Red),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_priority_icon(&self, priority: Priority) -> String {
        if self.use_colors {
            let icon = match priority {
                Priority::High => "🚨",
                Priority::Medium => "📋",
                Priority::Low => "💡",
            };
            format!("{} ", icon)
        } else {
            let text_icon = match priority {
                Priority::High => "[!]",
                Priority::Medium => "[*]",
                Priority::Low => "[-]",
            };
            format!("{} ", text_icon)
        }
    }

    fn readiness_color(level: ReadinessLevel) -> Color {
        match level {
            ReadinessLevel::HighlyReady => Color::Green,
            ReadinessLevel::ModeratelyReady => Color::BrightGreen,
            ReadinessLevel::NeedsDevelopment => Color::Yellow,
            ReadinessLevel::SignificantDevelopmentNeeded => Color::Red,
        }
    }

    fn format_profile(&self, extracted: &ExtractedProfile) -> String {
        let profile = &extracted.profile;
        let mut output = self.format_header("👤 Candidate Profile", 2);

        let name = profile.contact.name.as_deref().unwrap_or("(unknown)");
        output.push_str(&format!("Name: {}\n", self.colorize(name, Color::Cyan)));
        if let Some(email) = &profile.contact.email {
            output.push_str(&format!("Email: {}\n", email));
        }
        if let Some(phone) = &profile.contact.phone {
            output.push_str(&format!("Phone: {}\n", phone));
        }
        output.push_str(&format!("Experience: {:.1} years\n", profile.total_years));
        output.push_str(&format!("Education: {}\n", profile.highest_degree));

        let skills: Vec<&str> = profile.skills.iter().map(SkillId::as_str).collect();
        output.push_str(&format!("Skills ({}): {}\n", skills.len(), skills.join(", ")));
        if self.detailed {
            for (category, grouped) in &extracted.skills_by_category {
                let names: Vec<&str> = grouped.iter().map(SkillId::as_str).collect();
                let label = self.colorize(&category.to_string(), Color::Blue);
                output.push_str(&format!("  {}: {}\n", label, names.join(", ")));
            }
        }

        if !profile.certifications.is_empty() {
            output.push_str(&format!("Certifications: {}\n", profile.certifications.join("; ")));
        }
        if !profile.languages.is_empty() {
            output.push_str(&format!("Languages: {}\n", profile.languages.join(", ")));
        }
        if self.detailed && !profile.projects.is_empty() {
            output.push_str("Projects:\n");
            for project in &profile.projects {
                output.push_str(&format!("  • {}\n", project));
            }
        }

        if extracted.is_degraded() {
            let fields: Vec<String> = extracted.degraded.iter().map(|f| f.to_string()).collect();
            output.push_str(&format!(
                "{} {}\n",
                self.colorize("⚠️  Not found, defaulted:", Color::Yellow),
                fields.join(", ")
            ));
        }

        output
    }

    fn format_prediction(&self, prediction: &PredictionResult) -> String {
        let mut output = self.format_header("🎯 Suitability", 2);
        output.push_str(&format!(
            "Position: {} {}\n",
            prediction.position_id,
            self.format_label_badge(prediction.label)
        ));
        output.push_str(&format!(
            "Confidence: {} ({})\n",
            percent(prediction.confidence),
            model_status_text(&prediction.model_status)
        ));

        let verdict = match prediction.rule_verdict {
            RuleVerdict::Pass => self.colorize("pass", Color::Green),
            RuleVerdict::Fail => self.colorize("fail", Color::Red),
        };
        output.push_str(&format!("Rule checks: {}\n", verdict));
        for failure in &prediction.rule_failures {
            output.push_str(&format!("  • {}\n", self.colorize(&failure.to_string(), Color::Red)));
        }

        output.push_str(&format!(
            "{} {}\n",
            self.colorize("Recommendation:", Color::Cyan),
            prediction.recommendation_text
        ));
        output
    }

    fn format_gap(&self, report: &SkillGapReport) -> String {
        let mut output = self.format_header(&format!("📊 Skill Gaps for {}", report.position_title), 2);

        let readiness = &report.readiness;
        output.push_str(&format!(
            "Readiness: {:.1}% {}\n",
            readiness.score,
            self.colorize(&readiness.level.to_string(), Self::readiness_color(readiness.level))
        ));
        output.push_str(&format!("Career level: {}\n", report.career_level));
        output.push_str(&format!(
            "Completion: required {:.1}% | advanced {:.1}% | tools {:.1}%\n",
            report.completion.required, report.completion.advanced, report.completion.tools
        ));

        let tiers = [
            ("Required", &report.missing_required, Color::Red),
            ("Advanced", &report.missing_advanced, Color::Yellow),
            ("Tools", &report.missing_tools, Color::BrightBlack),
        ];
        for (name, missing, color) in tiers {
            if !missing.is_empty() {
                output.push_str(&format!(
                    "  Missing {}: {}\n",
                    name.to_lowercase(),
                    self.colorize(&join_skills(missing), color)
                ));
            }
        }

        if self.detailed {
            let present = [
                ("required", &report.present_required),
                ("advanced", &report.present_advanced),
                ("tools", &report.present_tools),
            ];
            for (name, skills) in present {
                if !skills.is_empty() {
                    output.push_str(&format!(
                        "  Present {}: {}\n",
                        name,
                        self.colorize(&join_skills(skills), Color::Green)
                    ));
                }
            }
        }

        if !report.has_gaps() {
            output.push_str(&format!("{}\n", self.colorize("✅ No skill gaps", Color::Green)));
        }
        output
    }

    fn format_plan(&self, plan: &ImprovementPlan) -> String {
        let mut output = self.format_header("🚀 Improvement Plan", 2);

        if plan.is_empty() {
            output.push_str(&format!("{}\n", self.colorize("Nothing to learn for this position", Color::Green)));
            return output;
        }

        output.push_str(&format!(
            "Time to readiness: {} | Total: {} weeks | Cost: {} (courses {}, certifications {})\n",
            self.colorize(&plan.time_to_readiness, Color::Cyan),
            plan.total_weeks,
            format_money(plan.estimated_cost.total),
            format_money(plan.estimated_cost.courses),
            format_money(plan.estimated_cost.certifications)
        ));

        for phase in &plan.phases {
            output.push_str(&self.format_header(
                &format!("{} ({}, {} weeks)", phase.focus, phase.duration, phase.weeks),
                3,
            ));
            for step in plan.steps.iter().filter(|s| s.priority == phase.priority) {
                output.push_str(&format!(
                    "  {}{} ({} weeks, {})\n",
                    self.format_priority_icon(step.priority),
                    step.action,
                    step.estimated_weeks,
                    format_money(step.total_cost())
                ));
                if self.detailed {
                    if let Some(cert) = &step.certification {
                        output.push_str(&format!("     Certification: {}\n", cert));
                    }
                    for course in &step.courses {
                        output.push_str(&format!("     Course: {}\n", course));
                    }
                }
            }
        }

        if !plan.recommended_certifications.is_empty() {
            output.push_str(&self.format_header("🏅 Recommended Certifications", 3));
            for cert in &plan.recommended_certifications {
                output.push_str(&format!("  • {}\n", cert));
            }
        }
        output
    }

    fn format_batch(&self, summary: &BatchSummary) -> String {
        let mut output = self.format_header(&format!("📦 Batch results for {}", summary.position_id), 2);
        output.push_str(&format!(
            "Candidates: {} | Evaluated: {} | Failed: {} | Suitable: {}\n\n",
            summary.total,
            summary.succeeded(),
            summary.failures.len(),
            self.colorize(&summary.suitable.to_string(), Color::Green)
        ));

        for evaluation in &summary.evaluations {
            let prediction = &evaluation.prediction;
            output.push_str(&format!(
                "  {} {} readiness {:.1}% | {}\n",
                self.format_label_badge(prediction.label),
                evaluation.source_file_name,
                evaluation.gap.readiness.score,
                prediction.recommendation_text
            ));
        }

        if !summary.failures.is_empty() {
            output.push_str(&self.format_header("❌ Failures", 3));
            for failure in &summary.failures {
                output.push_str(&format!(
                    "  {} {}: {}\n",
                    self.colorize(&format!("[{}]", failure.kind), Color::Red),
                    failure.source,
                    failure.message
                ));
            }
        }
        output
    }

    fn format_positions(&self, positions: &[PositionRequirement]) -> String {
        let mut output = String::new();
        for position in positions {
            output.push_str(&format!(
                "{} {}\n",
                self.colorize(&format!("{:<20}", position.id), Color::Cyan),
                position.title
            ));
            if self.detailed {
                let required: Vec<&str> = position.required_skills.iter().map(SkillId::as_str).collect();
                output.push_str(&format!("    required: {}\n", required.join(", ")));
                output.push_str(&format!(
                    "    minimum: {} years, {} degree\n",
                    position.min_years, position.min_education
                ));
            }
        }
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        let mut output = self.format_header(&report.title().to_uppercase(), 1);
        output.push_str(&format!(
            "Generated: {}",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        if let Some(source) = &report.metadata.source {
            output.push_str(&format!(" | Source: {}", source));
        }
        output.push('\n');

        match &report.content {
            ReportContent::Extraction(extracted) => output.push_str(&self.format_profile(extracted)),
            ReportContent::Prediction(prediction) => output.push_str(&self.format_prediction(prediction)),
            ReportContent::Gap(gap) => output.push_str(&self.format_gap(gap)),
            ReportContent::Plan { gap, plan } => {
                output.push_str(&self.format_gap(gap));
                output.push_str(&self.format_plan(plan));
            }
            ReportContent::Evaluation(evaluation) => {
                output.push_str(&self.format_profile(&evaluation.extracted));
                output.push_str(&self.format_prediction(&evaluation.prediction));
                output.push_str(&self.format_gap(&evaluation.gap));
                output.push_str(&self.format_plan(&evaluation.plan));
            }
            ReportContent::Batch(summary) => output.push_str(&self.format_batch(summary)),
            ReportContent::Positions(positions) => output.push_str(&self.format_positions(positions)),
        }

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn skill_list(skills: &[SkillId]) -> String {
        if skills.is_empty() {
            "-".to_string()
        } else {
            skills.iter().map(|s| format!("`{}`", s)).collect::<Vec<_>>().join(", ")
        }
    }

    fn markdown_label(label: SuitabilityLabel) -> &'static str {
        match label {
            SuitabilityLabel::Suitable => "🟢 Suitable",
            SuitabilityLabel::NotSuitable => "🔴 Not Suitable",
        }
    }

    fn profile_section(extracted: &ExtractedProfile) -> String {
        let profile = &extracted.profile;
        let mut output = String::from("## Candidate Profile\n\n");
        output.push_str("| Field | Value |\n|-------|-------|\n");
        output.push_str(&format!(
            "| Name | {} |\n",
            profile.contact.name.as_deref().unwrap_or("-")
        ));
        output.push_str(&format!(
            "| Email | {} |\n",
            profile.contact.email.as_deref().unwrap_or("-")
        ));
        output.push_str(&format!("| Experience | {:.1} years |\n", profile.total_years));
        output.push_str(&format!("| Education | {} |\n\n", profile.highest_degree));

        let skills: Vec<SkillId> = profile.skills.iter().cloned().collect();
        output.push_str(&format!("**Skills:** {}\n\n", Self::skill_list(&skills)));

        if !extracted.skills_by_category.is_empty() {
            output.push_str("| Category | Skills |\n|----------|--------|\n");
            for (category, grouped) in &extracted.skills_by_category {
                output.push_str(&format!("| {} | {} |\n", category, Self::skill_list(grouped)));
            }
            output.push('\n');
        }

        if !profile.certifications.is_empty() {
            output.push_str("**Certifications:**\n\n");
            for cert in &profile.certifications {
                output.push_str(&format!("- {}\n", cert));
            }
            output.push('\n');
        }
        if !profile.projects.is_empty() {
            output.push_str("**Projects:**\n\n");
            for project in &profile.projects {
                output.push_str(&format!("- {}\n", project));
            }
            output.push('\n');
        }
        if extracted.is_degraded() {
            let fields: Vec<String> = extracted.degraded.iter().map(|f| f.to_string()).collect();
            output.push_str(&format!("> Defaulted fields: {}\n\n", fields.join(", ")));
        }
        output
    }

    fn prediction_section(prediction: &PredictionResult) -> String {
        let mut output = String::from("## Suitability\n\n");
        output.push_str(&format!(
            "**{}** for `{}` with {} confidence ({})\n\n",
            Self::markdown_label(prediction.label),
            prediction.position_id,
            percent(prediction.confidence),
            model_status_text(&prediction.model_status)
        ));
        if !prediction.rule_failures.is_empty() {
            output.push_str("**Failed checks:**\n\n");
            for failure in &prediction.rule_failures {
                output.push_str(&format!("- {}\n", failure));
            }
            output.push('\n');
        }
        output.push_str(&format!("> {}\n\n", prediction.recommendation_text));
        output
    }

    fn gap_section(report: &SkillGapReport) -> String {
        let mut output = format!("## Skill Gaps: {}\n\n", report.position_title);
        output.push_str(&format!(
            "**Readiness:** {:.1}% ({}) | **Career level:** {}\n\n",
            report.readiness.score, report.readiness.level, report.career_level
        ));
        output.push_str("| Tier | Completion | Missing |\n|------|------------|---------|\n");
        output.push_str(&format!(
            "| Required | {:.1}% | {} |\n",
            report.completion.required,
            Self::skill_list(&report.missing_required)
        ));
        output.push_str(&format!(
            "| Advanced | {:.1}% | {} |\n",
            report.completion.advanced,
            Self::skill_list(&report.missing_advanced)
        ));
        output.push_str(&format!(
            "| Tools | {:.1}% | {} |\n\n",
            report.completion.tools,
            Self::skill_list(&report.missing_tools)
        ));
        output
    }

    fn plan_section(plan: &ImprovementPlan) -> String {
        let mut output = String::from("## Improvement Plan\n\n");
        if plan.is_empty() {
            output.push_str("No missing skills for this position.\n\n");
            return output;
        }

        output.push_str(&format!(
            "**Time to readiness:** {} | **Total weeks:** {} | **Estimated cost:** {}\n\n",
            plan.time_to_readiness,
            plan.total_weeks,
            format_money(plan.estimated_cost.total)
        ));
        output.push_str("| Priority | Action | Weeks | Course | Certification |\n");
        output.push_str("|----------|--------|-------|--------|---------------|\n");
        for step in &plan.steps {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                step.priority,
                step.action,
                step.estimated_weeks,
                format_money(step.course_cost),
                step.certification.as_deref().unwrap_or("-")
            ));
        }
        output.push('\n');

        for phase in &plan.phases {
            output.push_str(&format!("### {} ({})\n\n", phase.focus, phase.duration));
            output.push_str(&format!("{}\n\n", Self::skill_list(&phase.skills)));
        }

        if !plan.recommended_certifications.is_empty() {
            output.push_str("### Recommended Certifications\n\n");
            for cert in &plan.recommended_certifications {
                output.push_str(&format!("- {}\n", cert));
            }
            output.push('\n');
        }
        output
    }

    fn batch_section(summary: &BatchSummary) -> String {
        let mut output = format!("## Batch: `{}`\n\n", summary.position_id);
        output.push_str(&format!(
            "{} candidates, {} evaluated, {} failed, {} suitable\n\n",
            summary.total,
            summary.succeeded(),
            summary.failures.len(),
            summary.suitable
        ));
        output.push_str("| Candidate | Verdict | Confidence | Readiness |\n");
        output.push_str("|-----------|---------|------------|-----------|\n");
        for evaluation in &summary.evaluations {
            output.push_str(&format!(
                "| {} | {} | {} | {:.1}% |\n",
                evaluation.source_file_name,
                Self::markdown_label(evaluation.prediction.label),
                percent(evaluation.prediction.confidence),
                evaluation.gap.readiness.score
            ));
        }
        output.push('\n');

        if !summary.failures.is_empty() {
            output.push_str("### Failures\n\n");
            for failure in &summary.failures {
                output.push_str(&format!("- `{}` ({}): {}\n", failure.source, failure.kind, failure.message));
            }
            output.push('\n');
        }
        output
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        let mut output = format!("# {}\n\n", report.title());

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {}",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
            if let Some(source) = &report.metadata.source {
                output.push_str(&format!(" | **Source:** `{}`", source));
            }
            output.push_str("\n\n");
        }

        match &report.content {
            ReportContent::Extraction(extracted) => output.push_str(&Self::profile_section(extracted)),
            ReportContent::Prediction(prediction) => output.push_str(&Self::prediction_section(prediction)),
            ReportContent::Gap(gap) => output.push_str(&Self::gap_section(gap)),
            ReportContent::Plan { gap, plan } => {
                output.push_str(&Self::gap_section(gap));
                output.push_str(&Self::plan_section(plan));
            }
            ReportContent::Evaluation(evaluation) => {
                output.push_str(&Self::profile_section(&evaluation.extracted));
                output.push_str(&Self::prediction_section(&evaluation.prediction));
                output.push_str(&Self::gap_section(&evaluation.gap));
                output.push_str(&Self::plan_section(&evaluation.plan));
            }
            ReportContent::Batch(summary) => output.push_str(&Self::batch_section(summary)),
            ReportContent::Positions(positions) => {
                output.push_str("| Id | Title | Required skills | Min years |\n");
                output.push_str("|----|-------|-----------------|-----------|\n");
                for position in positions {
                    let required: Vec<SkillId> = position.required_skills.iter().cloned().collect();
                    output.push_str(&format!(
                        "| `{}` | {} | {} | {} |\n",
                        position.id,
                        position.title,
                        Self::skill_list(&required),
                        position.min_years
                    ));
                }
                output.push('\n');
            }
        }

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!(
                "*Generated by candidate-advisor v{}{}*\n",
                report.metadata.tool_version,
                if report.metadata.model_configured { " with a suitability model" } else { " (rule checks only)" }
            ));
        }

        Ok(output)
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(config.color_output, config.detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_detail(mut self, detailed: bool) -> Self {
        self.console_formatter.detailed = detailed;
        self
    }

    pub fn without_colors(mut self) -> Self {
        self.console_formatter.use_colors = false;
        self
    }

    pub fn generate_report(&self, report: &Report, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, source_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(source_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_report{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_report{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_report{}.md", base_name, timestamp_suffix),
    }
}

/// Where `--save` writes: the target itself, or a generated file name inside
/// it when the target is an existing directory.
pub fn resolve_report_path(target: &Path, format: OutputFormat, report: &Report) -> PathBuf {
    if !target.is_dir() {
        return target.to_path_buf();
    }
    let stem = report.metadata.source.as_deref().unwrap_or_else(|| report.kind());
    target.join(suggest_filename(format, stem, true))
}
