// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command line definition.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use letterhead_core::{AppConfig, ExportFormat, TemplateKind};

/// Compose letters and export them onto HRT or TRT letterhead.
#[derive(Debug, Parser)]
#[command(name = "letterhead", version, about)]
pub struct Cli {
    /// Data directory (database, config.json, assets).
    #[arg(long, global = true, env = "LETTERHEAD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory holding hrt_letterhead.png and trt_letterhead.png.
    #[arg(long, global = true, env = "LETTERHEAD_ASSETS_DIR")]
    pub assets_dir: Option<PathBuf>,

    /// TrueType/OpenType font for body text in PDF export.
    #[arg(long, global = true, env = "LETTERHEAD_BODY_FONT")]
    pub body_font: Option<PathBuf>,

    /// Bold font for the signer name in PDF export.
    #[arg(long, global = true, env = "LETTERHEAD_BOLD_FONT")]
    pub bold_font: Option<PathBuf>,

    /// Prefix for exported filenames.
    #[arg(long, global = true, env = "LETTERHEAD_FILENAME_PREFIX")]
    pub filename_prefix: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Flags take precedence over config.json.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.assets_dir {
            config.assets_dir = Some(dir.clone());
        }
        if let Some(font) = &self.body_font {
            config.body_font = Some(font.clone());
        }
        if let Some(font) = &self.bold_font {
            config.bold_font = Some(font.clone());
        }
        if let Some(prefix) = &self.filename_prefix {
            config.filename_prefix = prefix.clone();
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Export the letter in one or more formats.
    Export(ExportArgs),
    /// Show how the letter paginates.
    Preview(PreviewArgs),
    /// Type or pipe a letter on stdin; it is autosaved as a draft.
    Compose(ComposeArgs),
    /// Copy the letter body to the clipboard (standard output).
    Copy(LetterArgs),
    /// Inspect, restore, or discard the saved draft.
    #[command(subcommand)]
    Draft(DraftCommand),
    /// Manage the signer roster.
    #[command(subcommand)]
    Signers(SignerCommand),
    /// List the built-in quick templates.
    Snippets,
    /// Show or change preferences.
    #[command(subcommand)]
    Prefs(PrefsCommand),
    /// Show or write config.json.
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Where the letter comes from and how it is closed.
#[derive(Debug, Args)]
pub struct LetterArgs {
    /// Read the body from a file.
    #[arg(long, conflicts_with_all = ["snippet", "stdin"])]
    pub body_file: Option<PathBuf>,

    /// Start from a quick template (see `letterhead snippets`).
    #[arg(long, conflicts_with = "stdin")]
    pub snippet: Option<String>,

    /// Read the body from standard input.
    #[arg(long)]
    pub stdin: bool,

    /// HRT or TRT. Defaults to the draft's template, then the configured one.
    #[arg(short, long, value_parser = parse_template)]
    pub template: Option<TemplateKind>,

    /// Signer name or id.
    #[arg(short, long)]
    pub signer: Option<String>,

    /// Leave the letter unsigned even if the draft has a signer.
    #[arg(long, conflicts_with = "signer")]
    pub unsigned: bool,

    /// Date used in filenames and quick templates (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub letter: LetterArgs,

    /// pdf, doc, txt, rtf or html. Repeat for several formats.
    #[arg(short, long = "format", value_parser = parse_format, default_value = "pdf")]
    pub formats: Vec<ExportFormat>,

    /// Export every format.
    #[arg(long, conflicts_with = "formats")]
    pub all: bool,

    /// Output directory. Defaults to the configured export directory.
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub letter: LetterArgs,

    /// Print the page markup instead of a summary.
    #[arg(long)]
    pub markup: bool,
}

#[derive(Debug, Args)]
pub struct ComposeArgs {
    #[arg(short, long, value_parser = parse_template)]
    pub template: Option<TemplateKind>,

    /// Signer name or id.
    #[arg(short, long)]
    pub signer: Option<String>,

    /// Continue from the saved draft instead of starting empty.
    #[arg(long)]
    pub resume: bool,
}

#[derive(Debug, Subcommand)]
pub enum DraftCommand {
    /// Show the saved draft without touching it.
    Show,
    /// Restore the saved draft as the current letter and print its body.
    Restore,
    /// Delete the saved draft.
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum SignerCommand {
    List,
    Add { name: String, title: String },
    /// Remove by name or id.
    Remove { signer: String },
}

#[derive(Debug, Subcommand)]
pub enum PrefsCommand {
    Show,
    DarkMode {
        #[arg(action = clap::ArgAction::Set, value_parser = clap::builder::BoolishValueParser::new())]
        enabled: bool,
    },
    /// Preview zoom, clamped to 0.6–1.5.
    Zoom { factor: f32 },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration.
    Show,
    /// Write the effective configuration to config.json.
    Save,
}

fn parse_template(raw: &str) -> Result<TemplateKind, String> {
    TemplateKind::from_label(raw).ok_or_else(|| format!("unknown template '{raw}' (expected HRT or TRT)"))
}

fn parse_format(raw: &str) -> Result<ExportFormat, String> {
    ExportFormat::from_extension(raw).ok_or_else(|| format!("unknown format '{raw}' (expected pdf, doc, txt, rtf or html)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_export_with_formats() {
        let cli = Cli::try_parse_from([
            "letterhead", "export", "--snippet", "prescription", "-t", "trt", "-f", "pdf", "-f", "rtf",
        ])
        .expect("parse");
        let Command::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.formats, vec![ExportFormat::Pdf, ExportFormat::Rtf]);
        assert_eq!(args.letter.template, Some(TemplateKind::Trt));
        assert_eq!(args.letter.snippet.as_deref(), Some("prescription"));
    }

    #[test]
    fn rejects_unknown_template() {
        assert!(Cli::try_parse_from(["letterhead", "preview", "-t", "xyz"]).is_err());
    }

    #[test]
    fn overrides_apply_to_config() {
        let cli = Cli::try_parse_from(["letterhead", "--filename-prefix", "clinic", "snippets"]).expect("parse");
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.filename_prefix, "clinic");
        assert_eq!(config.assets_dir, None);
    }
}
