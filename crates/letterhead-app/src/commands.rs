// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command handlers. Each builds a session from the services, applies the
// command, and prints the result on stdout.

use std::time::Instant;

use chrono::{Local, NaiveDate};
use letterhead_core::ExportFormat;
use letterhead_core::error::Result;
use letterhead_document::RenderedDocument;
use letterhead_document::export::markup::render_markup;
use letterhead_document::snippets::SNIPPETS;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::{debug, info};

use crate::cli::{
    Command, ComposeArgs, ConfigCommand, DraftCommand, ExportArgs, LetterArgs, PrefsCommand, PreviewArgs,
    SignerCommand,
};
use crate::services::app_services::AppServices;
use crate::services::ports::StdoutClipboard;
use crate::session::LetterSession;

pub async fn run(command: Command, svc: &AppServices) -> Result<()> {
    match command {
        Command::Export(args) => export(args, svc).await,
        Command::Preview(args) => preview(args, svc).await,
        Command::Compose(args) => compose(args, svc).await,
        Command::Copy(args) => copy(args, svc).await,
        Command::Draft(cmd) => draft(cmd, svc),
        Command::Signers(cmd) => signers(cmd, svc),
        Command::Snippets => {
            for snippet in &SNIPPETS {
                println!("{:<22} {}", snippet.key, snippet.label);
            }
            Ok(())
        }
        Command::Prefs(cmd) => prefs(cmd, svc),
        Command::Config(cmd) => config(cmd, svc),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Fill the session from the command line: an explicit body source, else a
/// copy of the saved draft. The saved draft itself is left untouched.
async fn load_letter(session: &mut LetterSession, args: &LetterArgs, date: NaiveDate) -> Result<()> {
    if let Some(path) = &args.body_file {
        session.set_body(tokio::fs::read_to_string(path).await?);
    } else if let Some(name) = &args.snippet {
        session.apply_snippet(name, date)?;
    } else if args.stdin {
        let mut body = String::new();
        tokio::io::stdin().read_to_string(&mut body).await?;
        session.set_body(body);
    } else if let Some(draft) = session.pending_restore().cloned() {
        debug!("using saved draft");
        session.set_template(draft.template_kind);
        if let Some(id) = draft.selected_signer_id
            && session.signers().get(id).is_some()
        {
            session.select_signer(Some(&id.to_string()))?;
        }
        session.set_body(draft.body);
        session.dismiss_draft();
    }

    if let Some(template) = args.template {
        session.set_template(template);
    }
    if args.unsigned {
        session.select_signer(None)?;
    } else if let Some(signer) = &args.signer {
        session.select_signer(Some(signer))?;
    }

    session.cancel_autosave();
    Ok(())
}

/// Caption and warnings, on stderr so stdout stays clean for piping.
fn report_view(doc: &RenderedDocument) {
    eprintln!("{}", doc.caption());
    for warning in doc.warnings() {
        eprintln!("warning: {}", warning.message());
    }
}

async fn export(args: ExportArgs, svc: &AppServices) -> Result<()> {
    let date = args.letter.date.unwrap_or_else(today);
    let mut session = svc.session();
    load_letter(&mut session, &args.letter, date).await?;

    let doc = session.derive_view();
    report_view(&doc);

    let formats = if args.all {
        ExportFormat::ALL.to_vec()
    } else {
        args.formats
    };

    let mut svc = svc.clone();
    if let Some(out) = args.out {
        svc.config_mut().export_dir = Some(out);
    }
    let service = svc.export_service();

    for format in formats {
        let (artifact, path) = service.export(format, &doc, date).await?;
        println!(
            "{}\t{}\t{} bytes\tsha256:{}",
            path.display(),
            artifact.mime_type,
            artifact.len(),
            artifact.sha256
        );
    }
    Ok(())
}

async fn preview(args: PreviewArgs, svc: &AppServices) -> Result<()> {
    let date = args.letter.date.unwrap_or_else(today);
    let mut session = svc.session();
    load_letter(&mut session, &args.letter, date).await?;
    let doc = session.derive_view();

    if args.markup {
        print!("{}", render_markup(&doc));
        return Ok(());
    }

    println!("{}", doc.caption());
    for warning in doc.warnings() {
        println!("warning: {}", warning.message());
    }
    for page in doc.pages() {
        let frame = if page.is_first { "letterhead" } else { "continuation" };
        let signed = page.signer.as_ref().map(|s| format!(", signed by {}", s.name)).unwrap_or_default();
        println!(
            "page {:>2}: {:>5} chars ({frame}{signed})",
            page.index + 1,
            page.body.chars().count()
        );
    }
    println!(
        "{} characters, preview zoom {:.0}%",
        doc.char_count(),
        session.zoom().factor() * 100.0
    );
    Ok(())
}

async fn compose(args: ComposeArgs, svc: &AppServices) -> Result<()> {
    let mut session = svc.session();
    if args.resume {
        session.restore_draft();
    } else {
        session.dismiss_draft();
    }
    if let Some(template) = args.template {
        session.set_template(template);
    }
    if let Some(signer) = &args.signer {
        session.select_signer(Some(signer))?;
    }

    // Every line is an edit; the autosaver coalesces them.
    let mut body = session.body().to_owned();
    let mut started = !body.is_empty();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if started {
            body.push('\n');
        }
        started = true;
        body.push_str(&line);
        session.set_body(body.clone());
    }

    let saved = session.flush();
    let doc = session.derive_view();
    report_view(&doc);
    let signer = session.selected_signer().map(|s| s.name.as_str()).unwrap_or("none");
    eprintln!("template: {}, signer: {signer}", session.template());
    info!(saved, chars = doc.char_count(), "compose finished");
    println!("{}", if saved { "Draft saved." } else { "Nothing to save." });
    Ok(())
}

async fn copy(args: LetterArgs, svc: &AppServices) -> Result<()> {
    let date = args.date.unwrap_or_else(today);
    let mut session = svc.session();
    load_letter(&mut session, &args, date).await?;

    let now = Instant::now();
    let result = session.copy_body(&StdoutClipboard, now);
    if let Some(status) = session.status(now) {
        eprintln!("{status}");
    }
    result
}

fn draft(cmd: DraftCommand, svc: &AppServices) -> Result<()> {
    match cmd {
        DraftCommand::Show => {
            let session = svc.session();
            match session.pending_restore() {
                Some(draft) => {
                    let signer = draft
                        .selected_signer_id
                        .and_then(|id| session.signers().get(id))
                        .map(|s| s.name.as_str())
                        .unwrap_or("none");
                    println!("saved:    {}", draft.saved_at.to_rfc3339());
                    println!("template: {}", draft.template_kind);
                    println!("signer:   {signer}");
                    println!("length:   {} characters", draft.body.chars().count());
                    println!();
                    println!("{}", draft.body);
                }
                None => println!("No saved draft."),
            }
        }
        DraftCommand::Restore => {
            let mut session = svc.session();
            if session.restore_draft() {
                session.flush();
                print!("{}", session.body());
            } else {
                eprintln!("No saved draft.");
            }
        }
        DraftCommand::Clear => {
            svc.drafts().clear();
            println!("Draft cleared.");
        }
    }
    Ok(())
}

fn signers(cmd: SignerCommand, svc: &AppServices) -> Result<()> {
    let mut session = svc.session();
    match cmd {
        SignerCommand::List => {
            for signer in session.signers().signers() {
                println!("{}  {:<24} {}", signer.id, signer.name, signer.title);
            }
        }
        SignerCommand::Add { name, title } => {
            let id = session.add_signer(&name, &title)?;
            println!("{id}");
        }
        SignerCommand::Remove { signer } => {
            let removed = session.remove_signer(&signer)?;
            println!("Removed {} ({}).", removed.name, removed.title);
        }
    }
    Ok(())
}

fn prefs(cmd: PrefsCommand, svc: &AppServices) -> Result<()> {
    let mut session = svc.session();
    match cmd {
        PrefsCommand::Show => {}
        PrefsCommand::DarkMode { enabled } => session.set_dark_mode(enabled),
        PrefsCommand::Zoom { factor } => {
            session.set_zoom(factor);
        }
    }
    println!("dark mode:    {}", if session.dark_mode() { "on" } else { "off" });
    println!("preview zoom: {:.0}%", session.zoom().factor() * 100.0);
    Ok(())
}

fn config(cmd: ConfigCommand, svc: &AppServices) -> Result<()> {
    match cmd {
        ConfigCommand::Show => println!("{}", serde_json::to_string_pretty(svc.config())?),
        ConfigCommand::Save => {
            svc.save_config()?;
            println!("Wrote {}", svc.data_dir().join("config.json").display());
        }
    }
    Ok(())
}
