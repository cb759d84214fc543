//! # Drawing migration
//!
//! Rewrites stored `drawingData` into the current paged format.
//!
//! ## Why
//!
//! Notes saved before multi-page support hold a single bare buffer. Loading still
//! understands them, but every load pays for the format sniffing and the stored
//! pages keep their pruned-away empty strokes.
//!
//! ## Steps
//!
//! 1. Walk every user in the `note-users` set.
//! 2. For each handwritten note, run `drawingData` through load then save.
//! 3. Write the note back only when the normalized form differs.
//!
//! Rewritten notes keep their `updatedAt`, a migration is not an edit.
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use ink::{CanvasSize, persistence};
use server::{
    database::Store,
    models::{Note, NoteKind},
};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub users: usize,
    pub handwritten: usize,
    pub rewritten: usize,
}

pub async fn migrate_drawings(store: &Store, size: CanvasSize, dry_run: bool) -> Result<Report> {
    let users = store.users().await?;
    let mut report = Report {
        users: users.len(),
        ..Report::default()
    };

    let pb = ProgressBar::new(users.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );

    for user in users {
        pb.set_message(format!("Migrating {user}"));

        for mut note in store.list_notes(&user).await? {
            if note.kind != NoteKind::Handwritten {
                continue;
            }
            report.handwritten += 1;

            if !normalize_note(&mut note, size) {
                continue;
            }
            report.rewritten += 1;

            if !dry_run {
                store.put_note(&user, &note).await?;
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Done");
    Ok(report)
}

/// Returns whether the note changed.
pub fn normalize_note(note: &mut Note, size: CanvasSize) -> bool {
    let drawing_data = persistence::normalize(note.drawing_data.as_deref(), size);
    let changed = note.drawing_data.as_deref() != Some(drawing_data.as_str())
        || note.content != persistence::HANDWRITTEN_CONTENT;

    if changed {
        note.drawing_data = Some(drawing_data);
        note.content = persistence::HANDWRITTEN_CONTENT.to_string();
    }

    changed
}
