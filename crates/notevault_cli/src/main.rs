//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `notevault_core`/`notevault_api` wiring outside any host runtime.
//! - Replay a fixed owner/writer session and print the final note as JSON.
//!
//! Usage: `notevault_cli [config.json]`

use log::info;
use notevault_api::{NotesBackend, NO_NOTE_ID};
use notevault_core::{init_logging_from_config, CoreConfig, NoteStore, Permission, Principal};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("notevault_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = match std::env::args().nth(1) {
        Some(path) => CoreConfig::load(&path).map_err(|err| err.to_string())?,
        None => CoreConfig::default(),
    };
    if init_logging_from_config(&config)? {
        info!("event=cli_start module=cli status=ok");
    }

    println!("notevault_core version={}", notevault_api::core_version());

    let mut backend = NotesBackend::from_store(NoteStore::with_config(
        &config,
        notevault_core::SystemClock,
    ));
    let owner = Principal::from("cli-owner");
    let writer = Principal::from("cli-writer");

    let id = backend.add_note(&owner, "Hi".to_string(), "v1".to_string());
    if id == NO_NOTE_ID {
        return Err("no note id could be issued".to_string());
    }
    backend
        .update_note(&owner, id, "Hi".to_string(), "v2".to_string())
        .ok_or_else(|| format!("owner update of note {id} failed"))?;
    backend
        .share_note(&owner, id, writer.clone(), Permission::Write)
        .ok_or_else(|| format!("share of note {id} failed"))?;
    backend
        .update_note(&writer, id, "Hi".to_string(), "v3".to_string())
        .ok_or_else(|| format!("writer update of note {id} failed"))?;
    if backend.delete_note(&writer, id).is_some() {
        return Err("writer was able to delete a note it does not own".to_string());
    }
    let note = backend
        .revert_to_version(&owner, id, 0)
        .ok_or_else(|| format!("revert of note {id} failed"))?;

    let json = serde_json::to_string_pretty(&note).map_err(|err| err.to_string())?;
    println!("{json}");
    Ok(())
}
