//! Wire-facing call surface for notevault hosts.

pub mod api;

pub use api::{
    core_version, init_logging, NotesBackend, ACCESS_DENIED_MESSAGE, NOTE_NOT_FOUND_MESSAGE,
    NO_NOTE_ID,
};
