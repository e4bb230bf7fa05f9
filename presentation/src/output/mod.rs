//! Terminal rendering of transcripts and snapshots

pub mod console;
