use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "clinic")]
#[command(about = "Inspect and edit the local overlay over bundled clinic records", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print records as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the effective records for an entity type
    #[command(alias = "ls")]
    List {
        /// appointments, invoices or patients
        entity: String,
    },

    /// Create a record from a JSON object (an empty or missing id gets one generated)
    #[command(alias = "n")]
    Create {
        entity: String,

        /// The record as JSON, e.g. '{"name":"Bob","dateOfBirth":"1990-07-04","lastVisit":null}'
        record: String,
    },

    /// Merge a JSON object of field changes into a record
    #[command(alias = "u")]
    Update {
        entity: String,

        id: String,

        /// Field changes as JSON, e.g. '{"status":"paid"}'
        patch: String,
    },

    /// Delete a record
    #[command(alias = "rm")]
    Delete { entity: String, id: String },

    /// Drop all local edits for an entity type
    Clear { entity: String },

    /// Show locally deleted ids
    Tombstones { entity: String },
}
