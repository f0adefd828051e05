use fractic_server_error::{define_client_error, define_internal_error};

// IO-related.
define_client_error!(ReadError, "Error reading file.");
define_internal_error!(WriteError, "Error writing file '{path}'.", { path: &str });

// Parsing-related.
define_client_error!(InvalidJson, "Invalid {json_type} (invalid JSON format).", { json_type: &str });
define_client_error!(InvalidRon, "Invalid {ron_type} (invalid RON format).", { ron_type: &str });

// Serialization-related.
define_internal_error!(InvalidSnapshot, "Snapshot could not be serialized.");
define_internal_error!(CsvWriteError, "Error writing CSV export.");

// Scheduling-related.
define_internal_error!(
    BackgroundTaskFailed,
    "Background task '{task}' did not complete.",
    { task: &str }
);
