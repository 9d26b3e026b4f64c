//! Formatted output helpers for CLI commands.

use berth_common::types::RentalRecord;
use berth_runtime::RuntimeContainer;

/// Shortens an engine handle to the familiar 12-character form.
/// Handles that are not plain hex (or whose cut would split a
/// multibyte character) are shown whole.
#[must_use]
pub fn short_handle(handle: &str) -> &str {
    handle.get(..12).unwrap_or(handle)
}

/// Prints rental records as a table.
pub fn print_records(records: &[RentalRecord]) {
    if records.is_empty() {
        println!("No rentals found.");
        return;
    }
    println!(
        "{:<36} {:<12} {:<10} {:<14} {:<20}",
        "RENTAL ID", "USER", "STATUS", "CONTAINER", "IMAGE"
    );
    for r in records {
        println!(
            "{:<36} {:<12} {:<10} {:<14} {:<20}",
            r.id,
            r.user_id,
            r.status,
            r.container_ref
                .as_ref()
                .map_or("-", |c| short_handle(c.as_str())),
            r.image
        );
    }
}

/// Prints the engine inventory as a table.
pub fn print_containers(containers: &[RuntimeContainer]) {
    if containers.is_empty() {
        println!("No containers found.");
        return;
    }
    println!("{:<14} {:<10} {:<30}", "CONTAINER", "STATE", "IMAGE");
    for c in containers {
        println!(
            "{:<14} {:<10} {:<30}",
            short_handle(c.id.as_str()),
            c.status,
            c.image
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_handle_truncates_long_ids() {
        assert_eq!(
            short_handle("0123456789abcdef0123456789abcdef"),
            "0123456789ab"
        );
    }

    #[test]
    fn short_handle_keeps_short_ids() {
        assert_eq!(short_handle("abc"), "abc");
    }

    #[test]
    fn short_handle_survives_multibyte_input() {
        // A hand-edited index can hold arbitrary UTF-8; byte 12 here
        // falls inside a two-byte character.
        assert_eq!(short_handle("0123456789aéxyz"), "0123456789aéxyz");
    }
}
